use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::{OverlayError, OverlayResult};
use crate::files;
use crate::strategy::{Strategy, parse_yaml};

pub const DEFAULT_ENDPOINT: &str = "http://loki:3100/loki/api/v1/push";
pub const DEFAULT_MARKER: &str = "# EXTRA_SCRAPE_CONFIGS";
pub const DEFAULT_ENDPOINTS_KEY: &str = "clients";
pub const DEFAULT_EXTRA_KEY: &str = "scrape_configs";

/// How [`Splice`] assembles its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Layout {
    /// Parse the base and append entries at their key paths.
    ///
    /// The output is re-serialized, so comments in the base are
    /// dropped (the marker line included) and extra entries land at
    /// the end of the scrape list.
    Structured,
    /// Treat the base as text: append indented endpoints at the end
    /// and insert the extra fragment after the marker line.
    #[default]
    Marker,
}

/// Builds a log-shipper config: push endpoints plus optional extra
/// scrape entries on top of the base.
///
/// Endpoints come from the endpoints file when present, otherwise a
/// single default entry is used. The extra fragment, when present,
/// is added to the scrape list.
///
/// # Example
///
/// ```
/// use overlay::{Layout, Splice};
///
/// let splice = Splice::new()
///     .endpoints_file("/etc/promtail/clients.yml")
///     .extra_file("/etc/promtail/extra.yml")
///     .layout(Layout::Marker);
///
/// assert_eq!(splice.layout, Layout::Marker);
/// assert_eq!(splice.endpoints_key, "clients");
/// ```
#[derive(Debug, Clone)]
pub struct Splice {
    pub endpoints_path: Option<PathBuf>,
    pub extra_path: Option<PathBuf>,
    pub default_endpoint: String,
    pub marker: String,
    pub endpoints_key: String,
    pub extra_key: String,
    pub layout: Layout,
}

#[derive(Serialize)]
struct Endpoint<'a> {
    url: &'a str,
}

/// An optional input file that was present and non-empty.
struct Fragment<'a> {
    path: &'a Path,
    text: String,
}

impl Default for Splice {
    fn default() -> Self {
        Self {
            endpoints_path: None,
            extra_path: None,
            default_endpoint: DEFAULT_ENDPOINT.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            endpoints_key: DEFAULT_ENDPOINTS_KEY.to_string(),
            extra_key: DEFAULT_EXTRA_KEY.to_string(),
            layout: Layout::default(),
        }
    }
}

impl Splice {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn endpoints_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.endpoints_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn extra_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn default_endpoint(mut self, url: &str) -> Self {
        self.default_endpoint = url.to_string();
        self
    }

    #[must_use]
    pub fn marker(mut self, marker: &str) -> Self {
        self.marker = marker.to_string();
        self
    }

    /// Dotted key path of the endpoint list, e.g. `clients`.
    #[must_use]
    pub fn endpoints_key(mut self, key: &str) -> Self {
        self.endpoints_key = key.to_string();
        self
    }

    /// Dotted key path of the list extra entries are added to.
    #[must_use]
    pub fn extra_key(mut self, key: &str) -> Self {
        self.extra_key = key.to_string();
        self
    }

    #[must_use]
    pub const fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    fn render_structured(
        &self,
        base_path: &Path,
        base: &str,
        endpoints: Option<&Fragment<'_>>,
        extra: Option<&Fragment<'_>>,
    ) -> OverlayResult<String> {
        let mut doc = parse_yaml(base_path, base)?;

        let clients = match endpoints {
            Some(fragment) => entries(fragment)?,
            None => vec![serde_yaml::to_value(Endpoint {
                url: &self.default_endpoint,
            })?],
        };
        append_at(&mut doc, &self.endpoints_key, clients)?;

        if let Some(fragment) = extra {
            append_at(&mut doc, &self.extra_key, entries(fragment)?)?;
        }

        Ok(serde_yaml::to_string(&doc)?)
    }

    fn render_marker(
        &self,
        base: &str,
        endpoints: Option<&Fragment<'_>>,
        extra: Option<&Fragment<'_>>,
    ) -> OverlayResult<String> {
        let mut out = base.to_string();
        ensure_trailing_newline(&mut out);

        let clients = endpoints.map_or_else(
            || format!("  - url: {}\n", self.default_endpoint),
            |fragment| indent(&fragment.text, "  "),
        );
        out.push_str(&clients);

        if let Some(fragment) = extra {
            match insert_after_marker(&out, &self.marker, &fragment.text) {
                Some(spliced) => out = spliced,
                None => tracing::warn!(
                    marker = %self.marker,
                    "marker not found in base, extra fragment skipped"
                ),
            }
        }

        serde_yaml::from_str::<Value>(&out).map_err(|source| OverlayError::Render {
            strategy: self.name(),
            source,
        })?;
        Ok(out)
    }
}

impl Strategy for Splice {
    fn name(&self) -> &'static str {
        "splice"
    }

    fn render(&self, base_path: &Path, base: &str) -> OverlayResult<String> {
        let endpoints = read_present(self.endpoints_path.as_deref())?;
        let extra = read_present(self.extra_path.as_deref())?;

        match self.layout {
            Layout::Structured => {
                self.render_structured(base_path, base, endpoints.as_ref(), extra.as_ref())
            }
            Layout::Marker => self.render_marker(base, endpoints.as_ref(), extra.as_ref()),
        }
    }
}

fn read_present(path: Option<&Path>) -> OverlayResult<Option<Fragment<'_>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    Ok(files::read_optional(path)?.map(|text| Fragment { path, text }))
}

/// List entries held by a fragment: a sequence yields its items, a
/// single mapping yields itself, an empty document yields nothing.
fn entries(fragment: &Fragment<'_>) -> OverlayResult<Vec<Value>> {
    match parse_yaml(fragment.path, &fragment.text)? {
        Value::Sequence(items) => Ok(items),
        Value::Mapping(map) => Ok(vec![Value::Mapping(map)]),
        Value::Null => Ok(Vec::new()),
        _ => Err(OverlayError::Schema {
            path: fragment.path.display().to_string(),
            message: "expected a list of entries or a single mapping".into(),
        }),
    }
}

/// Append `items` to the sequence at the dotted `key_path`,
/// creating missing mappings along the way. A null leaf becomes
/// the list; any other non-list leaf is an error.
pub fn append_at(doc: &mut Value, key_path: &str, items: Vec<Value>) -> OverlayResult<()> {
    let schema_err = |message: &str| OverlayError::Schema {
        path: key_path.to_string(),
        message: message.to_string(),
    };

    let mut node = doc;
    for segment in key_path.split('.').filter(|s| !s.is_empty()) {
        if node.is_null() {
            *node = Value::Mapping(Mapping::new());
        }
        let Value::Mapping(map) = node else {
            return Err(schema_err("parent is not a mapping"));
        };
        node = map
            .entry(Value::String(segment.to_string()))
            .or_insert(Value::Null);
    }

    if node.is_null() {
        *node = Value::Sequence(items);
        return Ok(());
    }
    let Value::Sequence(existing) = node else {
        return Err(schema_err("not a list"));
    };
    existing.extend(items);
    Ok(())
}

fn ensure_trailing_newline(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

/// Prefix every line with `prefix`, terminating each with `\n`.
#[must_use]
pub fn indent(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len() + prefix.len() * 8);
    for line in text.lines() {
        out.push_str(prefix);
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Insert `fragment` right after the first line containing
/// `marker`. Returns `None` when no line contains it.
#[must_use]
pub fn insert_after_marker(text: &str, marker: &str, fragment: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len() + fragment.len() + 1);
    let mut inserted = false;

    for line in text.split_inclusive('\n') {
        out.push_str(line);
        if !inserted && line.contains(marker) {
            if !line.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(fragment);
            if !fragment.ends_with('\n') {
                out.push('\n');
            }
            inserted = true;
        }
    }

    inserted.then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_every_line() {
        assert_eq!(indent("- a\n- b", "  "), "  - a\n  - b\n");
    }

    #[test]
    fn marker_kept_and_fragment_follows() {
        let text = "a: 1\n# HERE\nb: 2\n";

        let out = insert_after_marker(text, "# HERE", "x: 3\n").unwrap();

        assert_eq!(out, "a: 1\n# HERE\nx: 3\nb: 2\n");
    }

    #[test]
    fn only_first_marker_used() {
        let text = "# HERE\n# HERE\n";

        let out = insert_after_marker(text, "# HERE", "x").unwrap();

        assert_eq!(out, "# HERE\nx\n# HERE\n");
    }

    #[test]
    fn missing_marker() {
        assert!(insert_after_marker("a: 1\n", "# HERE", "x").is_none());
    }

    #[test]
    fn append_creates_path() {
        let mut doc: Value = serde_yaml::from_str("server: {}\n").unwrap();

        append_at(&mut doc, "a.b", vec![Value::from(1)]).unwrap();

        let expected: Value = serde_yaml::from_str("server: {}\na:\n  b: [1]\n").unwrap();
        assert_eq!(doc, expected);
    }

    #[test]
    fn append_extends_existing() {
        let mut doc: Value = serde_yaml::from_str("clients:\n  - url: a\n").unwrap();

        append_at(&mut doc, "clients", vec![serde_yaml::from_str("url: b").unwrap()]).unwrap();

        let expected: Value = serde_yaml::from_str("clients:\n  - url: a\n  - url: b\n").unwrap();
        assert_eq!(doc, expected);
    }

    #[test]
    fn append_rejects_scalar_leaf() {
        let mut doc: Value = serde_yaml::from_str("clients: nope\n").unwrap();

        let err = append_at(&mut doc, "clients", Vec::new()).unwrap_err();

        assert!(matches!(err, OverlayError::Schema { .. }));
    }
}
