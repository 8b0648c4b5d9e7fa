use std::path::{Path, PathBuf};

use serde_yaml::Value;
use serde_yaml::mapping::Entry;

use crate::error::OverlayResult;
use crate::files;
use crate::strategy::{Strategy, parse_yaml};

/// Recursively merges an optional override document onto the base.
///
/// Mappings merge key by key with the override winning on
/// conflict. Everything else, sequences included, is replaced
/// wholesale. With no override the base is copied byte for byte.
///
/// A present override re-serializes the merged tree, so comments in
/// the base are dropped, along with any placeholder token written
/// inside one. `yq`'s `*` keeps base comments; this does not.
///
/// # Example
///
/// ```
/// use overlay::DeepMerge;
///
/// let merge = DeepMerge::new()
///     .override_file("/etc/prometheus/override.yml");
///
/// assert!(merge.override_path.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeepMerge {
    pub override_path: Option<PathBuf>,
}

impl DeepMerge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn override_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }
}

impl Strategy for DeepMerge {
    fn name(&self) -> &'static str {
        "deep-merge"
    }

    fn render(&self, base_path: &Path, base: &str) -> OverlayResult<String> {
        let Some(override_path) = self.override_path.as_deref() else {
            return Ok(base.to_string());
        };
        let Some(text) = files::read_optional(override_path)? else {
            return Ok(base.to_string());
        };

        let overlay = parse_yaml(override_path, &text)?;
        if overlay.is_null() {
            tracing::debug!(
                path = %override_path.display(),
                "override holds no document, copying base"
            );
            return Ok(base.to_string());
        }

        let mut doc = parse_yaml(base_path, base)?;
        merge(&mut doc, overlay);
        Ok(serde_yaml::to_string(&doc)?)
    }
}

/// Merge `overlay` into `base` in place.
///
/// Two mappings merge recursively; in every other combination the
/// overlay value replaces the base value.
pub fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.entry(key) {
                    Entry::Occupied(mut slot) => merge(slot.get_mut(), value),
                    Entry::Vacant(slot) => {
                        slot.insert(value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn nested_override_wins() {
        let mut base = yaml("a: 1\nb:\n  c: 2\n");
        merge(&mut base, yaml("b:\n  c: 3\n  d: 4\n"));

        assert_eq!(base, yaml("a: 1\nb:\n  c: 3\n  d: 4\n"));
    }

    #[test]
    fn sequences_replaced_wholesale() {
        let mut base = yaml("targets: [a, b, c]\n");
        merge(&mut base, yaml("targets: [z]\n"));

        assert_eq!(base, yaml("targets: [z]\n"));
    }

    #[test]
    fn scalar_replaces_mapping() {
        let mut base = yaml("storage:\n  tsdb:\n    path: /data\n");
        merge(&mut base, yaml("storage: none\n"));

        assert_eq!(base, yaml("storage: none\n"));
    }

    #[test]
    fn mapping_replaces_scalar() {
        let mut base = yaml("remote_write: ~\n");
        merge(&mut base, yaml("remote_write:\n  url: http://x\n"));

        assert_eq!(base, yaml("remote_write:\n  url: http://x\n"));
    }

    #[test]
    fn explicit_null_in_override_wins() {
        let mut base = yaml("a: 1\nb: 2\n");
        merge(&mut base, yaml("b: null\n"));

        assert_eq!(base, yaml("a: 1\nb: null\n"));
    }

    #[test]
    fn base_key_order_kept_new_keys_appended() {
        let mut base = yaml("z: 1\na: 2\n");
        merge(&mut base, yaml("m: 3\nz: 9\n"));

        let out = serde_yaml::to_string(&base).unwrap();
        assert_eq!(out, "z: 9\na: 2\nm: 3\n");
    }
}
