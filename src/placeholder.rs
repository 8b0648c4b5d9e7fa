use indexmap::IndexMap;

/// Literal tokens and the values they are replaced with in the
/// generated config.
///
/// Built once at the entrypoint boundary and handed to the
/// resolver; the library never reads the environment itself.
///
/// # Example
///
/// ```
/// use overlay::Placeholders;
///
/// let placeholders = Placeholders::new()
///     .set("__SERVER_LABEL__", "web-01");
///
/// assert_eq!(
///     placeholders.apply("host: __SERVER_LABEL__"),
///     "host: web-01"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    pub tokens: IndexMap<String, String>,
}

impl Placeholders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `token` to `value`. Setting the same token twice keeps
    /// the last value.
    #[must_use]
    pub fn set(mut self, token: &str, value: &str) -> Self {
        self.tokens.insert(token.to_string(), value.to_string());
        self
    }

    /// Build from `(token, variable)` pairs using `lookup` to
    /// resolve each variable. Tokens whose variable is unset are
    /// left out, so their text survives substitution untouched.
    #[must_use]
    pub fn resolve<F>(bindings: &[(String, String)], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut tokens = IndexMap::new();
        for (token, var) in bindings {
            if token.is_empty() {
                continue;
            }
            let Some(value) = lookup(var) else {
                tracing::debug!(%token, %var, "placeholder variable unset, token kept");
                continue;
            };
            tokens.insert(token.clone(), value);
        }
        Self { tokens }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Replace every occurrence of every token in one left-to-right
    /// pass. Replacement values are not rescanned. When two tokens
    /// match at the same position the longer one wins.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        if self.tokens.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while !rest.is_empty() {
            if let Some((token, value)) = self.longest_match(rest) {
                out.push_str(value);
                rest = &rest[token.len()..];
                continue;
            }

            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }

        out
    }

    fn longest_match(&self, text: &str) -> Option<(&str, &str)> {
        self.tokens
            .iter()
            .filter(|(token, _)| !token.is_empty() && text.starts_with(token.as_str()))
            .max_by_key(|(token, _)| token.len())
            .map(|(token, value)| (token.as_str(), value.as_str()))
    }
}
