use glob::Pattern;

/// Matches web-accessible-resource declarations against archive entry names.
///
/// Patterns use shell-glob semantics (`*`, `?`, character classes); `*`
/// crosses `/` boundaries, so `*` alone whitelists every entry. Invalid
/// patterns are dropped at construction.
#[derive(Debug, Clone)]
pub struct ResourceMatcher {
    patterns: Vec<Pattern>,
}

impl ResourceMatcher {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .filter_map(|pattern| Pattern::new(pattern.as_ref()).ok())
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether any declared pattern matches the entry name.
    pub fn matches(&self, entry: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(entry))
    }
}
