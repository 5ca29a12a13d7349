/// Policy deciding which referenced scripts are worth embedding in the
/// extracted output.
///
/// Defaults: jquery library variants are dropped, non-`.js` references are
/// dropped, and `https://` references are dropped (they live outside the
/// package). Both lists are configuration; callers can extend them, e.g.
/// with an `http://` prefix.
#[derive(Debug, Clone)]
pub struct ScriptFilter {
    skip_substrings: Vec<String>,
    skip_prefixes: Vec<String>,
}

impl Default for ScriptFilter {
    fn default() -> Self {
        Self {
            skip_substrings: vec![
                "jquery".to_string(),
                "jq.min.js".to_string(),
                "jq.js".to_string(),
            ],
            skip_prefixes: vec!["https://".to_string()],
        }
    }
}

impl ScriptFilter {
    /// Adds a case-insensitive substring to the skip list.
    pub fn with_skip_substring(mut self, substring: impl Into<String>) -> Self {
        self.skip_substrings.push(substring.into().to_lowercase());
        self
    }

    /// Adds a literal prefix to the skip list.
    pub fn with_skip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.skip_prefixes.push(prefix.into());
        self
    }

    /// Whether a referenced script path should be kept for extraction.
    pub fn retains(&self, path: &str) -> bool {
        if !path.ends_with(".js") {
            return false;
        }
        if self
            .skip_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return false;
        }
        let lowered = path.to_lowercase();
        !self
            .skip_substrings
            .iter()
            .any(|substring| lowered.contains(substring.as_str()))
    }
}
