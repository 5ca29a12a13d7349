use std::collections::HashSet;

/// An insertion-ordered, deduplicated sequence of script paths destined for
/// one output artifact (content scripts, background, or WARs).
#[derive(Debug, Default, Clone)]
pub struct ScriptBundle {
    paths: Vec<String>,
    seen: HashSet<String>,
}

impl ScriptBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a path unless it was already collected.
    /// Returns whether the path was added.
    pub fn push(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.paths.push(path);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
