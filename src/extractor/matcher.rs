use crate::models::ContentEntry;

/// Case-insensitive file name prefixes selecting which root files to fetch.
#[derive(Debug, Clone)]
pub struct TargetMatcher {
    patterns: Vec<String>,
}

impl TargetMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.patterns.iter().any(|p| lower.starts_with(p.as_str()))
    }

    /// Only regular files are candidates; directories and submodules never match.
    pub fn is_target(&self, entry: &ContentEntry) -> bool {
        entry.is_file() && self.matches(&entry.name)
    }
}
