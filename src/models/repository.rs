use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::aggregate::AggregateKey;

/// One unit of extraction work, as listed in the repositories file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub owner: String,
    pub name: String,
    pub language: String,
}

impl RepositoryRecord {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, language: &str) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            language: normalize_language(Some(language)),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn aggregate_key(&self) -> AggregateKey {
        AggregateKey::new(&self.language, format!("{}_{}", self.owner, self.name))
    }
}

#[derive(Debug, Deserialize)]
struct RepositoryList {
    repos: Vec<RepositoryEntry>,
}

#[derive(Debug, Deserialize)]
struct RepositoryEntry {
    owner: Option<String>,
    name: Option<String>,
    language: Option<String>,
}

fn normalize_language(language: Option<&str>) -> String {
    match language.map(str::trim) {
        Some(lang) if !lang.is_empty() => lang.to_lowercase(),
        _ => "unknown".to_string(),
    }
}

/// Reads `{"repos": [...]}`. A missing or malformed file is a configuration error;
/// individual entries without an owner or name are dropped with a warning.
pub fn load_repositories(path: &Path) -> Result<Vec<RepositoryRecord>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "cannot read repositories file {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_repositories(&raw)
}

pub fn parse_repositories(raw: &str) -> Result<Vec<RepositoryRecord>> {
    let list: RepositoryList = serde_json::from_str(raw)
        .map_err(|e| Error::Config(format!("malformed repositories file: {}", e)))?;

    let mut records = Vec::with_capacity(list.repos.len());
    for entry in list.repos {
        match (entry.owner, entry.name) {
            (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => {
                records.push(RepositoryRecord {
                    owner,
                    name,
                    language: normalize_language(entry.language.as_deref()),
                });
            }
            (owner, name) => {
                tracing::warn!(
                    action = "skipped",
                    "Skipping malformed repository entry (owner: {:?}, name: {:?})",
                    owner,
                    name
                );
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repositories() {
        let raw = r#"{"repos": [
            {"owner": "octocat", "name": "demo", "language": "Python"},
            {"owner": "octocat", "name": "demo2"},
            {"owner": "octocat"},
            {"name": "orphan", "language": "go"}
        ]}"#;

        let repos = parse_repositories(raw).unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0], RepositoryRecord::new("octocat", "demo", "python"));
        assert_eq!(repos[1].language, "unknown");
        assert_eq!(repos[0].full_name(), "octocat/demo");
    }

    #[test]
    fn test_malformed_list_is_fatal() {
        assert!(parse_repositories("not json").unwrap_err().is_fatal());
        assert!(parse_repositories(r#"{"repositories": []}"#).unwrap_err().is_fatal());
    }

    #[test]
    fn test_missing_list_is_fatal() {
        let err = load_repositories(Path::new("no/such/repositories.json")).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_aggregate_key() {
        let key = RepositoryRecord::new("octocat", "demo", "C#").aggregate_key();
        assert_eq!(key.language, "c#");
        assert_eq!(key.file_name(), "octocat_demo.txt");
    }
}
