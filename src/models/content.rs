use serde::{Deserialize, Serialize};

/// An entry of the GitHub contents listing for a repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ContentEntry {
    pub fn file(name: &str, download_url: &str) -> Self {
        Self {
            name: name.to_string(),
            entry_type: "file".to_string(),
            download_url: Some(download_url.to_string()),
        }
    }

    pub fn dir(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entry_type: "dir".to_string(),
            download_url: None,
        }
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_listing_entry() {
        let raw = r#"{
            "name": "README.md",
            "path": "README.md",
            "sha": "abc",
            "size": 120,
            "type": "file",
            "download_url": "https://raw.githubusercontent.com/octocat/demo/main/README.md"
        }"#;
        let entry: ContentEntry = serde_json::from_str(raw).unwrap();
        assert!(entry.is_file());
        assert_eq!(entry.name, "README.md");

        let dir: ContentEntry =
            serde_json::from_str(r#"{"name": "src", "type": "dir", "download_url": null}"#).unwrap();
        assert!(!dir.is_file());
        assert!(dir.download_url.is_none());
    }
}
