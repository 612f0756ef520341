use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::{Error, Result};

/// Merged answers of every prompt that produced a parseable JSON object for one
/// aggregate file. Keys keep the order in which prompts were applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationResult {
    entries: Vec<(String, Value)>,
}

impl ClassificationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the fragment for a prompt id.
    pub fn insert(&mut self, prompt_id: &str, fragment: Value) {
        if let Some(slot) = self.entries.iter_mut().find(|(id, _)| id == prompt_id) {
            slot.1 = fragment;
        } else {
            self.entries.push((prompt_id.to_string(), fragment));
        }
    }

    pub fn get(&self, prompt_id: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(id, _)| id == prompt_id)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty JSON with four-space indentation, non-ASCII kept verbatim.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(|e| Error::Storage(e.to_string()))
    }
}

impl Serialize for ClassificationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_keep_insertion_order() {
        let mut result = ClassificationResult::new();
        result.insert("governance_participants", json!({"mention_funders": "no"}));
        result.insert("development_team", json!({"mention_to_dev_team": "yes"}));
        result.insert("governance_participants", json!({"mention_funders": "yes"}));

        assert_eq!(
            result.keys().collect::<Vec<_>>(),
            vec!["governance_participants", "development_team"]
        );
        assert_eq!(
            result.get("governance_participants"),
            Some(&json!({"mention_funders": "yes"}))
        );
    }

    #[test]
    fn test_pretty_output() {
        let mut result = ClassificationResult::new();
        result.insert("tests_with_potential_users", json!({"mention_labor_force": "não"}));

        assert_eq!(
            result.to_json_pretty().unwrap(),
            "{\n    \"tests_with_potential_users\": {\n        \"mention_labor_force\": \"não\"\n    }\n}"
        );
        assert_eq!(ClassificationResult::new().to_json_pretty().unwrap(), "{}");
    }
}
