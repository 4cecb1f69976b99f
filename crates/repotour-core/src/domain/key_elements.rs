//! Architecturally significant files and directories of a repository.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Result of key-element classification.
///
/// Both sets are ordered, so iteration and serialization are always sorted
/// and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyElements {
    pub key_files: BTreeSet<String>,
    pub key_directories: BTreeSet<String>,
}

impl KeyElements {
    pub fn is_empty(&self) -> bool {
        self.key_files.is_empty() && self.key_directories.is_empty()
    }

    /// Pretty JSON rendering used inside prompts.
    pub fn to_prompt_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_sorted_arrays() {
        let mut key = KeyElements::default();
        key.key_files.insert("setup.py".to_string());
        key.key_files.insert("README.md".to_string());
        key.key_directories.insert("src".to_string());

        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json["key_files"], serde_json::json!(["README.md", "setup.py"]));
        assert_eq!(json["key_directories"], serde_json::json!(["src"]));
    }
}
