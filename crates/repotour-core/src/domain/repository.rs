//! Repository identifier parsed from user input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::TourError;

/// `owner/name` pair identifying a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepositoryRef {
    type Err = TourError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = || TourError::InvalidRepository {
            input: input.to_string(),
        };

        let (owner, name) = input.split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }

        Ok(RepositoryRef {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_name() {
        let repo: RepositoryRef = "PyGithub/PyGithub".parse().unwrap();
        assert_eq!(repo.owner(), "PyGithub");
        assert_eq!(repo.name(), "PyGithub");
        assert_eq!(repo.to_string(), "PyGithub/PyGithub");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let repo: RepositoryRef = "  octo/widgets \n".parse().unwrap();
        assert_eq!(repo.to_string(), "octo/widgets");
    }

    #[test]
    fn rejects_missing_separator() {
        let err = "PyGithub".parse::<RepositoryRef>().unwrap_err();
        assert!(matches!(err, TourError::InvalidRepository { .. }));
        assert!(err.to_string().contains("owner/repo"));
    }

    #[test]
    fn rejects_empty_parts_and_extra_separators() {
        for input in ["/repo", "owner/", "/", "a/b/c", ""] {
            assert!(
                input.parse::<RepositoryRef>().is_err(),
                "{input:?} should be rejected"
            );
        }
    }
}
