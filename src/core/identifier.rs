//! Project identifier resolution.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{Error, Result};

static PROJECT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"projectID[0-9a-fA-F]+").unwrap());

/// A pgdp.net project identifier such as `projectID509579cf64be8`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Pull the identifier token out of arbitrary user input.
    ///
    /// Accepts a bare identifier, a full project URL or any text that
    /// contains the token. The first match wins.
    pub fn resolve(raw: &str) -> Result<Self> {
        PROJECT_ID_PATTERN
            .find(raw)
            .map(|m| Self(m.as_str().to_string()))
            .ok_or_else(|| {
                Error::validation_invalid_argument(
                    "projectid",
                    format!("No project ID found in '{}'", raw),
                    Some(raw.to_string()),
                )
                .with_hint("Project IDs look like projectID509579cf64be8")
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_bare_identifier() {
        let id = ProjectId::resolve("projectID509579cf64be8").unwrap();
        assert_eq!(id.as_str(), "projectID509579cf64be8");
    }

    #[test]
    fn extracts_identifier_from_url() {
        let id =
            ProjectId::resolve("http://www.pgdp.net/c/project.php?id=projectID509579cf64be8&detail_level=3")
                .unwrap();
        assert_eq!(id.as_str(), "projectID509579cf64be8");
    }

    #[test]
    fn ignores_surrounding_text() {
        let id = ProjectId::resolve("  see projectIDabc123, thanks").unwrap();
        assert_eq!(id.to_string(), "projectIDabc123");
    }

    #[test]
    fn stops_at_first_non_hex_character() {
        let id = ProjectId::resolve("projectID12fgh").unwrap();
        assert_eq!(id.as_str(), "projectID12f");
    }

    #[test]
    fn missing_token_is_a_validation_error() {
        let err = ProjectId::resolve("http://www.pgdp.net/c/project.php").unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
        assert_eq!(err.details["field"], "projectid");
    }

    #[test]
    fn prefix_without_hex_digits_is_rejected() {
        assert!(ProjectId::resolve("projectID").is_err());
        assert!(ProjectId::resolve("projectidabc").is_err());
    }
}
