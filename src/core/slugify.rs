//! Project name derivation from a book title.
//!
//! The rules are applied in a fixed order; reordering them changes output.

use regex::Regex;
use std::sync::LazyLock;

/// Longest project name produced before trailing words are dropped.
pub const MAX_NAME_LENGTH: usize = 30;

// Volume marker such as "P1" on multi-part projects.
static VOLUME_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"P[123]").unwrap());
static SPACED_AMPERSAND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+&\s+").unwrap());
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\- ]").unwrap());
static LEADING_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:the |[a-z0-9] )").unwrap());
static LEADING_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ +").unwrap());
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());
static HYPHEN_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// Derive a filesystem-safe project name from a title.
///
/// Produces lowercase ASCII letters, digits and single hyphens, at most
/// [`MAX_NAME_LENGTH`] characters. Whole trailing words are dropped to fit;
/// if even the first word is too long the result is empty. No check is made
/// against existing directories.
pub fn project_name(title: &str) -> String {
    let name = VOLUME_MARKER.replace_all(title, "");
    let name = name.to_lowercase();
    let name = SPACED_AMPERSAND.replace_all(&name, "-");
    let name = DISALLOWED.replace_all(&name, "");
    let name = LEADING_ARTICLE.replace(&name, "");
    let name = LEADING_SPACES.replace(&name, "");
    let name = SPACE_RUNS.replace_all(&name, "");
    let name = name.replace(' ', "-");
    let name = HYPHEN_RUNS.replace_all(&name, "-");

    let name = name.strip_prefix('-').unwrap_or(&name);
    let name = name.strip_suffix('-').unwrap_or(name);

    truncate_words(name, MAX_NAME_LENGTH)
}

fn truncate_words(name: &str, max_len: usize) -> String {
    let words: Vec<&str> = name.split('-').collect();
    let mut count = words.len();
    let mut truncated = name.to_string();

    while truncated.len() > max_len && count > 0 {
        count -= 1;
        truncated = words[..count].join("-");
    }

    truncated
}
