//! Text extraction primitives for scraped markup.
//!
//! Just enough to pull plain strings out of a known page: capture-group
//! extraction, tag stripping, entity decoding and whitespace folding.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static ENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap());

static WHITESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Extract the first capture group of `re` in `content`.
pub fn extract_first<'a>(content: &'a str, re: &Regex) -> Option<&'a str> {
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Remove every markup tag, keeping the text between them.
pub fn strip_tags(markup: &str) -> String {
    TAG_PATTERN.replace_all(markup, "").into_owned()
}

/// Decode named and numeric character references.
///
/// Unknown names are left untouched.
pub fn decode_entities(text: &str) -> String {
    ENTITY_PATTERN
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(entity)
            };

            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => None,
    }
}

/// Fold runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_PATTERN.replace_all(text, " ").trim().to_string()
}

/// Plain text content of a markup fragment.
pub fn text_content(markup: &str) -> String {
    collapse_whitespace(&decode_entities(&strip_tags(markup)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_first_returns_capture_group() {
        let re = Regex::new(r"id=(\w+)").unwrap();
        assert_eq!(extract_first("project.php?id=abc", &re), Some("abc"));
        assert_eq!(extract_first("nothing here", &re), None);
    }

    #[test]
    fn strip_tags_removes_nested_markup() {
        assert_eq!(strip_tags("<td><a href='x'>Moby <i>Dick</i></a></td>"), "Moby Dick");
    }

    #[test]
    fn decode_entities_handles_named_and_numeric() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("caf&#233;"), "café");
        assert_eq!(decode_entities("&#x4E;ame"), "Name");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
    }

    #[test]
    fn collapse_whitespace_folds_runs() {
        assert_eq!(collapse_whitespace("  The\n  Title\t "), "The Title");
    }

    #[test]
    fn text_content_combines_all_steps() {
        assert_eq!(
            text_content("<td>\n  Pride &amp;\n Prejudice </td>"),
            "Pride & Prejudice"
        );
    }
}
