//! Project metadata scraped from the project page.
//!
//! The page carries a `project_info_table` whose rows pair a bold label cell
//! with a value cell:
//!
//! ```text
//! <tr><th><b>Title</b></th><td>Moby Dick</td></tr>
//! ```

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::parser;

static INFO_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<table\b[^>]*\bid\s*=\s*["']?project_info_table\b[^>]*>(.*?)</table>"#)
        .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
    pub title: String,
    pub author: String,
}

impl ProjectInfo {
    /// Parse title and author out of a project page.
    ///
    /// `url` only labels the error when the expected structure is absent.
    pub fn from_html(html: &str, url: &str) -> Result<Self> {
        let table = parser::extract_first(html, &INFO_TABLE)
            .ok_or_else(|| Error::project_page_invalid(url, "project_info_table"))?;

        Ok(Self {
            title: labelled_cell(table, "Title")
                .ok_or_else(|| Error::project_page_invalid(url, "Title"))?,
            author: labelled_cell(table, "Author")
                .ok_or_else(|| Error::project_page_invalid(url, "Author"))?,
        })
    }
}

/// Text of the cell that follows the cell holding `<b>label</b>`.
fn labelled_cell(table: &str, label: &str) -> Option<String> {
    let pattern = format!(
        r"(?is)<b>\s*{}\s*</b>.*?</t[dh]>\s*<t[dh]\b[^>]*>(.*?)</t[dh]>",
        regex::escape(label)
    );
    let re = Regex::new(&pattern).ok()?;

    parser::extract_first(table, &re).map(parser::text_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
<table class='basic' id='project_info_table'>
<tr><th class='label'><b>Title</b></th><td colspan='4'>The Great &amp; Glorious
    Adventure</td></tr>
<tr><th class='label'><b>Author</b></th><td colspan='4'><a href="x">Smith, John</a></td></tr>
<tr><th class='label'><b>Language</b></th><td colspan='4'>English</td></tr>
</table>
</body></html>"#;

    #[test]
    fn extracts_title_and_author() {
        let info = ProjectInfo::from_html(PAGE, "http://example.test").unwrap();
        assert_eq!(info.title, "The Great & Glorious Adventure");
        assert_eq!(info.author, "Smith, John");
    }

    #[test]
    fn accepts_td_label_cells() {
        let page = r#"<table id="project_info_table"><tr><td><b>Title</b></td><td>Emma</td></tr>
            <tr><td><b>Author</b></td><td>Austen, Jane</td></tr></table>"#;
        let info = ProjectInfo::from_html(page, "u").unwrap();
        assert_eq!(info.title, "Emma");
        assert_eq!(info.author, "Austen, Jane");
    }

    #[test]
    fn ignores_labels_outside_the_info_table() {
        let page = r#"<table id="other"><tr><td><b>Title</b></td><td>Wrong</td></tr></table>
            <table id="project_info_table"><tr><td><b>Title</b></td><td>Right</td></tr>
            <tr><td><b>Author</b></td><td>Someone</td></tr></table>"#;
        let info = ProjectInfo::from_html(page, "u").unwrap();
        assert_eq!(info.title, "Right");
    }

    #[test]
    fn missing_table_is_page_invalid() {
        let err = ProjectInfo::from_html("<html></html>", "u").unwrap_err();
        assert_eq!(err.code.as_str(), "project.page_invalid");
        assert_eq!(err.details["missing"], "project_info_table");
    }

    #[test]
    fn missing_author_is_page_invalid() {
        let page = r#"<table id="project_info_table"><tr><td><b>Title</b></td><td>Emma</td></tr></table>"#;
        let err = ProjectInfo::from_html(page, "u").unwrap_err();
        assert_eq!(err.details["missing"], "Author");
    }
}
