//! Paths inside a checked-out project.

use serde::Serialize;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::identifier::ProjectId;

/// Every path of a project tree, derived from its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLayout {
    name: String,
    root: PathBuf,
}

impl ProjectLayout {
    /// Lay out `name` under `work_dir`.
    ///
    /// The name must be a single directory name, so the project root is
    /// always a fresh child of `work_dir` and never `work_dir` itself.
    pub fn new(work_dir: &Path, name: &str) -> Result<Self> {
        let mut components = Path::new(name).components();
        let single_dir = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );

        if !single_dir {
            let problem = if name.is_empty() {
                "Project name is empty".to_string()
            } else {
                format!("Project name '{}' is not a single directory name", name)
            };
            return Err(
                Error::validation_invalid_argument("projectname", problem, Some(name.to_string()))
                    .with_hint("Pass a project name, e.g. ppcheckout <PROJECTID> my-book"),
            );
        }

        Ok(Self {
            name: name.to_string(),
            root: work_dir.join(name),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn originals(&self) -> PathBuf {
        self.root.join("originals")
    }

    pub fn illustrations(&self) -> PathBuf {
        self.originals().join("illustrations")
    }

    pub fn pngs(&self) -> PathBuf {
        self.root.join("pngs")
    }

    /// File name of the working source text, `<name>-src.txt`.
    pub fn source_file_name(&self) -> String {
        format!("{}-src.txt", self.name)
    }

    pub fn source_text(&self) -> PathBuf {
        self.root.join(self.source_file_name())
    }

    pub fn makefile(&self) -> PathBuf {
        self.root.join("Makefile")
    }

    /// Concatenated text as delivered in the text archive.
    pub fn original_text(&self, id: &ProjectId) -> PathBuf {
        self.originals().join(format!("{}.txt", id))
    }

    pub fn tei_text(&self, id: &ProjectId) -> PathBuf {
        self.originals().join(format!("{}_TEI.txt", id))
    }
}
