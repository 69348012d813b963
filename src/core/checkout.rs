//! Project checkout orchestration.
//!
//! A checkout is a fixed sequence of steps run against the working
//! directory. Fatal failures propagate as `Err`; tolerated ones are logged
//! and recorded in the [`CheckoutReport`]. Nothing is rolled back.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Dispatch;

use crate::archive;
use crate::command::{require_success, CommandRunner, CommandSpec};
use crate::convert;
use crate::error::{Error, Result};
use crate::files::{self, CopyOutcome};
use crate::git;
use crate::http::{Download, ProjectUrls, Remote};
use crate::identifier::ProjectId;
use crate::io;
use crate::layout::ProjectLayout;
use crate::logging::{self, Verbosity};
use crate::project_page::ProjectInfo;
use crate::report::CheckoutReport;
use crate::settings::Settings;
use crate::slugify;

/// Local file names for downloads, relative to the working directory.
pub const IMAGES_ARCHIVE: &str = "images.zip";
pub const TEXT_ARCHIVE: &str = "text.zip";
pub const WORD_LISTS: [&str; 2] = ["good_words.txt", "bad_words.txt"];

pub const INITIAL_COMMIT: &str = "Initial version";
pub const ENCODING_COMMIT: &str = "Convert to UTF-8, native line endings";
pub const TITLE_COMMIT: &str = "Add title";

/// Step names as they appear in the report.
pub mod step {
    pub const DOWNLOAD_IMAGES: &str = "download images";
    pub const DOWNLOAD_TEXT: &str = "download text";
    pub const COPY_SKELETON: &str = "copy skeleton";
    pub const EXTRACT_IMAGES: &str = "extract images";
    pub const EXTRACT_TEXT: &str = "extract text";
    pub const RECLASSIFY_ILLUSTRATIONS: &str = "reclassify illustrations";
    pub const COPY_SOURCE_TEXT: &str = "copy source text";
    pub const RELOCATE_ARCHIVES: &str = "relocate archives";
    pub const REMOVE_TEI: &str = "remove TEI text";
    pub const CONVERT_ILLUSTRATIONS: &str = "convert illustrations";
    pub const PATCH_MAKEFILE: &str = "patch Makefile";
    pub const GIT_INIT: &str = "git init";
    pub const GIT_ADD: &str = "git add";
    pub const GIT_COMMIT_INITIAL: &str = "git commit initial";
    pub const CONVERT_ENCODING: &str = "convert encoding";
    pub const LINE_ENDINGS: &str = "normalize line endings";
    pub const GIT_COMMIT_ENCODING: &str = "git commit encoding";
    pub const INSERT_TITLE: &str = "insert title";
    pub const GIT_COMMIT_TITLE: &str = "git commit title";

    pub fn download_word_list(name: &str) -> String {
        format!("download {}", name)
    }

    pub fn relocate_word_list(name: &str) -> String {
        format!("relocate {}", name)
    }

    pub fn convert_illustration(name: &str) -> String {
        format!("convert {}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Identifier as typed: bare id, project URL or text containing one.
    pub raw_id: String,
    /// Overrides the name derived from the title.
    pub name: Option<String>,
}

impl CheckoutRequest {
    pub fn new(raw_id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            raw_id: raw_id.into(),
            name,
        }
    }
}

/// Archives fetched in the download phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Downloads {
    pub images: Download,
    pub text: Download,
}

pub struct Checkout<R, C> {
    settings: Settings,
    remote: R,
    runner: C,
    work_dir: PathBuf,
    dispatch: Dispatch,
}

impl<R: Remote, C: CommandRunner> Checkout<R, C> {
    pub fn new(settings: Settings, remote: R, runner: C) -> Self {
        Self {
            settings,
            remote,
            runner,
            work_dir: PathBuf::from("."),
            dispatch: logging::dispatch(Verbosity::default()),
        }
    }

    /// Directory downloads land in and the project directory is created under.
    pub fn in_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.dispatch = logging::dispatch(verbosity);
        self
    }

    /// Run every step in order, logging through this checkout's subscriber.
    pub fn run(&self, request: &CheckoutRequest) -> Result<CheckoutReport> {
        tracing::dispatcher::with_default(&self.dispatch, || self.execute(request))
    }

    fn execute(&self, request: &CheckoutRequest) -> Result<CheckoutReport> {
        tracing::debug!("{:?}", request);

        let id = ProjectId::resolve(&request.raw_id)?;
        let urls = ProjectUrls::new(self.settings.site(), &id);

        let info = self.fetch_info(&urls)?;
        tracing::info!("Title: {}", info.title);
        tracing::info!("Author: {}", info.author);

        let name = self.project_name(request, &info);
        // Checked before anything is downloaded or written.
        let layout = ProjectLayout::new(&self.work_dir, &name)?;
        tracing::info!("Checking out {} as {}", id, layout.name());

        let mut report = CheckoutReport::new(id.clone(), &info, &layout);

        self.download_word_lists(&urls, &mut report)?;
        let downloads = self.download_archives(&urls, &mut report)?;

        self.copy_skeleton(&layout, &mut report)?;
        self.extract_archives(&layout, downloads, &mut report)?;
        self.reclassify_illustrations(&layout, &mut report)?;
        self.copy_source_text(&layout, &id, &mut report)?;
        self.relocate_archives(&layout, &mut report)?;
        self.relocate_word_lists(&layout, &mut report)?;
        self.remove_tei(&layout, &id, &mut report)?;

        self.convert_illustrations(&layout, &mut report)?;
        self.patch_makefile(&layout, &mut report)?;

        self.seed_repository(&layout, &mut report);
        self.normalize_encoding(&layout, &mut report)?;
        self.insert_title(&layout, &info, &mut report)?;

        tracing::info!(
            "Checked out {} into {} ({} tolerated failures)",
            id,
            layout.root().display(),
            report.tolerated_failures
        );

        Ok(report)
    }

    // ========================================================================
    // Identity
    // ========================================================================

    pub fn fetch_info(&self, urls: &ProjectUrls) -> Result<ProjectInfo> {
        let url = urls.page();
        tracing::debug!("Fetching {}", url);
        let page = self.remote.fetch_page(&url)?;
        ProjectInfo::from_html(&page, &url)
    }

    /// Supplied name if any, otherwise a slug of the title.
    pub fn project_name(&self, request: &CheckoutRequest, info: &ProjectInfo) -> String {
        if let Some(name) = &request.name {
            return name.clone();
        }

        let name = slugify::project_name(&info.title);
        if name.is_empty() {
            tracing::warn!("Title '{}' produced an empty project name", info.title);
        }
        name
    }

    // ========================================================================
    // Downloads
    // ========================================================================

    /// Fetch the optional good/bad word lists into the working directory.
    pub fn download_word_lists(
        &self,
        urls: &ProjectUrls,
        report: &mut CheckoutReport,
    ) -> Result<()> {
        for name in WORD_LISTS {
            let url = urls.word_list(name);
            let step = step::download_word_list(name);

            match self.remote.download(&url, &self.work_dir.join(name))? {
                Download::Saved { bytes } => {
                    tracing::debug!("Saved {} ({} bytes)", name, bytes);
                    report.done(step);
                }
                Download::NotFound => {
                    tracing::warn!("No {} at {}", name, url);
                    report.skipped(step, format!("not found at {}", url));
                }
            }
        }
        Ok(())
    }

    pub fn download_archives(
        &self,
        urls: &ProjectUrls,
        report: &mut CheckoutReport,
    ) -> Result<Downloads> {
        let images =
            self.download_archive(step::DOWNLOAD_IMAGES, &urls.images(), IMAGES_ARCHIVE, report)?;
        let text = self.download_archive(step::DOWNLOAD_TEXT, &urls.text(), TEXT_ARCHIVE, report)?;

        Ok(Downloads { images, text })
    }

    fn download_archive(
        &self,
        step: &str,
        url: &str,
        file_name: &str,
        report: &mut CheckoutReport,
    ) -> Result<Download> {
        let download = self.remote.download(url, &self.work_dir.join(file_name))?;

        match download {
            Download::Saved { bytes } => {
                tracing::debug!("Saved {} ({} bytes)", file_name, bytes);
                report.done(step);
            }
            Download::NotFound => {
                tracing::error!("HTTP 404 Not Found: {}", url);
                report.failed(step, format!("not found at {}", url));
            }
        }
        Ok(download)
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Copy the template tree to the project directory.
    ///
    /// An existing project directory is reused as is.
    pub fn copy_skeleton(
        &self,
        layout: &ProjectLayout,
        report: &mut CheckoutReport,
    ) -> Result<CopyOutcome> {
        let template = self.settings.template_path(&self.work_dir);
        let outcome = files::copy_tree(&template, layout.root())?;

        match outcome {
            CopyOutcome::Copied => {
                tracing::debug!(
                    "Copied {} to {}",
                    template.display(),
                    layout.root().display()
                );
                report.done(step::COPY_SKELETON);
            }
            CopyOutcome::AlreadyExists => {
                tracing::error!(
                    "Project directory {} already exists; continuing with it",
                    layout.root().display()
                );
                report.failed(step::COPY_SKELETON, "project directory already exists");
            }
        }
        Ok(outcome)
    }

    /// Unpack images into `pngs/` and text into `originals/`.
    pub fn extract_archives(
        &self,
        layout: &ProjectLayout,
        downloads: Downloads,
        report: &mut CheckoutReport,
    ) -> Result<()> {
        self.extract_archive(
            step::EXTRACT_IMAGES,
            IMAGES_ARCHIVE,
            downloads.images,
            &layout.pngs(),
            report,
        )?;
        self.extract_archive(
            step::EXTRACT_TEXT,
            TEXT_ARCHIVE,
            downloads.text,
            &layout.originals(),
            report,
        )
    }

    fn extract_archive(
        &self,
        step: &str,
        file_name: &str,
        download: Download,
        dest: &Path,
        report: &mut CheckoutReport,
    ) -> Result<()> {
        if !download.is_saved() {
            tracing::warn!("Skipping extraction of {}: it was not downloaded", file_name);
            report.skipped(step, "archive was not downloaded");
            return Ok(());
        }

        let entries = archive::extract(&self.work_dir.join(file_name), dest)?;
        tracing::debug!(
            "Extracted {} entries from {} into {}",
            entries,
            file_name,
            dest.display()
        );
        report.done(step);
        Ok(())
    }

    /// Move `.jpg` files out of the page scans into the illustrations folder.
    pub fn reclassify_illustrations(
        &self,
        layout: &ProjectLayout,
        report: &mut CheckoutReport,
    ) -> Result<usize> {
        let jpgs = files::glob_files(&layout.pngs(), "*.jpg")?;
        if jpgs.is_empty() {
            report.skipped(step::RECLASSIFY_ILLUSTRATIONS, "no illustrations");
            return Ok(0);
        }

        io::create_dir_all(&layout.illustrations(), "create illustrations dir")?;
        let moved = files::move_into(&jpgs, &layout.illustrations())?;
        tracing::info!("Found {} illustrations", moved.len());
        report.done(step::RECLASSIFY_ILLUSTRATIONS);
        Ok(moved.len())
    }

    /// Copy `originals/<id>.txt` to `<name>-src.txt`.
    pub fn copy_source_text(
        &self,
        layout: &ProjectLayout,
        id: &ProjectId,
        report: &mut CheckoutReport,
    ) -> Result<()> {
        let original = layout.original_text(id);
        if !original.is_file() {
            return Err(Error::internal_io(
                format!("Source text not found: {}", original.display()),
                Some("copy source text".to_string()),
            )
            .with_hint("The text archive may be missing or incomplete"));
        }

        files::copy_file(&original, &layout.source_text())?;
        report.done(step::COPY_SOURCE_TEXT);
        Ok(())
    }

    /// Move every zip left in the working directory into `originals/`.
    pub fn relocate_archives(
        &self,
        layout: &ProjectLayout,
        report: &mut CheckoutReport,
    ) -> Result<()> {
        let archives = files::glob_files(&self.work_dir, "*.zip")?;
        if archives.is_empty() {
            report.skipped(step::RELOCATE_ARCHIVES, "no archives");
            return Ok(());
        }

        io::create_dir_all(&layout.originals(), "create originals dir")?;
        files::move_into(&archives, &layout.originals())?;
        report.done(step::RELOCATE_ARCHIVES);
        Ok(())
    }

    /// Move downloaded word lists into `originals/`, replacing older copies.
    pub fn relocate_word_lists(
        &self,
        layout: &ProjectLayout,
        report: &mut CheckoutReport,
    ) -> Result<()> {
        for name in WORD_LISTS {
            let step = step::relocate_word_list(name);
            let source = self.work_dir.join(name);
            if !source.is_file() {
                report.skipped(step, "not downloaded");
                continue;
            }

            io::create_dir_all(&layout.originals(), "create originals dir")?;
            files::move_into(&[source], &layout.originals())?;
            report.done(step);
        }
        Ok(())
    }

    pub fn remove_tei(
        &self,
        layout: &ProjectLayout,
        id: &ProjectId,
        report: &mut CheckoutReport,
    ) -> Result<()> {
        let tei = layout.tei_text(id);
        if files::remove_if_exists(&tei)? {
            report.done(step::REMOVE_TEI);
        } else {
            tracing::warn!("No TEI text at {}", tei.display());
            report.skipped(step::REMOVE_TEI, "not present");
        }
        Ok(())
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Convert each illustration to PNG. Converter failures are tolerated.
    pub fn convert_illustrations(
        &self,
        layout: &ProjectLayout,
        report: &mut CheckoutReport,
    ) -> Result<()> {
        let jpgs = files::glob_files(&layout.illustrations(), "*.jpg")?;
        if jpgs.is_empty() {
            report.skipped(step::CONVERT_ILLUSTRATIONS, "no illustrations");
            return Ok(());
        }

        for jpg in &jpgs {
            let name = jpg
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            tracing::debug!("Converting {}", name);
            self.invoke(
                &step::convert_illustration(&name),
                convert::illustration(&self.settings.converter, jpg),
                report,
            );
        }
        Ok(())
    }

    pub fn patch_makefile(&self, layout: &ProjectLayout, report: &mut CheckoutReport) -> Result<()> {
        files::prepend_line(
            &layout.makefile(),
            &format!("PROJECTNAME={}", layout.name()),
        )?;
        report.done(step::PATCH_MAKEFILE);
        Ok(())
    }

    // ========================================================================
    // Version control
    // ========================================================================

    /// `git init`, stage the source text and make the initial commit.
    pub fn seed_repository(&self, layout: &ProjectLayout, report: &mut CheckoutReport) {
        let git = &self.settings.git;
        let root = layout.root();

        self.invoke(step::GIT_INIT, git::init(git, root), report);
        self.invoke(
            step::GIT_ADD,
            git::add(git, root, &layout.source_file_name()),
            report,
        );
        self.invoke(
            step::GIT_COMMIT_INITIAL,
            git::commit(git, root, INITIAL_COMMIT),
            report,
        );
    }

    /// Re-encode the source text to UTF-8, fix line endings and commit.
    pub fn normalize_encoding(
        &self,
        layout: &ProjectLayout,
        report: &mut CheckoutReport,
    ) -> Result<()> {
        let source = layout.source_text();
        let converted = source.with_extension("txt.utf8");
        let spec = convert::to_utf8(
            &self.settings.encoder,
            &self.settings.source_encoding,
            &source,
            &converted,
        );

        if self.invoke(step::CONVERT_ENCODING, spec, report) {
            io::move_file(&converted, &source, "replace source text")?;
        } else {
            files::remove_if_exists(&converted)?;
        }

        files::normalize_line_endings(&source)?;
        report.done(step::LINE_ENDINGS);

        self.invoke(
            step::GIT_COMMIT_ENCODING,
            git::commit_all(&self.settings.git, layout.root(), ENCODING_COMMIT),
            report,
        );
        Ok(())
    }

    /// Prepend the `.dt` title line to the source text and commit.
    pub fn insert_title(
        &self,
        layout: &ProjectLayout,
        info: &ProjectInfo,
        report: &mut CheckoutReport,
    ) -> Result<()> {
        let line = title_line(info);
        files::prepend_line(&layout.source_text(), &line)?;
        tracing::info!("{}", line);
        report.done(step::INSERT_TITLE);

        self.invoke(
            step::GIT_COMMIT_TITLE,
            git::commit_all(&self.settings.git, layout.root(), TITLE_COMMIT),
            report,
        );
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Run a tolerated command. Failure is logged and recorded, never
    /// propagated. Returns whether the command succeeded.
    fn invoke(&self, step: &str, spec: CommandSpec, report: &mut CheckoutReport) -> bool {
        tracing::debug!("Running {}", spec.display());

        let result = self
            .runner
            .run(&spec)
            .and_then(|output| require_success(&spec, &output));

        match result {
            Ok(()) => {
                report.done(step);
                true
            }
            Err(err) => {
                let reason = failure_reason(&err);
                tracing::error!("{}", reason);
                report.failed(step, reason);
                false
            }
        }
    }
}

/// The ppgen title directive for a project.
pub fn title_line(info: &ProjectInfo) -> String {
    format!(".dt {}, by {}", info.title, info.author)
}

fn failure_reason(err: &Error) -> String {
    match err.details.get("stderr").and_then(|s| s.as_str()) {
        Some(stderr) if !stderr.is_empty() => format!("{}: {}", err.message, stderr),
        _ => err.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_line_uses_dt_directive() {
        let info = ProjectInfo {
            title: "Moby Dick".to_string(),
            author: "Melville, Herman".to_string(),
        };
        assert_eq!(title_line(&info), ".dt Moby Dick, by Melville, Herman");
    }

    #[test]
    fn failure_reason_appends_stderr() {
        let err = Error::command_failed("git init", Some(128), "not permitted");
        assert_eq!(
            failure_reason(&err),
            "Command failed: git init: not permitted"
        );

        let err = Error::command_failed("git init", Some(1), "");
        assert_eq!(failure_reason(&err), "Command failed: git init");
    }

    #[test]
    fn spawn_failure_reason_is_message() {
        let err = Error::internal_io("No such file", Some("mogrify x.jpg".to_string()));
        assert_eq!(failure_reason(&err), "IO error (mogrify x.jpg): No such file");
    }
}
