use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths;

/// Root configuration structure for ppcheckout.json
///
/// Every field falls back to its built-in default when absent from the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the proofreading site, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Skeleton directory copied into every new project. `~` is expanded;
    /// a relative path is taken from the working directory.
    #[serde(default = "default_template_dir")]
    pub template_dir: String,

    /// Encoding of the text archive's source file, as understood by `iconv`.
    #[serde(default = "default_source_encoding")]
    pub source_encoding: String,

    /// Image converter invoked once per illustration.
    #[serde(default = "default_converter")]
    pub converter: String,

    /// Character-set converter used to produce UTF-8 source text.
    #[serde(default = "default_encoder")]
    pub encoder: String,

    #[serde(default = "default_git")]
    pub git: String,

    /// Per-request HTTP timeout. `null` disables it.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            template_dir: default_template_dir(),
            source_encoding: default_source_encoding(),
            converter: default_converter(),
            encoder: default_encoder(),
            git: default_git(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Settings {
    /// Template directory with a leading `~` expanded, resolved against
    /// `work_dir` when relative.
    pub fn template_path(&self, work_dir: &Path) -> PathBuf {
        let expanded = PathBuf::from(shellexpand::tilde(&self.template_dir).into_owned());
        if expanded.is_absolute() {
            expanded
        } else {
            work_dir.join(expanded)
        }
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }

    /// Base URL without trailing slashes.
    pub fn site(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Reject values that would make every run fail later on.
    pub fn validate(&self) -> crate::Result<()> {
        let required = [
            ("base_url", self.site()),
            ("template_dir", self.template_dir.as_str()),
            ("source_encoding", self.source_encoding.as_str()),
            ("converter", self.converter.as_str()),
            ("encoder", self.encoder.as_str()),
            ("git", self.git.as_str()),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(crate::Error::config_invalid_value(
                    key,
                    Some(value.to_string()),
                    "must not be empty",
                ));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_base_url() -> String {
    "http://www.pgdp.net".to_string()
}

fn default_template_dir() -> String {
    paths::TEMPLATE_DIR_NAME.to_string()
}

fn default_source_encoding() -> String {
    "ISO-8859-1".to_string()
}

fn default_converter() -> String {
    "mogrify".to_string()
}

fn default_encoder() -> String {
    "iconv".to_string()
}

fn default_git() -> String {
    "git".to_string()
}

fn default_http_timeout_secs() -> Option<u64> {
    Some(300)
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load ppcheckout.json, falling back to built-in defaults.
///
/// A missing file is normal. An unreadable or invalid file is logged and
/// ignored.
pub fn load_settings() -> Settings {
    match load_settings_from_file() {
        Ok(Some(settings)) => settings,
        Ok(None) => Settings::default(),
        Err(err) => {
            tracing::warn!("Ignoring settings file: {}", err);
            Settings::default()
        }
    }
}

/// Attempt to load settings from the ppcheckout.json file.
fn load_settings_from_file() -> crate::Result<Option<Settings>> {
    let path = paths::settings_json()?;

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    parse_settings(&content, &path.display().to_string()).map(Some)
}

pub fn parse_settings(content: &str, origin: &str) -> crate::Result<Settings> {
    let settings: Settings =
        serde_json::from_str(content).map_err(|e| crate::Error::config_invalid_json(origin, e))?;
    settings.validate()?;
    Ok(settings)
}
