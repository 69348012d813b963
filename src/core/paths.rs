use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base ppcheckout config directory (~/.config/ppcheckout/ on all platforms)
pub fn ppcheckout() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("ppcheckout"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("ppcheckout"))
    }
}

/// Global ppcheckout.json settings file path
pub fn settings_json() -> Result<PathBuf> {
    Ok(ppcheckout()?.join("ppcheckout.json"))
}

/// Name of the skeleton directory a new project is copied from
pub const TEMPLATE_DIR_NAME: &str = "_NEW_PROJECT_TEMPLATE";
