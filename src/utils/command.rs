//! Command execution primitives with consistent error handling.
//!
//! External tools are described by a [`CommandSpec`] (program plus argument
//! list) and never by an interpolated shell string. Execution goes through the
//! [`CommandRunner`] trait so callers can swap in a recording runner.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::utils::shell;

/// Typed descriptor for one external process invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a path argument, lossily converted to UTF-8.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Render as a shell-quoted line. Only for logs; never executed.
    pub fn display(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.clone());
        parts.extend(self.args.iter().cloned());
        shell::quote_args(&parts)
    }
}

/// Captured output from command execution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CapturedOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl CapturedOutput {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            ..Self::default()
        }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code: Some(exit_code),
            stderr: stderr.into(),
            ..Self::default()
        }
    }

    /// Prefers stderr, falls back to stdout if stderr is empty.
    pub fn error_text(&self) -> String {
        if !self.stderr.trim().is_empty() {
            self.stderr.trim().to_string()
        } else {
            self.stdout.trim().to_string()
        }
    }
}

impl From<Output> for CapturedOutput {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

/// Executes command descriptors.
///
/// `Err` means the process could not be started at all. A process that ran
/// and exited non-zero is reported through [`CapturedOutput::success`].
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CapturedOutput>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, spec: &CommandSpec) -> Result<CapturedOutput> {
        (**self).run(spec)
    }
}

/// Runs commands as child processes of this one.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CapturedOutput> {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| {
            Error::internal_io(
                format!("Failed to run {}: {}", spec.program, e),
                Some(spec.display()),
            )
        })?;

        Ok(CapturedOutput::from(output))
    }
}

/// Require a captured command to have succeeded.
pub fn require_success(spec: &CommandSpec, output: &CapturedOutput) -> Result<()> {
    if output.success {
        Ok(())
    } else {
        Err(Error::command_failed(
            spec.display(),
            output.exit_code,
            output.error_text(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let spec = CommandSpec::new("git")
            .arg("commit")
            .arg("-m")
            .arg("Initial version");
        assert_eq!(spec.display(), "git commit -m 'Initial version'");
    }

    #[test]
    fn path_arg_keeps_path_as_single_argument() {
        let spec = CommandSpec::new("mogrify").path_arg(Path::new("/tmp/my pics/001.jpg"));
        assert_eq!(spec.args, vec!["/tmp/my pics/001.jpg".to_string()]);
    }

    #[test]
    fn system_runner_captures_stdout() {
        let output = SystemRunner
            .run(&CommandSpec::new("echo").arg("hello"))
            .unwrap();
        assert!(output.success);
        assert_eq!(output.stdout, "hello");
    }

    #[test]
    fn system_runner_reports_non_zero_exit() {
        let output = SystemRunner.run(&CommandSpec::new("false")).unwrap();
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(1));
    }

    #[test]
    fn system_runner_errors_when_program_missing() {
        let result = SystemRunner.run(&CommandSpec::new("nonexistent_command_xyz"));
        assert!(result.is_err());
    }

    #[test]
    fn system_runner_honours_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        let output = SystemRunner
            .run(&CommandSpec::new("pwd").current_dir(dir.path()))
            .unwrap();
        let reported = std::fs::canonicalize(&output.stdout).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn error_text_prefers_stderr() {
        let output = CapturedOutput {
            success: false,
            exit_code: Some(1),
            stdout: "stdout content".to_string(),
            stderr: "stderr content".to_string(),
        };
        assert_eq!(output.error_text(), "stderr content");
    }

    #[test]
    fn error_text_falls_back_to_stdout() {
        let output = CapturedOutput {
            success: false,
            exit_code: Some(1),
            stdout: "stdout content".to_string(),
            stderr: String::new(),
        };
        assert_eq!(output.error_text(), "stdout content");
    }

    #[test]
    fn require_success_fails_with_command_failed() {
        let spec = CommandSpec::new("mogrify");
        let err = require_success(&spec, &CapturedOutput::failed(1, "bad image")).unwrap_err();
        assert_eq!(err.code.as_str(), "command.failed");
        assert_eq!(err.details["stderr"], "bad image");
    }
}
