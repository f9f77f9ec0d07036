//! External formatter run on a docs file after it has been rewritten.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

/// Errors from running the formatter.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The program could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The program ran and exited unsuccessfully.
    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        /// Program name.
        program: String,
        /// Exit status.
        status: ExitStatus,
        /// Captured stderr, trimmed.
        stderr: String,
    },
}

/// A command invoked as `<program> <args...> <file>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl Formatter {
    /// Creates a formatter from a program and its leading arguments.
    #[must_use]
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
        }
    }

    /// `npx prettier --write`.
    #[must_use]
    pub fn prettier() -> Self {
        Self::new("npx", ["prettier", "--write"])
    }

    /// Runs the formatter from `dir` instead of the current directory.
    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// The program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Formats `file` in place.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Spawn`] if the program cannot be started and
    /// [`FormatError::Failed`] on a non-zero exit.
    pub fn run(&self, file: &Path) -> Result<(), FormatError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        tracing::debug!("Running {} on {}", self.program, file.display());
        let output = command.output().map_err(|source| FormatError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(FormatError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
