//! Copying and downloading generated code.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;
use traderobots_domain::entities::Robot;

/// Errors raised while exporting code.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("{kind} code not available for this robot")]
    CodeUnavailable { kind: CodeKind },
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
}

/// Somewhere copied text can be placed.
pub trait Clipboard {
    /// Replaces the clipboard contents.
    ///
    /// # Errors
    /// Returns [`ExportError::Clipboard`] if the sink cannot accept text.
    fn set_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// Clipboard kept in memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Which generated source to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeKind {
    #[default]
    Mql5,
    Python,
}

impl CodeKind {
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mql5 => "mq5",
            Self::Python => "py",
        }
    }

    /// The robot's code of this kind, if non-empty.
    #[must_use]
    pub fn code_of<'a>(&self, robot: &'a Robot) -> Option<&'a str> {
        match self {
            Self::Mql5 => robot.mql5(),
            Self::Python => robot.python(),
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mql5 => "MQL5",
            Self::Python => "Python",
        })
    }
}

/// File name offered when downloading a robot's code.
#[must_use]
pub fn download_file_name(robot: &Robot, kind: CodeKind) -> String {
    format!(
        "{}_{}_{}.{}",
        robot.symbol,
        robot.method,
        robot.id.short(8),
        kind.extension()
    )
}

/// Copies a robot's code to the clipboard.
///
/// # Errors
/// Returns [`ExportError::CodeUnavailable`] when the robot has no such code.
pub fn copy_code(
    robot: &Robot,
    kind: CodeKind,
    clipboard: &mut dyn Clipboard,
) -> Result<(), ExportError> {
    let code = kind
        .code_of(robot)
        .ok_or(ExportError::CodeUnavailable { kind })?;
    clipboard.set_text(code)
}

/// Writes a robot's code into `dir` under its download name.
///
/// # Errors
/// Returns [`ExportError::CodeUnavailable`] when the robot has no such code,
/// or [`ExportError::Io`] if the file cannot be written.
pub fn export_code(robot: &Robot, kind: CodeKind, dir: &Path) -> Result<PathBuf, ExportError> {
    let code = kind
        .code_of(robot)
        .ok_or(ExportError::CodeUnavailable { kind })?;

    let path = dir.join(download_file_name(robot, kind));
    std::fs::write(&path, code).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    info!(robot = %robot.id, path = %path.display(), "Code exported");
    Ok(path)
}
