//! Event and classification types emitted by the walker.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entry::{DirectoryEntry, FileEntry};
use crate::error::{Result, WalkError};

/// Lifecycle stage reported while walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnostic {
    ProcessingStarted,
    FileProcessing,
    FileReparsePoint,
    FileFailed,
    FileRead,
    DirectoryProcessing,
    DirectoryReparsePoint,
    DirectoryFailed,
    DirectoryRead,
    UnknownObject,
    ProcessingCompleted,
}

impl Diagnostic {
    pub const ALL: [Diagnostic; 11] = [
        Self::ProcessingStarted,
        Self::FileProcessing,
        Self::FileReparsePoint,
        Self::FileFailed,
        Self::FileRead,
        Self::DirectoryProcessing,
        Self::DirectoryReparsePoint,
        Self::DirectoryFailed,
        Self::DirectoryRead,
        Self::UnknownObject,
        Self::ProcessingCompleted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProcessingStarted => "processing_started",
            Self::FileProcessing => "file_processing",
            Self::FileReparsePoint => "file_reparse_point",
            Self::FileFailed => "file_failed",
            Self::FileRead => "file_read",
            Self::DirectoryProcessing => "directory_processing",
            Self::DirectoryReparsePoint => "directory_reparse_point",
            Self::DirectoryFailed => "directory_failed",
            Self::DirectoryRead => "directory_read",
            Self::UnknownObject => "unknown_object",
            Self::ProcessingCompleted => "processing_completed",
        }
    }

    /// True for the two stages that bracket a whole run.
    pub fn is_lifecycle(self) -> bool {
        matches!(self, Self::ProcessingStarted | Self::ProcessingCompleted)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic together with the path it is about.
///
/// For `ProcessingStarted` and `ProcessingCompleted` the path is the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEvent {
    pub diagnostic: Diagnostic,
    pub path: PathBuf,
}

impl DiagnosticEvent {
    pub fn new(diagnostic: Diagnostic, path: &Path) -> Self {
        Self {
            diagnostic,
            path: path.to_path_buf(),
        }
    }
}

/// Notification that a concrete entry was discovered.
#[derive(Debug, Clone)]
pub enum FoundEntry {
    Directory(DirectoryEntry),
    File(FileEntry),
}

impl FoundEntry {
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(entry) => entry.path(),
            Self::File(entry) => entry.path(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Directory(_) => EntryKind::Directory,
            Self::File(_) => EntryKind::File,
        }
    }
}

/// File or directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

/// A traversal root that has been classified as exactly one of file or
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Root {
    File(PathBuf),
    Directory(PathBuf),
}

impl Root {
    /// Queries the platform for the kind of `path`.
    ///
    /// Symbolic links are classified by their target, so a link to a
    /// directory is a directory root. Anything that cannot be stat'ed, or a
    /// dangling link, is neither and yields `WalkError::ContractViolation`.
    pub fn classify(path: &Path) -> Result<Self> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(error) => {
                let reason = match error.kind() {
                    io::ErrorKind::NotFound => "path does not exist".to_string(),
                    _ => format!("cannot determine entry type: {error}"),
                };
                return Err(WalkError::ContractViolation {
                    path: path.to_path_buf(),
                    reason,
                });
            }
        };

        if metadata.is_dir() {
            Ok(Self::Directory(path.to_path_buf()))
        } else {
            Ok(Self::File(path.to_path_buf()))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Directory(path) => path,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::File(_) => EntryKind::File,
            Self::Directory(_) => EntryKind::Directory,
        }
    }
}
