//! Recursive filesystem traversal with ordered, synchronous notifications.
//!
//! This crate provides:
//! - A depth-first walker that visits files before subdirectories
//! - A symbolic-link policy for files and directories
//! - Found-entry notifications and lifecycle diagnostics delivered to
//!   registered listeners on the calling thread
//! - Per-entry failure isolation with a pluggable failure sink
//!
//! ```no_run
//! use std::path::Path;
//! use treewalk::{Walker, WalkSettings};
//!
//! let mut walker = Walker::new(&WalkSettings::default());
//! walker.on_file_found(|file| {
//!     println!("{}", file.path().display());
//!     Ok(())
//! });
//! let summary = walker.run(Path::new("/var/log"))?;
//! println!("{} files", summary.files_read);
//! # Ok::<(), treewalk::WalkError>(())
//! ```

pub mod access;
pub mod channel;
pub mod entry;
pub mod error;
pub mod report;
pub mod settings;
pub mod transcript;
pub mod types;
pub mod walker;

// Re-export main types
pub use access::{AccessDiagnostics, NoopAccessDiagnostics, OwnerIdentity};
#[cfg(unix)]
pub use access::OwningGroup;
pub use entry::{DirectoryEntry, FileEntry};
pub use error::{FailureKind, Result, WalkError};
pub use report::{FailureReport, FailureSink, LogFailureSink};
pub use settings::WalkSettings;
pub use transcript::{Transcript, TranscriptEvent};
pub use types::{Diagnostic, DiagnosticEvent, EntryKind, FoundEntry, Root};
pub use walker::{WalkSummary, Walker};
