//! Recursive depth-first traversal.
//!
//! The walker visits a root and everything below it on the calling thread:
//!
//! - A directory's own `DirectoryFound` notification fires before any of its
//!   children are touched.
//! - Within a directory, every immediate file is processed (in the order the
//!   filesystem lists them) before any subdirectory is entered.
//! - Failures are contained at the entry that raised them. A failed file
//!   yields `FileFailed` and its siblings carry on; an error escaping a
//!   directory's children yields `DirectoryFailed` for that directory only.
//! - `ProcessingStarted` opens every run and `ProcessingCompleted` closes it
//!   exactly once, whatever happens in between.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::access::{self, AccessDiagnostics};
use crate::channel::Channel;
use crate::entry::{DirectoryEntry, FileEntry};
use crate::error::{FailureKind, Result, WalkError};
use crate::report::{FailureReport, FailureSink, LogFailureSink};
use crate::settings::WalkSettings;
use crate::types::{Diagnostic, DiagnosticEvent, FoundEntry, Root};

/// Tallies for a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WalkSummary {
    pub files_read: usize,
    pub directories_read: usize,
    pub files_failed: usize,
    pub directories_failed: usize,
    pub unknown_objects: usize,
    /// Symbolic links that were reported but not followed.
    pub skipped_reparse_points: usize,
}

impl WalkSummary {
    pub fn failures(&self) -> usize {
        self.files_failed + self.directories_failed
    }
}

/// Immediate children of a directory, split by kind.
#[derive(Debug, Default)]
struct Children {
    files: Vec<PathBuf>,
    directories: Vec<PathBuf>,
}

impl Children {
    /// Lists `path` without sorting. A symbolic link goes with the
    /// directories when its target is a directory, and with the files when
    /// its target is not one or is missing. A link whose target cannot be
    /// resolved for any other reason (a loop, for instance) fails the
    /// listing.
    fn enumerate(path: &Path) -> Result<Self> {
        let read_dir_error = |source: io::Error| WalkError::ReadDir {
            path: path.to_path_buf(),
            source,
        };

        let mut children = Self::default();
        for entry in fs::read_dir(path).map_err(read_dir_error)? {
            let entry = entry.map_err(read_dir_error)?;
            let file_type = entry.file_type().map_err(read_dir_error)?;
            let child = entry.path();

            let is_directory = if file_type.is_symlink() {
                match fs::metadata(&child) {
                    Ok(metadata) => metadata.is_dir(),
                    Err(error) if error.kind() == io::ErrorKind::NotFound => false,
                    Err(error) => return Err(read_dir_error(error)),
                }
            } else {
                file_type.is_dir()
            };

            if is_directory {
                children.directories.push(child);
            } else {
                children.files.push(child);
            }
        }
        Ok(children)
    }
}

/// Emits `ProcessingCompleted` when dropped, so that every way out of a run
/// (including unwinding out of a listener) closes it.
struct RunScope<'a> {
    walker: &'a Walker,
    root: &'a Path,
}

impl<'a> RunScope<'a> {
    fn begin(walker: &'a Walker, root: &'a Path) -> Self {
        log::info!("walk started: {}", root.display());
        walker.emit_lifecycle(Diagnostic::ProcessingStarted, root);
        Self { walker, root }
    }
}

impl Drop for RunScope<'_> {
    fn drop(&mut self) {
        self.walker
            .emit_lifecycle(Diagnostic::ProcessingCompleted, self.root);
    }
}

/// The traversal engine.
///
/// Listeners are registered with `&mut self` before running; a run only
/// needs `&self`, so one walker can be shared across threads walking
/// disjoint roots.
pub struct Walker {
    settings: WalkSettings,
    found: Channel<FoundEntry>,
    diagnostics: Channel<DiagnosticEvent>,
    failure_sink: Box<dyn FailureSink>,
    access: Box<dyn AccessDiagnostics>,
}

impl Walker {
    /// Creates a walker holding its own copy of `settings`.
    pub fn new(settings: &WalkSettings) -> Self {
        Self {
            settings: *settings,
            found: Channel::new(),
            diagnostics: Channel::new(),
            failure_sink: Box::new(LogFailureSink),
            access: access::platform_default(),
        }
    }

    /// Replaces the sink that receives contained failures.
    pub fn with_failure_sink(mut self, sink: impl FailureSink + 'static) -> Self {
        self.failure_sink = Box::new(sink);
        self
    }

    /// Replaces the ownership lookup used after an access denial.
    pub fn with_access_diagnostics(mut self, access: impl AccessDiagnostics + 'static) -> Self {
        self.access = Box::new(access);
        self
    }

    pub fn settings(&self) -> WalkSettings {
        self.settings
    }

    /// Registers a listener for both kinds of found-entry notification.
    pub fn on_found<F>(&mut self, listener: F) -> &mut Self
    where
        F: Fn(&FoundEntry) -> Result<()> + Send + Sync + 'static,
    {
        self.found.subscribe(listener);
        self
    }

    pub fn on_file_found<F>(&mut self, listener: F) -> &mut Self
    where
        F: Fn(&FileEntry) -> Result<()> + Send + Sync + 'static,
    {
        self.found.subscribe(move |entry| match entry {
            FoundEntry::File(file) => listener(file),
            FoundEntry::Directory(_) => Ok(()),
        });
        self
    }

    pub fn on_directory_found<F>(&mut self, listener: F) -> &mut Self
    where
        F: Fn(&DirectoryEntry) -> Result<()> + Send + Sync + 'static,
    {
        self.found.subscribe(move |entry| match entry {
            FoundEntry::Directory(directory) => listener(directory),
            FoundEntry::File(_) => Ok(()),
        });
        self
    }

    pub fn on_diagnostic<F>(&mut self, listener: F) -> &mut Self
    where
        F: Fn(&DiagnosticEvent) -> Result<()> + Send + Sync + 'static,
    {
        self.diagnostics.subscribe(listener);
        self
    }

    /// Classifies `root` and walks it.
    ///
    /// Fails only when `root` is neither a file nor a directory; every other
    /// failure is contained and shows up in the diagnostics and the summary.
    pub fn run(&self, root: &Path) -> Result<WalkSummary> {
        let _scope = RunScope::begin(self, root);
        let root = Root::classify(root).inspect_err(|error| {
            log::error!("cannot walk {}: {}", root.display(), error);
        })?;
        Ok(self.walk(&root))
    }

    /// Walks a root the caller has already classified.
    pub fn run_root(&self, root: &Root) -> WalkSummary {
        let _scope = RunScope::begin(self, root.path());
        self.walk(root)
    }

    fn walk(&self, root: &Root) -> WalkSummary {
        let mut summary = WalkSummary::default();
        let outcome = match root {
            Root::Directory(path) => self.process_directory(path, &mut summary),
            Root::File(path) => self.process_file(path, &mut summary),
        };
        // Reached only when a listener fails on the root's own Failed or
        // UnknownObject diagnostic.
        if let Err(error) = outcome {
            self.failure_sink
                .report(&FailureReport::new(root.path(), &error));
        }
        log::info!(
            "walk finished: {} ({} files, {} directories, {} failures)",
            root.path().display(),
            summary.files_read,
            summary.directories_read,
            summary.failures()
        );
        summary
    }

    fn process_directory(&self, path: &Path, summary: &mut WalkSummary) -> Result<()> {
        let directory = DirectoryEntry::open(path);
        if !directory.exists() {
            log::info!("directory no longer exists: {}", path.display());
            summary.unknown_objects += 1;
            return self.emit(Diagnostic::UnknownObject, path);
        }

        if let Err(error) = self.read_directory(directory, summary) {
            self.failure_sink.report(&FailureReport::new(path, &error));
            summary.directories_failed += 1;
            self.emit(Diagnostic::DirectoryFailed, path)?;
        }
        Ok(())
    }

    fn read_directory(&self, directory: DirectoryEntry, summary: &mut WalkSummary) -> Result<()> {
        let is_symlink = directory.is_reparse_point();
        let found = FoundEntry::Directory(directory);
        let path = found.path();

        self.emit(Diagnostic::DirectoryProcessing, path)?;
        if is_symlink {
            self.emit(Diagnostic::DirectoryReparsePoint, path)?;
            if !self.settings.follow_directory_symlinks {
                log::debug!("not following directory link {}", path.display());
                summary.skipped_reparse_points += 1;
                return Ok(());
            }
        }

        self.found.publish(&found)?;

        let children = Children::enumerate(path)?;
        for file in &children.files {
            self.process_file(file, summary)?;
        }
        if self.settings.recurse_directories {
            for subdirectory in &children.directories {
                self.process_directory(subdirectory, summary)?;
            }
        }

        self.emit(Diagnostic::DirectoryRead, path)?;
        summary.directories_read += 1;
        Ok(())
    }

    fn process_file(&self, path: &Path, summary: &mut WalkSummary) -> Result<()> {
        let file = FileEntry::open(path);
        if !file.exists() {
            // Listed by the parent a moment ago: something is racing the walk.
            log::warn!(
                "file vanished between enumeration and processing: {}",
                path.display()
            );
            summary.unknown_objects += 1;
            return self.emit(Diagnostic::UnknownObject, path);
        }

        if let Err(error) = self.read_file(file, summary) {
            let report = FailureReport::for_file(path, &error);
            self.failure_sink.report(&report);
            if report.kind == FailureKind::AccessDenied {
                self.inspect_access(path);
            }
            summary.files_failed += 1;
            self.emit(Diagnostic::FileFailed, path)?;
        }
        Ok(())
    }

    fn read_file(&self, file: FileEntry, summary: &mut WalkSummary) -> Result<()> {
        let is_symlink = file.is_reparse_point();
        let found = FoundEntry::File(file);
        let path = found.path();

        self.emit(Diagnostic::FileProcessing, path)?;
        if is_symlink {
            self.emit(Diagnostic::FileReparsePoint, path)?;
            if !self.settings.follow_file_symlinks {
                log::debug!("not following file link {}", path.display());
                summary.skipped_reparse_points += 1;
                return Ok(());
            }
        }

        self.found.publish(&found)?;
        self.emit(Diagnostic::FileRead, path)?;
        summary.files_read += 1;
        Ok(())
    }

    fn inspect_access(&self, path: &Path) {
        match self.access.owner_identity(path) {
            Ok(Some(identity)) => {
                log::info!("{} is owned by group {}", path.display(), identity)
            }
            Ok(None) => {}
            Err(error) => log::warn!(
                "access diagnostics failed for {}: {}",
                path.display(),
                error
            ),
        }
    }

    fn emit(&self, diagnostic: Diagnostic, path: &Path) -> Result<()> {
        log::debug!("{}: {}", diagnostic, path.display());
        self.diagnostics
            .publish(&DiagnosticEvent::new(diagnostic, path))
    }

    /// Start and completion sit outside any entry scope, so listener errors
    /// there have nowhere to go but the log.
    fn emit_lifecycle(&self, diagnostic: Diagnostic, root: &Path) {
        if let Err(error) = self.emit(diagnostic, root) {
            log::warn!(
                "{} listener failed for {}: {}",
                diagnostic,
                root.display(),
                error
            );
        }
    }
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("settings", &self.settings)
            .field("found", &self.found)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}
