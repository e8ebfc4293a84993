//! Error-reporting sink for failures contained during a walk.

use std::path::{Path, PathBuf};

use crate::error::{FailureKind, WalkError};

/// A failure caught at an entry's processing scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub message: String,
    /// The error's source chain, outermost first. Absent for files that
    /// could not be accessed, which is an expected condition.
    pub trace: Option<Vec<String>>,
}

impl FailureReport {
    /// A report that always carries the source chain.
    pub fn new(path: &Path, error: &WalkError) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: FailureKind::classify(error),
            message: error.to_string(),
            trace: Some(error.chain()),
        }
    }

    /// A report for a failed file. Access denials are reported without the
    /// source chain.
    pub fn for_file(path: &Path, error: &WalkError) -> Self {
        let mut report = Self::new(path, error);
        if report.kind == FailureKind::AccessDenied {
            report.trace = None;
        }
        report
    }
}

/// Receives every contained failure.
pub trait FailureSink: Send + Sync {
    fn report(&self, report: &FailureReport);
}

/// Default sink that writes to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFailureSink;

impl FailureSink for LogFailureSink {
    fn report(&self, report: &FailureReport) {
        let trace = report
            .trace
            .as_ref()
            .map(|chain| {
                chain
                    .iter()
                    .skip(1)
                    .map(|cause| format!("\n  caused by: {cause}"))
                    .collect::<String>()
            })
            .unwrap_or_default();
        match report.kind {
            FailureKind::AccessDenied => log::warn!(
                "{} ({}): {}{}",
                report.path.display(),
                report.kind.as_str(),
                report.message,
                trace
            ),
            FailureKind::GenericFailure => log::error!(
                "{} ({}): {}{}",
                report.path.display(),
                report.kind.as_str(),
                report.message,
                trace
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn file_access_denied_report_has_no_trace() {
        let error: WalkError = io::Error::from(io::ErrorKind::PermissionDenied).into();
        let report = FailureReport::for_file(Path::new("/locked"), &error);
        assert_eq!(report.kind, FailureKind::AccessDenied);
        assert!(report.trace.is_none());
        assert_eq!(report.path, PathBuf::from("/locked"));

        let traced = FailureReport::new(Path::new("/locked"), &error);
        assert_eq!(traced.kind, FailureKind::AccessDenied);
        assert!(traced.trace.is_some());
    }

    #[test]
    fn generic_report_carries_chain() {
        let error = WalkError::ReadDir {
            path: PathBuf::from("/data"),
            source: io::Error::new(io::ErrorKind::Other, "bad sector"),
        };
        let report = FailureReport::for_file(Path::new("/data"), &error);
        assert_eq!(report.kind, FailureKind::GenericFailure);
        let trace = report.trace.unwrap();
        assert_eq!(trace.last().map(String::as_str), Some("bad sector"));
    }

    #[test]
    fn log_sink_accepts_both_kinds() {
        let sink = LogFailureSink;
        let denied: WalkError = io::Error::from(io::ErrorKind::PermissionDenied).into();
        sink.report(&FailureReport::for_file(Path::new("/a"), &denied));
        sink.report(&FailureReport::new(
            Path::new("/b"),
            &WalkError::listener("boom"),
        ));
    }
}
