use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Access denied: {path}")]
    AccessDenied { path: PathBuf },

    #[error("Listener error: {0}")]
    Listener(#[source] Box<dyn StdError + Send + Sync>),

    #[error("Contract violation for {path}: {reason}")]
    ContractViolation { path: PathBuf, reason: String },

    #[error("Settings error: {0}")]
    Settings(String),
}

impl WalkError {
    /// Wraps an arbitrary listener-side error.
    pub fn listener<E>(error: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Listener(error.into())
    }

    /// Returns true if this error, or any error in its source chain, is a
    /// permission failure.
    pub fn is_access_denied(&self) -> bool {
        let mut current: Option<&(dyn StdError + 'static)> = Some(self);
        while let Some(error) = current {
            if let Some(Self::AccessDenied { .. }) = error.downcast_ref::<Self>() {
                return true;
            }
            if let Some(io_error) = error.downcast_ref::<io::Error>() {
                if io_error.kind() == io::ErrorKind::PermissionDenied {
                    return true;
                }
            }
            current = error.source();
        }
        false
    }

    /// Messages of every error in the source chain, outermost first.
    pub fn chain(&self) -> Vec<String> {
        let mut messages = vec![self.to_string()];
        let mut current = self.source();
        while let Some(error) = current {
            messages.push(error.to_string());
            current = error.source();
        }
        messages
    }
}

/// The two ways processing a single entry can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A permission failure. Expected and low severity.
    AccessDenied,
    /// Anything else.
    GenericFailure,
}

impl FailureKind {
    pub fn classify(error: &WalkError) -> Self {
        if error.is_access_denied() {
            Self::AccessDenied
        } else {
            Self::GenericFailure
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessDenied => "access_denied",
            Self::GenericFailure => "generic_failure",
        }
    }
}

pub type Result<T> = std::result::Result<T, WalkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_io_error_is_access_denied() {
        let error: WalkError = io::Error::from(io::ErrorKind::PermissionDenied).into();
        assert!(error.is_access_denied());
        assert_eq!(FailureKind::classify(&error), FailureKind::AccessDenied);
    }

    #[test]
    fn explicit_access_denied_variant() {
        let error = WalkError::AccessDenied {
            path: PathBuf::from("/secret"),
        };
        assert_eq!(FailureKind::classify(&error), FailureKind::AccessDenied);
    }

    #[test]
    fn nested_permission_error_is_found_in_chain() {
        let error = WalkError::ReadDir {
            path: PathBuf::from("/locked"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(error.is_access_denied());

        let wrapped = WalkError::listener(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(wrapped.is_access_denied());
    }

    #[test]
    fn access_denied_returned_by_a_listener_is_access_denied() {
        let error = WalkError::listener(WalkError::AccessDenied {
            path: PathBuf::from("/secret/report.pdf"),
        });
        assert!(matches!(error, WalkError::Listener(_)));
        assert!(error.is_access_denied());
        assert_eq!(FailureKind::classify(&error), FailureKind::AccessDenied);

        let generic = WalkError::listener(WalkError::listener("boom"));
        assert!(!generic.is_access_denied());
    }

    #[test]
    fn other_errors_are_generic() {
        let error = WalkError::listener("boom");
        assert_eq!(FailureKind::classify(&error), FailureKind::GenericFailure);

        let not_found: WalkError = io::Error::from(io::ErrorKind::NotFound).into();
        assert!(!not_found.is_access_denied());
    }

    #[test]
    fn chain_lists_sources_outermost_first() {
        let error = WalkError::ReadDir {
            path: PathBuf::from("/data"),
            source: io::Error::new(io::ErrorKind::Other, "disk on fire"),
        };
        let chain = error.chain();
        assert_eq!(chain.len(), 2);
        assert!(chain[0].contains("/data"));
        assert_eq!(chain[1], "disk on fire");
    }
}
