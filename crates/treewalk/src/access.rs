//! Best-effort ownership lookup used when a file turns out to be unreadable.
//!
//! Nothing here influences traversal. The walker calls the configured
//! `AccessDiagnostics` after an access denial, logs what it gets back and
//! ignores any failure.

use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Identity that owns an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerIdentity {
    /// Resolved account or group name.
    Name(String),
    /// Raw numeric id, when no name could be resolved.
    Id(u32),
}

impl fmt::Display for OwnerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

pub trait AccessDiagnostics: Send + Sync {
    /// Looks up the identity owning `path`. `Ok(None)` means the capability
    /// is not available.
    fn owner_identity(&self, path: &Path) -> Result<Option<OwnerIdentity>>;
}

/// For platforms without ownership inspection.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAccessDiagnostics;

impl AccessDiagnostics for NoopAccessDiagnostics {
    fn owner_identity(&self, _path: &Path) -> Result<Option<OwnerIdentity>> {
        Ok(None)
    }
}

/// Reports the owning group of a file: its name when the group database
/// resolves it, otherwise the numeric gid.
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct OwningGroup;

#[cfg(unix)]
impl AccessDiagnostics for OwningGroup {
    fn owner_identity(&self, path: &Path) -> Result<Option<OwnerIdentity>> {
        use std::os::unix::fs::MetadataExt;

        let gid = std::fs::symlink_metadata(path)?.gid();
        match uzers::get_group_by_gid(gid) {
            Some(group) => Ok(Some(OwnerIdentity::Name(
                group.name().to_string_lossy().into_owned(),
            ))),
            None => {
                log::debug!(
                    "group lookup failed for gid {gid} on {}, falling back to numeric id",
                    path.display()
                );
                Ok(Some(OwnerIdentity::Id(gid)))
            }
        }
    }
}

/// The diagnostics used when none is configured.
pub fn platform_default() -> Box<dyn AccessDiagnostics> {
    #[cfg(unix)]
    {
        Box::new(OwningGroup)
    }
    #[cfg(not(unix))]
    {
        Box::new(NoopAccessDiagnostics)
    }
}
