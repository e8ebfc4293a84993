//! Handles for the files and directories met during a traversal.
//!
//! An entry is stat'ed once, without following symbolic links, when it is
//! opened. Listeners receive entries by reference and must copy anything
//! they want to keep.

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

/// Attributes shared by file and directory handles.
#[derive(Debug, Clone)]
struct EntryAttributes {
    path: PathBuf,
    exists: bool,
    is_reparse_point: bool,
    metadata: Option<Metadata>,
}

impl EntryAttributes {
    fn probe(path: &Path) -> Self {
        match fs::symlink_metadata(path) {
            Ok(metadata) => Self {
                path: path.to_path_buf(),
                exists: true,
                is_reparse_point: metadata.file_type().is_symlink(),
                metadata: Some(metadata),
            },
            // A parent replaced by a file reports NotADirectory.
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                Self {
                    path: path.to_path_buf(),
                    exists: false,
                    is_reparse_point: false,
                    metadata: None,
                }
            }
            Err(error) => {
                // The name is there but its attributes are not readable.
                log::debug!("cannot stat {}: {}", path.display(), error);
                Self {
                    path: path.to_path_buf(),
                    exists: true,
                    is_reparse_point: false,
                    metadata: None,
                }
            }
        }
    }
}

/// A directory discovered during traversal.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    attributes: EntryAttributes,
}

impl DirectoryEntry {
    pub fn open(path: &Path) -> Self {
        Self {
            attributes: EntryAttributes::probe(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.attributes.path
    }

    pub fn exists(&self) -> bool {
        self.attributes.exists
    }

    /// True when the directory is a symbolic link.
    pub fn is_reparse_point(&self) -> bool {
        self.attributes.is_reparse_point
    }

    /// Metadata of the link itself for reparse points.
    pub fn metadata(&self) -> Option<&Metadata> {
        self.attributes.metadata.as_ref()
    }
}

/// A file discovered during traversal.
#[derive(Debug, Clone)]
pub struct FileEntry {
    attributes: EntryAttributes,
}

impl FileEntry {
    pub fn open(path: &Path) -> Self {
        Self {
            attributes: EntryAttributes::probe(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.attributes.path
    }

    pub fn exists(&self) -> bool {
        self.attributes.exists
    }

    /// True when the file is a symbolic link.
    pub fn is_reparse_point(&self) -> bool {
        self.attributes.is_reparse_point
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.attributes.metadata.as_ref()
    }

    /// Size in bytes of the entry itself (the link, for reparse points).
    pub fn size(&self) -> Option<u64> {
        self.metadata().map(Metadata::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn open_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.txt");
        File::create(&path).unwrap().write_all(b"hello").unwrap();

        let entry = FileEntry::open(&path);
        assert!(entry.exists());
        assert!(!entry.is_reparse_point());
        assert_eq!(entry.path(), path.as_path());
        assert_eq!(entry.size(), Some(5));
    }

    #[test]
    fn open_missing_entries() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone");

        assert!(!FileEntry::open(&missing).exists());
        let dir = DirectoryEntry::open(&missing);
        assert!(!dir.exists());
        assert!(dir.metadata().is_none());
    }

    #[test]
    fn entry_below_a_file_is_missing() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain");
        File::create(&file).unwrap();
        let below = file.join("inner");

        let entry = FileEntry::open(&below);
        assert!(!entry.exists());
        assert!(!entry.is_reparse_point());
        assert!(!DirectoryEntry::open(&below).exists());
    }

    #[test]
    fn open_existing_directory() {
        let temp = TempDir::new().unwrap();
        let entry = DirectoryEntry::open(temp.path());
        assert!(entry.exists());
        assert!(!entry.is_reparse_point());
        assert!(entry.metadata().is_some_and(Metadata::is_dir));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_reparse_points() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let target_dir = temp.path().join("real");
        fs::create_dir(&target_dir).unwrap();
        let target_file = temp.path().join("real.txt");
        File::create(&target_file).unwrap();

        let dir_link = temp.path().join("dir-link");
        let file_link = temp.path().join("file-link");
        symlink(&target_dir, &dir_link).unwrap();
        symlink(&target_file, &file_link).unwrap();

        assert!(DirectoryEntry::open(&dir_link).is_reparse_point());
        assert!(FileEntry::open(&file_link).is_reparse_point());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_still_exists() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let link = temp.path().join("dangling");
        symlink(temp.path().join("nowhere"), &link).unwrap();

        let entry = FileEntry::open(&link);
        assert!(entry.exists());
        assert!(entry.is_reparse_point());
    }
}
