//! The filesystem seam.
//!
//! Every existence check the resolver performs goes through [`FileOracle`],
//! so resolution logic can be tested against an in-memory file set without
//! touching the disk. Production code uses [`DiskFiles`]; tests (and
//! embedded deployments) use [`MemoryFiles`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Read-only view of the files a resolution pass may consult.
pub trait FileOracle {
    /// Returns true if `path` names an existing source file.
    fn exists(&self, path: &Path) -> bool;
}

/// Oracle backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFiles;

impl FileOracle for DiskFiles {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Oracle backed by an explicit path set.
#[derive(Debug, Default, Clone)]
pub struct MemoryFiles {
    files: HashSet<PathBuf>,
}

impl MemoryFiles {
    /// Creates an empty file set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a path to the set.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.files.insert(path.into());
        self
    }

    /// Builds a file set from an iterator of paths.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of files in the set.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True if the set holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileOracle for MemoryFiles {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_memory_files() {
        let files = MemoryFiles::from_paths(["/src/Util.class.php"]);
        assert!(files.exists(Path::new("/src/Util.class.php")));
        assert!(!files.exists(Path::new("/src/Other.class.php")));
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_memory_files_add() {
        let mut files = MemoryFiles::new();
        assert!(files.is_empty());
        files.add("/a.php").add("/b.php");
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_disk_files() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Present.class.php");
        fs::write(&file, "<?php\n").unwrap();

        let oracle = DiskFiles;
        assert!(oracle.exists(&file));
        assert!(!oracle.exists(&dir.path().join("Absent.class.php")));
        // Directories are not files.
        assert!(!oracle.exists(dir.path()));
    }
}
