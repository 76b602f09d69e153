//! Search-path configuration.
//!
//! The resolver searches an ordered list of include directories for
//! generic lookups, and derives the well-known subdirectories (controllers,
//! admin controllers, modules, exceptions) from a single source root.

use std::path::{Path, PathBuf};

use crate::oracle::FileOracle;

/// Ordered search roots plus the well-known subdirectory layout.
#[derive(Debug, Clone)]
pub struct SearchPaths {
    source: PathBuf,
    include: Vec<PathBuf>,
}

impl SearchPaths {
    /// Creates a search-path set rooted at `source`. The include path
    /// initially contains just the source root.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        Self {
            include: vec![source.clone()],
            source,
        }
    }

    /// Appends a directory to the include path. Order matters: earlier
    /// directories win.
    pub fn push_include(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.include.push(dir.into());
        self
    }

    /// The base source directory.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The ordered include path.
    pub fn include(&self) -> &[PathBuf] {
        &self.include
    }

    /// Directory holding `*.controller.php` files.
    pub fn controllers(&self) -> PathBuf {
        self.source.join("controllers")
    }

    /// Directory holding admin controllers.
    pub fn admin_controllers(&self) -> PathBuf {
        self.source.join("admin")
    }

    /// Directory holding per-module subdirectories.
    pub fn modules(&self) -> PathBuf {
        self.source.join("modules")
    }

    /// Directory holding exception classes.
    pub fn exceptions(&self) -> PathBuf {
        self.source.join("Exception")
    }

    /// Finds `file_name` on the include path, first hit wins.
    pub fn find(&self, file_name: &str, fs: &dyn FileOracle) -> Option<PathBuf> {
        self.include
            .iter()
            .map(|dir| dir.join(file_name))
            .find(|candidate| fs.exists(candidate))
    }

    /// Finds the first of `file_names` that resolves on the include path.
    /// Name order dominates directory order: all directories are tried
    /// for the first name before the second name is considered.
    pub fn find_first(&self, file_names: &[String], fs: &dyn FileOracle) -> Option<PathBuf> {
        file_names.iter().find_map(|name| self.find(name, fs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::MemoryFiles;

    #[test]
    fn test_include_order() {
        let mut paths = SearchPaths::new("/src");
        paths.push_include("/ext");

        let fs = MemoryFiles::from_paths(["/ext/Thing.class.php", "/src/Thing.class.php"]);
        // /src is registered first, so it wins.
        assert_eq!(
            paths.find("Thing.class.php", &fs),
            Some(PathBuf::from("/src/Thing.class.php"))
        );
    }

    #[test]
    fn test_find_first_prefers_name_order() {
        let mut paths = SearchPaths::new("/src");
        paths.push_include("/ext");

        let fs = MemoryFiles::from_paths(["/ext/Thing.class.php", "/src/Thing.php"]);
        let names = vec!["Thing.class.php".to_string(), "Thing.php".to_string()];
        // The .class.php name is preferred even though it only exists in
        // the later directory.
        assert_eq!(
            paths.find_first(&names, &fs),
            Some(PathBuf::from("/ext/Thing.class.php"))
        );
    }

    #[test]
    fn test_derived_directories() {
        let paths = SearchPaths::new("/src");
        assert_eq!(paths.controllers(), PathBuf::from("/src/controllers"));
        assert_eq!(paths.admin_controllers(), PathBuf::from("/src/admin"));
        assert_eq!(paths.modules(), PathBuf::from("/src/modules"));
        assert_eq!(paths.exceptions(), PathBuf::from("/src/Exception"));
    }
}
