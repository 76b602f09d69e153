//! Namespace-to-directory registry.
//!
//! Maps a namespace path (e.g. `Agora\Packages`) to an ordered set of
//! directories plus a per-namespace strict flag. Registrations happen
//! once at startup (explicit [`NamespaceRegistry::register`]) or lazily
//! the first time an unknown namespace is seen; entries are never removed
//! for the lifetime of the registry.
//!
//! Lookup walks the candidate namespace from most-specific to
//! least-specific: `Agora\Admin\Reports` is tried before `Agora\Admin`
//! before `Agora`. When nothing matches, the full namespace is registered
//! with a directory computed by substituting the configured root
//! namespace with the configured source root.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Registry key for symbols with no namespace at all.
pub const NO_NAMESPACE: &str = "";

/// One registered namespace: where to look, and how much to trust the
/// naming rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceEntry {
    /// Directories searched in registration order; first hit wins.
    pub dirs: Vec<PathBuf>,
    /// When strict, the load stage must re-verify a guessed candidate on
    /// the search path before including it.
    pub strict: bool,
}

/// Process-wide namespace map, held by the resolver and mutated only by
/// appending new entries.
#[derive(Debug)]
pub struct NamespaceRegistry {
    map: HashMap<String, NamespaceEntry>,
    root_namespace: String,
    source_root: PathBuf,
}

impl NamespaceRegistry {
    /// Creates a registry rooted at `source_root`, with `root_namespace`
    /// as the token substituted during lazy registration.
    ///
    /// The no-namespace sentinel is pre-registered against the source
    /// root so single-segment lookups always have a home.
    pub fn new(root_namespace: impl Into<String>, source_root: impl Into<PathBuf>) -> Self {
        let source_root = source_root.into();
        let mut map = HashMap::new();
        map.insert(
            NO_NAMESPACE.to_string(),
            NamespaceEntry {
                dirs: vec![source_root.clone()],
                strict: false,
            },
        );
        Self {
            map,
            root_namespace: root_namespace.into(),
            source_root,
        }
    }

    /// Explicitly registers a namespace against an ordered directory list.
    ///
    /// Registering the same namespace again replaces the earlier entry;
    /// this is a startup-time operation, not a per-request one.
    pub fn register(
        &mut self,
        namespace: impl Into<String>,
        dirs: Vec<PathBuf>,
        strict: bool,
    ) {
        self.map.insert(namespace.into(), NamespaceEntry { dirs, strict });
    }

    /// Looks up the most specific registered namespace for `parts`,
    /// popping trailing segments until a match is found.
    pub fn lookup(&self, parts: &[String]) -> Option<&NamespaceEntry> {
        for depth in (1..=parts.len()).rev() {
            let key = parts[..depth].join("\\");
            if let Some(entry) = self.map.get(&key) {
                return Some(entry);
            }
        }
        None
    }

    /// Looks up `parts`, registering the full namespace on a miss.
    ///
    /// The lazily computed directory replaces the root-namespace token
    /// with the source root, so `Agora\Packages` lands at
    /// `{source_root}/Packages`. Lazy registrations are non-strict: the
    /// naming rule is trusted optimistically.
    pub fn lookup_or_register(&mut self, parts: &[String]) -> NamespaceEntry {
        if let Some(entry) = self.lookup(parts) {
            return entry.clone();
        }

        let dir = self.computed_dir(parts);
        let key = parts.join("\\");
        let entry = NamespaceEntry {
            dirs: vec![dir],
            strict: false,
        };
        self.map.insert(key, entry.clone());
        entry
    }

    /// True if the exact namespace path is registered.
    pub fn contains(&self, namespace: &str) -> bool {
        self.map.contains_key(namespace)
    }

    /// The configured source root.
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    fn computed_dir(&self, parts: &[String]) -> PathBuf {
        let mut dir = PathBuf::new();
        for part in parts {
            if *part == self.root_namespace {
                dir.push(&self.source_root);
            } else {
                dir.push(part);
            }
        }
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> NamespaceRegistry {
        NamespaceRegistry::new("Agora", "/var/www/sources")
    }

    fn parts(path: &str) -> Vec<String> {
        path.split('\\').map(String::from).collect()
    }

    #[test]
    fn test_no_namespace_sentinel_preregistered() {
        let reg = registry();
        assert!(reg.contains(NO_NAMESPACE));
    }

    #[test]
    fn test_lookup_most_specific_first() {
        let mut reg = registry();
        reg.register("Agora", vec!["/var/www/sources".into()], false);
        reg.register("Agora\\Admin", vec!["/var/www/sources/admin".into()], true);

        let entry = reg.lookup(&parts("Agora\\Admin\\Reports")).unwrap();
        assert_eq!(entry.dirs, vec![PathBuf::from("/var/www/sources/admin")]);
        assert!(entry.strict);

        let entry = reg.lookup(&parts("Agora\\Other")).unwrap();
        assert_eq!(entry.dirs, vec![PathBuf::from("/var/www/sources")]);
    }

    #[test]
    fn test_lookup_miss() {
        let reg = registry();
        assert!(reg.lookup(&parts("Vendor\\Thing")).is_none());
    }

    #[test]
    fn test_lazy_registration_substitutes_root() {
        let mut reg = registry();
        let entry = reg.lookup_or_register(&parts("Agora\\Packages"));
        assert_eq!(entry.dirs, vec![PathBuf::from("/var/www/sources/Packages")]);
        assert!(!entry.strict);
        // The full namespace is now registered for subsequent lookups.
        assert!(reg.contains("Agora\\Packages"));
    }

    #[test]
    fn test_lazy_registration_is_stable() {
        let mut reg = registry();
        let first = reg.lookup_or_register(&parts("Agora\\Themes"));
        let second = reg.lookup_or_register(&parts("Agora\\Themes"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_foreign_root_kept_verbatim() {
        let mut reg = registry();
        let entry = reg.lookup_or_register(&parts("Vendor\\Widget"));
        assert_eq!(entry.dirs, vec![PathBuf::from("Vendor/Widget")]);
    }
}
