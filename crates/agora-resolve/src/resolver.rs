//! The resolver service.
//!
//! [`Resolver`] owns all the state the legacy autoloader kept in globals:
//! the namespace registry, the loaded-file set, and the search paths. It
//! is constructed once at process start and passed by reference to every
//! call site; there is no ambient state.
//!
//! Resolution is a fixed pipeline, first success wins:
//!
//! 1. tokenize (charset check fails fast),
//! 2. namespace rule (registered directories, `{name}.php`),
//! 3. the suffix rule chain (see [`crate::strategy`]),
//! 4. load, idempotent per resolved path, with a strict-namespace
//!    re-verification when required.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ResolveError;
use crate::namespace::NamespaceRegistry;
use crate::oracle::FileOracle;
use crate::paths::SearchPaths;
use crate::strategy::{rule_chain, ResolutionRule, RuleOutcome};
use crate::token::ClassNameToken;

/// A resolved candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    /// The candidate path.
    pub path: PathBuf,
    /// True when the owning namespace is strict and the candidate came
    /// from an unverified naming rule: the load stage must confirm the
    /// file exists before including it.
    pub verify_on_load: bool,
}

/// Result of an idempotent load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded {
    /// The file was included for the first time.
    Included(PathBuf),
    /// The file had already been included; nothing happened.
    AlreadyIncluded(PathBuf),
}

impl Loaded {
    /// The resolved path, whichever way the load went.
    pub fn path(&self) -> &Path {
        match self {
            Loaded::Included(p) | Loaded::AlreadyIncluded(p) => p,
        }
    }
}

/// Symbol resolver: symbolic class name → source file.
pub struct Resolver {
    paths: SearchPaths,
    namespaces: NamespaceRegistry,
    fs: Box<dyn FileOracle>,
    loaded: HashSet<PathBuf>,
    rules: Vec<Box<dyn ResolutionRule>>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("paths", &self.paths)
            .field("loaded", &self.loaded.len())
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Creates a resolver with the given root namespace, search paths and
    /// filesystem oracle.
    pub fn new(
        root_namespace: impl Into<String>,
        paths: SearchPaths,
        fs: Box<dyn FileOracle>,
    ) -> Self {
        let namespaces = NamespaceRegistry::new(root_namespace, paths.source());
        Self {
            paths,
            namespaces,
            fs,
            loaded: HashSet::new(),
            rules: rule_chain(),
        }
    }

    /// Registers a namespace against an ordered directory list, with an
    /// explicit strict flag.
    pub fn register_namespace(
        &mut self,
        namespace: impl Into<String>,
        dirs: Vec<PathBuf>,
        strict: bool,
    ) {
        self.namespaces.register(namespace, dirs, strict);
    }

    /// The configured search paths.
    pub fn paths(&self) -> &SearchPaths {
        &self.paths
    }

    /// True if a controller source file named `{stem}.controller.php`
    /// exists on the admin or standard controller path.
    ///
    /// This backs the dispatcher's naming-convention route: drop-in
    /// controllers need no registration in the action table.
    pub fn has_controller(&self, stem: &str, admin: bool) -> bool {
        let dir = if admin {
            self.paths.admin_controllers()
        } else {
            self.paths.controllers()
        };
        self.fs.exists(&dir.join(format!("{stem}.controller.php")))
    }

    /// Resolves a symbolic name to a candidate file.
    ///
    /// # Errors
    ///
    /// [`ResolveError::InvalidName`] when the final segment fails the
    /// charset check; [`ResolveError::Unresolvable`] when every rule is
    /// exhausted.
    pub fn resolve(&mut self, raw: &str) -> Result<FileReference, ResolveError> {
        let token = ClassNameToken::parse(raw)?;
        let mut strict = false;

        if token.has_namespace() {
            let entry = self.namespaces.lookup_or_register(token.namespace());
            let file = format!("{}.php", token.name());
            for dir in &entry.dirs {
                let candidate = dir.join(&file);
                if self.fs.exists(&candidate) {
                    return Ok(FileReference {
                        path: candidate,
                        verify_on_load: false,
                    });
                }
            }
            // Strictness only matters for candidates guessed by the
            // later, unverified rules.
            strict = entry.strict;
        }

        for rule in &self.rules {
            if !rule.applies(&token) {
                continue;
            }
            return match rule.resolve(&token, &self.paths, self.fs.as_ref()) {
                RuleOutcome::Found(path) => Ok(FileReference {
                    path,
                    verify_on_load: strict,
                }),
                RuleOutcome::NotFound => Err(ResolveError::Unresolvable(raw.to_string())),
            };
        }

        Err(ResolveError::Unresolvable(raw.to_string()))
    }

    /// Resolves and includes a symbol, at most once per resolved path.
    ///
    /// When the resolution carries the strict flag, the candidate is
    /// re-verified against the oracle before inclusion; a candidate that
    /// fails the re-check is reported as unresolvable.
    pub fn load(&mut self, raw: &str) -> Result<Loaded, ResolveError> {
        let reference = self.resolve(raw)?;

        if reference.verify_on_load && !self.fs.exists(&reference.path) {
            return Err(ResolveError::Unresolvable(raw.to_string()));
        }

        if self.loaded.contains(&reference.path) {
            return Ok(Loaded::AlreadyIncluded(reference.path));
        }

        debug!(symbol = raw, path = %reference.path.display(), "including source file");
        self.loaded.insert(reference.path.clone());
        Ok(Loaded::Included(reference.path))
    }

    /// True if the given path has already been included.
    pub fn is_loaded(&self, path: &Path) -> bool {
        self.loaded.contains(path)
    }
}
