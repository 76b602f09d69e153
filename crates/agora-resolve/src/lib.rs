//! Symbolic class-name resolution for the agora forum engine.
//!
//! `agora-resolve` turns a symbolic class name (e.g. `Foo_Bar_Controller`
//! or `Agora\Packages\Manifest`) into a source-file path using a layered
//! set of naming-convention rules, and tracks which files have been
//! included so a file is loaded at most once per process.
//!
//! # Features
//!
//! - **Tokenization**: namespace / stem / suffix split with a fail-fast
//!   charset check ([`ClassNameToken`])
//! - **Namespace registry**: ordered directories per namespace, explicit
//!   or lazy first-use registration, per-namespace strict flag
//!   ([`NamespaceRegistry`])
//! - **Rule chain**: an ordered table of suffix rules, first match wins,
//!   no backtracking
//! - **Filesystem seam**: every existence check goes through
//!   [`FileOracle`], so resolution is testable without a disk
//!
//! # Example
//!
//! ```rust
//! use agora_resolve::{MemoryFiles, Resolver, SearchPaths};
//!
//! let files = MemoryFiles::from_paths(["/src/controllers/Post.controller.php"]);
//! let mut resolver = Resolver::new("Agora", SearchPaths::new("/src"), Box::new(files));
//!
//! let reference = resolver.resolve("Post_Controller").unwrap();
//! assert_eq!(
//!     reference.path,
//!     std::path::PathBuf::from("/src/controllers/Post.controller.php")
//! );
//! ```

mod error;
mod namespace;
mod oracle;
mod paths;
mod resolver;
mod strategy;
mod token;

pub use error::ResolveError;
pub use namespace::{NamespaceEntry, NamespaceRegistry, NO_NAMESPACE};
pub use oracle::{DiskFiles, FileOracle, MemoryFiles};
pub use paths::SearchPaths;
pub use resolver::{FileReference, Loaded, Resolver};
pub use token::{ClassNameToken, NAMESPACE_SEPARATOR};
