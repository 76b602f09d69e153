//! Resolution error types.

use thiserror::Error;

/// Errors produced while resolving a symbolic class name to a source file.
///
/// Both variants are fatal at the call site: a caller that asked for a
/// symbol cannot proceed without it. The resolver itself never panics or
/// aborts; it reports and lets the caller decide.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The class stem failed the `[A-Za-z0-9_]+` check. No resolution
    /// rule is attempted for such a name.
    #[error("invalid symbol name: {0:?}")]
    InvalidName(String),

    /// Every resolution rule was exhausted without producing a file.
    /// The symbol is genuinely undefined as far as the naming convention
    /// is concerned.
    #[error("unresolvable symbol: {0:?}")]
    Unresolvable(String),
}
