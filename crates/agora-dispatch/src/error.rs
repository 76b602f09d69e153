//! Dispatch error types.

use thiserror::Error;

/// Errors surfaced by controller loading and the dispatch loop.
///
/// Routing itself never fails: the action resolver's final fallback
/// guarantees a target. Failures appear later, when the target cannot be
/// instantiated or even the front page lacks a callable handler.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The resolved controller id is not instantiable. A request cannot
    /// be served without its controller, so this is fatal.
    #[error("unknown controller {0:?}")]
    UnknownController(String),

    /// Neither the resolved method, `action_index`, a default handler,
    /// nor the front-page fallback produced a callable target. This
    /// indicates a packaging or configuration defect.
    #[error("no callable target for {method:?} on {controller:?}")]
    NoHandler {
        /// The controller that lacked the method.
        controller: String,
        /// The method that could not be satisfied.
        method: String,
    },

    /// A controller handler ran and failed.
    #[error("handler failed")]
    Handler(#[source] anyhow::Error),
}
