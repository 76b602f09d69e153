//! Request routing and dispatch for the forum engine.
//!
//! Turns a per-request [`RequestContext`] into a running controller
//! method, through a fixed pipeline:
//!
//! 1. clone the boot-time [`ActionTable`] and extend it through the
//!    [`EventBus`] (once per request),
//! 2. resolve the request to a [`ResolvedTarget`] with the
//!    [`ActionResolver`]'s single-pass precedence chain,
//! 3. load the controller and wire its modules with the
//!    [`ControllerLoader`],
//! 4. run the [`DispatchLoop`]'s fallback chain, firing lifecycle hooks
//!    around the handler.
//!
//! # Features
//!
//! - Declarative routing through the action table, plus drop-in
//!   controllers discovered by file naming convention.
//! - Security guards (maintenance mode, guest access) that dominate all
//!   other routing.
//! - Hook points for third-party code: action-table extension, front-page
//!   override, and per-action lifecycle hooks.
//! - Per-controller module wiring driven by runtime settings.
//!
//! # Example
//!
//! ```
//! use agora_dispatch::{ActionResolver, ActionTable, EventBus, RequestContext, ResolvedTarget};
//! use agora_resolve::{MemoryFiles, Resolver, SearchPaths};
//!
//! let table = ActionTable::forum_defaults();
//! let bus = EventBus::new();
//! let resolver = Resolver::new(
//!     "Agora",
//!     SearchPaths::new("/src"),
//!     Box::new(MemoryFiles::new()),
//! );
//!
//! let req = RequestContext::for_action("post");
//! let target = ActionResolver::default().resolve(&req, &table, &bus, &resolver);
//! assert_eq!(target, ResolvedTarget::new("Post_Controller", "action_post"));
//! ```

mod bus;
mod config;
mod controller;
mod dispatch;
mod error;
mod loader;
mod request;
mod route;
mod table;

pub use bus::{
    hook_base, lifecycle_hook_name, EventBus, EventScope, LifecycleEvent, LifecyclePhase,
};
pub use config::{ConfigStore, MapConfig};
pub use controller::{generic_hook_name, Controller, ControllerRegistry, HandleOutcome, Module};
pub use dispatch::{DispatchLoop, DispatchOutcome, DispatchVia};
pub use error::DispatchError;
pub use loader::{ControllerLoader, LoadedController};
pub use request::RequestContext;
pub use route::{ActionResolver, ResolvedTarget, AUTH_CONTROLLER, GUEST_ALLOWED_ACTIONS};
pub use table::{ActionEntry, ActionTable};
