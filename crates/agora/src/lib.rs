//! # Agora - Forum Request Engine
//!
//! Agora is the request-serving core of a web forum: it resolves symbolic
//! class names to source files, routes requests to controllers, and runs
//! the dispatch lifecycle with its hook points. It provides:
//!
//! - Symbol resolution over the legacy file-naming conventions
//!   (suffix-driven rules, namespaces, idempotent includes)
//! - A declarative action table plus drop-in controllers discovered by
//!   naming convention
//! - Security guards (maintenance mode, guest access) ahead of all
//!   routing
//! - Hook points for third-party code: route extension, front-page
//!   override, per-action lifecycle hooks
//! - Module wiring per controller instantiation, driven by runtime
//!   settings
//!
//! ## Quick Start
//!
//! ```rust
//! use agora::{Engine, HandleOutcome, RequestContext};
//! use agora::resolve::MemoryFiles;
//!
//! struct Help;
//!
//! impl agora::Controller for Help {
//!     fn hook(&self) -> &str {
//!         "help"
//!     }
//!
//!     fn handle(&mut self, method: &str, _req: &RequestContext) -> anyhow::Result<HandleOutcome> {
//!         Ok(if method == "action_index" {
//!             HandleOutcome::Handled
//!         } else {
//!             HandleOutcome::Unknown
//!         })
//!     }
//! }
//!
//! let files = MemoryFiles::from_paths(["/src/controllers/Help.controller.php"]);
//! let mut engine = Engine::builder("/src")
//!     .with_files(Box::new(files))
//!     .controller("Help_Controller", || Box::new(Help))
//!     .build()
//!     .unwrap();
//!
//! let outcome = engine.serve(&RequestContext::for_action("help")).unwrap();
//! assert_eq!(outcome.target.method, "action_index");
//! ```
//!
//! The building blocks live in two companion crates, re-exported here:
//! [`resolve`] (symbol → file resolution) and [`dispatch`] (routing and
//! the dispatch loop).

mod engine;
mod settings;
mod setup;

pub use engine::{Engine, EngineBuilder};
pub use settings::{settings_from_yaml, settings_from_yaml_file};
pub use setup::SetupError;

pub use agora_dispatch::{
    ActionEntry, ActionResolver, ActionTable, ConfigStore, Controller, ControllerRegistry,
    DispatchError, DispatchOutcome, DispatchVia, EventBus, HandleOutcome, LifecycleEvent,
    LifecyclePhase, MapConfig, Module, RequestContext, ResolvedTarget,
};
pub use agora_resolve::{ResolveError, Resolver};

pub use agora_dispatch as dispatch;
pub use agora_resolve as resolve;
