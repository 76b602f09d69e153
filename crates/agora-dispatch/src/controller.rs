//! Controller and module capability traits, plus the constructor
//! registry.
//!
//! The legacy engine instantiated controllers by string class name after
//! including their source file. The registry is the typed counterpart:
//! source inclusion still goes through the resolver, but construction
//! runs a registered factory keyed by the controller identifier. A
//! resolvable file with no registered constructor is as fatal as a
//! missing file.
//!
//! Method invocation by name maps to [`Controller::handle`], which
//! reports [`HandleOutcome::Unknown`] for a method the controller does
//! not implement. The dispatch loop drives its fallback chain off that
//! signal instead of reflection.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::bus::EventScope;
use crate::request::RequestContext;

/// What a controller did with a method invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleOutcome {
    /// The method existed and ran.
    Handled,
    /// The controller has no such method; the caller should fall back.
    Unknown,
}

/// A request-serving controller.
pub trait Controller {
    /// The controller's generic hook name, used to look up its module
    /// bindings (`modules_{hook}`). Conventionally the controller
    /// identifier with the `_Controller` suffix stripped, lower-cased;
    /// see [`generic_hook_name`].
    fn hook(&self) -> &str;

    /// Runs once after module wiring, before any handler. Controllers
    /// load shared state here.
    fn pre_dispatch(&mut self, _req: &RequestContext) {}

    /// Invokes the named method. Returns [`HandleOutcome::Unknown`] when
    /// the controller does not implement it.
    ///
    /// # Errors
    ///
    /// Any error a handler body raises; the dispatch loop wraps it in
    /// [`crate::DispatchError::Handler`].
    fn handle(&mut self, method: &str, req: &RequestContext) -> anyhow::Result<HandleOutcome>;
}

/// A plugin bound to one controller instantiation.
pub trait Module {
    /// Registers the module's lifecycle listeners on the controller's
    /// event scope.
    fn bind(&self, scope: &mut EventScope, req: &RequestContext);
}

/// Derives the generic hook name for a controller identifier:
/// `Display_Controller` → `display`.
pub fn generic_hook_name(controller_id: &str) -> String {
    controller_id
        .strip_suffix("_Controller")
        .unwrap_or(controller_id)
        .to_ascii_lowercase()
}

type ControllerFactory = Rc<dyn Fn() -> Box<dyn Controller>>;
type ModuleFactory = Rc<dyn Fn() -> Box<dyn Module>>;
type DefaultHandlerFn = Rc<dyn Fn(&RequestContext) -> anyhow::Result<()>>;

/// Constructor registry for controllers, modules, and free-standing
/// default handlers.
///
/// Default handlers are the last resort of the dispatch fallback chain:
/// a plain function keyed by method identifier, for handlers that never
/// belonged to a controller.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, ControllerFactory>,
    modules: HashMap<String, ModuleFactory>,
    default_handlers: HashMap<String, DefaultHandlerFn>,
}

impl ControllerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller constructor under its identifier.
    pub fn register_controller<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Controller> + 'static,
    {
        self.controllers.insert(id.into(), Rc::new(factory));
    }

    /// Registers a module constructor under its class identifier.
    pub fn register_module<F>(&mut self, class_id: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Module> + 'static,
    {
        self.modules.insert(class_id.into(), Rc::new(factory));
    }

    /// Registers a free-standing default handler for a method identifier.
    pub fn register_default_handler<F>(&mut self, method: impl Into<String>, handler: F)
    where
        F: Fn(&RequestContext) -> anyhow::Result<()> + 'static,
    {
        self.default_handlers.insert(method.into(), Rc::new(handler));
    }

    /// True if a constructor is registered for the controller id.
    pub fn contains_controller(&self, id: &str) -> bool {
        self.controllers.contains_key(id)
    }

    /// Constructs a fresh controller instance.
    pub fn instantiate(&self, id: &str) -> Option<Box<dyn Controller>> {
        self.controllers.get(id).map(|factory| factory())
    }

    /// Constructs a fresh module instance.
    pub fn module(&self, class_id: &str) -> Option<Box<dyn Module>> {
        self.modules.get(class_id).map(|factory| factory())
    }

    /// Looks up a default handler.
    pub fn default_handler(&self, method: &str) -> Option<&DefaultHandlerFn> {
        self.default_handlers.get(method)
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("controllers", &self.controllers.len())
            .field("modules", &self.modules.len())
            .field("default_handlers", &self.default_handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Probe {
        handled: Vec<&'static str>,
    }

    impl Controller for Probe {
        fn hook(&self) -> &str {
            "probe"
        }

        fn handle(&mut self, method: &str, _req: &RequestContext) -> anyhow::Result<HandleOutcome> {
            if self.handled.contains(&method) {
                Ok(HandleOutcome::Handled)
            } else {
                Ok(HandleOutcome::Unknown)
            }
        }
    }

    #[test]
    fn test_generic_hook_name() {
        assert_eq!(generic_hook_name("Display_Controller"), "display");
        assert_eq!(generic_hook_name("MessageIndex_Controller"), "messageindex");
        assert_eq!(generic_hook_name("Oddball"), "oddball");
    }

    #[test]
    fn test_instantiate_runs_factory_each_time() {
        let mut registry = ControllerRegistry::new();
        registry.register_controller("Probe_Controller", || {
            Box::new(Probe {
                handled: vec!["action_index"],
            })
        });

        assert!(registry.contains_controller("Probe_Controller"));
        assert!(registry.instantiate("Probe_Controller").is_some());
        assert!(registry.instantiate("Ghost_Controller").is_none());
    }

    #[test]
    fn test_handle_outcome() {
        let mut probe = Probe {
            handled: vec!["action_index"],
        };
        let req = RequestContext::default();
        assert_eq!(
            probe.handle("action_index", &req).unwrap(),
            HandleOutcome::Handled
        );
        assert_eq!(
            probe.handle("action_missing", &req).unwrap(),
            HandleOutcome::Unknown
        );
    }

    #[test]
    fn test_default_handler_lookup() {
        let ran = Rc::new(Cell::new(false));
        let ran_handler = ran.clone();

        let mut registry = ControllerRegistry::new();
        registry.register_default_handler("action_trackip", move |_req| {
            ran_handler.set(true);
            Ok(())
        });

        let handler = registry.default_handler("action_trackip").unwrap().clone();
        handler(&RequestContext::default()).unwrap();
        assert!(ran.get());
        assert!(registry.default_handler("action_other").is_none());
    }
}
