//! Controller loading and module wiring.
//!
//! [`ControllerLoader`] turns a resolved target into a live controller:
//!
//! 1. include the controller's source file through the resolver (fatal
//!    when unresolvable),
//! 2. construct the controller from the registry (fatal when no
//!    constructor is registered),
//! 3. discover modules from the `modules_{hook}` setting and bind the
//!    resolvable ones to a fresh event scope (unresolvable ones are
//!    skipped silently),
//! 4. run the controller's `pre_dispatch`.
//!
//! Module wiring happens on every instantiation; bindings are never
//! cached across requests, so a settings change takes effect on the next
//! request.

use agora_resolve::Resolver;
use tracing::debug;

use crate::bus::EventScope;
use crate::config::ConfigStore;
use crate::controller::{Controller, ControllerRegistry, Module};
use crate::error::DispatchError;
use crate::request::RequestContext;
use crate::route::{ucfirst, ResolvedTarget};

/// A controller ready to receive a method invocation.
pub struct LoadedController {
    /// The controller identifier it was constructed from.
    pub id: String,
    /// The instance itself.
    pub controller: Box<dyn Controller>,
    /// Lifecycle listeners bound by this instantiation's modules.
    pub scope: EventScope,
    // Modules stay alive as long as their listeners do.
    _modules: Vec<Box<dyn Module>>,
}

impl std::fmt::Debug for LoadedController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedController")
            .field("id", &self.id)
            .field("modules", &self._modules.len())
            .finish_non_exhaustive()
    }
}

/// Instantiates controllers for the dispatch loop.
pub struct ControllerLoader<'a> {
    registry: &'a ControllerRegistry,
    config: &'a dyn ConfigStore,
    resolver: &'a mut Resolver,
}

impl<'a> ControllerLoader<'a> {
    /// Creates a loader over the given registry, settings, and resolver.
    pub fn new(
        registry: &'a ControllerRegistry,
        config: &'a dyn ConfigStore,
        resolver: &'a mut Resolver,
    ) -> Self {
        Self {
            registry,
            config,
            resolver,
        }
    }

    /// Loads the target's controller and wires its modules.
    ///
    /// # Errors
    ///
    /// [`DispatchError::UnknownController`] when the controller's source
    /// file does not resolve or no constructor is registered for its id.
    pub fn load(
        &mut self,
        target: &ResolvedTarget,
        req: &RequestContext,
    ) -> Result<LoadedController, DispatchError> {
        let id = target.controller.clone();

        self.resolver
            .load(&id)
            .map_err(|_| DispatchError::UnknownController(id.clone()))?;
        let mut controller = self
            .registry
            .instantiate(&id)
            .ok_or_else(|| DispatchError::UnknownController(id.clone()))?;

        let hook = controller.hook().to_string();
        let mut scope = EventScope::new();
        let mut modules = Vec::new();
        for short_name in self.config.get_list(&format!("modules_{hook}")) {
            let class_id = format!("{}_{}_Module", ucfirst(&short_name), ucfirst(&hook));
            if self.resolver.load(&class_id).is_err() {
                debug!(module = %class_id, "module source not resolvable, skipping");
                continue;
            }
            match self.registry.module(&class_id) {
                Some(module) => {
                    module.bind(&mut scope, req);
                    modules.push(module);
                }
                None => debug!(module = %class_id, "module has no constructor, skipping"),
            }
        }

        controller.pre_dispatch(req);

        Ok(LoadedController {
            id,
            controller,
            scope,
            _modules: modules,
        })
    }
}
