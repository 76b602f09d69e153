//! The dispatch loop.
//!
//! Takes a resolved target and drives the handler invocation with its
//! fallback chain:
//!
//! 1. the resolved method,
//! 2. `action_index` on the same controller,
//! 3. a registered free-standing default handler for the method,
//! 4. a front-page re-resolution, at most once per request.
//!
//! Lifecycle hooks fire around the chain: the before hook fires once the
//! controller is loaded, the after hook fires whichever branch served
//! the request. Hook names derive from the originally resolved method,
//! so `post2` submissions fire the `post` hooks either way.

use tracing::{debug, warn};

use crate::bus::{hook_base, lifecycle_hook_name, EventBus, LifecycleEvent, LifecyclePhase};
use crate::controller::{ControllerRegistry, HandleOutcome};
use crate::error::DispatchError;
use crate::loader::ControllerLoader;
use crate::request::RequestContext;
use crate::route::{ActionResolver, ResolvedTarget};

/// Which branch of the fallback chain served the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchVia {
    /// The resolved method ran.
    Direct,
    /// The controller fell back to `action_index`.
    IndexFallback,
    /// A free-standing default handler ran.
    DefaultHandler,
    /// The request was re-routed to the front page.
    FrontPage,
}

/// Result of a completed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// The controller/method pair that actually served the request.
    pub target: ResolvedTarget,
    /// The fallback branch that produced it.
    pub via: DispatchVia,
}

/// Runs resolved targets to completion.
#[derive(Debug)]
pub struct DispatchLoop<'a> {
    routes: &'a ActionResolver,
    registry: &'a ControllerRegistry,
    bus: &'a EventBus,
}

impl<'a> DispatchLoop<'a> {
    /// Creates a loop over the given route configuration, registry and
    /// bus.
    pub fn new(
        routes: &'a ActionResolver,
        registry: &'a ControllerRegistry,
        bus: &'a EventBus,
    ) -> Self {
        Self {
            routes,
            registry,
            bus,
        }
    }

    /// Dispatches a resolved target.
    ///
    /// # Errors
    ///
    /// [`DispatchError::UnknownController`] when the target (or its
    /// front-page fallback) cannot be instantiated;
    /// [`DispatchError::NoHandler`] when the whole fallback chain is
    /// exhausted; [`DispatchError::Handler`] when a handler body fails.
    pub fn run(
        &self,
        loader: &mut ControllerLoader<'_>,
        req: &RequestContext,
        target: ResolvedTarget,
    ) -> Result<DispatchOutcome, DispatchError> {
        self.run_at_depth(loader, req, target, 0)
    }

    fn run_at_depth(
        &self,
        loader: &mut ControllerLoader<'_>,
        req: &RequestContext,
        target: ResolvedTarget,
        depth: u8,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut loaded = loader.load(&target, req)?;

        let base = hook_base(&target.method).to_string();
        let before_hook = lifecycle_hook_name(&base, LifecyclePhase::Before);
        let before = LifecycleEvent {
            phase: LifecyclePhase::Before,
            request: req,
            target: &target,
        };
        self.bus.fire_lifecycle(&before_hook, &before);
        loaded.scope.notify(&before_hook, &before);

        let mut served = target.clone();
        let via = match loaded
            .controller
            .handle(&target.method, req)
            .map_err(DispatchError::Handler)?
        {
            HandleOutcome::Handled => DispatchVia::Direct,
            HandleOutcome::Unknown => match loaded
                .controller
                .handle("action_index", req)
                .map_err(DispatchError::Handler)?
            {
                HandleOutcome::Handled => {
                    debug!(
                        controller = %target.controller,
                        method = %target.method,
                        "method missing, served by action_index"
                    );
                    served.method = "action_index".to_string();
                    DispatchVia::IndexFallback
                }
                HandleOutcome::Unknown => {
                    if let Some(handler) = self.registry.default_handler(&target.method) {
                        handler(req).map_err(DispatchError::Handler)?;
                        DispatchVia::DefaultHandler
                    } else if depth == 0 {
                        warn!(
                            controller = %target.controller,
                            method = %target.method,
                            "no handler on target, re-routing to the front page"
                        );
                        self.fire_after(&loaded, req, &base, &served);
                        let front = self.routes.front_page(self.bus);
                        let mut outcome = self.run_at_depth(loader, req, front, depth + 1)?;
                        outcome.via = DispatchVia::FrontPage;
                        return Ok(outcome);
                    } else {
                        return Err(DispatchError::NoHandler {
                            controller: target.controller,
                            method: target.method,
                        });
                    }
                }
            },
        };

        self.fire_after(&loaded, req, &base, &served);
        Ok(DispatchOutcome {
            target: served,
            via,
        })
    }

    fn fire_after(
        &self,
        loaded: &crate::loader::LoadedController,
        req: &RequestContext,
        base: &str,
        served: &ResolvedTarget,
    ) {
        let after_hook = lifecycle_hook_name(base, LifecyclePhase::After);
        let after = LifecycleEvent {
            phase: LifecyclePhase::After,
            request: req,
            target: served,
        };
        self.bus.fire_lifecycle(&after_hook, &after);
        loaded.scope.notify(&after_hook, &after);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::controller::Controller;
    use agora_resolve::{MemoryFiles, Resolver, SearchPaths};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Scripted {
        hook: &'static str,
        methods: Vec<&'static str>,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Controller for Scripted {
        fn hook(&self) -> &str {
            self.hook
        }

        fn handle(&mut self, method: &str, _req: &RequestContext) -> anyhow::Result<HandleOutcome> {
            if self.methods.contains(&method) {
                self.log.borrow_mut().push(format!("run:{method}"));
                Ok(HandleOutcome::Handled)
            } else {
                Ok(HandleOutcome::Unknown)
            }
        }
    }

    struct Failing;

    impl Controller for Failing {
        fn hook(&self) -> &str {
            "failing"
        }

        fn handle(&mut self, _method: &str, _req: &RequestContext) -> anyhow::Result<HandleOutcome> {
            anyhow::bail!("boom")
        }
    }

    struct Fixture {
        registry: ControllerRegistry,
        resolver: Resolver,
        config: MapConfig,
        routes: ActionResolver,
        bus: EventBus,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Fixture {
        fn new() -> Self {
            let log: Rc<RefCell<Vec<String>>> = Rc::default();

            let mut registry = ControllerRegistry::new();
            let sink = log.clone();
            registry.register_controller("Post_Controller", move || {
                Box::new(Scripted {
                    hook: "post",
                    methods: vec!["action_post", "action_post2"],
                    log: sink.clone(),
                })
            });
            let sink = log.clone();
            registry.register_controller("Profile_Controller", move || {
                Box::new(Scripted {
                    hook: "profile",
                    methods: vec!["action_index"],
                    log: sink.clone(),
                })
            });
            let sink = log.clone();
            registry.register_controller("BoardIndex_Controller", move || {
                Box::new(Scripted {
                    hook: "boardindex",
                    methods: vec!["action_boardindex"],
                    log: sink.clone(),
                })
            });

            let resolver = Resolver::new(
                "Agora",
                SearchPaths::new("/src"),
                Box::new(MemoryFiles::from_paths([
                    "/src/controllers/Post.controller.php",
                    "/src/controllers/Profile.controller.php",
                    "/src/controllers/BoardIndex.controller.php",
                ])),
            );

            Self {
                registry,
                resolver,
                config: MapConfig::new(),
                routes: ActionResolver::default(),
                bus: EventBus::new(),
                log,
            }
        }

        fn run(&mut self, target: ResolvedTarget) -> Result<DispatchOutcome, DispatchError> {
            let mut loader =
                ControllerLoader::new(&self.registry, &self.config, &mut self.resolver);
            let dispatch = DispatchLoop::new(&self.routes, &self.registry, &self.bus);
            dispatch.run(&mut loader, &RequestContext::default(), target)
        }
    }

    #[test]
    fn test_direct_dispatch() {
        let mut fx = Fixture::new();
        let outcome = fx
            .run(ResolvedTarget::new("Post_Controller", "action_post"))
            .unwrap();
        assert_eq!(outcome.via, DispatchVia::Direct);
        assert_eq!(outcome.target.method, "action_post");
        assert_eq!(*fx.log.borrow(), vec!["run:action_post".to_string()]);
    }

    #[test]
    fn test_index_fallback() {
        let mut fx = Fixture::new();
        let outcome = fx
            .run(ResolvedTarget::new("Profile_Controller", "action_missing"))
            .unwrap();
        assert_eq!(outcome.via, DispatchVia::IndexFallback);
        assert_eq!(outcome.target.method, "action_index");
    }

    #[test]
    fn test_default_handler_fallback() {
        let mut fx = Fixture::new();
        let sink = fx.log.clone();
        fx.registry
            .register_default_handler("action_missing", move |_req| {
                sink.borrow_mut().push("default".into());
                Ok(())
            });
        // Post_Controller has no action_missing and no action_index.
        let outcome = fx
            .run(ResolvedTarget::new("Post_Controller", "action_missing"))
            .unwrap();
        assert_eq!(outcome.via, DispatchVia::DefaultHandler);
        assert_eq!(*fx.log.borrow(), vec!["default".to_string()]);
    }

    #[test]
    fn test_front_page_fallback_recurses_once() {
        let mut fx = Fixture::new();
        let outcome = fx
            .run(ResolvedTarget::new("Post_Controller", "action_missing"))
            .unwrap();
        assert_eq!(outcome.via, DispatchVia::FrontPage);
        assert_eq!(
            outcome.target,
            ResolvedTarget::new("BoardIndex_Controller", "action_boardindex")
        );
    }

    #[test]
    fn test_exhausted_chain_errors_instead_of_looping() {
        let mut fx = Fixture::new();
        // Point the front page at a controller that cannot serve it
        // either; the second pass must error, not recurse again.
        fx.routes = ActionResolver::new(ResolvedTarget::new("Post_Controller", "action_missing"));
        let err = fx
            .run(ResolvedTarget::new("Post_Controller", "action_missing"))
            .unwrap_err();
        assert!(matches!(err, DispatchError::NoHandler { .. }));
    }

    #[test]
    fn test_handler_error_is_wrapped() {
        let mut fx = Fixture::new();
        fx.registry
            .register_controller("Failing_Controller", || Box::new(Failing));
        let mut resolver_files = MemoryFiles::new();
        resolver_files.add("/src/controllers/Failing.controller.php");
        fx.resolver = Resolver::new("Agora", SearchPaths::new("/src"), Box::new(resolver_files));

        let err = fx
            .run(ResolvedTarget::new("Failing_Controller", "action_fail"))
            .unwrap_err();
        assert!(matches!(err, DispatchError::Handler(_)));
    }

    #[test]
    fn test_lifecycle_hooks_fire_around_handler() {
        let mut fx = Fixture::new();
        let sink = fx.log.clone();
        fx.bus.on_lifecycle("integrate_action_post_before", move |e| {
            sink.borrow_mut().push(format!("hook:{}", e.phase));
        });
        let sink = fx.log.clone();
        fx.bus.on_lifecycle("integrate_action_post_after", move |e| {
            sink.borrow_mut().push(format!("hook:{}", e.phase));
        });

        // post2 normalizes to the post hooks.
        fx.run(ResolvedTarget::new("Post_Controller", "action_post2"))
            .unwrap();
        assert_eq!(
            *fx.log.borrow(),
            vec![
                "hook:before".to_string(),
                "run:action_post2".to_string(),
                "hook:after".to_string(),
            ]
        );
    }

    #[test]
    fn test_after_hook_fires_on_fallback_branch() {
        let mut fx = Fixture::new();
        let sink = fx.log.clone();
        fx.bus
            .on_lifecycle("integrate_action_missing_after", move |_| {
                sink.borrow_mut().push("after:missing".into());
            });

        fx.run(ResolvedTarget::new("Post_Controller", "action_missing"))
            .unwrap();
        // The failed target's after hook fired before the front-page pass.
        assert_eq!(fx.log.borrow()[0], "after:missing");
    }
}
