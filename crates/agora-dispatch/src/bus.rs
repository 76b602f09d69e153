//! The event bus and per-controller event scope.
//!
//! Extension points fire at fixed places in the request lifecycle:
//!
//! ```text
//! request
//!   → ACTION-TABLE HOOK ← (extend/override routes, once per request)
//!   → action resolution
//!       → FRONT-PAGE HOOK ← (replace the default front-page target)
//!   → controller load (modules bind to the controller's scope)
//!   → BEFORE LIFECYCLE HOOK
//!   → handler
//!   → AFTER LIFECYCLE HOOK (fires regardless of which handler branch ran)
//! ```
//!
//! Lifecycle hook names follow the integration convention
//! `integrate_action_{base}_{before|after}`, where `base` is the method
//! identifier minus its `action_` prefix and minus a single legacy
//! trailing `2` (a form's submit handler shares hooks with its form:
//! `post2` and `post` both fire the `post` hooks).

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::request::RequestContext;
use crate::route::ResolvedTarget;
use crate::table::ActionTable;

/// Which side of the handler a lifecycle hook fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Before the handler runs.
    Before,
    /// After the handler (or its fallback) ran.
    After,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecyclePhase::Before => write!(f, "before"),
            LifecyclePhase::After => write!(f, "after"),
        }
    }
}

/// Computes the hook base name for a method identifier.
///
/// Strips the `action_` prefix, then a single trailing `'2'`. The
/// trailing-2 rule is a legacy convention preserved bit-for-bit:
/// `action_post2` → `post`, `action_post22` → `post2`.
pub fn hook_base(method: &str) -> &str {
    let base = method.strip_prefix("action_").unwrap_or(method);
    base.strip_suffix('2').unwrap_or(base)
}

/// Builds the full lifecycle hook name for a base and phase.
pub fn lifecycle_hook_name(base: &str, phase: LifecyclePhase) -> String {
    format!("integrate_action_{base}_{phase}")
}

/// Read-only view of the dispatch state handed to lifecycle listeners.
#[derive(Debug)]
pub struct LifecycleEvent<'a> {
    /// The phase being fired.
    pub phase: LifecyclePhase,
    /// The request being served.
    pub request: &'a RequestContext,
    /// The target the dispatch loop is invoking.
    pub target: &'a ResolvedTarget,
}

type TableHookFn = Rc<dyn Fn(&mut ActionTable)>;
type FrontPageHookFn = Rc<dyn Fn(&mut ResolvedTarget)>;
type LifecycleHookFn = Rc<dyn Fn(&LifecycleEvent<'_>)>;

/// Process-wide hook registry.
///
/// Callbacks are stored in registration order and run in that order.
/// Registration happens at startup (or from module `bind` calls); firing
/// takes `&self` so the bus can be shared across the whole dispatch pass.
#[derive(Clone, Default)]
pub struct EventBus {
    table_hooks: Vec<TableHookFn>,
    front_page_hooks: Vec<FrontPageHookFn>,
    lifecycle: HashMap<String, Vec<LifecycleHookFn>>,
}

impl EventBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no hooks of any kind are registered.
    pub fn is_empty(&self) -> bool {
        self.table_hooks.is_empty()
            && self.front_page_hooks.is_empty()
            && self.lifecycle.is_empty()
    }

    /// Registers an action-table extension hook.
    pub fn on_action_table<F>(&mut self, f: F)
    where
        F: Fn(&mut ActionTable) + 'static,
    {
        self.table_hooks.push(Rc::new(f));
    }

    /// Registers a front-page override hook. The callback may replace the
    /// default controller/method pair entirely.
    pub fn on_front_page<F>(&mut self, f: F)
    where
        F: Fn(&mut ResolvedTarget) + 'static,
    {
        self.front_page_hooks.push(Rc::new(f));
    }

    /// Registers a lifecycle listener against a full hook name (see
    /// [`lifecycle_hook_name`]).
    pub fn on_lifecycle<F>(&mut self, hook: impl Into<String>, f: F)
    where
        F: Fn(&LifecycleEvent<'_>) + 'static,
    {
        self.lifecycle.entry(hook.into()).or_default().push(Rc::new(f));
    }

    /// Runs the table-extension hooks, in registration order.
    pub fn extend_action_table(&self, table: &mut ActionTable) {
        for hook in &self.table_hooks {
            hook(table);
        }
    }

    /// Runs the front-page override hooks against the default target.
    pub fn override_front_page(&self, target: &mut ResolvedTarget) {
        for hook in &self.front_page_hooks {
            hook(target);
        }
    }

    /// Fires every listener registered against the given hook name.
    pub fn fire_lifecycle(&self, hook: &str, event: &LifecycleEvent<'_>) {
        if let Some(listeners) = self.lifecycle.get(hook) {
            for listener in listeners {
                listener(event);
            }
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("table_hooks", &self.table_hooks.len())
            .field("front_page_hooks", &self.front_page_hooks.len())
            .field("lifecycle_hooks", &self.lifecycle.len())
            .finish()
    }
}

/// Hook context created fresh for each controller instantiation.
///
/// Modules bound to a controller register their listeners here; the
/// dispatch loop notifies the scope at the same points it fires the
/// global bus. The scope lives exactly as long as one controller load.
#[derive(Clone, Default)]
pub struct EventScope {
    listeners: HashMap<String, Vec<LifecycleHookFn>>,
}

impl EventScope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Registers a listener against a full hook name.
    pub fn register<F>(&mut self, hook: impl Into<String>, f: F)
    where
        F: Fn(&LifecycleEvent<'_>) + 'static,
    {
        self.listeners.entry(hook.into()).or_default().push(Rc::new(f));
    }

    /// Notifies every listener registered against the given hook name.
    pub fn notify(&self, hook: &str, event: &LifecycleEvent<'_>) {
        if let Some(listeners) = self.listeners.get(hook) {
            for listener in listeners {
                listener(event);
            }
        }
    }
}

impl fmt::Debug for EventScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventScope")
            .field("hooks", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn event<'a>(req: &'a RequestContext, target: &'a ResolvedTarget) -> LifecycleEvent<'a> {
        LifecycleEvent {
            phase: LifecyclePhase::Before,
            request: req,
            target,
        }
    }

    #[test]
    fn test_hook_base_strips_action_prefix() {
        assert_eq!(hook_base("action_post"), "post");
        assert_eq!(hook_base("action_messageindex"), "messageindex");
    }

    #[test]
    fn test_hook_base_strips_single_trailing_two() {
        assert_eq!(hook_base("action_post2"), "post");
        assert_eq!(hook_base("action_post22"), "post2");
        assert_eq!(hook_base("post2"), "post");
    }

    #[test]
    fn test_hook_base_leaves_other_digits() {
        assert_eq!(hook_base("action_login3"), "login3");
        assert_eq!(hook_base("action_post"), "post");
    }

    #[test]
    fn test_lifecycle_hook_name() {
        assert_eq!(
            lifecycle_hook_name("post", LifecyclePhase::Before),
            "integrate_action_post_before"
        );
        assert_eq!(
            lifecycle_hook_name("post", LifecyclePhase::After),
            "integrate_action_post_after"
        );
    }

    #[test]
    fn test_front_page_override_order() {
        let mut bus = EventBus::new();
        bus.on_front_page(|t| t.controller = "First_Controller".into());
        bus.on_front_page(|t| t.controller = "Second_Controller".into());

        let mut target = ResolvedTarget::new("Boards_Controller", "action_index");
        bus.override_front_page(&mut target);
        // Later registrations see (and may replace) earlier results.
        assert_eq!(target.controller, "Second_Controller");
    }

    #[test]
    fn test_lifecycle_fires_only_matching_hook() {
        let fired: Rc<RefCell<Vec<String>>> = Rc::default();

        let mut bus = EventBus::new();
        let sink = fired.clone();
        bus.on_lifecycle("integrate_action_post_before", move |e| {
            sink.borrow_mut().push(format!("post:{}", e.phase));
        });
        let sink = fired.clone();
        bus.on_lifecycle("integrate_action_help_before", move |_| {
            sink.borrow_mut().push("help".into());
        });

        let req = RequestContext::default();
        let target = ResolvedTarget::new("Post_Controller", "action_post");
        bus.fire_lifecycle("integrate_action_post_before", &event(&req, &target));

        assert_eq!(*fired.borrow(), vec!["post:before".to_string()]);
    }

    #[test]
    fn test_scope_is_independent_of_bus() {
        let fired = Rc::new(RefCell::new(0));

        let mut scope = EventScope::new();
        let sink = fired.clone();
        scope.register("integrate_action_display_before", move |_| {
            *sink.borrow_mut() += 1;
        });

        let req = RequestContext::default();
        let target = ResolvedTarget::new("Display_Controller", "action_display");
        scope.notify("integrate_action_display_before", &event(&req, &target));
        scope.notify("integrate_action_other_before", &event(&req, &target));

        assert_eq!(*fired.borrow(), 1);
    }
}
