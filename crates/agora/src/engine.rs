//! The engine and its builder.
//!
//! [`EngineBuilder`] collects everything a deployment registers at boot:
//! controllers, modules, hooks, routes, namespaces, and settings.
//! [`Engine::serve`] then runs the full per-request pipeline: table
//! extension, action resolution, controller load, dispatch.

use std::path::PathBuf;

use tracing::debug;

use agora_dispatch::{
    ActionEntry, ActionResolver, ActionTable, ConfigStore, Controller, ControllerLoader,
    ControllerRegistry, DispatchError, DispatchLoop, DispatchOutcome, EventBus, LifecycleEvent,
    MapConfig, Module, RequestContext, ResolvedTarget,
};
use agora_resolve::{DiskFiles, FileOracle, Resolver, SearchPaths};

use crate::settings::settings_from_yaml;
use crate::setup::SetupError;

/// Collects boot-time registrations and assembles an [`Engine`].
///
/// All methods consume and return the builder so registrations chain;
/// [`EngineBuilder::build`] validates the whole configuration at once.
pub struct EngineBuilder {
    root_namespace: String,
    paths: SearchPaths,
    fs: Box<dyn FileOracle>,
    table: ActionTable,
    registry: ControllerRegistry,
    bus: EventBus,
    config: MapConfig,
    front_page: ResolvedTarget,
    namespaces: Vec<(String, Vec<PathBuf>, bool)>,
    duplicate_controllers: Vec<String>,
}

impl EngineBuilder {
    /// Starts a builder rooted at the given source directory, with the
    /// stock action table, the on-disk file oracle, and the board index
    /// as the front page.
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            root_namespace: "Agora".to_string(),
            paths: SearchPaths::new(source_root),
            fs: Box::new(DiskFiles),
            table: ActionTable::forum_defaults(),
            registry: ControllerRegistry::new(),
            bus: EventBus::new(),
            config: MapConfig::new(),
            front_page: ResolvedTarget::front_page_default(),
            namespaces: Vec::new(),
            duplicate_controllers: Vec::new(),
        }
    }

    /// Replaces the file oracle. Tests and embedded deployments pass a
    /// memory-backed oracle here.
    pub fn with_files(mut self, fs: Box<dyn FileOracle>) -> Self {
        self.fs = fs;
        self
    }

    /// Sets the root namespace substituted for the source root during
    /// lazy namespace registration.
    pub fn root_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.root_namespace = namespace.into();
        self
    }

    /// Appends a directory to the generic include path.
    pub fn include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.paths.push_include(dir);
        self
    }

    /// Registers a namespace against an ordered directory list.
    pub fn namespace(
        mut self,
        namespace: impl Into<String>,
        dirs: Vec<PathBuf>,
        strict: bool,
    ) -> Self {
        self.namespaces.push((namespace.into(), dirs, strict));
        self
    }

    /// Replaces the front-page target.
    pub fn front_page(mut self, controller: impl Into<String>, method: impl Into<String>) -> Self {
        self.front_page = ResolvedTarget::new(controller, method);
        self
    }

    /// Adds or replaces an action-table route.
    pub fn route(mut self, action: impl Into<String>, entry: ActionEntry) -> Self {
        self.table.insert(action, entry);
        self
    }

    /// Restricts an action to the admin search path.
    pub fn admin_action(mut self, action: impl Into<String>) -> Self {
        self.table.restrict_to_admin(action);
        self
    }

    /// Registers a controller constructor. Registering the same id twice
    /// fails at [`EngineBuilder::build`].
    pub fn controller<F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Controller> + 'static,
    {
        let id = id.into();
        if self.registry.contains_controller(&id) {
            self.duplicate_controllers.push(id);
        } else {
            self.registry.register_controller(id, factory);
        }
        self
    }

    /// Registers a module constructor under its class identifier.
    pub fn module<F>(mut self, class_id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Module> + 'static,
    {
        self.registry.register_module(class_id, factory);
        self
    }

    /// Registers a free-standing default handler for a method id.
    pub fn default_handler<F>(mut self, method: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&RequestContext) -> anyhow::Result<()> + 'static,
    {
        self.registry.register_default_handler(method, handler);
        self
    }

    /// Registers an action-table extension hook.
    pub fn on_action_table<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut ActionTable) + 'static,
    {
        self.bus.on_action_table(f);
        self
    }

    /// Registers a front-page override hook.
    pub fn on_front_page<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut ResolvedTarget) + 'static,
    {
        self.bus.on_front_page(f);
        self
    }

    /// Registers a lifecycle listener against a full hook name.
    pub fn on_lifecycle<F>(mut self, hook: impl Into<String>, f: F) -> Self
    where
        F: Fn(&LifecycleEvent<'_>) + 'static,
    {
        self.bus.on_lifecycle(hook, f);
        self
    }

    /// Replaces the settings store.
    pub fn settings(mut self, config: MapConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads settings from a YAML mapping of scalars.
    ///
    /// # Errors
    ///
    /// See [`settings_from_yaml`].
    pub fn settings_yaml(mut self, raw: &str) -> Result<Self, SetupError> {
        self.config = settings_from_yaml(raw)?;
        Ok(self)
    }

    /// Sets a single setting.
    pub fn setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.set(key, value);
        self
    }

    /// Assembles the engine.
    ///
    /// # Errors
    ///
    /// [`SetupError::DuplicateController`] when a controller id was
    /// registered more than once.
    pub fn build(self) -> Result<Engine, SetupError> {
        if let Some(id) = self.duplicate_controllers.into_iter().next() {
            return Err(SetupError::DuplicateController(id));
        }

        let mut resolver = Resolver::new(self.root_namespace, self.paths, self.fs);
        for (namespace, dirs, strict) in self.namespaces {
            resolver.register_namespace(namespace, dirs, strict);
        }

        let routes = ActionResolver::new(self.front_page)
            .with_admin_actions(self.config.get_list("admin_actions"));

        Ok(Engine {
            table: self.table,
            routes,
            bus: self.bus,
            registry: self.registry,
            config: self.config,
            resolver,
        })
    }
}

impl std::fmt::Debug for EngineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("table", &self.table.len())
            .field("registry", &self.registry)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

/// The assembled request engine.
#[derive(Debug)]
pub struct Engine {
    table: ActionTable,
    routes: ActionResolver,
    bus: EventBus,
    registry: ControllerRegistry,
    config: MapConfig,
    resolver: Resolver,
}

impl Engine {
    /// Starts a builder. See [`EngineBuilder::new`].
    pub fn builder(source_root: impl Into<PathBuf>) -> EngineBuilder {
        EngineBuilder::new(source_root)
    }

    /// Serves one request: extends a per-request copy of the action
    /// table, resolves the target, loads the controller, and dispatches.
    ///
    /// # Errors
    ///
    /// The dispatch failures of [`DispatchLoop::run`]; routing itself
    /// cannot fail.
    pub fn serve(&mut self, req: &RequestContext) -> Result<DispatchOutcome, DispatchError> {
        let mut table = self.table.clone();
        table.extend(&self.bus);

        let target = self.routes.resolve(req, &table, &self.bus, &self.resolver);
        debug!(
            action = req.action().unwrap_or(""),
            controller = %target.controller,
            method = %target.method,
            "request resolved"
        );

        let mut loader = ControllerLoader::new(&self.registry, &self.config, &mut self.resolver);
        DispatchLoop::new(&self.routes, &self.registry, &self.bus).run(&mut loader, req, target)
    }

    /// Resolves a request to its target without dispatching it.
    pub fn resolve_target(&self, req: &RequestContext) -> ResolvedTarget {
        let mut table = self.table.clone();
        table.extend(&self.bus);
        self.routes.resolve(req, &table, &self.bus, &self.resolver)
    }

    /// The symbol resolver.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Mutable access to the symbol resolver, for explicit symbol loads
    /// outside a dispatch pass.
    pub fn resolver_mut(&mut self) -> &mut Resolver {
        &mut self.resolver
    }

    /// The runtime settings.
    pub fn settings(&self) -> &MapConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_dispatch::HandleOutcome;
    use agora_resolve::MemoryFiles;

    struct Stub;

    impl Controller for Stub {
        fn hook(&self) -> &str {
            "stub"
        }

        fn handle(&mut self, _method: &str, _req: &RequestContext) -> anyhow::Result<HandleOutcome> {
            Ok(HandleOutcome::Handled)
        }
    }

    #[test]
    fn test_duplicate_controller_fails_build() {
        let err = Engine::builder("/src")
            .controller("Stub_Controller", || Box::new(Stub))
            .controller("Stub_Controller", || Box::new(Stub))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SetupError::DuplicateController(id) if id == "Stub_Controller"
        ));
    }

    #[test]
    fn test_resolve_target_without_dispatch() {
        let engine = Engine::builder("/src")
            .with_files(Box::new(MemoryFiles::new()))
            .build()
            .unwrap();
        let target = engine.resolve_target(&RequestContext::for_action("post"));
        assert_eq!(target, ResolvedTarget::new("Post_Controller", "action_post"));
    }

    #[test]
    fn test_front_page_setting() {
        let engine = Engine::builder("/src")
            .with_files(Box::new(MemoryFiles::new()))
            .front_page("Portal_Controller", "action_portal")
            .build()
            .unwrap();
        let target = engine.resolve_target(&RequestContext::default());
        assert_eq!(target, ResolvedTarget::new("Portal_Controller", "action_portal"));
    }

    #[test]
    fn test_admin_actions_setting_extends_allow_list() {
        // "featured" is admin-listed via settings, so only the admin
        // directory satisfies its naming-convention route.
        let files = MemoryFiles::from_paths(["/src/admin/Featured.controller.php"]);
        let engine = Engine::builder("/src")
            .with_files(Box::new(files))
            .setting("admin_actions", "featured")
            .build()
            .unwrap();
        let target = engine.resolve_target(&RequestContext::for_action("featured"));
        assert_eq!(target, ResolvedTarget::new("Featured_Controller", "action_index"));
    }
}
