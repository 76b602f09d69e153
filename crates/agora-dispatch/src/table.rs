//! The action table.
//!
//! A static mapping from a request's primary verb (`action`) to a
//! controller/method pair. The table is populated at boot and may be
//! extended or overridden exactly once per request through the event bus,
//! letting third-party code add routes without touching the core.
//!
//! An entry may leave its method empty, in which case the sub-action
//! (`sa`) parameter supplies the method suffix at resolution time.

use std::collections::{HashMap, HashSet};

use crate::bus::EventBus;

/// One routing entry: the controller to instantiate, and optionally the
/// method to invoke on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    /// Controller identifier, e.g. `Post_Controller`.
    pub controller: String,
    /// Method identifier, e.g. `action_post`. When `None`, the method is
    /// synthesized from the request's sub-action.
    pub method: Option<String>,
}

impl ActionEntry {
    /// Entry with a fixed method.
    pub fn new(controller: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            method: Some(method.into()),
        }
    }

    /// Entry whose method comes from the sub-action.
    pub fn sub_action_driven(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            method: None,
        }
    }
}

/// The action → entry map plus the set of actions restricted to the admin
/// search path.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    entries: HashMap<String, ActionEntry>,
    admin_only: HashSet<String>,
    extended: bool,
}

impl ActionTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The boot-time table: the core forum actions every installation
    /// routes.
    pub fn forum_defaults() -> Self {
        let mut table = Self::new();
        table.insert("activate", ActionEntry::new("Register_Controller", "action_activate"));
        table.insert("admin", ActionEntry::sub_action_driven("Admin_Controller"));
        table.insert("announce", ActionEntry::sub_action_driven("Announce_Controller"));
        table.insert("help", ActionEntry::new("Help_Controller", "action_index"));
        table.insert("login", ActionEntry::new("Auth_Controller", "action_login"));
        table.insert("login2", ActionEntry::new("Auth_Controller", "action_login2"));
        table.insert("logout", ActionEntry::new("Auth_Controller", "action_logout"));
        table.insert(
            "messageindex",
            ActionEntry::new("MessageIndex_Controller", "action_messageindex"),
        );
        table.insert("post", ActionEntry::new("Post_Controller", "action_post"));
        table.insert("post2", ActionEntry::new("Post_Controller", "action_post2"));
        table.insert("profile", ActionEntry::sub_action_driven("Profile_Controller"));
        table.insert("register", ActionEntry::new("Register_Controller", "action_register"));
        table.insert("reminder", ActionEntry::sub_action_driven("Reminder_Controller"));
        table.insert("who", ActionEntry::new("Who_Controller", "action_who"));
        table.restrict_to_admin("admin");
        table
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, action: impl Into<String>, entry: ActionEntry) {
        self.entries.insert(action.into(), entry);
    }

    /// Marks an action as resolvable only on the admin search path.
    pub fn restrict_to_admin(&mut self, action: impl Into<String>) {
        self.admin_only.insert(action.into());
    }

    /// Looks up an entry.
    pub fn get(&self, action: &str) -> Option<&ActionEntry> {
        self.entries.get(action)
    }

    /// True if the action is restricted to the admin search path.
    pub fn is_admin_only(&self, action: &str) -> bool {
        self.admin_only.contains(action)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs the table-extension hooks, exactly once per table instance.
    ///
    /// A second call is a no-op: the per-request table is extended at the
    /// start of the resolution pass and never again.
    pub fn extend(&mut self, bus: &EventBus) {
        if self.extended {
            return;
        }
        self.extended = true;
        bus.extend_action_table(self);
    }
}
