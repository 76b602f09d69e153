//! Action resolution.
//!
//! [`ActionResolver`] turns one request's routing inputs into a single
//! `(controller, method)` target in a single pass with no backtracking:
//! branches are evaluated in a fixed order and the first guard that
//! matches fully determines the target.
//!
//! Branch order:
//!
//! 1. **Maintenance guard**: non-admins only reach the auth controller.
//! 2. **Guest guard**: guests are kicked unless the action is
//!    allow-listed.
//! 3. **No-action guard**: board/topic presence picks the front page,
//!    the message index, or the topic display.
//! 4. **Table lookup**: an explicit entry always beats the naming
//!    convention.
//! 5. **Naming-convention fallback**: drop-in controllers discovered by
//!    file name, only consulted when the table has no entry.
//! 6. **Default fallback**: the front page. A request always resolves;
//!    "no route" is unreachable by construction.
//! 7. **API suffix**: `_api` appended exactly once, whatever branch
//!    fired.

use std::collections::HashSet;

use agora_resolve::Resolver;

use crate::bus::EventBus;
use crate::request::RequestContext;
use crate::table::ActionTable;

/// The authentication controller, target of the maintenance and guest
/// guards.
pub const AUTH_CONTROLLER: &str = "Auth_Controller";

/// Actions guests may reach even when guest access is globally off.
pub const GUEST_ALLOWED_ACTIONS: &[&str] = &[
    "activate",
    "coppa",
    "help",
    "login",
    "login2",
    "logout",
    "mailq",
    "quickhelp",
    "register",
    "register2",
    "reminder",
    "verificationcode",
];

/// Actions whose drop-in controllers live on the admin search path.
const ADMIN_ACTIONS: &[&str] = &["admin", "jsoption", "theme", "viewadminfile", "viewquery"];

/// A fully resolved dispatch target.
///
/// Once produced by the resolver it is immutable for the rest of the
/// request; the dispatch loop clones it when it needs a variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Controller identifier, e.g. `Display_Controller`.
    pub controller: String,
    /// Method identifier, e.g. `action_display`.
    pub method: String,
}

impl ResolvedTarget {
    /// Creates a target.
    pub fn new(controller: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            method: method.into(),
        }
    }

    /// The stock front page: the board index.
    pub fn front_page_default() -> Self {
        Self::new("BoardIndex_Controller", "action_boardindex")
    }
}

/// Single-pass request router.
#[derive(Debug, Clone)]
pub struct ActionResolver {
    front_page: ResolvedTarget,
    admin_actions: HashSet<String>,
}

impl Default for ActionResolver {
    fn default() -> Self {
        Self::new(ResolvedTarget::front_page_default())
    }
}

impl ActionResolver {
    /// Creates a resolver with the given configured front-page target and
    /// the built-in admin-action list.
    pub fn new(front_page: ResolvedTarget) -> Self {
        Self {
            front_page,
            admin_actions: ADMIN_ACTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Adds configured admin actions on top of the built-in list.
    pub fn with_admin_actions<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.admin_actions.extend(extra.into_iter().map(Into::into));
        self
    }

    /// Resolves a request to its dispatch target.
    ///
    /// The `table` must already have had its per-request hook extension
    /// applied; `resolver` backs the naming-convention file checks. This
    /// never fails: the front-page default guarantees a target.
    pub fn resolve(
        &self,
        req: &RequestContext,
        table: &ActionTable,
        bus: &EventBus,
        resolver: &Resolver,
    ) -> ResolvedTarget {
        let mut target = self.resolve_target(req, table, bus, resolver);
        // API rendition, applied once at the single exit point.
        if req.api_mode {
            target.method.push_str("_api");
        }
        target
    }

    fn resolve_target(
        &self,
        req: &RequestContext,
        table: &ActionTable,
        bus: &EventBus,
        resolver: &Resolver,
    ) -> ResolvedTarget {
        // 1. Maintenance dominates everything for non-admins.
        if req.maintenance_mode && !req.is_admin {
            return match req.action() {
                Some("login2") => ResolvedTarget::new(AUTH_CONTROLLER, "action_login2"),
                Some("logout") => ResolvedTarget::new(AUTH_CONTROLLER, "action_logout"),
                _ => ResolvedTarget::new(AUTH_CONTROLLER, "action_maintenance_mode"),
            };
        }

        // 2. Guests get kicked unless the action is on the allow-list.
        if !req.guest_access_allowed && req.is_guest {
            let allowed = req
                .action()
                .map(|a| GUEST_ALLOWED_ACTIONS.contains(&a))
                .unwrap_or(false);
            if !allowed {
                return ResolvedTarget::new(AUTH_CONTROLLER, "action_kick_guest");
            }
        }

        // 3. No action: board/topic presence decides.
        let Some(action) = req.action() else {
            if req.topic.is_some() {
                return ResolvedTarget::new("Display_Controller", "action_display");
            }
            if req.board.is_some() {
                return ResolvedTarget::new("MessageIndex_Controller", "action_messageindex");
            }
            return self.front_page(bus);
        };

        // 4. The explicit table.
        if let Some(entry) = table.get(action) {
            let method = entry
                .method
                .clone()
                .unwrap_or_else(|| sub_action_method(req.sub_action()));
            return ResolvedTarget::new(entry.controller.clone(), method);
        }

        // 5. Naming convention: a drop-in controller file.
        if is_routable_action(action) {
            let stem = ucfirst(action);
            let admin = self.is_admin_action(action, table);
            if resolver.has_controller(&stem, admin) {
                let method = if req.area.is_none() {
                    sub_action_method(req.sub_action())
                } else {
                    "action_index".to_string()
                };
                return ResolvedTarget::new(format!("{stem}_Controller"), method);
            }
        }

        // 6. Nothing matched: the front page.
        self.front_page(bus)
    }

    /// The configured front-page target, after the override hook.
    pub fn front_page(&self, bus: &EventBus) -> ResolvedTarget {
        let mut target = self.front_page.clone();
        bus.override_front_page(&mut target);
        target
    }

    fn is_admin_action(&self, action: &str, table: &ActionTable) -> bool {
        self.admin_actions.contains(action) || table.is_admin_only(action)
    }
}

/// Synthesizes a method from a sub-action: `action_{sa}` when `sa` is a
/// word (`\w+`), `action_index` otherwise.
fn sub_action_method(sub_action: Option<&str>) -> String {
    match sub_action {
        Some(sa) if is_word(sa) => format!("action_{sa}"),
        _ => "action_index".to_string(),
    }
}

/// `\w+`: letters, digits, underscores, non-empty.
fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `[a-zA-Z_-]+\d*`: a letter/underscore/hyphen run, optionally followed
/// by digits.
fn is_routable_action(s: &str) -> bool {
    let head = s.trim_end_matches(|c: char| c.is_ascii_digit());
    !head.is_empty()
        && head
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '_' || c == '-')
}

/// Upper-cases the first ASCII character.
pub(crate) fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
