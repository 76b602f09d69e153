//! Per-request input state.
//!
//! The legacy engine read routing inputs from ambient request globals.
//! Here every stage receives an explicit, immutable [`RequestContext`]
//! built once at the edge of the request.

use serde::{Deserialize, Serialize};

/// Everything the action resolver needs to know about one request.
///
/// Constructed once per request and never mutated afterwards; the
/// resolver, loader, and dispatch loop all borrow it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The primary routing key (`action` parameter), if supplied.
    pub action: Option<String>,

    /// The secondary routing key (`sa` parameter), selecting a method
    /// within the action's controller.
    pub sub_action: Option<String>,

    /// The admin `area` parameter; its presence suppresses sub-action
    /// method synthesis on the naming-convention route.
    pub area: Option<String>,

    /// The requested board, when present.
    pub board: Option<u32>,

    /// The requested topic, when present.
    pub topic: Option<u32>,

    /// True when the forum is in maintenance mode.
    pub maintenance_mode: bool,

    /// True when the caller holds admin privileges.
    pub is_admin: bool,

    /// True when guests may browse the forum at all.
    pub guest_access_allowed: bool,

    /// True when the caller is not logged in.
    pub is_guest: bool,

    /// True when the request asks for the API rendition of a handler.
    pub api_mode: bool,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            action: None,
            sub_action: None,
            area: None,
            board: None,
            topic: None,
            maintenance_mode: false,
            is_admin: false,
            guest_access_allowed: true,
            is_guest: false,
            api_mode: false,
        }
    }
}

impl RequestContext {
    /// A request for the given action, everything else defaulted.
    pub fn for_action(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Self::default()
        }
    }

    /// A request for an action plus sub-action.
    pub fn for_sub_action(action: impl Into<String>, sa: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            sub_action: Some(sa.into()),
            ..Self::default()
        }
    }

    /// The action, treating an empty string the same as an absent one.
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref().filter(|a| !a.is_empty())
    }

    /// The sub-action, treating an empty string the same as absent.
    pub fn sub_action(&self) -> Option<&str> {
        self.sub_action.as_deref().filter(|sa| !sa.is_empty())
    }
}
