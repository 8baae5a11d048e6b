//! Adapter-facing event shapes.
//!
//! The platform adapter owns transport and authentication; this module
//! defines what crosses the boundary in each direction. Action identifiers
//! are parsed exactly once here — business logic only ever sees a resolved
//! [`GroupTarget`], never a raw string to re-match.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use onboard_core::model::{Catalog, TaskId, UserId};

use crate::error::EventError;
use crate::home_view::ViewDocument;

/// Action-identifier prefix carried by every group checkbox control.
pub const TOGGLE_ACTION_PREFIX: &str = "task_toggle_";

/// One `{label, value}` pair reported by the platform for a checked option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub label: String,
    pub value: String,
}

/// The group a toggle action refers to, resolved once at the boundary.
///
/// An `Unknown` target keeps the raw key for logging; handling it is a
/// no-op merge followed by a normal re-render, not a user-visible error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupTarget {
    Known(String),
    Unknown(String),
}

impl GroupTarget {
    /// Resolves an inbound action identifier against the catalog.
    ///
    /// The suffix after `task_toggle_` is matched case-insensitively
    /// against catalog group names. Identifiers without the prefix resolve
    /// the whole identifier, so hand-typed group names also work.
    #[must_use]
    pub fn resolve(catalog: &Catalog, action_id: &str) -> Self {
        let key = action_id
            .strip_prefix(TOGGLE_ACTION_PREFIX)
            .unwrap_or(action_id);
        match catalog.resolve_group(key) {
            Some(name) => Self::Known(name.to_owned()),
            None => Self::Unknown(key.to_owned()),
        }
    }
}

/// Inbound platform events this core consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecklistEvent {
    /// User opened their home surface.
    HomeOpened { user: UserId },
    /// User joined the workspace. The one-time greeting
    /// ([`onboard_core::defaults::WELCOME_GREETING`]) is the adapter's side
    /// effect, not part of this core.
    MemberJoined { user: UserId },
    /// Manual refresh command; same path as `HomeOpened`.
    Refresh { user: UserId },
    /// One group's checkbox control changed. `selected` is that group's
    /// full current selection, not a delta.
    GroupToggle {
        user: UserId,
        group: GroupTarget,
        selected: BTreeSet<TaskId>,
    },
}

impl ChecklistEvent {
    /// Builds a `HomeOpened` event from a raw payload field.
    ///
    /// # Errors
    ///
    /// Returns `EventError::MissingField` if the user id is absent.
    pub fn home_opened(user: Option<&str>) -> Result<Self, EventError> {
        Ok(Self::HomeOpened {
            user: require_user(user)?,
        })
    }

    /// Builds a `MemberJoined` event from a raw payload field.
    ///
    /// # Errors
    ///
    /// Returns `EventError::MissingField` if the user id is absent.
    pub fn member_joined(user: Option<&str>) -> Result<Self, EventError> {
        Ok(Self::MemberJoined {
            user: require_user(user)?,
        })
    }

    /// Builds a `Refresh` event from a raw payload field.
    ///
    /// # Errors
    ///
    /// Returns `EventError::MissingField` if the user id is absent.
    pub fn refresh(user: Option<&str>) -> Result<Self, EventError> {
        Ok(Self::Refresh {
            user: require_user(user)?,
        })
    }

    /// Builds a `GroupToggle` event from raw payload fields.
    ///
    /// A missing `selected` list means "nothing checked in this group" —
    /// the platform omits the list when a group is cleared — so only the
    /// user id and action identifier are required.
    ///
    /// # Errors
    ///
    /// Returns `EventError::MissingField` if the user id or the action
    /// identifier is absent.
    pub fn group_toggle(
        catalog: &Catalog,
        user: Option<&str>,
        action_id: Option<&str>,
        selected: Option<&[SelectedOption]>,
    ) -> Result<Self, EventError> {
        let user = require_user(user)?;
        let action_id = action_id.ok_or(EventError::MissingField("action_id"))?;
        let selected = selected
            .unwrap_or_default()
            .iter()
            .map(|opt| TaskId::new(opt.value.clone()))
            .collect();

        Ok(Self::GroupToggle {
            user,
            group: GroupTarget::resolve(catalog, action_id),
            selected,
        })
    }

    /// The user the event belongs to.
    #[must_use]
    pub fn user(&self) -> &UserId {
        match self {
            Self::HomeOpened { user }
            | Self::MemberJoined { user }
            | Self::Refresh { user }
            | Self::GroupToggle { user, .. } => user,
        }
    }
}

fn require_user(user: Option<&str>) -> Result<UserId, EventError> {
    user.map(UserId::new).ok_or(EventError::MissingField("user"))
}

/// Outbound render call: the document replaces the user's surface
/// wholesale, never as an incremental patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRequest {
    pub user: UserId,
    pub view: ViewDocument,
}
