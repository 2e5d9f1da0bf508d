use super::context::ActionId;
use crate::error::AffectError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every action in a group has a start and a complete task. Affects fire when one is marked done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Task {
    Start,
    Complete,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Start => write!(f, "START"),
            Task::Complete => write!(f, "COMPLETE"),
        }
    }
}

/// Identifies an action instance: the same global action in two groups is two instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ActionKey {
    pub group_id: i64,
    pub action_id: i64,
}

impl ActionKey {
    pub fn new(group_id: i64, action_id: i64) -> Self {
        Self {
            group_id,
            action_id,
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group_id, self.action_id)
    }
}

/// A foreign key to an action, plus the instance it resolved to once the graph is bound.
///
/// `resolved` stays `None` for dangling references.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionRef {
    pub key: ActionKey,
    pub resolved: Option<ActionId>,
}

impl ActionRef {
    pub fn unbound(key: ActionKey) -> Self {
        Self {
            key,
            resolved: None,
        }
    }
}

/// Shifts the due date offset of the target's task.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetAffect {
    pub target: ActionRef,
    pub task: Option<Task>,
    pub hours: f64,
}

/// Marks the target's task done.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkDoneAffect {
    pub target: ActionRef,
    pub task: Option<Task>,
}

impl MarkDoneAffect {
    /// Only a row whose auto-complete flag is set is a mark-done affect.
    pub fn new(
        key: ActionKey,
        task: Option<Task>,
        auto_complete: Option<bool>,
    ) -> Result<Self, AffectError> {
        match auto_complete {
            Some(true) => Ok(Self {
                target: ActionRef::unbound(key),
                task,
            }),
            other => Err(AffectError::NotMarkDone(other)),
        }
    }
}

/// Adds a new instance of the target action to the file.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateActionAffect {
    pub target: ActionRef,
}

/// Adds a group to the file.
///
/// For drawing, the affect points at the first action of the created group; a group has no node
/// of its own in the full diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateGroupAffect {
    pub group_id: i64,
    pub first_action: Option<ActionId>,
}

/// One effect of an action's start or completion.
#[derive(Debug, Clone, PartialEq)]
pub enum Affect {
    Offset(OffsetAffect),
    MarkDone(MarkDoneAffect),
    CreateAction(CreateActionAffect),
    CreateGroup(CreateGroupAffect),
}

impl Affect {
    /// Short type name, used in structured dumps.
    pub fn kind(&self) -> &'static str {
        match self {
            Affect::Offset(_) => "offset",
            Affect::MarkDone(_) => "complete",
            Affect::CreateAction(_) => "create",
            Affect::CreateGroup(_) => "create_group",
        }
    }

    /// The group this affect points into.
    pub fn group_id(&self) -> i64 {
        match self {
            Affect::Offset(a) => a.target.key.group_id,
            Affect::MarkDone(a) => a.target.key.group_id,
            Affect::CreateAction(a) => a.target.key.group_id,
            Affect::CreateGroup(a) => a.group_id,
        }
    }

    /// The targeted action instance, for affects that name one directly.
    pub fn target_key(&self) -> Option<ActionKey> {
        match self {
            Affect::Offset(a) => Some(a.target.key),
            Affect::MarkDone(a) => Some(a.target.key),
            Affect::CreateAction(a) => Some(a.target.key),
            Affect::CreateGroup(_) => None,
        }
    }

    /// The action instance this affect resolved to, `None` when it dangles or is not bound yet.
    pub fn resolved(&self) -> Option<ActionId> {
        match self {
            Affect::Offset(a) => a.target.resolved,
            Affect::MarkDone(a) => a.target.resolved,
            Affect::CreateAction(a) => a.target.resolved,
            Affect::CreateGroup(a) => a.first_action,
        }
    }

    pub fn references_group(&self, group_id: i64) -> bool {
        self.group_id() == group_id
    }

    pub(crate) fn set_resolved(&mut self, id: Option<ActionId>) {
        match self {
            Affect::Offset(a) => a.target.resolved = id,
            Affect::MarkDone(a) => a.target.resolved = id,
            Affect::CreateAction(a) => a.target.resolved = id,
            Affect::CreateGroup(a) => a.first_action = id,
        }
    }
}
