use super::affect::{ActionKey, Affect, Task};
use super::context::{ActionId, GroupId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Something happening outside of ResWare that ResWare detects and uses to trigger an affect.
///
/// Identity is by value, so two triggers on the same event compare equal and draw one node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExternalAction {
    Plain {
        id: i64,
        name: String,
    },
    DocumentAdded {
        id: i64,
        name: String,
        document_type_id: i64,
        document_name: String,
    },
    ActionEventReceived {
        id: i64,
        name: String,
        action_event_id: i64,
        action_event_name: String,
    },
}

impl ExternalAction {
    pub fn id(&self) -> i64 {
        match self {
            ExternalAction::Plain { id, .. }
            | ExternalAction::DocumentAdded { id, .. }
            | ExternalAction::ActionEventReceived { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ExternalAction::Plain { name, .. }
            | ExternalAction::DocumentAdded { name, .. }
            | ExternalAction::ActionEventReceived { name, .. } => name,
        }
    }

    /// Human-readable label for diagrams and summaries.
    pub fn label(&self) -> String {
        match self {
            ExternalAction::Plain { name, .. } => name.clone(),
            ExternalAction::DocumentAdded { document_name, .. } => {
                format!("{} Added", document_name)
            }
            ExternalAction::ActionEventReceived {
                action_event_name, ..
            } => format!("Event: {}", action_event_name),
        }
    }
}

/// Binds an external action to the affect ResWare performs when it detects it.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub external_action: ExternalAction,
    pub affect: Affect,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PartnerType {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PartnerRef {
    pub id: i64,
    pub name: String,
}

/// A partner company with the types it acts as and the partners it brings along.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partner {
    pub id: i64,
    pub name: String,
    pub types: Vec<PartnerType>,
    /// Keyed by the partner type this partner is added as.
    pub auto_adds: BTreeMap<i64, Vec<(PartnerRef, PartnerType)>>,
}

/// Partner companies an entity is limited to, or withheld from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartnerRestrictions {
    pub required: Vec<PartnerRef>,
    pub excluded: Vec<PartnerRef>,
}

impl PartnerRestrictions {
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.excluded.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateRef {
    pub id: i64,
    pub name: String,
    pub filename: String,
}

/// An email template sent on one task of one action instance.
///
/// The template row is shared, but each (group, action, task) sending it gets its own `Email`.
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub email_id: i64,
    pub key: ActionKey,
    pub name: String,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub task: Task,
    pub recipients: Vec<PartnerType>,
    pub documents: Vec<String>,
    pub templates: Vec<TemplateRef>,
    pub restrictions: PartnerRestrictions,
}

/// An action instance in a group, with the emails it sends and the affects its tasks cause.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub id: ActionId,
    pub group: GroupId,
    pub key: ActionKey,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub hidden: bool,
    pub dynamic: bool,
    pub start_emails: Vec<Email>,
    pub complete_emails: Vec<Email>,
    pub start_affects: Vec<Affect>,
    pub complete_affects: Vec<Affect>,
    pub restrictions: PartnerRestrictions,
}

impl Action {
    /// Start affects followed by complete affects.
    pub fn affects(&self) -> impl Iterator<Item = &Affect> {
        self.start_affects.iter().chain(self.complete_affects.iter())
    }

    /// Start emails followed by complete emails.
    pub fn emails(&self) -> impl Iterator<Item = &Email> {
        self.start_emails.iter().chain(self.complete_emails.iter())
    }

    /// Every action targeted by one of this action's affects, skipping dangling ones.
    pub fn successors(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.affects().filter_map(Affect::resolved)
    }
}

/// A group of actions and triggers that can be added to a file.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: GroupId,
    pub group_id: i64,
    pub name: String,
    pub optional: bool,
    pub actions: Vec<ActionId>,
    pub triggers: Vec<Trigger>,
    pub restrictions: PartnerRestrictions,
}

impl Group {
    /// A group with no actions and no triggers has nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.triggers.is_empty()
    }
}

/// An ordered sequence of groups defining a workflow template.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionList {
    pub id: i64,
    pub name: String,
    /// Only the groups directly on the list, in group order.
    pub groups: Vec<GroupId>,
}
