//! Structured, serializable view of a built action list, for JSON inspection.

use crate::builder::{BuiltGraph, MissingReference};
use crate::describe::describe_affect;
use crate::model::{
    Action, ActionKey, Affect, Context, Email, ExternalAction, Group, PartnerRestrictions,
    PartnerType, Task, TemplateRef,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ActionListDump {
    pub id: i64,
    pub name: String,
    pub groups: Vec<GroupDump>,
    pub missing: Vec<MissingReference>,
    pub pruned_affects: usize,
    pub duplicate_actions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupDump {
    pub id: i64,
    pub name: String,
    pub optional: bool,
    pub restrictions: PartnerRestrictions,
    pub triggers: Vec<TriggerDump>,
    pub actions: Vec<ActionDump>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TriggerDump {
    pub external_action: ExternalAction,
    pub label: String,
    pub affect: AffectDump,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionDump {
    pub group_id: i64,
    pub action_id: i64,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub hidden: bool,
    pub dynamic: bool,
    pub restrictions: PartnerRestrictions,
    pub start_emails: Vec<EmailDump>,
    pub complete_emails: Vec<EmailDump>,
    pub start_affects: Vec<AffectDump>,
    pub complete_affects: Vec<AffectDump>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailDump {
    pub email_id: i64,
    pub name: String,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub task: Task,
    pub recipients: Vec<PartnerType>,
    pub documents: Vec<String>,
    pub templates: Vec<TemplateRef>,
    pub restrictions: PartnerRestrictions,
}

#[derive(Debug, Clone, Serialize)]
pub struct AffectDump {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub group_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<ActionKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    pub resolved: bool,
    pub description: String,
}

impl ActionListDump {
    pub fn new(graph: &BuiltGraph) -> Self {
        let ctx = &graph.context;
        Self {
            id: graph.action_list.id,
            name: graph.action_list.name.clone(),
            groups: graph.list_groups().map(|g| GroupDump::new(ctx, g)).collect(),
            missing: graph.diagnostics.missing().copied().collect(),
            pruned_affects: graph.diagnostics.pruned_affects(),
            duplicate_actions: graph.diagnostics.duplicate_actions(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl GroupDump {
    fn new(ctx: &Context, group: &Group) -> Self {
        Self {
            id: group.group_id,
            name: group.name.clone(),
            optional: group.optional,
            restrictions: group.restrictions.clone(),
            triggers: group
                .triggers
                .iter()
                .map(|t| TriggerDump {
                    external_action: t.external_action.clone(),
                    label: t.external_action.label(),
                    affect: AffectDump::new(ctx, &t.affect),
                })
                .collect(),
            actions: group
                .actions
                .iter()
                .map(|id| ActionDump::new(ctx, ctx.action(*id)))
                .collect(),
        }
    }
}

impl ActionDump {
    fn new(ctx: &Context, action: &Action) -> Self {
        let affects = |affects: &[Affect]| -> Vec<AffectDump> {
            affects.iter().map(|a| AffectDump::new(ctx, a)).collect()
        };
        let emails =
            |emails: &[Email]| -> Vec<EmailDump> { emails.iter().map(EmailDump::from).collect() };
        Self {
            group_id: action.key.group_id,
            action_id: action.key.action_id,
            name: action.name.clone(),
            display_name: action.display_name.clone(),
            description: action.description.clone(),
            hidden: action.hidden,
            dynamic: action.dynamic,
            restrictions: action.restrictions.clone(),
            start_emails: emails(&action.start_emails),
            complete_emails: emails(&action.complete_emails),
            start_affects: affects(&action.start_affects),
            complete_affects: affects(&action.complete_affects),
        }
    }
}

impl From<&Email> for EmailDump {
    fn from(email: &Email) -> Self {
        Self {
            email_id: email.email_id,
            name: email.name.clone(),
            subject: email.subject.clone(),
            body: email.body.clone(),
            task: email.task,
            recipients: email.recipients.clone(),
            documents: email.documents.clone(),
            templates: email.templates.clone(),
            restrictions: email.restrictions.clone(),
        }
    }
}

impl AffectDump {
    fn new(ctx: &Context, affect: &Affect) -> Self {
        let (task, hours) = match affect {
            Affect::Offset(offset) => (offset.task, Some(offset.hours)),
            Affect::MarkDone(mark_done) => (mark_done.task, None),
            Affect::CreateAction(_) | Affect::CreateGroup(_) => (None, None),
        };
        Self {
            kind: affect.kind(),
            group_id: affect.group_id(),
            target: affect.target_key(),
            task,
            hours,
            resolved: affect.resolved().is_some(),
            description: describe_affect(ctx, affect),
        }
    }
}
