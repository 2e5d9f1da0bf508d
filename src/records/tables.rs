//! Typed records for the ResWare tables that describe action lists.
//!
//! Every table is declared once through `define_tables!`, which generates the record struct,
//! its column mapping, and its lookup key. Nullability follows the field type: `Option<T>`
//! columns may be absent or NULL, everything else is required.

use super::row::{FromColumn, Row};
use crate::error::RecordError;
use crate::model::Task;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use std::hash::Hash;

/// A table that can be fetched from the record source and mapped into typed records.
pub trait Table: Sized {
    /// The source table name.
    const NAME: &'static str;
    /// The lookup key records are grouped or indexed by.
    type Key: Eq + Hash + Clone + Debug;

    fn from_row(row: &Row) -> Result<Self, RecordError>;
    fn key(&self) -> Self::Key;
}

/// The eight nullable columns shared by group-action affects and external trigger affects.
///
/// Which of them are populated decides which typed affects a row represents.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AffectColumns {
    pub affected_group_id: Option<i64>,
    pub affected_action_id: Option<i64>,
    pub affected_task: Option<Task>,
    pub offset: Option<f64>,
    pub auto_complete: Option<bool>,
    pub created_action_group_id: Option<i64>,
    pub created_action_action_id: Option<i64>,
    pub created_group_id: Option<i64>,
}

/// Rows that carry affect columns.
pub trait AffectRow {
    fn affect_columns(&self) -> AffectColumns;
}

macro_rules! define_tables {
    (@read $row:ident, $table:literal, $field:ident, $col:literal, $fty:ty) => {
        $row.read::<$fty>($table, stringify!($field), $col)?
    };
    (@read $row:ident, $table:literal, $field:ident, $col:literal, $fty:ty, $parser:path) => {
        $row.read_with::<$fty>($table, stringify!($field), $col, $parser)?
    };
    (
        $(
            $(#[$meta:meta])*
            $name:ident => $table:literal, key: $kty:ty = |$s:ident| $kexpr:expr, {
                $( $field:ident : $fty:ty = $col:literal $(=> $parser:path)? ),* $(,)?
            }
        )*
    ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            pub struct $name {
                $( pub $field: $fty, )*
            }

            impl Table for $name {
                const NAME: &'static str = $table;
                type Key = $kty;

                fn from_row(row: &Row) -> Result<Self, RecordError> {
                    Ok(Self {
                        $( $field: define_tables!(@read row, $table, $field, $col, $fty $(, $parser)?), )*
                    })
                }

                fn key(&self) -> Self::Key {
                    let $s = self;
                    $kexpr
                }
            }
        )*
    };
}

define_tables! {
    /// A global action definition. Instances of it live in groups.
    ActionRecord => "ActionDef", key: i64 = |r| r.id, {
        id: i64 = "ActionDefID",
        name: String = "Name",
        display_name: String = "DisplayName",
        description: Option<String> = "Description",
        hidden: bool = "Hidden",
    }

    ActionListRecord => "ActionListDef", key: i64 = |r| r.id, {
        id: i64 = "ActionListDefID",
        name: String = "Name",
    }

    /// Membership of a group in an action list.
    ActionListGroupRecord => "ActionListGroupsDef", key: i64 = |r| r.action_list_id, {
        action_list_id: i64 = "ActionListDefId",
        group_id: i64 = "ActionListGroupDefId",
        order: i64 = "GroupOrder",
        optional: bool = "Optional",
    }

    GroupRecord => "ActionListGroupDef", key: i64 = |r| r.id, {
        id: i64 = "ActionListGroupDefID",
        name: String = "ActionListGroupName",
    }

    /// An action placed in a group.
    GroupActionRecord => "ActionListGroupActionDef", key: i64 = |r| r.group_id, {
        group_id: i64 = "ActionListGroupDefID",
        action_id: i64 = "ActionDefID",
        order: Option<i64> = "ActionOrder",
        dynamic: bool = "Dynamic",
    }

    /// What happens when a group action's start or complete task is marked done.
    ///
    /// `task` is the task of the owning action the affect fires on.
    AffectRecord => "ActionGroupAffectDef", key: (i64, i64) = |r| (r.group_id, r.action_id), {
        group_id: i64 = "ActionListGroupDefID",
        action_id: i64 = "ActionDefID",
        task: Option<Task> = "ActionTypeID",
        order: Option<i64> = "AffectOrder",
        affected_group_id: Option<i64> = "AffectActionListGroupDefID",
        affected_action_id: Option<i64> = "AffectActionDefID",
        affected_task: Option<Task> = "AffectActionTypeID",
        offset: Option<f64> = "AffectOffset",
        auto_complete: Option<bool> = "AffectAutoComplete",
        created_action_group_id: Option<i64> = "CreateActionActionListGroupDefID",
        created_action_action_id: Option<i64> = "CreateActionActionDefID",
        created_group_id: Option<i64> = "CreateGroupActionListGroupDefID",
    }

    /// An affect performed when ResWare detects an external action while the group is on a file.
    TriggerRecord => "ActionListGroupExternalTriggerAffectsDef", key: i64 = |r| r.group_id, {
        group_id: i64 = "ActionListGroupDefID",
        external_action_id: i64 = "ExternalActionDefID",
        action_event_id: Option<i64> = "ActionEventDefID",
        document_type_id: Option<i64> = "DocumentTypeID",
        affected_group_id: Option<i64> = "AffectActionListGroupDefID",
        affected_action_id: Option<i64> = "AffectActionDefID",
        affected_task: Option<Task> = "AffectActionTypeID",
        offset: Option<f64> = "AffectOffset",
        auto_complete: Option<bool> = "AffectAutoComplete",
        created_action_group_id: Option<i64> = "CreateActionActionListGroupDefID",
        created_action_action_id: Option<i64> = "CreateActionActionDefID",
        created_group_id: Option<i64> = "CreateGroupActionListGroupDefID",
    }

    ExternalActionRecord => "ExternalActionDef", key: i64 = |r| r.id, {
        id: i64 = "ExternalActionDefID",
        name: String = "Name",
    }

    ActionEventRecord => "ActionEventDef", key: i64 = |r| r.id, {
        id: i64 = "ActionEventDefID",
        name: String = "Name",
    }

    DocumentTypeRecord => "DocumentType", key: i64 = |r| r.id, {
        id: i64 = "DocumentTypeID",
        name: String = "Name",
    }

    /// An email template. The same template may be sent by many actions.
    EmailRecord => "ActionEmailTemplate", key: i64 = |r| r.id, {
        id: i64 = "ActionEmailTemplateID",
        name: String = "ActionEmailTemplateName",
        subject: Option<String> = "EmailSubject",
        body: Option<String> = "EmailBody",
    }

    /// An email sent when a global action's start or complete is marked done.
    ActionEmailRecord => "ActionDefActionEmailTemplateRel", key: i64 = |r| r.action_id, {
        action_id: i64 = "ActionDefID",
        email_id: i64 = "ActionEmailTemplateID",
        task: Task = "ActionStartComplete" => parse_email_task,
    }

    /// The partner type that should receive the email.
    EmailRecipientRecord => "ActionEmailTemplatePartnerTypeRef", key: i64 = |r| r.email_id, {
        email_id: i64 = "ActionEmailTemplateID",
        partner_type_id: i64 = "PartnerTypeID",
    }

    EmailDocumentRecord => "ActionEmailTemplateDocumentTypeRef", key: i64 = |r| r.email_id, {
        email_id: i64 = "ActionEmailTemplateID",
        document_type_id: i64 = "DocumentTypeID",
    }

    EmailTemplateRecord => "ActionEmailTemplateTemplateRef", key: i64 = |r| r.email_id, {
        email_id: i64 = "ActionEmailTemplateID",
        template_id: i64 = "TemplateID",
    }

    TemplateRecord => "Template", key: i64 = |r| r.id, {
        id: i64 = "TemplateID",
        name: String = "Name",
        filename: String = "Filename",
        document_type_id: i64 = "DocumentTypeID",
    }

    /// Every template has at least one row here; a NULL partner is a placeholder for "no restriction".
    EmailPartnerRecord => "PartnerCompanyActionEmailTemplateRel", key: i64 = |r| r.email_id, {
        partner_id: Option<i64> = "PartnerCompanyID",
        email_id: i64 = "ActionEmailTemplateID",
        include: bool = "IncludeExclude",
    }

    GroupPartnerRecord => "ActionListGroupDefPartnerRel", key: i64 = |r| r.group_id, {
        group_id: i64 = "ActionListGroupDefID",
        partner_id: i64 = "PartnerCompanyID",
        include: bool = "ActionPartnerAddTypeID" => parse_partner_include,
    }

    GroupActionPartnerRecord => "ActionListGroupActionDefPartnerRel", key: (i64, i64) = |r| (r.group_id, r.action_id), {
        group_id: i64 = "ActionListGroupDefID",
        action_id: i64 = "ActionDefID",
        partner_id: i64 = "PartnerCompanyID",
        include: bool = "ActionPartnerAddTypeID" => parse_partner_include,
    }

    PartnerRecord => "PartnerCompany", key: i64 = |r| r.id, {
        id: i64 = "PartnerCompanyID",
        name: String = "Name",
    }

    PartnerTypeRecord => "PartnerType", key: i64 = |r| r.id, {
        id: i64 = "PartnerTypeID",
        name: String = "Name",
    }

    PartnerTypeRelRecord => "PartnerCompanyPartnerTypeRel", key: i64 = |r| r.partner_id, {
        partner_id: i64 = "PartnerCompanyID",
        type_id: i64 = "PartnerTypeID",
    }

    /// When `partner_id` is added to a file as `type_id`, `auto_add_id` joins as `auto_add_type_id`.
    PartnerAutoAddRecord => "PartnerAutoAddPartnerRel", key: i64 = |r| r.partner_id, {
        partner_id: i64 = "PartnerCompanyID",
        type_id: i64 = "PartnerTypeId",
        auto_add_id: i64 = "AutoAddPartnerCompanyID",
        auto_add_type_id: i64 = "AutoAddPartnerTypeID",
    }
}

impl AffectRow for AffectRecord {
    fn affect_columns(&self) -> AffectColumns {
        AffectColumns {
            affected_group_id: self.affected_group_id,
            affected_action_id: self.affected_action_id,
            affected_task: self.affected_task,
            offset: self.offset,
            auto_complete: self.auto_complete,
            created_action_group_id: self.created_action_group_id,
            created_action_action_id: self.created_action_action_id,
            created_group_id: self.created_group_id,
        }
    }
}

impl AffectRow for TriggerRecord {
    fn affect_columns(&self) -> AffectColumns {
        AffectColumns {
            affected_group_id: self.affected_group_id,
            affected_action_id: self.affected_action_id,
            affected_task: self.affected_task,
            offset: self.offset,
            auto_complete: self.auto_complete,
            created_action_group_id: self.created_action_group_id,
            created_action_action_id: self.created_action_action_id,
            created_group_id: self.created_group_id,
        }
    }
}

// ActionTypeID / AffectActionTypeID: 1 is the start task, 2 the complete task.
impl FromColumn for Task {
    fn parse(value: &Value) -> Result<Self, String> {
        match value.as_i64() {
            Some(1) => Ok(Task::Start),
            Some(2) => Ok(Task::Complete),
            _ => Err("expected a task type of 1 (start) or 2 (complete)".to_string()),
        }
    }
}

/// `ActionStartComplete` is a bit: set means the email goes out on complete.
fn parse_email_task(value: &Value) -> Result<Task, String> {
    bool::parse(value).map(|complete| if complete { Task::Complete } else { Task::Start })
}

/// `ActionPartnerAddTypeID` is 1 for include and 2 for exclude.
fn parse_partner_include(value: &Value) -> Result<bool, String> {
    match value.as_i64() {
        Some(1) => Ok(true),
        Some(2) => Ok(false),
        _ => Err("expected 1 for include or 2 for exclude".to_string()),
    }
}
