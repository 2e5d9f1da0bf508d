//! Turns one flat affect row into the typed affects it represents.
//!
//! What a row does is decided by which of its nullable columns are set:
//! 1. `AffectActionListGroupDefID` + `AffectActionDefID` change another group action's task.
//!    `AffectOffset` shifts its due date; `AffectAutoComplete` set to true marks it done. Despite
//!    the name, auto-complete has nothing to do with targeting the complete task. Both may fire.
//! 2. `CreateActionActionListGroupDefID` + `CreateActionActionDefID` add an action to the file.
//! 3. `CreateGroupActionListGroupDefID` adds a group to the file.
//!
//! Any other row (display name changes, XML sends, recording documents, curatives) is outside
//! this model and yields nothing.

use crate::model::{
    ActionKey, ActionRef, Affect, CreateActionAffect, CreateGroupAffect, MarkDoneAffect,
    OffsetAffect,
};
use crate::records::{AffectColumns, AffectRow};

/// Classifies a row into zero or more affects, in the order offset, mark-done, create action,
/// create group.
pub fn classify(row: &impl AffectRow) -> Vec<Affect> {
    classify_columns(&row.affect_columns())
}

pub fn classify_columns(columns: &AffectColumns) -> Vec<Affect> {
    let mut affects = Vec::new();

    if let (Some(group_id), Some(action_id)) =
        (columns.affected_group_id, columns.affected_action_id)
    {
        let key = ActionKey::new(group_id, action_id);
        if let Some(hours) = columns.offset {
            affects.push(Affect::Offset(OffsetAffect {
                target: ActionRef::unbound(key),
                task: columns.affected_task,
                hours,
            }));
        }
        // A false or NULL flag just means this row is not a mark-done affect.
        if let Ok(mark_done) =
            MarkDoneAffect::new(key, columns.affected_task, columns.auto_complete)
        {
            affects.push(Affect::MarkDone(mark_done));
        }
    }

    if let (Some(group_id), Some(action_id)) = (
        columns.created_action_group_id,
        columns.created_action_action_id,
    ) {
        affects.push(Affect::CreateAction(CreateActionAffect {
            target: ActionRef::unbound(ActionKey::new(group_id, action_id)),
        }));
    }

    if let Some(group_id) = columns.created_group_id {
        affects.push(Affect::CreateGroup(CreateGroupAffect {
            group_id,
            first_action: None,
        }));
    }

    affects
}
