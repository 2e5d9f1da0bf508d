//! Plain-text descriptions of affects and whole action lists.

use crate::builder::BuiltGraph;
use crate::model::{Affect, Context, Task};
use std::fmt::Write;

/// One line describing what an affect does, e.g. `Offset START on Title/Order Survey by 24 hours`.
///
/// Dangling targets are shown as `<missing group/action>`.
pub fn describe_affect(ctx: &Context, affect: &Affect) -> String {
    let target = match (affect.resolved(), affect.target_key()) {
        (Some(id), _) => ctx.action_path(id),
        (None, Some(key)) => format!("<missing {}>", key),
        (None, None) => format!("<missing group {}>", affect.group_id()),
    };
    let task = |task: Option<Task>| match task {
        Some(task) => task.to_string(),
        None => "UNKNOWN".to_string(),
    };

    match affect {
        Affect::Offset(offset) => {
            format!("Offset {} on {} by {} hours", task(offset.task), target, offset.hours)
        }
        Affect::MarkDone(mark_done) => format!("{} {}", task(mark_done.task), target),
        Affect::CreateAction(_) => format!("Create {}", target),
        Affect::CreateGroup(create) => match ctx.find_group(create.group_id) {
            Some(group) => format!("Create group {}", group.name),
            None => format!("Create group <missing {}>", create.group_id),
        },
    }
}

/// A summary of the action list's groups, with their triggers, actions, emails and affects.
pub fn describe(graph: &BuiltGraph) -> String {
    let ctx = &graph.context;
    let mut output = String::new();

    // Writing to a String never fails.
    let _ = writeln!(output, "Action list: {} ({})", graph.action_list.name, graph.action_list.id);
    for group in graph.list_groups() {
        let optional = if group.optional { " (optional)" } else { "" };
        let _ = writeln!(output, "Group: {}{}", group.name, optional);
        for trigger in &group.triggers {
            let _ = writeln!(
                output,
                "  Trigger: {} -> {}",
                trigger.external_action.label(),
                describe_affect(ctx, &trigger.affect)
            );
        }
        for id in &group.actions {
            let action = ctx.action(*id);
            let _ = writeln!(output, "  Action: {}", ctx.action_path(*id));
            if action.emails().next().is_some() {
                let _ = writeln!(output, "    Emails:");
                for email in action.emails() {
                    let _ = writeln!(output, "      {} on {}", email.name, email.task);
                }
            }
            if action.affects().next().is_some() {
                let _ = writeln!(output, "    Affects:");
                for (task, affects) in [
                    (Task::Start, &action.start_affects),
                    (Task::Complete, &action.complete_affects),
                ] {
                    for affect in affects {
                        let _ = writeln!(
                            output,
                            "      on {}: {}",
                            task,
                            describe_affect(ctx, affect)
                        );
                    }
                }
            }
        }
    }

    let missing: Vec<String> = graph.diagnostics.missing().map(|m| m.to_string()).collect();
    if !missing.is_empty() {
        let _ = writeln!(output, "Missing: {}", missing.join(", "));
    }
    output
}
