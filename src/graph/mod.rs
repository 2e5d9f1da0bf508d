//! Reachability over the affect graph and the default choice of where to start it.

use crate::model::{ActionId, ActionList, Context};
use ahash::AHashSet;

/// External actions that start work on a file, used as the default roots of a scoped diagram.
pub const ROOT_EXTERNAL_ACTIONS: &[(i64, &str)] = &[
    (121, "Document Added"),
    (14, "File Created"),
    (154, "Received Action Event"),
];

/// Every action reachable from `roots` by following resolved start and complete affects.
///
/// Roots are part of the result, except ids that do not belong to `ctx`, which are ignored.
/// Dangling affects are skipped. Affect cycles are fine: an action is only expanded the first
/// time it is visited.
pub fn reachable(ctx: &Context, roots: impl IntoIterator<Item = ActionId>) -> AHashSet<ActionId> {
    let mut visited = AHashSet::new();
    let mut stack: Vec<ActionId> = roots.into_iter().collect();

    while let Some(id) = stack.pop() {
        let Some(action) = ctx.get_action(id) else {
            tracing::debug!(action = id.index(), "Ignoring an action id from another build");
            continue;
        };
        if !visited.insert(id) {
            continue;
        }
        stack.extend(action.successors().filter(|next| !visited.contains(next)));
    }
    visited
}

/// Actions targeted by a trigger of one of the list's groups whose external action id is in
/// `external_actions`.
pub fn find_roots(
    ctx: &Context,
    list: &ActionList,
    external_actions: &[(i64, &str)],
) -> AHashSet<ActionId> {
    list.groups
        .iter()
        .flat_map(|id| ctx.group(*id).triggers.iter())
        .filter(|trigger| {
            external_actions
                .iter()
                .any(|(id, _)| *id == trigger.external_action.id())
        })
        .filter_map(|trigger| trigger.affect.resolved())
        .collect()
}

/// Roots for the well-known external actions in `ROOT_EXTERNAL_ACTIONS`.
pub fn default_roots(ctx: &Context, list: &ActionList) -> AHashSet<ActionId> {
    find_roots(ctx, list, ROOT_EXTERNAL_ACTIONS)
}
