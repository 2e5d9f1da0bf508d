//! Turns a built graph into dot statements: the whole action list, or one group at a time.

use super::emitter::{Edge, NodeKind, Statement, Vertex};
use super::escape::node_name;
use crate::graph::{default_roots, reachable};
use crate::model::{Action, ActionId, ActionList, Context, Email, ExternalAction, Group, GroupId};
use ahash::AHashSet;
use regex::Regex;
use std::sync::OnceLock;

/// Entities that are drawn as a single node.
///
/// Actions and plain external actions are named after themselves; every other kind carries a
/// kind marker, so an email or a group named like an action still gets its own node.
pub trait DotNode {
    /// The node identifier. Includes the entity's ids so distinct entities never collide.
    fn node_name(&self) -> String;
    fn vertex(&self) -> Vertex;
}

fn label_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\w+: ").expect("label prefix pattern is valid"))
}

/// Action names often carry a state or department prefix (`TX: Order Survey`) that only adds
/// noise to a diagram.
pub fn strip_label_prefix(name: &str) -> &str {
    match label_prefix().find(name) {
        Some(m) => &name[m.end()..],
        None => name,
    }
}

impl DotNode for Action {
    fn node_name(&self) -> String {
        node_name(&[&self.name, &self.key.group_id, &self.key.action_id])
    }

    fn vertex(&self) -> Vertex {
        Vertex::styled(
            self.node_name(),
            strip_label_prefix(&self.name),
            NodeKind::Action,
        )
    }
}

impl DotNode for Email {
    fn node_name(&self) -> String {
        node_name(&[
            &"Email",
            &self.name,
            &self.email_id,
            &self.key.group_id,
            &self.key.action_id,
        ])
    }

    fn vertex(&self) -> Vertex {
        Vertex::styled(self.node_name(), self.name.as_str(), NodeKind::Email)
    }
}

impl DotNode for ExternalAction {
    fn node_name(&self) -> String {
        match self {
            ExternalAction::Plain { id, name } => node_name(&[name, id]),
            ExternalAction::DocumentAdded {
                id,
                document_type_id,
                document_name,
                ..
            } => node_name(&[&"Document", document_name, id, document_type_id]),
            ExternalAction::ActionEventReceived {
                id,
                action_event_id,
                action_event_name,
                ..
            } => node_name(&[&"Event", action_event_name, id, action_event_id]),
        }
    }

    fn vertex(&self) -> Vertex {
        let kind = match self {
            ExternalAction::Plain { .. } => NodeKind::ExternalAction,
            ExternalAction::DocumentAdded { .. } => NodeKind::DocumentAdded,
            ExternalAction::ActionEventReceived { .. } => NodeKind::ActionEvent,
        };
        Vertex::styled(self.node_name(), self.label(), kind)
    }
}

impl DotNode for Group {
    fn node_name(&self) -> String {
        node_name(&[&"Group", &self.name, &self.group_id])
    }

    fn vertex(&self) -> Vertex {
        Vertex::styled(self.node_name(), self.name.as_str(), NodeKind::Group)
    }
}

/// Which actions a full action list diagram draws.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Scope {
    /// Every action of the list's groups, plus whatever their affects and triggers reach.
    #[default]
    Everything,
    /// Only what is reachable from the well-known root external actions.
    DefaultRoots,
    /// Only what is reachable from these actions.
    Roots(AHashSet<ActionId>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DigraphOptions {
    pub include_triggers: bool,
    pub scope: Scope,
}

impl Default for DigraphOptions {
    fn default() -> Self {
        Self {
            include_triggers: true,
            scope: Scope::Everything,
        }
    }
}

fn in_scope(ctx: &Context, list: &ActionList, scope: &Scope) -> AHashSet<ActionId> {
    match scope {
        Scope::Everything => {
            let seeds = list.groups.iter().flat_map(|id| {
                let group = ctx.group(*id);
                group
                    .actions
                    .iter()
                    .copied()
                    .chain(group.triggers.iter().filter_map(|t| t.affect.resolved()))
            });
            reachable(ctx, seeds)
        }
        Scope::DefaultRoots => reachable(ctx, default_roots(ctx, list)),
        Scope::Roots(roots) => reachable(ctx, roots.iter().copied()),
    }
}

/// Statements for the full action list diagram, produced lazily one group at a time.
///
/// Groups are visited in build order: the list's own groups first, then the groups affects can
/// add. Only the list's groups contribute trigger nodes. Dangling affects draw no edge.
pub fn action_list_statements<'a>(
    ctx: &'a Context,
    list: &ActionList,
    options: &DigraphOptions,
) -> impl Iterator<Item = Statement> + use<'a> {
    let scope = in_scope(ctx, list, &options.scope);
    let on_list: AHashSet<GroupId> = list.groups.iter().copied().collect();
    let include_triggers = options.include_triggers;

    ctx.groups().flat_map(move |group| {
        let mut statements = Vec::new();
        if include_triggers && on_list.contains(&group.id) {
            for trigger in &group.triggers {
                let Some(target) = trigger.affect.resolved().filter(|t| scope.contains(t)) else {
                    continue;
                };
                let vertex = trigger.external_action.vertex();
                let edge = Edge::new(vertex.name.clone(), ctx.action(target).node_name());
                statements.push(vertex.into());
                statements.push(edge.into());
            }
        }
        for id in group.actions.iter().filter(|id| scope.contains(*id)) {
            let action = ctx.action(*id);
            push_action(action, &mut statements);
            for target in action.successors() {
                let edge = Edge::new(action.node_name(), ctx.action(target).node_name());
                statements.push(edge.into());
            }
        }
        statements
    })
}

/// An action node followed by its email nodes and edges.
fn push_action(action: &Action, statements: &mut Vec<Statement>) {
    let name = action.node_name();
    statements.push(action.vertex().into());
    for email in action.emails() {
        let vertex = email.vertex();
        statements.push(Edge::new(name.clone(), vertex.name.clone()).into());
        statements.push(vertex.into());
    }
}

/// Statements for one group: its triggers and actions, with affects that cross into or out of
/// the group drawn to or from an octagon for the other group.
pub fn group_statements(ctx: &Context, group_id: GroupId, include_triggers: bool) -> Vec<Statement> {
    let group = ctx.group(group_id);
    let mut statements = Vec::new();

    // An affect target inside the group is drawn as itself, anything else as its group.
    let target_node = |target: ActionId| -> (String, Option<Statement>) {
        let action = ctx.action(target);
        if action.group == group_id {
            (action.node_name(), None)
        } else {
            let foreign = ctx.group_of(action);
            (foreign.node_name(), Some(foreign.vertex().into()))
        }
    };

    if include_triggers {
        for trigger in &group.triggers {
            let Some(target) = trigger.affect.resolved() else {
                continue;
            };
            let vertex = trigger.external_action.vertex();
            let (target_name, foreign) = target_node(target);
            statements.extend(foreign);
            statements.push(Edge::new(vertex.name.clone(), target_name).into());
            statements.push(vertex.into());
        }
    }

    for id in &group.actions {
        let action = ctx.action(*id);
        push_action(action, &mut statements);
        for target in action.successors() {
            let (target_name, foreign) = target_node(target);
            statements.extend(foreign);
            statements.push(Edge::new(action.node_name(), target_name).into());
        }
    }

    // Affects from other groups landing here.
    for source in ctx.actions().filter(|a| a.group != group_id) {
        for target in source.successors() {
            if ctx.action(target).group != group_id {
                continue;
            }
            let source_group = ctx.group_of(source);
            statements.push(source_group.vertex().into());
            statements.push(
                Edge::new(source_group.node_name(), ctx.action(target).node_name()).into(),
            );
        }
    }

    statements
}
