//! Graphviz dot output.

pub mod emitter;
pub mod escape;
pub mod view;

pub use emitter::{Edge, FOOTER, HEADER, NodeKind, Statement, Vertex, emit, render};
pub use escape::{dot_id, escape_name, node_name};
pub use view::{
    DigraphOptions, DotNode, Scope, action_list_statements, group_statements, strip_label_prefix,
};

use crate::builder::BuiltGraph;
use crate::model::GroupId;

/// Dot text for the whole action list of `graph`.
pub fn render_action_list(graph: &BuiltGraph, options: &DigraphOptions) -> String {
    render(action_list_statements(
        &graph.context,
        &graph.action_list,
        options,
    ))
}

/// Dot text for a single group of `graph`.
pub fn render_group(graph: &BuiltGraph, group: GroupId, include_triggers: bool) -> String {
    render(group_statements(&graph.context, group, include_triggers))
}
