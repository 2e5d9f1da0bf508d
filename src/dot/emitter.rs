use super::escape::{dot_id, quote};
use itertools::Itertools;
use std::fmt;
use std::iter;

pub const HEADER: &str = "digraph G {";
pub const FOOTER: &str = "}";

/// Visual style of a node, keyed by the kind of entity it draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Action,
    Email,
    ExternalAction,
    DocumentAdded,
    ActionEvent,
    Group,
}

/// A node declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub name: String,
    pub label: String,
    attributes: Vec<(&'static str, String)>,
}

impl Vertex {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            attributes: Vec::new(),
        }
    }

    /// A vertex styled for `kind`.
    pub fn styled(name: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        let vertex = Self::new(name, label);
        match kind {
            NodeKind::Action => vertex.shape("box"),
            NodeKind::Email => vertex.filled("#33a02c").font_color("white"),
            NodeKind::ExternalAction => vertex.filled("#a6cee3"),
            NodeKind::DocumentAdded => vertex.filled("#b2df8a"),
            NodeKind::ActionEvent => vertex.filled("#1f78b4").font_color("white"),
            NodeKind::Group => vertex.shape("octagon"),
        }
    }

    pub fn shape(self, shape: &str) -> Self {
        self.attribute("shape", shape)
    }

    pub fn filled(self, color: &str) -> Self {
        self.attribute("style", "filled").attribute("fillcolor", color)
    }

    pub fn font_color(self, color: &str) -> Self {
        self.attribute("fontcolor", color)
    }

    fn attribute(mut self, key: &'static str, value: &str) -> Self {
        self.attributes.push((key, value.to_string()));
        self
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut attributes = Vec::with_capacity(self.attributes.len() + 1);
        if self.label != self.name {
            attributes.push(format!("label={}", quote(&self.label)));
        }
        attributes.extend(
            self.attributes
                .iter()
                .map(|(key, value)| format!("{}={}", key, quote(value))),
        );

        write!(f, "{}", dot_id(&self.name))?;
        if !attributes.is_empty() {
            write!(f, "[{}]", attributes.join(", "))?;
        }
        write!(f, ";")
    }
}

/// A directed edge between two node names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {};", dot_id(&self.from), dot_id(&self.to))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Node(Vertex),
    Edge(Edge),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Node(vertex) => fmt::Display::fmt(vertex, f),
            Statement::Edge(edge) => fmt::Display::fmt(edge, f),
        }
    }
}

impl From<Vertex> for Statement {
    fn from(vertex: Vertex) -> Self {
        Statement::Node(vertex)
    }
}

impl From<Edge> for Statement {
    fn from(edge: Edge) -> Self {
        Statement::Edge(edge)
    }
}

/// Renders statements as dot lines framed by `HEADER` and `FOOTER`.
///
/// Lazy. A line identical to one already emitted is dropped, so the output never repeats a
/// statement; the first occurrence keeps its position.
pub fn emit<I>(statements: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = Statement>,
{
    iter::once(HEADER.to_string())
        .chain(statements.into_iter().map(|s| s.to_string()).unique())
        .chain(iter::once(FOOTER.to_string()))
}

/// Collects `emit` into newline-separated text.
pub fn render<I>(statements: I) -> String
where
    I: IntoIterator<Item = Statement>,
{
    let mut output = emit(statements).join("\n");
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_label_only_when_different() {
        let vertex = Vertex::styled("NOrder_1_2", "NOrder_1_2", NodeKind::Action);
        assert_eq!(vertex.to_string(), "NOrder_1_2[shape=\"box\"];");

        let vertex = Vertex::styled("NWelcome_1_2", "Welcome", NodeKind::Email);
        assert_eq!(
            vertex.to_string(),
            "NWelcome_1_2[label=\"Welcome\", style=\"filled\", fillcolor=\"#33a02c\", fontcolor=\"white\"];"
        );
    }

    #[test]
    fn test_label_quotes_are_escaped() {
        let vertex = Vertex::new("NA", "Say \"hi\"");
        assert_eq!(vertex.to_string(), "NA[label=\"Say \\\"hi\\\"\"];");
    }

    #[test]
    fn test_emit_deduplicates_lines() {
        let statements = vec![
            Statement::from(Edge::new("NA", "NB")),
            Vertex::new("NA", "A").into(),
            Edge::new("NA", "NB").into(),
        ];
        let lines: Vec<_> = emit(statements).collect();
        assert_eq!(lines, vec!["digraph G {", "NA -> NB;", "NA[label=\"A\"];", "}"]);
    }
}
