//! Digraph rendering tests
mod common;
use actiongraph::dot::{DotNode, escape_name, group_statements};
use actiongraph::prelude::*;
use common::*;
use std::collections::HashSet;

fn lines(dot: &str) -> Vec<&str> {
    dot.lines().collect()
}

fn edges(dot: &str) -> Vec<&str> {
    dot.lines().filter(|l| l.contains(" -> ")).collect()
}

fn node_name(graph: &BuiltGraph, key: (i64, i64)) -> String {
    graph
        .context
        .find_action(ActionKey::new(key.0, key.1))
        .expect("Action was not built")
        .node_name()
}

#[cfg(test)]
mod dot_tests {
    use super::*;

    #[test]
    fn test_empty_action_list_renders_only_frame() {
        let dump = DumpBuilder::new().action_list(LIST, "Empty");
        let graph = build(&dump);
        let dot = render_action_list(&graph, &DigraphOptions::default());
        assert_eq!(lines(&dot), vec!["digraph G {", "}"]);
    }

    #[test]
    fn test_affects_differing_only_by_task_draw_one_edge() {
        let dump = purchase_list()
            .affect(ORDER_TITLE, COMPLETE, offset(SCHEDULE_CLOSING, COMPLETE, 4.0))
            .affect(ORDER_TITLE, START, mark_done(SCHEDULE_CLOSING, START));
        let graph = build(&dump);
        let dot = render_action_list(&graph, &DigraphOptions::default());

        let expected = format!(
            "{} -> {};",
            node_name(&graph, ORDER_TITLE),
            node_name(&graph, SCHEDULE_CLOSING)
        );
        assert_eq!(edges(&dot).iter().filter(|e| **e == expected).count(), 1);
    }

    #[test]
    fn test_output_never_repeats_a_line() {
        let dump = purchase_list()
            .action(CLOSING, 4, "Fund")
            .affect(SCHEDULE_CLOSING, COMPLETE, create_action((CLOSING, 4)))
            .affect(SCHEDULE_CLOSING, START, create_action((CLOSING, 4)))
            .trigger(OPENING, FILE_CREATED, create_action(REVIEW_TITLE));
        let graph = build(&dump);

        for dot in [
            render_action_list(&graph, &DigraphOptions::default()),
            render_group(&graph, graph.action_list.groups[1], true),
        ] {
            let mut seen = HashSet::new();
            for line in lines(&dot) {
                assert!(seen.insert(line), "Repeated line: {}", line);
            }
        }
    }

    #[test]
    fn test_dangling_affects_draw_no_edge() {
        let dump = purchase_list().affect(REVIEW_TITLE, START, offset((CLOSING, 404), START, 1.0));
        let graph = build(&dump);
        let dot = render_action_list(&graph, &DigraphOptions::default());

        // Every edge endpoint is a declared node.
        let declared: HashSet<_> = dot
            .lines()
            .filter(|l| !l.contains(" -> ") && l.ends_with(';'))
            .map(|l| l.split(['[', ';']).next().unwrap_or_default())
            .collect();
        for edge in edges(&dot) {
            let (from, to) = edge.trim_end_matches(';').split_once(" -> ").unwrap();
            assert!(declared.contains(from), "Undeclared node {}", from);
            assert!(declared.contains(to), "Undeclared node {}", to);
        }
        assert_eq!(edges(&dot).len(), 3);
    }

    #[test]
    fn test_node_styles_by_kind() {
        let dump = purchase_list()
            .row(
                "ActionEmailTemplate",
                serde_json::json!({ "ActionEmailTemplateID": 300, "ActionEmailTemplateName": "Welcome" }),
            )
            .row(
                "ActionDefActionEmailTemplateRel",
                serde_json::json!({ "ActionDefID": ORDER_TITLE.1, "ActionEmailTemplateID": 300, "ActionStartComplete": false }),
            );
        let graph = build(&dump);
        let dot = render_action_list(&graph, &DigraphOptions::default());

        let order_title = node_name(&graph, ORDER_TITLE);
        assert!(dot.contains(&format!(
            "{}[label=\"Order Title\", shape=\"box\"];",
            order_title
        )));
        assert!(dot.contains(
            "NEmail_Welcome_300_10_1[label=\"Welcome\", style=\"filled\", fillcolor=\"#33a02c\", fontcolor=\"white\"];"
        ));
        assert!(dot.contains(&format!("{} -> NEmail_Welcome_300_10_1;", order_title)));
        assert!(dot.contains(
            "NFile_Created_14[label=\"File Created\", style=\"filled\", fillcolor=\"#a6cee3\"];"
        ));
    }

    #[test]
    fn test_entities_sharing_a_name_get_distinct_nodes() {
        let dump = purchase_list()
            .row(
                "ActionEmailTemplate",
                serde_json::json!({ "ActionEmailTemplateID": 300, "ActionEmailTemplateName": "TX: Order Title" }),
            )
            .row(
                "ActionDefActionEmailTemplateRel",
                serde_json::json!({ "ActionDefID": ORDER_TITLE.1, "ActionEmailTemplateID": 300, "ActionStartComplete": true }),
            )
            .list_group(LIST, FILE_CREATED, "File Created", 3)
            .action(FILE_CREATED, 5, "Open File")
            .affect(REVIEW_TITLE, START, create_action((FILE_CREATED, 5)))
            .trigger(CLOSING, FILE_CREATED, create_action(SCHEDULE_CLOSING));
        let graph = build(&dump);

        let order_title = graph
            .context
            .find_action(ActionKey::new(ORDER_TITLE.0, ORDER_TITLE.1))
            .unwrap();
        let email = &order_title.complete_emails[0];
        assert_ne!(order_title.node_name(), email.node_name());

        let dot = render_action_list(&graph, &DigraphOptions::default());
        let declared = |name: &str| {
            dot.lines()
                .filter(|l| l.starts_with(&format!("{}[", name)) || *l == format!("{};", name))
                .count()
        };
        assert_eq!(declared(&order_title.node_name()), 1);
        assert_eq!(declared(&email.node_name()), 1);
        assert!(!edges(&dot).contains(&format!("{0} -> {0};", order_title.node_name()).as_str()));

        // Group 14 "File Created" and external action 14 "File Created".
        let file_created_group = graph.context.find_group(FILE_CREATED).unwrap();
        let trigger = &graph.context.find_group(CLOSING).unwrap().triggers[0];
        assert_ne!(file_created_group.node_name(), trigger.external_action.node_name());

        let closing = graph.context.lookup_group(CLOSING).unwrap();
        let opening = graph.context.lookup_group(OPENING).unwrap();
        let dot = render_group(&graph, opening, true);
        assert!(dot.contains(&format!(
            "{}[label=\"File Created\", shape=\"octagon\"];",
            file_created_group.node_name()
        )));
        let dot = render_group(&graph, closing, true);
        assert!(dot.contains(&format!(
            "{}[label=\"File Created\", style=\"filled\", fillcolor=\"#a6cee3\"];",
            trigger.external_action.node_name()
        )));
    }

    #[test]
    fn test_trigger_with_missing_target_draws_no_edge() {
        let missing = (CLOSING, 404);
        let dump = purchase_list()
            .trigger(CLOSING, FILE_CREATED, create_action(missing))
            .affect(ORDER_TITLE, START, create_action(missing));
        let graph = build(&dump);

        let dangling: Vec<_> = graph.diagnostics.dangling_actions().collect();
        assert_eq!(dangling, vec![ActionKey::new(missing.0, missing.1)]);

        let dot = render_action_list(&graph, &DigraphOptions::default());
        assert_eq!(lines(&dot).first(), Some(&"digraph G {"));
        assert_eq!(lines(&dot).last(), Some(&"}"));
        assert_eq!(edges(&dot).len(), 3);

        let closing = graph.context.lookup_group(CLOSING).unwrap();
        let dot = render_group(&graph, closing, true);
        assert_eq!(lines(&dot).last(), Some(&"}"));
        assert!(dot.contains(&node_name(&graph, SCHEDULE_CLOSING)));
        assert!(!dot.contains("File_Created"));
    }

    #[test]
    fn test_triggers_can_be_left_out() {
        let graph = build(&purchase_list());
        let options = DigraphOptions {
            include_triggers: false,
            ..Default::default()
        };
        let dot = render_action_list(&graph, &options);
        assert!(!dot.contains("File_Created"));
        assert_eq!(edges(&dot).len(), 2);
    }

    #[test]
    fn test_reachable_scope_draws_only_reached_actions() {
        let dump = purchase_list().action(CLOSING, 4, "Unreached");
        let graph = build(&dump);
        let options = DigraphOptions {
            scope: Scope::DefaultRoots,
            ..Default::default()
        };
        let dot = render_action_list(&graph, &options);

        // File Created reaches Review Title only.
        assert!(dot.contains(&node_name(&graph, REVIEW_TITLE)));
        assert!(!dot.contains(&node_name(&graph, ORDER_TITLE)));
        assert!(!dot.contains(&node_name(&graph, (CLOSING, 4))));
    }

    #[test]
    fn test_group_view_draws_foreign_groups_as_octagons() {
        let graph = build(&purchase_list());
        let closing = graph.context.lookup_group(CLOSING).unwrap();
        let opening = graph.context.lookup_group(OPENING).unwrap();

        let dot = render(group_statements(&graph.context, closing, true));
        let opening_node = graph.context.group(opening).node_name();
        assert!(dot.contains(&format!(
            "{}[label=\"Opening\", shape=\"octagon\"];",
            opening_node
        )));
        assert!(dot.contains(&format!(
            "{} -> {};",
            opening_node,
            node_name(&graph, SCHEDULE_CLOSING)
        )));

        let dot = render(group_statements(&graph.context, opening, true));
        let closing_node = graph.context.group(closing).node_name();
        assert!(dot.contains(&format!(
            "{} -> {};",
            node_name(&graph, ORDER_TITLE),
            closing_node
        )));
        assert!(!dot.contains(&node_name(&graph, SCHEDULE_CLOSING)));
    }

    #[test]
    fn test_escape_matches_documented_example() {
        assert_eq!(
            escape_name("Request Fees & Taxes (2024)"),
            "Request_Fees_and_Taxes__2024_"
        );
    }
}
