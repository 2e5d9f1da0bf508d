//! Reachability tests
mod common;
use actiongraph::prelude::*;
use ahash::AHashSet;
use common::*;

/// Two actions in one group that each mark the other done on completion.
fn cycle() -> DumpBuilder {
    let a = (OPENING, 1);
    let b = (OPENING, 2);
    DumpBuilder::new()
        .action_list(LIST, "Cycle")
        .list_group(LIST, OPENING, "Opening", 1)
        .action(a.0, a.1, "A")
        .action(b.0, b.1, "B")
        .affect(a, COMPLETE, mark_done(b, COMPLETE))
        .affect(b, COMPLETE, mark_done(a, COMPLETE))
}

#[cfg(test)]
mod graph_tests {
    use super::*;

    #[test]
    fn test_reachable_terminates_on_cycles() {
        let graph = build(&cycle());
        let built = ids(&graph, &[(OPENING, 1), (OPENING, 2)]);

        let reached = reachable(&graph.context, [built[0]]);
        let expected: AHashSet<_> = built.iter().copied().collect();
        assert_eq!(reached, expected);
    }

    #[test]
    fn test_reachable_is_idempotent() {
        let graph = build(&purchase_list());
        let roots = ids(&graph, &[ORDER_TITLE]);

        let first = reachable(&graph.context, roots.clone());
        let second = reachable(&graph.context, roots);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_reachable_follows_affects_only_forward() {
        let graph = build(&purchase_list());
        let built = ids(&graph, &[REVIEW_TITLE]);

        let reached = reachable(&graph.context, built.clone());
        assert_eq!(reached.len(), 1);
        assert!(reached.contains(&built[0]));
    }

    #[test]
    fn test_reachable_skips_dangling_targets() {
        let dump = purchase_list().affect(REVIEW_TITLE, START, offset((CLOSING, 404), START, 2.0));
        let graph = build(&dump);
        let built = ids(&graph, &[REVIEW_TITLE]);

        assert_eq!(reachable(&graph.context, built).len(), 1);
    }

    #[test]
    fn test_reachable_ignores_ids_from_another_build() {
        let larger = build(&purchase_list());
        let foreign = ids(&larger, &[SCHEDULE_CLOSING]);

        let graph = build(&cycle());
        assert_eq!(graph.context.actions().count(), 2);
        assert!(graph.context.get_action(foreign[0]).is_none());

        let mut roots = ids(&graph, &[(OPENING, 1)]);
        roots.extend(foreign);
        assert_eq!(reachable(&graph.context, roots).len(), 2);
    }

    #[test]
    fn test_default_roots_come_from_well_known_triggers() {
        let dump = purchase_list()
            .external_action(500, "Manual Trigger")
            .trigger(CLOSING, 500, create_action(SCHEDULE_CLOSING));
        let graph = build(&dump);

        let roots = default_roots(&graph.context, &graph.action_list);
        let expected: AHashSet<_> = ids(&graph, &[REVIEW_TITLE]).into_iter().collect();
        assert_eq!(roots, expected);

        let custom = find_roots(&graph.context, &graph.action_list, &[(500, "Manual Trigger")]);
        let expected: AHashSet<_> = ids(&graph, &[SCHEDULE_CLOSING]).into_iter().collect();
        assert_eq!(custom, expected);
    }
}
