//! Tests for weak connectivity and downstream link trails

use std::collections::BTreeSet;

use rstest::rstest;

use cardmap::domain::{connected_ids, cyclic_ids, link_trail, Card, LinkGraph, TrailEnd};
use cardmap::util::testing::{init_test_setup, pipeline_cards};

fn ids(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn star() -> Vec<Card> {
    vec![
        Card::new("A", "a", "database"),
        Card::new("B", "b", "api").linked_to("A"),
        Card::new("C", "c", "form").linked_to("A"),
    ]
}

// ============================================================
// connected_ids
// ============================================================

#[rstest]
#[case::from_target("A")]
#[case::from_source("B")]
#[case::from_sibling("C")]
fn given_star_when_connected_from_any_member_then_whole_star(#[case] root: &str) {
    init_test_setup();
    let cards = star();

    let result = connected_ids(root, &cards);

    assert_eq!(result, ids(&["A", "B", "C"]));
}

#[test]
fn given_two_components_when_connected_then_other_component_excluded() {
    init_test_setup();
    let cards = pipeline_cards();

    let result = connected_ids("email_input", &cards);

    assert_eq!(
        result,
        ids(&[
            "email_col",
            "email_param",
            "email_input",
            "email_confirm",
            "email_import"
        ])
    );
    assert!(!result.contains("name_col"));
    assert!(!result.contains("draft_note"));
}

#[test]
fn given_unknown_root_when_connected_then_only_root() {
    let cards = star();

    let result = connected_ids("missing", &cards);

    assert_eq!(result, ids(&["missing"]));
}

#[test]
fn given_empty_snapshot_when_connected_then_only_root() {
    let result = connected_ids("A", &[]);

    assert_eq!(result, ids(&["A"]));
}

#[test]
fn given_cycle_when_connected_then_terminates_with_both() {
    let cards = vec![
        Card::new("A", "a", "api").linked_to("B"),
        Card::new("B", "b", "api").linked_to("A"),
    ];

    let result = connected_ids("A", &cards);

    assert_eq!(result, ids(&["A", "B"]));
}

#[test]
fn given_dangling_link_when_connected_then_missing_target_not_reported() {
    let cards = vec![
        Card::new("A", "a", "api").linked_to("ghost"),
        Card::new("B", "b", "form").linked_to("A"),
    ];

    let result = connected_ids("B", &cards);

    assert_eq!(result, ids(&["A", "B"]));
}

#[test]
fn given_same_snapshot_when_connected_twice_then_results_equal() {
    let cards = pipeline_cards();

    let first = connected_ids("name_param", &cards);
    let second = connected_ids("name_param", &cards);

    assert_eq!(first, second);
    assert_eq!(first, ids(&["name_col", "name_param"]));
}

#[test]
fn given_connected_set_when_connected_from_member_then_same_set() {
    let cards = pipeline_cards();
    let from_root = connected_ids("email_col", &cards);

    for member in &from_root {
        assert_eq!(connected_ids(member, &cards), from_root, "from {member}");
    }
}

#[test]
fn given_duplicate_id_when_connected_then_shadowed_link_ignored() {
    // Second "B" is shadowed by the first, so its link to C is not an edge
    let cards = vec![
        Card::new("A", "a", "database"),
        Card::new("B", "first", "api").linked_to("A"),
        Card::new("B", "second", "api").linked_to("C"),
        Card::new("C", "c", "database"),
    ];

    assert_eq!(connected_ids("A", &cards), ids(&["A", "B"]));
    assert_eq!(connected_ids("C", &cards), ids(&["C"]));
    for root in ["A", "B", "C"] {
        let component = connected_ids(root, &cards);
        for member in &component {
            assert_eq!(connected_ids(member, &cards), component, "from {member} via {root}");
        }
    }
}

#[test]
fn given_long_chain_when_connected_then_no_stack_overflow() {
    let mut cards = vec![Card::new("c0", "f0", "database")];
    for i in 1..20_000 {
        cards.push(Card::new(format!("c{i}"), format!("f{i}"), "api").linked_to(format!("c{}", i - 1)));
    }

    let result = connected_ids("c0", &cards);

    assert_eq!(result.len(), 20_000);
}

// ============================================================
// link_trail / cyclic_ids
// ============================================================

#[test]
fn given_form_field_when_trailing_then_reaches_database() {
    let cards = pipeline_cards();
    let graph = LinkGraph::new(&cards);

    let trail = link_trail(&graph, "email_confirm");

    let path: Vec<&str> = trail.cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(path, vec!["email_confirm", "email_param", "email_col"]);
    assert_eq!(trail.end, TrailEnd::Terminal);
}

#[test]
fn given_cycle_when_trailing_then_stops_at_repeat() {
    let cards = vec![
        Card::new("A", "a", "api").linked_to("B"),
        Card::new("B", "b", "api").linked_to("A"),
    ];
    let graph = LinkGraph::new(&cards);

    let trail = link_trail(&graph, "A");

    assert_eq!(trail.cards.len(), 2);
    assert_eq!(trail.end, TrailEnd::Cycle("A".to_string()));
}

#[test]
fn given_unknown_start_when_trailing_then_empty_and_dangling() {
    let cards = star();
    let graph = LinkGraph::new(&cards);

    let trail = link_trail(&graph, "nope");

    assert!(trail.cards.is_empty());
    assert_eq!(trail.end, TrailEnd::Dangling("nope".to_string()));
}

#[test]
fn given_cycle_with_tail_when_finding_cycles_then_only_loop_members() {
    let cards = vec![
        Card::new("tail", "t", "form").linked_to("A"),
        Card::new("A", "a", "api").linked_to("B"),
        Card::new("B", "b", "api").linked_to("A"),
        Card::new("self", "s", "api").linked_to("self"),
    ];
    let graph = LinkGraph::new(&cards);

    let cyclic = cyclic_ids(&graph);

    assert_eq!(cyclic, ids(&["A", "B", "self"]));
}

#[test]
fn given_acyclic_pipeline_when_finding_cycles_then_none() {
    let cards = pipeline_cards();

    assert!(cyclic_ids(&LinkGraph::new(&cards)).is_empty());
}
