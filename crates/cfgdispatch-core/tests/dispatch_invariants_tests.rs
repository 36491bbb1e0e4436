#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use cfgdispatch_core::diff::{DiffNode, DiffTree, Operation};
use cfgdispatch_core::dispatch::{apply_root, dispatch};
use cfgdispatch_core::PassPolicy;
use common::{recording_table, Calls, Elem};
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
struct Shape {
    priority: u32,
    children: Vec<Shape>,
}

fn shape(max_priority: u32) -> impl Strategy<Value = Shape> {
    let leaf = (0..=max_priority).prop_map(|priority| Shape {
        priority,
        children: Vec::new(),
    });
    leaf.prop_recursive(4, 48, 4, move |inner| {
        (0..=max_priority, prop::collection::vec(inner, 0..4))
            .prop_map(|(priority, children)| Shape { priority, children })
    })
}

fn forest(max_priority: u32) -> impl Strategy<Value = Vec<Shape>> {
    prop::collection::vec(shape(max_priority), 0..5)
}

/// Build a tree with unique node names n1, n2, ... in pre-order
fn build(shapes: &[Shape]) -> DiffTree<Elem> {
    fn build_node(shape: &Shape, counter: &mut usize) -> DiffNode<Elem> {
        *counter += 1;
        let name = format!("n{}", counter);
        let children: Vec<_> = shape
            .children
            .iter()
            .map(|child| build_node(child, counter))
            .collect();
        DiffNode::new(format!("/{}", name), Operation::Modify, name)
            .with_priority(shape.priority)
            .with_children(children)
    }

    let mut counter = 0;
    DiffTree::from_entries(shapes.iter().map(|s| build_node(s, &mut counter)).collect())
}

fn dispatched_names(tree: &DiffTree<Elem>) -> HashSet<String> {
    let mut out = HashSet::new();
    tree.visit(&mut |node| {
        if node.is_applied() && node.dispatch_priority().is_some() {
            out.insert(node.element.clone());
        }
    });
    out
}

proptest! {
    #[test]
    fn prop_no_priority_means_no_callbacks(shapes in forest(0)) {
        let mut tree = build(&shapes);
        let mut calls = Calls::new();

        let report = dispatch(&mut tree, &recording_table(3), &mut calls, PassPolicy::UntilSettled)
            .unwrap();

        prop_assert_eq!(report.callbacks, 0);
        prop_assert!(calls.is_empty());
    }

    #[test]
    fn prop_each_node_dispatched_at_most_once(shapes in forest(3), extra_passes in 0usize..4) {
        let mut tree = build(&shapes);
        let table = recording_table(3);
        let mut calls = Calls::new();

        let report = dispatch(&mut tree, &table, &mut calls, PassPolicy::UntilSettled).unwrap();
        let mut total = report.callbacks;
        for _ in 0..extra_passes {
            total += apply_root(&mut tree, &table, &mut calls).unwrap();
        }

        let names: Vec<String> = calls
            .iter()
            .map(|c| c.trim_start_matches("modify:").to_string())
            .collect();
        let unique: HashSet<String> = names.iter().cloned().collect();

        prop_assert_eq!(names.len(), unique.len(), "a node was dispatched twice: {:?}", names);
        prop_assert_eq!(total, names.len());
        // Every dispatched node is applied, and every applied prioritised node was dispatched
        prop_assert_eq!(unique, dispatched_names(&tree));
    }

    #[test]
    fn prop_until_settled_clears_top_level(shapes in forest(3)) {
        let mut tree = build(&shapes);
        let mut calls = Calls::new();

        dispatch(&mut tree, &recording_table(3), &mut calls, PassPolicy::UntilSettled).unwrap();

        prop_assert!(!tree.has_pending_entry());
    }

    #[test]
    fn prop_parent_dispatched_after_its_picked_child(shapes in forest(3)) {
        let mut tree = build(&shapes);
        let mut calls = Calls::new();

        dispatch(&mut tree, &recording_table(3), &mut calls, PassPolicy::UntilSettled).unwrap();

        let position = |name: &str| calls.iter().position(|c| c == &format!("modify:{}", name));
        let mut violations = Vec::new();
        tree.visit(&mut |node| {
            if let Some(parent_at) = position(&node.element) {
                for child in node.children() {
                    if let Some(child_at) = position(&child.element) {
                        if child_at > parent_at {
                            violations.push((node.element.clone(), child.element.clone()));
                        }
                    }
                }
            }
        });
        prop_assert!(violations.is_empty(), "children after parent: {:?}", violations);
    }
}
