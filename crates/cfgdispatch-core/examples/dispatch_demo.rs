//! Dispatch Demonstration
//!
//! Walks an interfaces change through the event handler.
#![allow(clippy::unwrap_used, clippy::expect_used)]
//!
//! Key concepts illustrated:
//! 1. Registration order is priority order
//! 2. Children are dispatched before their parent
//! 3. A single root walk leaves higher-priority siblings pending
//! 4. Fail-fast dispatch

use cfgdispatch_core::callbacks::{CallbackFailure, CallbackResult, CallbackTable};
use cfgdispatch_core::diff::{
    render_tree_summary, DiffNode, DiffSource, DiffTree, NamespaceMap, Operation,
};
use cfgdispatch_core::{ChangeHandler, DispatchConfig, PassPolicy};

/// Pretends the documents were diffed into a fixed interfaces change
struct InterfacesChange;

impl DiffSource for InterfacesChange {
    type Document = ();
    type Model = ();
    type Element = &'static str;

    fn diff(
        &self,
        _old: &(),
        _new: &(),
        _model: &(),
        _namespaces: &NamespaceMap,
    ) -> cfgdispatch_core::Result<Option<DiffTree<&'static str>>> {
        Ok(Some(DiffTree::from_entries(vec![
            DiffNode::new("/interfaces", Operation::Modify, "interfaces")
                .with_child(DiffNode::new("/interfaces/eth0", Operation::Add, "eth0"))
                .with_child(DiffNode::new("/interfaces/eth1", Operation::Remove, "eth1")),
            DiffNode::new("/system/hostname", Operation::Modify, "hostname"),
        ])))
    }
}

fn print_change(op: Operation, elem: &&'static str, seen: &mut Vec<String>) -> CallbackResult {
    println!("  callback: {} {}", op, elem);
    seen.push(elem.to_string());
    Ok(())
}

fn table() -> CallbackTable<&'static str, Vec<String>> {
    CallbackTable::new()
        .with("/interfaces/eth0", print_change)
        .with("/interfaces/eth1", print_change)
        .with("/interfaces", print_change)
        .with("/system/hostname", print_change)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== cfgdispatch Demo ===\n");

    // ===== Part 1: The tree as handed over by the diff source =====
    println!("## Part 1: Diff tree\n");
    let tree = InterfacesChange
        .diff(&(), &(), &(), &NamespaceMap::new())?
        .expect("demo diff is never empty");
    print!("{}", render_tree_summary(&tree));

    // ===== Part 2: One root walk =====
    println!("\n## Part 2: Single pass\n");
    let handler = ChangeHandler::new(InterfacesChange, table());
    let mut seen = Vec::new();
    let outcome = handler.on_configuration_changed(&(), &(), &(), &mut seen)?;
    println!("  outcome: {:?}", outcome);
    println!("  eth1 and hostname are still pending after one walk");

    // ===== Part 3: Walk until the top level settles =====
    println!("\n## Part 3: Until settled\n");
    let config = DispatchConfig {
        passes: PassPolicy::UntilSettled,
        ..DispatchConfig::default()
    };
    let handler = ChangeHandler::new(InterfacesChange, table()).with_config(&config);
    let mut seen = Vec::new();
    let outcome = handler.on_configuration_changed(&(), &(), &(), &mut seen)?;
    println!("  outcome: {:?}", outcome);

    // ===== Part 4: Fail-fast =====
    println!("\n## Part 4: Failing callback\n");
    let failing = CallbackTable::new()
        .with("/interfaces/eth0", print_change)
        .with("/interfaces/eth1", print_change)
        .with("/interfaces", print_change)
        .with(
            "/system/hostname",
            |_: Operation, _: &&'static str, _: &mut Vec<String>| -> CallbackResult {
                Err(CallbackFailure::code(16).with_message("resolver busy"))
            },
        );
    let handler = ChangeHandler::new(InterfacesChange, failing).with_config(&config);
    let mut seen = Vec::new();
    match handler.on_configuration_changed(&(), &(), &(), &mut seen) {
        Ok(outcome) => println!("  unexpected success: {:?}", outcome),
        Err(e) => println!("  ✗ {} (already applied: {:?})", e, seen),
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
