use cfgdispatch_core::callbacks::{CallbackFailure, CallbackResult, CallbackTable};
use cfgdispatch_core::diff::{DiffNode, Operation};

/// Element type used across tests: the node's own name
pub type Elem = String;

/// Shared context: every callback appends `"<op>:<name>"`
pub type Calls = Vec<String>;

#[allow(dead_code)]
pub fn record(op: Operation, elem: &Elem, ctx: &mut Calls) -> CallbackResult {
    ctx.push(format!("{}:{}", op, elem));
    Ok(())
}

/// A node whose path is `/<name>` and whose element is `name`
#[allow(dead_code)]
pub fn node(name: &str, priority: u32) -> DiffNode<Elem> {
    DiffNode::new(format!("/{}", name), Operation::Modify, name.to_string())
        .with_priority(priority)
}

/// A structural node without priority
#[allow(dead_code)]
pub fn bare(name: &str) -> DiffNode<Elem> {
    DiffNode::new(format!("/{}", name), Operation::Modify, name.to_string())
}

/// Table with `slots` recording callbacks (priorities 1..=slots)
#[allow(dead_code)]
pub fn recording_table(slots: u32) -> CallbackTable<Elem, Calls> {
    let mut table = CallbackTable::new();
    for i in 1..=slots {
        table.register(format!("/slot{}", i), record);
    }
    table
}

/// Like [`recording_table`] but the callback at `failing` returns code 2
#[allow(dead_code)]
pub fn table_failing_at(slots: u32, failing: u32) -> CallbackTable<Elem, Calls> {
    let mut table = CallbackTable::new();
    for i in 1..=slots {
        if i == failing {
            table.register(
                format!("/slot{}", i),
                |op: Operation, elem: &Elem, ctx: &mut Calls| -> CallbackResult {
                    ctx.push(format!("{}:{}!", op, elem));
                    Err(CallbackFailure::code(2).with_message("rejected"))
                },
            );
        } else {
            table.register(format!("/slot{}", i), record);
        }
    }
    table
}
