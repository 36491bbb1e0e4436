//! Dispatch command
//!
//! Usage: cfgdispatch dispatch <TREE_JSON> --config <TOML> [--fail-on <PATH>]
//! [--passes single|until-settled]
//!
//! Every path declared in the config file gets a callback that prints one
//! line per invocation (`<op> <path>`). The captured tree is replayed as the
//! result of a diff, so the run goes through the same event handling as an
//! embedded application.

use super::{load_tree, JsonElement};
use cfgdispatch_core::callbacks::{CallbackFailure, CallbackResult, CallbackTable};
use cfgdispatch_core::diff::{DiffSource, DiffTree, NamespaceMap, Operation};
use cfgdispatch_core::logging_facility;
use cfgdispatch_core::{ChangeHandler, ChangeOutcome, DispatchConfig, PassPolicy};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DispatchArgs {
    /// Diff tree captured as JSON
    pub tree: PathBuf,

    /// Dispatch configuration (TOML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Make the callback registered for this path fail with code 1
    #[arg(long)]
    pub fail_on: Option<String>,

    /// Override the pass policy from the config file
    #[arg(long)]
    pub passes: Option<PassPolicy>,
}

/// Diff source that hands back a tree captured earlier
struct CapturedDiff {
    tree: DiffTree<JsonElement>,
}

impl DiffSource for CapturedDiff {
    type Document = ();
    type Model = ();
    type Element = JsonElement;

    fn diff(
        &self,
        _old: &(),
        _new: &(),
        _model: &(),
        _namespaces: &NamespaceMap,
    ) -> cfgdispatch_core::Result<Option<DiffTree<JsonElement>>> {
        Ok(Some(self.tree.clone()))
    }
}

/// Execute dispatch command
pub fn execute(args: DispatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = DispatchConfig::load(&args.config)?;
    if let Some(passes) = args.passes {
        config.passes = passes;
    }
    logging_facility::init(config.log_profile);

    if config.callbacks.is_empty() {
        return Err(format!("{} declares no callbacks", args.config.display()).into());
    }

    let tree = load_tree(&args.tree)?;

    let mut table: CallbackTable<JsonElement, Vec<String>> = CallbackTable::new();
    for spec in &config.callbacks {
        let path = spec.path.clone();
        let fails = args.fail_on.as_deref() == Some(path.as_str());
        table.register(
            spec.path.clone(),
            move |op: Operation, _element: &JsonElement, seen: &mut Vec<String>| -> CallbackResult {
                let line = format!("{} {}", op, path);
                println!("{}", line);
                seen.push(line);
                if fails {
                    return Err(CallbackFailure::code(1).with_message("failure requested"));
                }
                Ok(())
            },
        );
    }

    let handler = ChangeHandler::new(CapturedDiff { tree }, table).with_config(&config);
    let mut seen = Vec::new();

    match handler.on_configuration_changed(&(), &(), &(), &mut seen)? {
        ChangeOutcome::NothingChanged => println!("nothing changed"),
        ChangeOutcome::NoCallbackFound => println!("no callback found"),
        ChangeOutcome::Dispatched(report) => println!(
            "dispatched {} callback(s) in {} pass(es)",
            report.callbacks, report.passes
        ),
    }

    Ok(())
}
