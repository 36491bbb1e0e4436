//! Show command
//!
//! Usage: cfgdispatch show <TREE_JSON> [--config <TOML>]

use super::{load_tree, JsonElement};
use cfgdispatch_core::callbacks::{CallbackResult, CallbackTable};
use cfgdispatch_core::diff::{render_tree_summary, Operation};
use cfgdispatch_core::errors::DispatchError;
use cfgdispatch_core::priority::{PathPriorityAssigner, PriorityAssigner};
use cfgdispatch_core::rules::validation::validate_tree;
use cfgdispatch_core::DispatchConfig;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Diff tree captured as JSON
    pub tree: PathBuf,

    /// Preview the priorities the callbacks in this config file would attach
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn preview_noop(_: Operation, _: &JsonElement, _: &mut ()) -> CallbackResult {
    Ok(())
}

/// Execute show command
pub fn execute(args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut tree = load_tree(&args.tree)?;
    validate_tree(&tree)?;

    if let Some(config_path) = args.config {
        let config = DispatchConfig::load(&config_path)?;
        let mut table = CallbackTable::new();
        for spec in &config.callbacks {
            table.register(spec.path.clone(), preview_noop);
        }
        match PathPriorityAssigner.assign(&mut tree, &table) {
            Ok(_) | Err(DispatchError::NoCallbackFound) => {}
            Err(e) => return Err(e.into()),
        }
    }

    print!("{}", render_tree_summary(&tree));
    Ok(())
}
