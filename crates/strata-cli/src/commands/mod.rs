//! Command dispatch and handler modules.

mod resolve;
mod tree;

use std::path::PathBuf;

use miette::Result;
use strata_core::project::PROJECT_FILE;
use strata_util::errors::StrataError;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve {
            stack,
            strategies,
            pins,
            ignore,
            json,
        } => resolve::exec(stack, strategies, pins, ignore, json),
        Command::Tree {
            stack,
            strategies,
            pins,
            ignore,
        } => tree::exec(stack, strategies, pins, ignore),
    }
}

/// Locate the project root by walking up from the current directory.
pub(crate) fn project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(StrataError::Io)?;
    strata_util::fs::find_ancestor_with(&cwd, PROJECT_FILE).ok_or_else(|| {
        StrataError::Config {
            message: format!("No {PROJECT_FILE} found in the current directory or any parent"),
        }
        .into()
    })
}
