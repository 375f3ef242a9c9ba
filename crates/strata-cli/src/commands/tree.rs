//! Handler for `strata tree`.

use miette::Result;

use strata_ops::{ops_tree, ResolveOptions};

pub fn exec(
    stack: Option<String>,
    strategies: Vec<String>,
    pins: Vec<String>,
    ignore: Vec<String>,
) -> Result<()> {
    let project_root = super::project_root()?;
    let options = ResolveOptions {
        stack,
        strategies,
        pins,
        ignore,
        json: false,
    };
    ops_tree::tree(&project_root, &options)
}
