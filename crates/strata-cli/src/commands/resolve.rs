//! Handler for `strata resolve`.

use miette::Result;

use strata_ops::{ops_resolve, ResolveOptions};

pub fn exec(
    stack: Option<String>,
    strategies: Vec<String>,
    pins: Vec<String>,
    ignore: Vec<String>,
    json: bool,
) -> Result<()> {
    let project_root = super::project_root()?;
    let options = ResolveOptions {
        stack,
        strategies,
        pins,
        ignore,
        json,
    };
    ops_resolve::resolve(&project_root, &options)
}
