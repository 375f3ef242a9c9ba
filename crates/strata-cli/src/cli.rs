//! CLI argument definitions for Strata.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "strata",
    version,
    about = "Resolve declarative package dependency trees into ordered install lists",
    long_about = "Strata resolves a project's declared dependencies - managed package \
                  versions and dynamic repository references - into a deterministic, \
                  ordered, deduplicated list of installable units."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve dependencies into an ordered install list
    Resolve {
        /// Named resolution stack (built-in or from strata.toml)
        #[arg(long)]
        stack: Option<String>,
        /// Explicit resolution strategy, repeatable, tried in order
        #[arg(long = "strategy")]
        strategies: Vec<String>,
        /// Pin a repository to an exact tag (URL=TAG)
        #[arg(long = "pin")]
        pins: Vec<String>,
        /// Ignore a dependency by package namespace or repository URL
        #[arg(long = "ignore")]
        ignore: Vec<String>,
        /// Emit the resolved list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print how each dependency expands into installable units
    Tree {
        /// Named resolution stack (built-in or from strata.toml)
        #[arg(long)]
        stack: Option<String>,
        /// Explicit resolution strategy, repeatable, tried in order
        #[arg(long = "strategy")]
        strategies: Vec<String>,
        /// Pin a repository to an exact tag (URL=TAG)
        #[arg(long = "pin")]
        pins: Vec<String>,
        /// Ignore a dependency by package namespace or repository URL
        #[arg(long = "ignore")]
        ignore: Vec<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
