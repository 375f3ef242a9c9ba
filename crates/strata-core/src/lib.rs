//! Core data types for the Strata dependency tool.
//!
//! This crate defines the fundamental types that represent a Strata project:
//! the dependency model (dynamic repository references and static installable
//! units), raw dependency-spec parsing, package version ordering, project
//! configuration, branch-name conventions, and the target-environment
//! installation contract.
//!
//! This crate is intentionally free of network I/O.

pub mod dependency;
pub mod git;
pub mod project;
pub mod spec;
pub mod target;
pub mod version;
