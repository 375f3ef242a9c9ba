//! VCS hosting boundary: the [`host::VcsHost`] trait the resolution engine
//! talks to, the remote project metadata model, and a GitHub REST
//! implementation.

pub mod github;
pub mod host;
pub mod remote;
