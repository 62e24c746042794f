//! gfr - Git Flow assistant for multi-repository projects
//!
//! A root project plus its submodules ("microservices") are driven through a
//! Git Flow branching model, with GitHub holding the issues, pull requests and
//! releases of every repository.
//!
//! # Architecture
//!
//! - [`target`] resolves `.`, `-`, a submodule name or `ALL` to repositories
//! - [`repo`] wraps the `git` executable behind the [`repo::GitOps`] trait
//! - [`platform`] wraps the GitHub API behind [`platform::HostingService`]
//! - [`state`] remembers the last targeted repository in `.gfr.yml`
//! - [`workflow`] holds the orchestrators (commit, task, release, fleet, project)

pub mod auth;
pub mod error;
pub mod platform;
pub mod repo;
pub mod state;
pub mod target;
pub mod types;
pub mod workflow;
