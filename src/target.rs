//! Target selection
//!
//! Commands take a selector as their first argument: `.` for the root
//! project, `-` for the last used target, or a submodule path. A few
//! commands also accept `ALL` for every repository in the project.

use crate::error::{Error, Result};
use crate::types::{ROOT_PATH, RepositoryHandle};
use std::fmt;

/// Sentinel accepted by fleet-capable commands
pub const ALL_SENTINEL: &str = "ALL";

/// Selector for a single repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `.`
    Root,
    /// `-`
    LastUsed,
    /// A submodule path
    Named(String),
}

impl Selector {
    /// Parse a raw selector argument
    pub fn parse(raw: &str) -> Self {
        match raw {
            ROOT_PATH => Self::Root,
            "-" => Self::LastUsed,
            other => Self::Named(other.to_string()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str(ROOT_PATH),
            Self::LastUsed => f.write_str("-"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Selector for commands that can also act on every repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// One repository
    One(Selector),
    /// Every submodule, then the root project
    AllRepositories,
}

impl Target {
    /// Parse a raw argument, recognizing the `ALL` sentinel
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_SENTINEL {
            Self::AllRepositories
        } else {
            Self::One(Selector::parse(raw))
        }
    }
}

/// Repository layout of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    /// Remote repository name of the root project (basename of the git root)
    pub root_name: String,
    /// Submodule paths, in `.gitmodules` order
    pub submodules: Vec<String>,
}

impl Topology {
    /// Handle for the root project
    pub fn root(&self) -> RepositoryHandle {
        RepositoryHandle::root(self.root_name.clone())
    }

    /// Root first, then every submodule
    pub fn root_first(&self) -> Vec<RepositoryHandle> {
        std::iter::once(self.root())
            .chain(self.submodules.iter().map(RepositoryHandle::submodule))
            .collect()
    }

    /// Every submodule, then the root
    pub fn root_last(&self) -> Vec<RepositoryHandle> {
        self.submodules
            .iter()
            .map(RepositoryHandle::submodule)
            .chain(std::iter::once(self.root()))
            .collect()
    }
}

/// Resolve a selector against the project topology and the persisted last target
///
/// Pure: performs no I/O. A stored last target is resolved as a literal, so a
/// stored `-` never chains.
pub fn resolve(
    selector: &Selector,
    topology: &Topology,
    last_used: Option<&str>,
) -> Result<RepositoryHandle> {
    match selector {
        Selector::Root => Ok(topology.root()),
        Selector::LastUsed => {
            let stored = last_used
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or(Error::NoLastUsedTarget)?;
            if stored == ROOT_PATH {
                Ok(topology.root())
            } else {
                resolve_named(stored, topology)
            }
        }
        Selector::Named(name) => resolve_named(name, topology),
    }
}

fn resolve_named(name: &str, topology: &Topology) -> Result<RepositoryHandle> {
    if topology.submodules.iter().any(|s| s == name) {
        Ok(RepositoryHandle::submodule(name))
    } else {
        Err(Error::UnknownSubmodule(name.to_string()))
    }
}
