//! Per-project state file
//!
//! `.gfr.yml` at the project root remembers the last targeted repository so
//! that `-` can stand in for it. The document is loaded on first access,
//! mutated in memory and rewritten whole after each change. Keys this tool
//! does not know about are carried through the rewrite untouched.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the state document
pub const STATE_FILE_NAME: &str = ".gfr.yml";

/// Contents of the state document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    /// Concrete selector (`.` or a submodule path) of the last target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_microservice: Option<String>,

    /// Any other keys found in the file
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// Lazily loaded, write-through store for [`StateDocument`]
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    document: Option<StateDocument>,
}

impl StateStore {
    /// Store for the project rooted at `root`
    pub fn for_root(root: &Path) -> Self {
        Self::at(root.join(STATE_FILE_NAME))
    }

    /// Store backed by an explicit file
    pub const fn at(path: PathBuf) -> Self {
        Self {
            path,
            document: None,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn document(&mut self) -> Result<&mut StateDocument> {
        if self.document.is_none() {
            let document = if self.path.exists() {
                let raw = fs::read_to_string(&self.path)?;
                if raw.trim().is_empty() {
                    StateDocument::default()
                } else {
                    serde_yaml::from_str(&raw)?
                }
            } else {
                StateDocument::default()
            };
            debug!("Loaded state from {}", self.path.display());
            self.document = Some(document);
        }
        Ok(self.document.get_or_insert_with(StateDocument::default))
    }

    /// The stored last target, if any
    pub fn last_used(&mut self) -> Result<Option<String>> {
        Ok(self.document()?.last_used_microservice.clone())
    }

    /// Record the last target and rewrite the file
    pub fn set_last_used(&mut self, selector: &str) -> Result<()> {
        self.document()?.last_used_microservice = Some(selector.to_string());
        self.save()
    }

    fn save(&mut self) -> Result<()> {
        let path = self.path.clone();
        let raw = serde_yaml::to_string(self.document()?)?;
        fs::write(&path, raw)?;
        debug!("Wrote state to {}", path.display());
        Ok(())
    }
}
