//! Priority declarations loaded from TOML.
//!
//! A priority file overlays declarations onto an already-populated
//! registry, so deployments can reorder bootstrapping without touching
//! code:
//!
//! ```toml
//! [priorities]
//! database = 0
//! migrations = { after = "database" }
//! sanity-check = { before = "database" }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::priority::Priority;
use crate::error::{Error, Result};
use crate::mlog_debug;
use crate::registry::Registry;

/// A TOML document mapping task names to priority declarations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriorityFile {
    /// Declarations keyed by task name.
    #[serde(default)]
    pub priorities: HashMap<String, Priority>,
}

impl PriorityFile {
    /// Load a priority file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        mlog_debug!("PriorityFile::load path={}", path.display());
        let file: Self = fs::read_to_string(path)?.parse()?;
        mlog_debug!("PriorityFile loaded: {} declaration(s)", file.priorities.len());
        Ok(file)
    }

    /// Write the priority file to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Overlay these declarations onto a registry's existing entries.
    ///
    /// # Errors
    /// Returns [`Error::UnknownEntity`](crate::Error::UnknownEntity) if a
    /// key names no registered entry; nothing is applied in that case.
    pub fn apply_to<C>(&self, registry: &mut Registry<C>) -> Result<()> {
        registry.apply_priorities(&self.priorities)
    }
}

impl std::str::FromStr for PriorityFile {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
