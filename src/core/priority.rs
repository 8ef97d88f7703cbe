//! Priority declarations for registered tasks.
//!
//! Every registry entry carries exactly one declaration: an absolute rank,
//! or a directive relative to another entry (`before`/`after`). Relative
//! declarations are reduced to absolute ranks during plan resolution.

use serde::{Deserialize, Serialize};

/// Absolute rank value a declaration resolves to. Lower ranks run first.
pub type Rank = i64;

/// Priority declaration attached to a registry entry.
///
/// The serialized form is untagged: a bare integer for an absolute rank, or
/// a one-key table naming the direction and target:
///
/// ```toml
/// database = 0
/// migrations = { after = "database" }
/// sanity-check = { before = "database" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Priority {
    /// Fixed rank; never altered by resolution.
    Absolute(Rank),
    /// Run strictly before the named entry.
    Before {
        /// Name of the entry this one must precede.
        before: String,
    },
    /// Run strictly after the named entry.
    After {
        /// Name of the entry this one must follow.
        after: String,
    },
}

impl Priority {
    /// Declaration with a fixed rank.
    pub fn absolute(rank: Rank) -> Self {
        Self::Absolute(rank)
    }

    /// Declaration relative to `target`, running before it.
    pub fn before(target: impl Into<String>) -> Self {
        Self::Before {
            before: target.into(),
        }
    }

    /// Declaration relative to `target`, running after it.
    pub fn after(target: impl Into<String>) -> Self {
        Self::After {
            after: target.into(),
        }
    }

    /// Whether this declaration is already an absolute rank.
    pub fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute(_))
    }

    /// Whether this declaration is relative to another entry.
    pub fn is_relative(&self) -> bool {
        !self.is_absolute()
    }

    /// The name this declaration points at, if relative.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Absolute(_) => None,
            Self::Before { before } => Some(before),
            Self::After { after } => Some(after),
        }
    }

    /// The rank carried by an absolute declaration.
    pub fn rank(&self) -> Option<Rank> {
        match self {
            Self::Absolute(rank) => Some(*rank),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Absolute(0)
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Absolute(rank) => write!(f, "{}", rank),
            Priority::Before { before } => write!(f, "before `{}`", before),
            Priority::After { after } => write!(f, "after `{}`", after),
        }
    }
}
