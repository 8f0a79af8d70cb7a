//! The closed enumeration of indexable record types.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The type of an indexed record.
///
/// This is a closed set: collaborators cannot invent new kinds at runtime,
/// which keeps aggregation buckets and scoring bonuses exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// An interactive session transcript.
    Session,
    /// A workspace grouping related records.
    Workspace,
    /// A reusable template.
    Template,
    /// A third-party integration.
    Integration,
    /// A file summary.
    File,
    /// A log excerpt.
    Log,
    /// A saved checkpoint.
    Checkpoint,
    /// An instruction document.
    Instruction,
    /// A stored computation result.
    Result,
}

impl EntityKind {
    /// All kinds, in stable order. Used to keep aggregation output exhaustive.
    pub const ALL: [Self; 9] = [
        Self::Session,
        Self::Workspace,
        Self::Template,
        Self::Integration,
        Self::File,
        Self::Log,
        Self::Checkpoint,
        Self::Instruction,
        Self::Result,
    ];

    /// Returns the lowercase name used in serialization and CLI filters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Workspace => "workspace",
            Self::Template => "template",
            Self::Integration => "integration",
            Self::File => "file",
            Self::Log => "log",
            Self::Checkpoint => "checkpoint",
            Self::Instruction => "instruction",
            Self::Result => "result",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown kind name.
#[derive(Debug, Error)]
#[error("unknown entity kind: {0}")]
pub struct ParseKindError(pub String);

impl FromStr for EntityKind {
    type Err = ParseKindError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().as_str() {
            "session" => Ok(Self::Session),
            "workspace" => Ok(Self::Workspace),
            "template" => Ok(Self::Template),
            "integration" => Ok(Self::Integration),
            "file" => Ok(Self::File),
            "log" => Ok(Self::Log),
            "checkpoint" => Ok(Self::Checkpoint),
            "instruction" => Ok(Self::Instruction),
            "result" => Ok(Self::Result),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}
