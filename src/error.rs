use thiserror::Error;

use crate::core::task::Fault;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Entry `{name}` points to an unavailable entry `{target}`")]
    UnresolvableReference { name: String, target: String },

    #[error("Entry `{name}` points to itself, self-recursion detected")]
    SelfRecursion { name: String },

    #[error("Entries `{first}` and `{second}` point at each other, recursion detected")]
    DirectRecursion { first: String, second: String },

    #[error("Priority cycle detected: {}", .names.join(" -> "))]
    PriorityCycle { names: Vec<String> },

    #[error("Task `{task}` execution failed")]
    QueueFault {
        task: String,
        #[source]
        source: Fault,
    },

    #[error("Task `{task}` ended in fatal state")]
    FatalQueueFault {
        task: String,
        #[source]
        source: Fault,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
