//! Callable task units and their failure classes.
//!
//! A task is anything invocable with the run's [`Controller`] and the
//! caller-supplied context. Tasks signal failure through [`Fault`], which
//! distinguishes recoverable logic mistakes from fatal runtime conditions;
//! the executor classifies a run abort accordingly.

use crate::error::Error;
use crate::exec::Controller;

/// Outcome of a single task invocation.
pub type TaskResult = std::result::Result<(), Fault>;

/// Failure raised by a task's callable.
///
/// The two classes decide how the run abort is reported: a recoverable
/// fault becomes a queue fault (caller/logic mistake), a fatal fault becomes
/// a fatal queue fault (unrecoverable runtime condition). Either may wrap an
/// underlying cause, which is preserved through the abort for diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum Fault {
    /// A caller or logic mistake; the run aborts but the condition is
    /// considered salvageable.
    #[error("{message}")]
    Recoverable {
        /// Human-readable description of the mistake.
        message: String,
        /// Underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + 'static>>,
    },
    /// An unrecoverable runtime condition; callers should not retry without
    /// external intervention.
    #[error("{message}")]
    Fatal {
        /// Human-readable description of the condition.
        message: String,
        /// Underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + 'static>>,
    },
}

impl Fault {
    /// Recoverable fault with the given message.
    pub fn recoverable(message: impl Into<String>) -> Self {
        Self::Recoverable {
            message: message.into(),
            source: None,
        }
    }

    /// Fatal fault with the given message.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
            source: None,
        }
    }

    /// Attach an underlying cause to this fault.
    pub fn with_source(self, source: impl std::error::Error + 'static) -> Self {
        match self {
            Self::Recoverable { message, .. } => Self::Recoverable {
                message,
                source: Some(Box::new(source)),
            },
            Self::Fatal { message, .. } => Self::Fatal {
                message,
                source: Some(Box::new(source)),
            },
        }
    }

    /// Whether this fault is of the fatal class.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }

    /// The fault's message.
    pub fn message(&self) -> &str {
        match self {
            Self::Recoverable { message, .. } | Self::Fatal { message, .. } => message,
        }
    }
}

/// Controller errors surfaced to a running task classify as the recoverable
/// family when propagated unhandled.
impl From<Error> for Fault {
    fn from(err: Error) -> Self {
        Self::Recoverable {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// A named, registered callable unit executed in priority order.
///
/// Implementations receive the run's [`Controller`] (for cancelling or
/// querying not-yet-executed entries) and a mutable reference to the
/// caller's context, which the core passes through opaquely.
///
/// Any closure of the matching shape is a task:
///
/// ```
/// use muster::{Controller, Registry, TaskResult};
///
/// let mut registry: Registry<Vec<String>> = Registry::new();
/// registry.attach(
///     "greet",
///     |_control: &mut Controller, log: &mut Vec<String>| -> TaskResult {
///         log.push("hello".to_string());
///         Ok(())
///     },
/// );
/// ```
pub trait Task<C> {
    /// Execute the unit.
    fn run(&self, control: &mut Controller, cx: &mut C) -> TaskResult;
}

impl<C, F> Task<C> for F
where
    F: Fn(&mut Controller, &mut C) -> TaskResult,
{
    fn run(&self, control: &mut Controller, cx: &mut C) -> TaskResult {
        self(control, cx)
    }
}

/// Owned, dynamically dispatched task as stored in the registry.
pub type BoxedTask<C> = Box<dyn Task<C>>;
