//! muster — a priority-ordered task registry.
//!
//! Named callable units are attached with absolute or relative
//! (`before`/`after`) priority declarations, resolved into a single
//! execution plan, and run sequentially on the caller's thread. Each
//! running task receives a [`Controller`] through which it can cancel
//! not-yet-executed entries or query what is still pending.
//!
//! ```
//! use muster::{Controller, Priority, Registry, TaskResult};
//!
//! let mut registry: Registry<String> = Registry::new();
//! registry.attach(
//!     "greet",
//!     |_control: &mut Controller, out: &mut String| -> TaskResult {
//!         out.push_str("hello");
//!         Ok(())
//!     },
//! );
//! registry.attach_with_priority(
//!     "punctuate",
//!     Priority::after("greet"),
//!     |_control: &mut Controller, out: &mut String| -> TaskResult {
//!         out.push('!');
//!         Ok(())
//!     },
//! );
//!
//! let mut out = String::new();
//! registry.execute(&mut out)?;
//! assert_eq!(out, "hello!");
//! # Ok::<(), muster::Error>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod exec;
pub mod log;
pub mod provider;
pub mod registry;

pub use crate::config::PriorityFile;
pub use crate::core::plan::{ExecutionPlan, PlanEntry};
pub use crate::core::priority::{Priority, Rank};
pub use crate::core::task::{BoxedTask, Fault, Task, TaskResult};
pub use crate::error::{Error, Result};
pub use crate::exec::controller::Controller;
pub use crate::exec::executor::{Executor, RunId, RunReport};
pub use crate::provider::Provider;
pub use crate::registry::Registry;
