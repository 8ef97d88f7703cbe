//! Sequential run driver.
//!
//! The executor walks an execution plan one task at a time on the caller's
//! thread. Each task receives the run's [`Controller`] and the caller's
//! context; a task fault aborts the run and is classified by its failure
//! class, preserving the original fault as the cause.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::plan::ExecutionPlan;
use crate::error::{Error, Result};
use crate::exec::controller::Controller;
use crate::registry::Registry;
use crate::{mlog, mlog_debug, mlog_error};

/// Unique identifier for one execution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new unique run identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return first 8 characters of the UUID for display.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summary of a completed (non-aborted) run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Identifier of this run.
    pub run_id: RunId,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock time the run took.
    pub duration: Duration,
    /// Names that executed, in execution order.
    pub executed: Vec<String>,
    /// Planned names that were cancelled mid-run and never executed.
    pub ignored: Vec<String>,
}

impl RunReport {
    /// Number of tasks that executed.
    pub fn executed_count(&self) -> usize {
        self.executed.len()
    }

    /// Number of planned tasks that were cancelled.
    pub fn ignored_count(&self) -> usize {
        self.ignored.len()
    }

    /// Whether `name` was cancelled during the run.
    pub fn was_ignored(&self, name: &str) -> bool {
        self.ignored.iter().any(|ignored| ignored == name)
    }
}

/// Drives one execution run over a resolved plan.
///
/// The executor borrows the registry for task lookup and owns the run's
/// controller; both share the plan's remaining sequence, so cancellations
/// made by a running task take effect on the next dequeue.
pub struct Executor<'r, C> {
    registry: &'r Registry<C>,
    plan: ExecutionPlan,
}

impl<'r, C> Executor<'r, C> {
    /// Create an executor for a resolved plan over `registry`.
    pub fn new(registry: &'r Registry<C>, plan: ExecutionPlan) -> Self {
        Self { registry, plan }
    }

    /// Run every planned task in order, skipping cancelled entries.
    ///
    /// # Errors
    /// A recoverable task fault aborts the run with [`Error::QueueFault`];
    /// a fatal fault with [`Error::FatalQueueFault`]. Both name the failing
    /// task and carry the original fault as their cause. Remaining tasks do
    /// not execute after an abort; effects of tasks that already completed
    /// persist.
    pub fn run(self, cx: &mut C) -> Result<RunReport> {
        let run_id = RunId::new();
        let started_at = Utc::now();
        let clock = Instant::now();

        let planned: Vec<String> = self.plan.names().map(str::to_string).collect();
        let mut control = Controller::new(&self.plan);
        let mut executed: Vec<String> = Vec::with_capacity(planned.len());

        mlog_debug!(
            "run {}: starting with {} planned task(s)",
            run_id.short(),
            planned.len()
        );

        while let Some(name) = control.next_pending() {
            let task = self.registry.get(&name)?;
            mlog_debug!("run {}: executing `{}`", run_id.short(), name);

            match task.run(&mut control, cx) {
                Ok(()) => executed.push(name),
                Err(fault) => {
                    mlog_error!(
                        "run {}: task `{}` raised a {} fault: {}",
                        run_id.short(),
                        name,
                        if fault.is_fatal() { "fatal" } else { "recoverable" },
                        fault
                    );
                    return Err(if fault.is_fatal() {
                        Error::FatalQueueFault { task: name, source: fault }
                    } else {
                        Error::QueueFault { task: name, source: fault }
                    });
                }
            }
        }

        let ignored: Vec<String> = planned
            .into_iter()
            .filter(|name| !executed.contains(name))
            .collect();

        mlog!(
            "run {}: completed, {} executed, {} ignored",
            run_id.short(),
            executed.len(),
            ignored.len()
        );

        Ok(RunReport {
            run_id,
            started_at,
            duration: clock.elapsed(),
            executed,
            ignored,
        })
    }
}
