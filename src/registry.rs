//! Keyed task registry and run entry point.
//!
//! The registry is a plain insertion-ordered store from task name to
//! (callable, priority declaration). All ordering intelligence lives in
//! [`crate::core::plan`]; the registry only snapshots its declarations,
//! resolves them into a plan, and hands the plan to an executor.

use std::collections::HashMap;

use crate::core::plan::ExecutionPlan;
use crate::core::priority::Priority;
use crate::core::task::{BoxedTask, Task};
use crate::error::{Error, Result};
use crate::exec::executor::{Executor, RunReport};
use crate::mlog_debug;
use crate::provider::Provider;

struct Entry<C> {
    task: BoxedTask<C>,
    priority: Priority,
}

/// Insertion-ordered registry of named tasks.
///
/// `C` is the caller's run context, passed mutably to every task; the
/// registry treats it as opaque. Attaching an existing name silently
/// replaces its entry while keeping the name's original position.
///
/// ```
/// use muster::{Controller, Priority, Registry, TaskResult};
///
/// let mut registry: Registry<String> = Registry::new();
/// registry.attach(
///     "database",
///     |_control: &mut Controller, out: &mut String| -> TaskResult {
///         out.push_str("db ");
///         Ok(())
///     },
/// );
/// registry.attach_with_priority(
///     "migrations",
///     Priority::after("database"),
///     |_control: &mut Controller, out: &mut String| -> TaskResult {
///         out.push_str("migrations");
///         Ok(())
///     },
/// );
///
/// let mut out = String::new();
/// registry.execute(&mut out)?;
/// assert_eq!(out, "db migrations");
/// # Ok::<(), muster::Error>(())
/// ```
pub struct Registry<C = ()> {
    items: HashMap<String, Entry<C>>,
    order: Vec<String>,
}

impl<C> Registry<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Attach a task under `name` with the default priority (rank 0).
    pub fn attach(&mut self, name: impl Into<String>, task: impl Task<C> + 'static) {
        self.attach_with_priority(name, Priority::default(), task);
    }

    /// Attach a task under `name` with an explicit priority declaration.
    ///
    /// An existing entry under the same name is overwritten without notice,
    /// keeping its insertion position.
    pub fn attach_with_priority(
        &mut self,
        name: impl Into<String>,
        priority: Priority,
        task: impl Task<C> + 'static,
    ) {
        self.insert(name.into(), priority, Box::new(task));
    }

    fn insert(&mut self, name: String, priority: Priority, task: BoxedTask<C>) {
        if !self.items.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.items.insert(name, Entry { task, priority });
    }

    /// Remove `name` from the registry. Returns whether an entry existed.
    pub fn detach(&mut self, name: &str) -> bool {
        if self.items.remove(name).is_some() {
            self.order.retain(|existing| existing != name);
            true
        } else {
            false
        }
    }

    /// Whether `name` is registered.
    pub fn has(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Fetch the task registered under `name`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownEntity`] if no entry exists.
    pub fn get(&self, name: &str) -> Result<&dyn Task<C>> {
        self.items
            .get(name)
            .map(|entry| entry.task.as_ref())
            .ok_or_else(|| Error::UnknownEntity(name.to_string()))
    }

    /// The priority declaration of `name`, if registered.
    pub fn priority(&self, name: &str) -> Option<&Priority> {
        self.items.get(name).map(|entry| &entry.priority)
    }

    /// Registered names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Merge a provider's entity map and priority map into the registry.
    ///
    /// Entities without a priority-map entry get the default declaration.
    pub fn register<P: Provider<C>>(&mut self, provider: P) {
        let priorities = provider.priorities();
        for (name, task) in provider.entities() {
            let priority = priorities.get(&name).cloned().unwrap_or_default();
            mlog_debug!("registering provided entity `{}` ({})", name, priority);
            self.insert(name, priority, task);
        }
    }

    /// Overlay priority declarations onto existing entries.
    ///
    /// # Errors
    /// Returns [`Error::UnknownEntity`] if a key names no registered entry;
    /// in that case no declaration is applied.
    pub fn apply_priorities(&mut self, priorities: &HashMap<String, Priority>) -> Result<()> {
        for name in priorities.keys() {
            if !self.items.contains_key(name) {
                return Err(Error::UnknownEntity(name.clone()));
            }
        }
        for (name, priority) in priorities {
            if let Some(entry) = self.items.get_mut(name) {
                entry.priority = priority.clone();
            }
        }
        Ok(())
    }

    /// Resolve the current declarations into an execution plan without
    /// running anything.
    ///
    /// # Errors
    /// Propagates resolution failures; see [`ExecutionPlan::resolve`].
    pub fn plan(&self) -> Result<ExecutionPlan> {
        ExecutionPlan::resolve(&self.snapshot())
    }

    /// Resolve and execute every registered task in priority order.
    ///
    /// The registry is borrowed for the whole run, so it cannot be mutated
    /// while tasks execute. Resolution failures abort before any task runs;
    /// task faults abort the remaining plan and are reported as queue
    /// faults with the original fault preserved as cause.
    pub fn execute(&self, cx: &mut C) -> Result<RunReport> {
        let plan = self.plan()?;
        Executor::new(self, plan).run(cx)
    }

    fn snapshot(&self) -> Vec<(String, Priority)> {
        self.order
            .iter()
            .filter_map(|name| {
                self.items
                    .get(name)
                    .map(|entry| (name.clone(), entry.priority.clone()))
            })
            .collect()
    }
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.order)
            .finish()
    }
}
