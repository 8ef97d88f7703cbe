//! Bulk registration of task entities.
//!
//! A provider supplies an entity map (name → callable) and a priority map
//! (name → declaration); [`Registry::register`](crate::Registry::register)
//! merges both before a run. The ordering kernel never calls providers
//! itself.

use std::collections::HashMap;

use crate::core::priority::Priority;
use crate::core::task::BoxedTask;

/// Source of pre-built task entities and their priority declarations.
///
/// ```
/// use std::collections::HashMap;
/// use muster::{BoxedTask, Priority, Provider, Registry, TaskResult};
///
/// struct Bootstrap;
///
/// impl Provider<Vec<String>> for Bootstrap {
///     fn entities(self) -> Vec<(String, BoxedTask<Vec<String>>)> {
///         vec![
///             ("config".to_string(), Box::new(|_: &mut muster::Controller, log: &mut Vec<String>| -> TaskResult {
///                 log.push("config".to_string());
///                 Ok(())
///             }) as BoxedTask<Vec<String>>),
///         ]
///     }
/// }
///
/// let mut registry = Registry::new();
/// registry.register(Bootstrap);
/// assert!(registry.has("config"));
/// ```
pub trait Provider<C> {
    /// Entity map: every named callable this provider contributes.
    /// Consumed on registration.
    fn entities(self) -> Vec<(String, BoxedTask<C>)>;

    /// Priority map: declarations for (a subset of) the entities. Entities
    /// absent from this map get the default declaration.
    fn priorities(&self) -> HashMap<String, Priority> {
        HashMap::new()
    }
}
