//! Priority resolution and execution-plan construction.
//!
//! Resolution reduces a mixture of absolute ranks and relative directives
//! into one total order. It works by work-queue relaxation: every entry is
//! queued in registration order, absolute entries stabilize immediately, and
//! a relative entry stabilizes once its target's rank is available, computing
//! its own rank one below (`before`) or one above (`after`) the target's.
//! Entries whose target has not stabilized are re-enqueued and retried, so
//! chains of directives resolve in dependency order rather than declaration
//! order.
//!
//! Self-references and mutual references are rejected eagerly while
//! relaxing. Longer reference cycles stall the queue instead; a stalled
//! queue is analyzed for its strongly connected components and reported as a
//! priority cycle naming the members.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::core::priority::{Priority, Rank};
use crate::error::{Error, Result};
use crate::mlog_debug;

/// One resolved entry of an execution plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Task name.
    pub name: String,
    /// Rank the name resolved to.
    pub rank: Rank,
}

/// The ordered sequence of task names for one execution run.
///
/// Built once per run from the registry's declarations, consumed once by the
/// executor, and discarded after. Ordering is by resolved rank ascending;
/// equal ranks preserve the order in which each name's rank became stable
/// during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    entries: Vec<PlanEntry>,
}

impl ExecutionPlan {
    /// Resolve a set of declarations, in registration order, into a plan.
    ///
    /// # Errors
    /// Returns an error if a relative declaration names an unknown entry,
    /// points at itself, forms a mutual pair, or participates in a longer
    /// reference cycle. No partial plan is produced on failure.
    pub fn resolve(declarations: &[(String, Priority)]) -> Result<Self> {
        let mut entries = resolve_ranks(declarations)?;
        entries.sort_by_key(|entry| entry.rank);
        mlog_debug!(
            "resolved plan: [{}]",
            entries
                .iter()
                .map(|e| format!("{}:{}", e.name, e.rank))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(Self { entries })
    }

    /// Task names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Resolved entries in execution order.
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// The rank a name resolved to, if it is part of the plan.
    pub fn rank_of(&self, name: &str) -> Option<Rank> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.rank)
    }

    /// Position of a name in execution order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    /// Number of planned tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan contains no tasks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reduce declarations to absolute ranks by work-queue relaxation.
///
/// Returns entries in stabilization order, which is the tie-break order for
/// the final sort.
fn resolve_ranks(declarations: &[(String, Priority)]) -> Result<Vec<PlanEntry>> {
    let decls: HashMap<&str, &Priority> = declarations
        .iter()
        .map(|(name, priority)| (name.as_str(), priority))
        .collect();

    let mut reduced: HashMap<&str, Rank> = HashMap::new();
    let mut stabilized: Vec<PlanEntry> = Vec::with_capacity(declarations.len());
    let mut queue: VecDeque<&str> = declarations
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    // Consecutive re-enqueues without a stabilization. Exceeding the queue
    // length means a full pass made no progress: the pending entries wait on
    // each other in a cycle.
    let mut idle = 0usize;

    while let Some(name) = queue.pop_front() {
        let declaration = decls[name];

        let target = match declaration {
            Priority::Absolute(rank) => {
                reduced.insert(name, *rank);
                stabilized.push(PlanEntry {
                    name: name.to_string(),
                    rank: *rank,
                });
                idle = 0;
                continue;
            }
            Priority::Before { before } => before.as_str(),
            Priority::After { after } => after.as_str(),
        };

        let target_declaration = match decls.get(target) {
            Some(declaration) => *declaration,
            None => {
                return Err(Error::UnresolvableReference {
                    name: name.to_string(),
                    target: target.to_string(),
                })
            }
        };

        if target == name {
            return Err(Error::SelfRecursion {
                name: name.to_string(),
            });
        }

        if target_declaration.target() == Some(name) {
            return Err(Error::DirectRecursion {
                first: name.to_string(),
                second: target.to_string(),
            });
        }

        // An absolute target's rank is known upfront; a relative target's
        // only once it has been reduced.
        let target_rank = match target_declaration.rank() {
            Some(rank) => Some(rank),
            None => reduced.get(target).copied(),
        };

        match target_rank {
            None => {
                queue.push_back(name);
                idle += 1;
                if idle > queue.len() {
                    return Err(cycle_among(declarations, &decls, &queue));
                }
            }
            Some(target_rank) => {
                let rank = match declaration {
                    Priority::Before { .. } => target_rank - 1,
                    _ => target_rank + 1,
                };
                reduced.insert(name, rank);
                stabilized.push(PlanEntry {
                    name: name.to_string(),
                    rank,
                });
                idle = 0;
            }
        }
    }

    Ok(stabilized)
}

/// Extract the reference cycle among the still-pending names of a stalled
/// queue.
///
/// Every pending entry is relative with a known, also-pending target, so the
/// pending set forms a graph in which each node has exactly one outgoing
/// edge; its strongly connected components contain the cycle. The reported
/// chain starts at the cycle member registered earliest.
fn cycle_among(
    declarations: &[(String, Priority)],
    decls: &HashMap<&str, &Priority>,
    pending: &VecDeque<&str>,
) -> Error {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();

    for &name in pending {
        nodes.insert(name, graph.add_node(name));
    }
    for &name in pending {
        if let Some(target) = decls[name].target() {
            if let (Some(&from), Some(&to)) = (nodes.get(name), nodes.get(target)) {
                graph.add_edge(from, to, ());
            }
        }
    }

    for scc in tarjan_scc(&graph) {
        if scc.len() < 2 {
            continue;
        }
        let members: HashSet<&str> = scc.iter().map(|&index| graph[index]).collect();
        let start = declarations
            .iter()
            .map(|(name, _)| name.as_str())
            .find(|name| members.contains(name));
        if let Some(start) = start {
            return Error::PriorityCycle {
                names: chain_from(decls, start, pending.len()),
            };
        }
    }

    // A stalled queue always contains a multi-node component; fall back to
    // listing the pending names as-is.
    Error::PriorityCycle {
        names: pending.iter().map(|name| name.to_string()).collect(),
    }
}

/// Follow relative targets from `start` until the chain closes, collecting
/// the cycle members in reference order.
fn chain_from(decls: &HashMap<&str, &Priority>, start: &str, limit: usize) -> Vec<String> {
    let mut names = vec![start.to_string()];
    let mut current = start;
    while let Some(next) = decls.get(current).and_then(|declaration| declaration.target()) {
        if next == start || names.len() > limit {
            break;
        }
        names.push(next.to_string());
        current = next;
    }
    names
}
