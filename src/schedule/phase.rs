//! Phase dependency graph.
//!
//! A phase is a named ordering bucket for per-frame work. Each phase declares
//! the phases it depends on; [`PhaseGraph::resolve`] turns the declarations into
//! a single linear execution order where every phase comes after all of its
//! (transitive) predecessors.
//!
//! The frame loop only ever builds a chain, but the resolver accepts any DAG
//! (branching and merging). Resolution uses Kahn's algorithm; when several
//! phases are ready at once, the one registered first wins, so the order is
//! fully deterministic.
//!
//! ```ignore
//! let mut graph = PhaseGraph::new();
//! graph.add_root(LOGIC)?;
//! graph.add_after(RENDER, LOGIC)?;
//! let order = graph.resolve()?; // [LOGIC, RENDER]
//! ```

use std::collections::BTreeSet;
use std::fmt;

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Unique identifier for a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhaseId(&'static str);

impl PhaseId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Setup-time scheduling errors. All of them are fatal for startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhaseError {
    #[error("Phase already registered: {0}")]
    AlreadyRegistered(&'static str),

    #[error("Missing predecessor: {predecessor} required by {phase}")]
    MissingPredecessor {
        phase: &'static str,
        predecessor: &'static str,
    },

    #[error("Dependency cycle detected involving: {phases:?}")]
    DependencyCycle { phases: Vec<&'static str> },

    #[error("Unknown phase: {0}")]
    UnknownPhase(&'static str),
}

struct PhaseNode {
    id: PhaseId,
    depends_on: Vec<PhaseId>,
}

/// Directed acyclic graph of phases, kept in registration order.
#[derive(Default)]
pub struct PhaseGraph {
    nodes: Vec<PhaseNode>,
    index: FxHashMap<PhaseId, usize>,
}

impl PhaseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a phase and the phases it must run after.
    ///
    /// Predecessors may be registered later; they are only checked by
    /// [`resolve`](Self::resolve).
    pub fn add_phase(
        &mut self,
        id: PhaseId,
        depends_on: &[PhaseId],
    ) -> Result<&mut Self, PhaseError> {
        if self.index.contains_key(&id) {
            return Err(PhaseError::AlreadyRegistered(id.as_str()));
        }
        self.index.insert(id, self.nodes.len());
        self.nodes.push(PhaseNode {
            id,
            depends_on: depends_on.to_vec(),
        });
        Ok(self)
    }

    /// Register a phase with no predecessor.
    pub fn add_root(&mut self, id: PhaseId) -> Result<&mut Self, PhaseError> {
        self.add_phase(id, &[])
    }

    /// Register a phase that runs after exactly one predecessor.
    pub fn add_after(
        &mut self,
        id: PhaseId,
        predecessor: PhaseId,
    ) -> Result<&mut Self, PhaseError> {
        self.add_phase(id, &[predecessor])
    }

    pub fn contains(&self, id: PhaseId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve the execution order with Kahn's algorithm.
    ///
    /// Ties between ready phases are broken by registration order.
    pub fn resolve(&self) -> Result<Vec<PhaseId>, PhaseError> {
        let count = self.nodes.len();
        let mut in_degree = vec![0usize; count];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];

        for (slot, node) in self.nodes.iter().enumerate() {
            for dep in &node.depends_on {
                let Some(&dep_slot) = self.index.get(dep) else {
                    return Err(PhaseError::MissingPredecessor {
                        phase: node.id.as_str(),
                        predecessor: dep.as_str(),
                    });
                };
                in_degree[slot] += 1;
                dependents[dep_slot].push(slot);
            }
        }

        // Ordered by registration slot, so the smallest ready slot pops first.
        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(slot, _)| slot)
            .collect();

        let mut order = Vec::with_capacity(count);
        while let Some(slot) = ready.pop_first() {
            order.push(self.nodes[slot].id);
            for &dependent in &dependents[slot] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() != count {
            let phases = self
                .nodes
                .iter()
                .enumerate()
                .filter(|(slot, _)| in_degree[*slot] > 0)
                .map(|(_, node)| node.id.as_str())
                .collect();
            return Err(PhaseError::DependencyCycle { phases });
        }

        Ok(order)
    }
}
