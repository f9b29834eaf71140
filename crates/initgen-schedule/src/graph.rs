//! Per-phase dependency graph and topological sort
//!
//! Edges come from explicit `depends_on` entries and from capability
//! dependencies resolved to providers of the same phase. A provider in an
//! earlier phase needs no edge: phase precedence already orders it.
//!
//! Sorting is Kahn's algorithm over an insertion-ordered queue. Nodes and
//! their dependent lists are both kept in first-seen registry order, so the
//! result is reproducible byte for byte.

use crate::error::ScheduleError;
use crate::validate::check_explicit_dependency;
use indexmap::IndexSet;
use initgen_registry::{CapabilityIndex, ComponentId, Phase, Registry};
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use std::collections::VecDeque;
use tracing::{trace, warn};

/// Dependency graph of the components in one phase
#[derive(Debug, Clone)]
pub struct PhaseGraph {
    phase: Phase,
    nodes: IndexSet<ComponentId>,
    prerequisites: Vec<IndexSet<usize>>,
    dependents: Vec<IndexSet<usize>>,
}

impl PhaseGraph {
    /// Build the graph for `phase`
    ///
    /// # Errors
    /// An explicit dependency that is undefined or lives in another phase.
    pub fn build(
        registry: &Registry,
        capabilities: &CapabilityIndex,
        phase: Phase,
    ) -> Result<Self, ScheduleError> {
        let nodes: IndexSet<ComponentId> = registry
            .in_phase(phase)
            .map(|(_, c)| c.id.clone())
            .collect();

        let mut graph = Self {
            phase,
            prerequisites: vec![IndexSet::new(); nodes.len()],
            dependents: vec![IndexSet::new(); nodes.len()],
            nodes,
        };

        for (consumer, component) in registry.in_phase(phase).map(|(_, c)| c).enumerate() {
            for dependency in &component.depends_on {
                check_explicit_dependency(registry, component, dependency)?;
                if let Some(provider) = graph.nodes.get_index_of(dependency) {
                    graph.add_edge(provider, consumer);
                }
            }

            for capability in &component.depends_on_capabilities {
                let providers = capabilities.providers(capability.as_str());
                if providers.is_empty() {
                    warn!(
                        component = %component.id,
                        capability = %capability,
                        "capability not found in component registry"
                    );
                }
                for provider in providers {
                    if let Some(provider) = graph.nodes.get_index_of(provider) {
                        graph.add_edge(provider, consumer);
                    }
                }
            }
        }

        trace!(
            phase = %phase,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "phase graph built"
        );
        Ok(graph)
    }

    fn add_edge(&mut self, provider: usize, consumer: usize) {
        self.prerequisites[consumer].insert(provider);
        self.dependents[provider].insert(consumer);
    }

    /// Phase this graph covers
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of components in the phase
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct prerequisite edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.prerequisites.iter().map(IndexSet::len).sum()
    }

    /// Input valence: distinct same-phase prerequisites of `id`
    #[must_use]
    pub fn valence(&self, id: &str) -> Option<usize> {
        self.nodes
            .get_index_of(id)
            .map(|n| self.prerequisites[n].len())
    }

    /// Same-phase prerequisites of `id`, in first-seen order
    #[must_use]
    pub fn prerequisites(&self, id: &str) -> Vec<&ComponentId> {
        self.nodes
            .get_index_of(id)
            .map(|n| self.prerequisites[n].iter().map(|&p| &self.nodes[p]).collect())
            .unwrap_or_default()
    }

    /// Nodes with no prerequisites (entry points)
    #[must_use]
    pub fn entry_nodes(&self) -> Vec<&ComponentId> {
        (0..self.node_count())
            .filter(|&n| self.prerequisites[n].is_empty())
            .map(|n| &self.nodes[n])
            .collect()
    }

    /// Linear order in which every component follows its prerequisites
    ///
    /// # Errors
    /// [`ScheduleError::DependencyCycle`] when some valence never reaches zero.
    pub fn sort(&self) -> Result<Vec<ComponentId>, ScheduleError> {
        let mut valence: Vec<usize> = self.prerequisites.iter().map(IndexSet::len).collect();
        let mut queue: VecDeque<usize> = (0..self.node_count()).filter(|&n| valence[n] == 0).collect();
        let mut order = Vec::with_capacity(self.node_count());

        while let Some(next) = queue.pop_front() {
            order.push(self.nodes[next].clone());
            for &dependent in &self.dependents[next] {
                valence[dependent] -= 1;
                if valence[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if order.len() == self.node_count() {
            return Ok(order);
        }

        let unresolved: Vec<usize> = (0..self.node_count()).filter(|&n| valence[n] != 0).collect();
        Err(ScheduleError::DependencyCycle {
            phase: self.phase,
            cycle: self
                .find_cycle(&unresolved)
                .into_iter()
                .map(|n| self.nodes[n].clone())
                .collect(),
            unresolved: unresolved.iter().map(|&n| self.nodes[n].clone()).collect(),
        })
    }

    /// Members of the first strongly connected component that forms a cycle
    fn find_cycle(&self, unresolved: &[usize]) -> Vec<usize> {
        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
        for &node in unresolved {
            graph.add_node(node);
        }
        for &node in unresolved {
            for &dependent in &self.dependents[node] {
                if graph.contains_node(dependent) {
                    graph.add_edge(node, dependent, ());
                }
            }
        }

        let mut cycles: Vec<Vec<usize>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|mut scc| {
                scc.sort_unstable();
                scc
            })
            .collect();
        cycles.sort();
        cycles.into_iter().next().unwrap_or_default()
    }
}
