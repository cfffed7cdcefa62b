//! Per-scope dependency graph using petgraph.
//!
//! Edges point from **dependent -> prerequisite**: `task -> depends_on`.
//! Outgoing edges of a node are its prerequisites, incoming edges its
//! dependents. The graph is kept acyclic by checking every insertion with
//! [`DependencyGraph::would_create_cycle`].
//!
//! A `StableDiGraph` is used so node indices held in `node_map` stay valid
//! when nodes are removed.

mod jsonl;

pub use jsonl::{EdgeLoadWarning, EdgeRecord};
pub(crate) use jsonl::{read_edges, write_edges};

use crate::domain::{DependencyEdge, TaskId};
use chrono::{DateTime, Utc};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};

/// Why an edge was refused by [`DependencyGraph::try_add_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRejection {
    /// Both endpoints are the same task
    SelfLoop,
    /// The prerequisite already (transitively) depends on the task
    Cycle,
    /// The exact ordered edge is already present
    Duplicate,
}

/// Directed acyclic edge set for one scope.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: StableDiGraph<TaskId, DateTime<Utc>>,
    node_map: HashMap<TaskId, NodeIndex>,
}

impl DependencyGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, id: &TaskId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    fn ensure_node(&mut self, id: &TaskId) -> NodeIndex {
        if let Some(node) = self.node(id) {
            return node;
        }
        let node = self.graph.add_node(id.clone());
        self.node_map.insert(id.clone(), node);
        node
    }

    /// Drop a node once it has no edges left.
    fn prune_if_isolated(&mut self, node: NodeIndex) {
        let isolated = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .next()
            .is_none()
            && self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .next()
                .is_none();
        if isolated {
            if let Some(id) = self.graph.remove_node(node) {
                self.node_map.remove(&id);
            }
        }
    }

    /// Whether adding `task -> depends_on` would close a cycle.
    ///
    /// Breadth-first search from `depends_on` along outgoing edges; each node
    /// is enqueued at most once. A self-edge counts as a cycle.
    #[must_use]
    pub fn would_create_cycle(&self, task: &TaskId, depends_on: &TaskId) -> bool {
        if task == depends_on {
            return true;
        }
        let (Some(start), Some(target)) = (self.node(depends_on), self.node(task)) else {
            // An endpoint with no edges cannot be on a path.
            return false;
        };

        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            if current == target {
                return true;
            }
            for next in self.graph.neighbors_directed(current, Direction::Outgoing) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        false
    }

    /// Whether the exact ordered edge `task -> depends_on` exists.
    #[must_use]
    pub fn contains_edge(&self, task: &TaskId, depends_on: &TaskId) -> bool {
        match (self.node(task), self.node(depends_on)) {
            (Some(from), Some(to)) => self.graph.find_edge(from, to).is_some(),
            _ => false,
        }
    }

    /// Insert `task -> depends_on` if it keeps the graph a simple DAG.
    ///
    /// Checks run in order: self-loop, cycle, duplicate. Nothing is written
    /// on rejection.
    ///
    /// # Errors
    ///
    /// Returns the first [`EdgeRejection`] that applies.
    pub fn try_add_edge(
        &mut self,
        task: &TaskId,
        depends_on: &TaskId,
        created_at: DateTime<Utc>,
    ) -> Result<DependencyEdge, EdgeRejection> {
        if task == depends_on {
            return Err(EdgeRejection::SelfLoop);
        }
        if self.would_create_cycle(task, depends_on) {
            return Err(EdgeRejection::Cycle);
        }
        if self.contains_edge(task, depends_on) {
            return Err(EdgeRejection::Duplicate);
        }

        let from = self.ensure_node(task);
        let to = self.ensure_node(depends_on);
        self.graph.add_edge(from, to, created_at);

        Ok(DependencyEdge {
            task_id: task.clone(),
            depends_on_task_id: depends_on.clone(),
            created_at,
        })
    }

    /// Remove `task -> depends_on`. Returns `false` if it was not present.
    pub fn remove_edge(&mut self, task: &TaskId, depends_on: &TaskId) -> bool {
        let (Some(from), Some(to)) = (self.node(task), self.node(depends_on)) else {
            return false;
        };
        let Some(edge) = self.graph.find_edge(from, to) else {
            return false;
        };

        self.graph.remove_edge(edge);
        self.prune_if_isolated(from);
        self.prune_if_isolated(to);
        true
    }

    /// Remove every edge touching `task`, in both directions.
    ///
    /// Returns the number of edges removed.
    pub fn remove_task(&mut self, task: &TaskId) -> usize {
        let Some(node) = self.node(task) else {
            return 0;
        };

        let neighbors: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .chain(self.graph.neighbors_directed(node, Direction::Incoming))
            .collect();
        let removed = neighbors.len();

        // StableGraph drops incident edges with the node.
        self.graph.remove_node(node);
        self.node_map.remove(task);
        for neighbor in neighbors {
            self.prune_if_isolated(neighbor);
        }

        removed
    }

    /// Direct prerequisites of `task` (outgoing edges), unordered.
    #[must_use]
    pub fn prerequisites(&self, task: &TaskId) -> Vec<TaskId> {
        self.neighbors(task, Direction::Outgoing)
    }

    /// Direct dependents of `task` (incoming edges), unordered.
    #[must_use]
    pub fn dependents(&self, task: &TaskId) -> Vec<TaskId> {
        self.neighbors(task, Direction::Incoming)
    }

    fn neighbors(&self, task: &TaskId, direction: Direction) -> Vec<TaskId> {
        let Some(node) = self.node(task) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(node, direction)
            .map(|neighbor| self.graph[neighbor].clone())
            .collect()
    }

    /// All edges, ordered by creation time then by endpoint ids.
    #[must_use]
    pub fn edges(&self) -> Vec<DependencyEdge> {
        let mut edges: Vec<DependencyEdge> = self
            .node_map
            .values()
            .flat_map(|&node| self.graph.edges(node))
            .map(|edge| DependencyEdge {
                task_id: self.graph[edge.source()].clone(),
                depends_on_task_id: self.graph[edge.target()].clone(),
                created_at: *edge.weight(),
            })
            .collect();
        edges.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.task_id.cmp(&b.task_id))
                .then_with(|| a.depends_on_task_id.cmp(&b.depends_on_task_id))
        });
        edges
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// True when the graph holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }
}
