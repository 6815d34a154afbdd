//! Flow network construction and the grow/augment/adopt solver
//!
//! The solver maintains two search trees rooted at the terminals. Growth
//! follows residual capacity oriented by tree side: the source tree expands
//! along forward residuals, the sink tree along backward ones. When the
//! trees touch, the discovered path is augmented by its bottleneck, and
//! subtrees cut off by saturated edges are repaired or dissolved in the
//! adoption phase. Capacities are real-valued, so every comparison against
//! zero goes through a configurable rounding tolerance.

use crate::flow::node::{Edge, NodeId, NodeState, Terminal};
use crate::flow::sets::{ActiveQueue, OrphanStack};
use crate::io::configuration::DEFAULT_ROUNDING_TOLERANCE;
use crate::io::error::{Result, SeamError, solver_error};
use std::collections::HashMap;

/// Numeric policy for a single solve
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Absolute tolerance used when residual capacities are compared to or
    /// clamped at zero
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_ROUNDING_TOLERANCE,
        }
    }
}

/// A directed flow network with two reserved terminals
///
/// Nodes and edges are added once during construction; [`solve`] then runs
/// to completion and freezes the node labeling consumed by [`partition`].
/// Each network is single-use: a second `solve` call is rejected.
///
/// [`solve`]: FlowNetwork::solve
/// [`partition`]: FlowNetwork::partition
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    nodes: Vec<NodeState>,
    edges: Vec<Edge>,
    edge_index: HashMap<(NodeId, NodeId), usize>,
    residual: HashMap<(NodeId, NodeId), f64>,
    active: ActiveQueue,
    orphans: OrphanStack,
    config: SolverConfig,
    solved: bool,
}

impl Default for FlowNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowNetwork {
    /// Reserved flow origin, present in every network
    pub const SOURCE: NodeId = NodeId(0);
    /// Reserved flow destination, present in every network
    pub const SINK: NodeId = NodeId(1);

    /// Create an empty network with default numeric policy
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    /// Create an empty network with an explicit numeric policy
    pub fn with_config(config: SolverConfig) -> Self {
        let mut network = Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            edge_index: HashMap::new(),
            residual: HashMap::new(),
            active: ActiveQueue::default(),
            orphans: OrphanStack::default(),
            config,
            solved: false,
        };

        let source = network.push_node();
        let sink = network.push_node();
        if let Some(state) = network.nodes.get_mut(source.0) {
            state.tree = Some(Terminal::Source);
        }
        if let Some(state) = network.nodes.get_mut(sink.0) {
            state.tree = Some(Terminal::Sink);
        }
        network.active.insert(source.0);
        network.active.insert(sink.0);
        network
    }

    fn push_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeState::default());
        self.active.grow();
        self.orphans.grow();
        id
    }

    /// Add a non-terminal node and return its id
    ///
    /// New nodes start free: no tree, no parent, not active.
    pub fn add_node(&mut self) -> NodeId {
        self.push_node()
    }

    /// Total number of nodes, terminals included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over every node id, terminals included
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Whether the given id names a node of this network
    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    /// Neighbors of a node in deterministic edge-insertion order
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node.0).map_or(&[], |state| &state.neighbors)
    }

    fn state(&self, node: NodeId) -> Result<&NodeState> {
        self.nodes
            .get(node.0)
            .ok_or(SeamError::UnknownNode { id: node.0 })
    }

    fn state_mut(&mut self, node: NodeId) -> Result<&mut NodeState> {
        self.nodes
            .get_mut(node.0)
            .ok_or(SeamError::UnknownNode { id: node.0 })
    }

    /// Add a directed edge with the given capacity
    ///
    /// The paired residual entries for both orientations are created here;
    /// a structurally distinct reverse edge may still be added separately
    /// with its own capacity.
    ///
    /// # Errors
    ///
    /// Returns [`SeamError::UnknownNode`] if either endpoint is not part of
    /// the network, [`SeamError::DuplicateEdge`] if this ordered pair
    /// already has an edge, and [`SeamError::InvalidParameter`] for a
    /// negative or NaN capacity or a self-loop.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, capacity: f64) -> Result<()> {
        if !self.contains(from) {
            return Err(SeamError::UnknownNode { id: from.0 });
        }
        if !self.contains(to) {
            return Err(SeamError::UnknownNode { id: to.0 });
        }
        if from == to {
            return Err(SeamError::InvalidParameter {
                parameter: "edge",
                value: format!("{} -> {}", from.0, to.0),
                reason: "self-loops carry no flow".to_string(),
            });
        }
        if capacity.is_nan() || capacity < 0.0 {
            return Err(SeamError::InvalidParameter {
                parameter: "capacity",
                value: format!("{capacity}"),
                reason: "capacity must be non-negative".to_string(),
            });
        }
        if self.edge_index.contains_key(&(from, to)) {
            return Err(SeamError::DuplicateEdge {
                from: from.0,
                to: to.0,
            });
        }

        self.edge_index.insert((from, to), self.edges.len());
        self.edges.push(Edge::new(from, to, capacity));

        *self.residual.entry((from, to)).or_insert(0.0) += capacity;
        self.residual.entry((to, from)).or_insert(0.0);

        let forward_known = self.state(from)?.neighbors.contains(&to);
        if !forward_known {
            self.state_mut(from)?.neighbors.push(to);
        }
        let reverse_known = self.state(to)?.neighbors.contains(&from);
        if !reverse_known {
            self.state_mut(to)?.neighbors.push(from);
        }
        Ok(())
    }

    /// Wire a node as an additional source via an infinite-capacity edge
    ///
    /// # Errors
    ///
    /// Propagates [`add_edge`](FlowNetwork::add_edge) failures.
    pub fn set_multi_source(&mut self, node: NodeId) -> Result<()> {
        self.add_edge(Self::SOURCE, node, f64::INFINITY)
    }

    /// Wire a node as an additional sink via an infinite-capacity edge
    ///
    /// # Errors
    ///
    /// Propagates [`add_edge`](FlowNetwork::add_edge) failures.
    pub fn set_multi_sink(&mut self, node: NodeId) -> Result<()> {
        self.add_edge(node, Self::SINK, f64::INFINITY)
    }

    /// The structural edge for an ordered pair, if one was added
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.edge_index
            .get(&(from, to))
            .and_then(|&i| self.edges.get(i))
    }

    /// Flow currently carried by the structural edge for an ordered pair
    pub fn edge_flow(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.edge(from, to).map(Edge::flow)
    }

    /// All structural edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Residual capacity for the ordered pair
    ///
    /// Aggregates forward capacity minus forward flow plus reverse flow;
    /// zero for pairs with no structural edge in either direction.
    pub fn residual(&self, from: NodeId, to: NodeId) -> f64 {
        self.residual.get(&(from, to)).copied().unwrap_or(0.0)
    }

    /// Residual capacity oriented by the tree of `p`
    ///
    /// Source-tree nodes grow along forward residuals, sink-tree nodes
    /// along backward ones. Free nodes have no tree capacity.
    fn tree_capacity(&self, p: NodeId, q: NodeId) -> f64 {
        match self.nodes.get(p.0).and_then(|state| state.tree) {
            Some(Terminal::Source) => self.residual(p, q),
            Some(Terminal::Sink) => self.residual(q, p),
            None => 0.0,
        }
    }

    /// Which tree a node ended on, if any
    pub fn tree(&self, node: NodeId) -> Option<Terminal> {
        self.nodes.get(node.0).and_then(|state| state.tree)
    }

    /// Whether a node sits on the source side of the cut
    ///
    /// Free nodes count as sink side, mirroring [`partition`].
    ///
    /// [`partition`]: FlowNetwork::partition
    pub fn is_source_side(&self, node: NodeId) -> bool {
        self.tree(node) == Some(Terminal::Source)
    }

    /// Run the solver to completion and return the maximum flow
    ///
    /// Alternates grow, augment, and adopt phases until the active set is
    /// exhausted without finding an augmenting path. As a side effect every
    /// node ends up labeled with the side of the minimum cut it falls on.
    ///
    /// # Errors
    ///
    /// Returns [`SeamError::Solver`] on a second call (networks are
    /// single-use) or when an internal invariant is violated; such errors
    /// indicate a solver bug and leave the network in an unspecified state.
    pub fn solve(&mut self) -> Result<f64> {
        if self.solved {
            return Err(solver_error(
                "solve",
                &"network already solved; construct a fresh network per graft",
            ));
        }

        loop {
            let path = self.grow()?;
            if path.is_empty() {
                break;
            }
            self.augment(&path)?;
            self.adopt()?;
        }

        self.solved = true;
        Ok(self.max_flow())
    }

    /// Whether [`solve`](FlowNetwork::solve) has completed
    pub const fn is_solved(&self) -> bool {
        self.solved
    }

    /// Total flow leaving SOURCE
    pub fn max_flow(&self) -> f64 {
        self.edges
            .iter()
            .filter(|edge| edge.endpoints().0 == Self::SOURCE)
            .map(Edge::flow)
            .sum()
    }

    /// The two sides of the minimum cut
    ///
    /// Every node appears exactly once: source-tree nodes on the source
    /// side, everything else (sink-tree and free nodes) on the sink side.
    /// A pure query; calling it repeatedly yields identical results.
    pub fn partition(&self) -> (Vec<NodeId>, Vec<NodeId>) {
        let mut source_side = Vec::new();
        let mut sink_side = Vec::new();
        for (index, state) in self.nodes.iter().enumerate() {
            if state.tree == Some(Terminal::Source) {
                source_side.push(NodeId(index));
            } else {
                sink_side.push(NodeId(index));
            }
        }
        (source_side, sink_side)
    }

    /// Grow the two trees until they touch or the active set drains
    ///
    /// Returns the discovered augmenting path as a node sequence from
    /// SOURCE to SINK, or an empty vector when flow is maximal.
    fn grow(&mut self) -> Result<Vec<NodeId>> {
        while let Some(p_index) = self.active.front() {
            let p = NodeId(p_index);
            let p_tree = self.state(p)?.tree;

            let mut i = 0;
            loop {
                let Some(&q) = self
                    .nodes
                    .get(p.0)
                    .and_then(|state| state.neighbors.get(i))
                else {
                    break;
                };
                i += 1;

                if self.tree_capacity(p, q) <= self.config.tolerance {
                    continue;
                }
                let q_tree = self.state(q)?.tree;
                match q_tree {
                    None => {
                        self.set_parent(q, p)?;
                        self.active.insert(q.0);
                    }
                    tree if tree == p_tree => {}
                    _ => return self.build_path(p, q),
                }
            }

            self.active.remove(p.0);
        }

        Ok(Vec::new())
    }

    /// Reconstruct the SOURCE-to-SINK path through the meeting edge (p, q)
    fn build_path(&self, p: NodeId, q: NodeId) -> Result<Vec<NodeId>> {
        let (source_end, sink_end) = match self.state(p)?.tree {
            Some(Terminal::Source) => (p, q),
            _ => (q, p),
        };

        let mut path = vec![source_end];
        let mut walk = source_end;
        while let Some(parent) = self.state(walk)?.parent {
            path.push(parent);
            walk = parent;
        }
        path.reverse();

        let mut walk = sink_end;
        path.push(walk);
        while let Some(parent) = self.state(walk)?.parent {
            path.push(parent);
            walk = parent;
        }

        if path.first() != Some(&Self::SOURCE) || path.last() != Some(&Self::SINK) {
            return Err(solver_error(
                "grow",
                &"augmenting path is not anchored at the terminals",
            ));
        }
        Ok(path)
    }

    /// Push the bottleneck flow along a discovered path
    fn augment(&mut self, path: &[NodeId]) -> Result<()> {
        let mut bottleneck = f64::INFINITY;
        for (&a, &b) in path.iter().zip(path.iter().skip(1)) {
            bottleneck = bottleneck.min(self.residual(a, b));
        }

        if bottleneck.is_infinite() {
            return Err(solver_error(
                "augment",
                &"augmenting path with infinite bottleneck",
            ));
        }
        if bottleneck <= self.config.tolerance {
            return Err(solver_error(
                "augment",
                &format!("non-positive bottleneck {bottleneck}"),
            ));
        }

        for (&a, &b) in path.iter().zip(path.iter().skip(1)) {
            self.add_flow(a, b, bottleneck)?;
        }
        Ok(())
    }

    /// Push `delta` units of flow from `p` to `q`
    ///
    /// Updates the paired residuals, evaluates orphaning when the forward
    /// residual saturates, and applies the amount to the real edges: the
    /// forward edge absorbs what headroom it has, and any remainder cancels
    /// existing flow on the structural reverse edge, clamped at zero.
    ///
    /// # Errors
    ///
    /// Returns [`SeamError::Solver`] when the forward residual would go
    /// negative beyond the rounding tolerance.
    pub fn add_flow(&mut self, p: NodeId, q: NodeId, delta: f64) -> Result<()> {
        let tolerance = self.config.tolerance;

        let forward = self.residual.entry((p, q)).or_insert(0.0);
        *forward -= delta;
        let remaining = *forward;
        if remaining < -tolerance {
            return Err(solver_error(
                "add_flow",
                &format!("negative residual capacity {remaining}"),
            ));
        }
        let saturated = remaining <= tolerance;
        if saturated {
            *forward = 0.0;
        }
        *self.residual.entry((q, p)).or_insert(0.0) += delta;

        if saturated {
            let p_tree = self.nodes.get(p.0).and_then(|state| state.tree);
            let q_tree = self.nodes.get(q.0).and_then(|state| state.tree);
            match (p_tree, q_tree) {
                (Some(Terminal::Source), Some(Terminal::Source)) => self.orphan(q),
                (Some(Terminal::Sink), Some(Terminal::Sink)) => self.orphan(p),
                _ => {}
            }
        }

        let mut remainder = delta;
        if let Some(&index) = self.edge_index.get(&(p, q))
            && let Some(edge) = self.edges.get_mut(index)
        {
            let headroom = edge.capacity() - edge.flow();
            let applied = remainder.min(headroom);
            *edge.flow_mut() += applied;
            remainder -= applied;
        }
        if remainder > tolerance
            && let Some(&index) = self.edge_index.get(&(q, p))
            && let Some(edge) = self.edges.get_mut(index)
        {
            let cancelled = (edge.flow() - remainder).max(0.0);
            *edge.flow_mut() = cancelled;
        }
        Ok(())
    }

    /// Attach `node` to `parent`'s tree
    fn set_parent(&mut self, node: NodeId, parent: NodeId) -> Result<()> {
        let Some(tree) = self.state(parent)?.tree else {
            return Err(solver_error(
                "set_parent",
                &format!("node {} has no tree to adopt into", parent.0),
            ));
        };
        let state = self.state_mut(node)?;
        state.parent = Some(parent);
        state.tree = Some(tree);
        Ok(())
    }

    /// Sever a node's parent link and queue it for adoption
    ///
    /// The node keeps its tree label until adoption either re-parents it or
    /// demotes it to free. Terminals are never orphaned.
    fn orphan(&mut self, node: NodeId) {
        if node == Self::SOURCE || node == Self::SINK {
            return;
        }
        if let Some(state) = self.nodes.get_mut(node.0) {
            state.parent = None;
        }
        self.orphans.insert(node.0);
    }

    /// Whether a node's parent chain reaches a terminal
    ///
    /// Orphans have their parent link cleared, so a chain that runs into
    /// one simply ends without reaching a terminal.
    fn is_rooted(&self, start: NodeId) -> bool {
        let mut walk = start;
        loop {
            if walk == Self::SOURCE || walk == Self::SINK {
                return true;
            }
            match self.nodes.get(walk.0).and_then(|state| state.parent) {
                Some(parent) => walk = parent,
                None => return false,
            }
        }
    }

    /// Re-parent or demote orphans until the orphan set drains
    fn adopt(&mut self) -> Result<()> {
        while let Some(index) = self.orphans.pop() {
            self.process_orphan(NodeId(index))?;
        }
        Ok(())
    }

    fn process_orphan(&mut self, p: NodeId) -> Result<()> {
        let p_tree = self.state(p)?.tree;

        // First chance: a same-tree neighbor with spare capacity toward p
        // that is still anchored at a terminal
        let mut i = 0;
        loop {
            let Some(&q) = self
                .nodes
                .get(p.0)
                .and_then(|state| state.neighbors.get(i))
            else {
                break;
            };
            i += 1;

            if self.state(q)?.tree == p_tree
                && self.tree_capacity(q, p) > self.config.tolerance
                && self.is_rooted(q)
            {
                return self.set_parent(p, q);
            }
        }

        // No parent found: dissolve. Neighbors that could still reach p get
        // another chance to grow, and children of p cascade into orphans.
        let mut i = 0;
        loop {
            let Some(&q) = self
                .nodes
                .get(p.0)
                .and_then(|state| state.neighbors.get(i))
            else {
                break;
            };
            i += 1;

            if self.state(q)?.tree != p_tree {
                continue;
            }
            if self.tree_capacity(q, p) > self.config.tolerance {
                self.active.insert(q.0);
            }
            if self.state(q)?.parent == Some(p) {
                self.orphan(q);
            }
        }

        self.state_mut(p)?.tree = None;
        self.active.remove(p.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FlowNetwork, Terminal};

    #[test]
    fn terminals_exist_with_fixed_trees() {
        let network = FlowNetwork::new();
        assert_eq!(network.node_count(), 2);
        assert_eq!(network.tree(FlowNetwork::SOURCE), Some(Terminal::Source));
        assert_eq!(network.tree(FlowNetwork::SINK), Some(Terminal::Sink));
    }

    #[test]
    fn duplicate_and_unknown_edges_are_rejected() {
        let mut network = FlowNetwork::new();
        let a = network.add_node();
        assert!(network.add_edge(FlowNetwork::SOURCE, a, 1.0).is_ok());
        assert!(network.add_edge(FlowNetwork::SOURCE, a, 2.0).is_err());
        assert!(network.add_edge(a, FlowNetwork::SOURCE, 2.0).is_ok());

        let ghost = super::NodeId(99);
        assert!(network.add_edge(a, ghost, 1.0).is_err());
        assert!(network.add_edge(a, a, 1.0).is_err());
        assert!(network.add_edge(FlowNetwork::SINK, a, -1.0).is_err());
    }

    #[test]
    fn residuals_track_both_orientations() {
        let mut network = FlowNetwork::new();
        let a = network.add_node();
        let b = network.add_node();
        assert!(network.add_edge(a, b, 10.0).is_ok());

        assert!((network.residual(a, b) - 10.0).abs() < 1e-12);
        assert!(network.residual(b, a).abs() < 1e-12);
        assert!(network.residual(b, FlowNetwork::SINK).abs() < 1e-12);
    }

    #[test]
    fn solve_is_single_use() {
        let mut network = FlowNetwork::new();
        let a = network.add_node();
        assert!(network.add_edge(FlowNetwork::SOURCE, a, 2.0).is_ok());
        assert!(network.add_edge(a, FlowNetwork::SINK, 2.0).is_ok());

        assert!(network.solve().is_ok());
        assert!(network.is_solved());
        assert!(network.solve().is_err());
    }
}
