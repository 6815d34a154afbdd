//! Node and edge records for flow networks

/// The two reserved terminals of every network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    /// The flow origin; its search tree claims the patch-A side of the cut
    Source,
    /// The flow destination; its search tree claims the patch-B side
    Sink,
}

/// Opaque node identifier
///
/// Ids are dense indices handed out by [`super::FlowNetwork::add_node`] and
/// are only meaningful within the network that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The dense index behind this id
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A directed edge with explicit capacity and flow
///
/// A structurally distinct reverse edge may coexist for the same node pair;
/// the two carry independent capacities and flows. Residual capacities are
/// tracked separately by the network, not on the edge record.
#[derive(Debug, Clone)]
pub struct Edge {
    from: NodeId,
    to: NodeId,
    capacity: f64,
    flow: f64,
}

impl Edge {
    pub(crate) const fn new(from: NodeId, to: NodeId, capacity: f64) -> Self {
        Self {
            from,
            to,
            capacity,
            flow: 0.0,
        }
    }

    /// Tail and head nodes, in flow direction
    pub const fn endpoints(&self) -> (NodeId, NodeId) {
        (self.from, self.to)
    }

    /// Edge capacity; may be `f64::INFINITY` for terminal wiring
    pub const fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Current flow, always within `0..=capacity` (modulo rounding tolerance)
    pub const fn flow(&self) -> f64 {
        self.flow
    }

    pub(crate) const fn flow_mut(&mut self) -> &mut f64 {
        &mut self.flow
    }
}

/// Per-node solver state
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeState {
    /// Which terminal's search tree the node currently belongs to
    pub tree: Option<Terminal>,
    /// The node through which this node attached to its tree
    pub parent: Option<NodeId>,
    /// Adjacent nodes in edge-insertion order, each listed once
    pub neighbors: Vec<NodeId>,
}
