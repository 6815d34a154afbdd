//! Incremental max-flow / min-cut solver
//!
//! A Boykov–Kolmogorov style algorithm over explicit flow networks with
//! real-valued capacities. Two search trees grow from the SOURCE and SINK
//! terminals, reuse their structure across augmentations, and repair
//! themselves through orphan adoption when augmenting paths saturate edges.

/// Node identifiers, terminal designation, and edge records
pub mod node;
/// The flow network and the grow/augment/adopt solver
pub mod network;
/// Ordered node sets with constant-time membership
pub(crate) mod sets;

pub use network::{FlowNetwork, SolverConfig};
pub use node::{Edge, NodeId, Terminal};
