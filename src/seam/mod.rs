//! Seam computation over pixel grids
//!
//! Turns a pair of candidate patches into a flow network whose minimum cut
//! is the least-visible seam between them: edge capacities come from the
//! weight model, border pixels feed the SOURCE terminal, and the diagonal
//! seam target feeds the SINK.

/// Grid construction, terminal wiring, and mask extraction
pub mod graph;
/// Edge capacities from color differences, gradients, and terminal zones
pub mod weight;

pub use graph::{SeamGraph, SeamMask, SeamSide};
pub use weight::{EdgeWeightModel, WeightConfig};
