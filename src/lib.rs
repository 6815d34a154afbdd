//! Graph-cut seam computation for blending overlapping image patches into Wang tiles
//!
//! The system builds a flow network over a pixel grid, derives edge capacities
//! from perceptual color differences and image gradients, and runs an
//! incremental tree-based max-flow solver to find the minimum-cost seam
//! between two candidate patches.

#![forbid(unsafe_code)]

/// Color space conversions and perceptual color distance
pub mod color;
/// Max-flow / min-cut solver over explicit flow networks
pub mod flow;
/// Input/output operations and error handling
pub mod io;
/// Read-only pixel access with Lab caching and directional gradients
pub mod pixel;
/// Grid construction, edge weighting, and seam extraction
pub mod seam;

pub use io::error::{Result, SeamError};
