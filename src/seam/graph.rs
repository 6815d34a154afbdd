//! Pixel-grid flow networks and seam mask extraction
//!
//! Builds one flow network node per pixel, connects 4-connected (optionally
//! 8-connected) neighbors with weight-model capacities, and wires the Wang
//! terminal layout: every border pixel feeds SOURCE, the interior diagonal
//! "X" feeds SINK. Solving the network partitions the tile into the four
//! border triangles (patch A) and the diagonal core (patch B), cut along the
//! cheapest seam.

use crate::flow::{Edge, FlowNetwork, NodeId, SolverConfig};
use crate::io::error::{Result, SeamError, solver_error};
use crate::seam::weight::EdgeWeightModel;
use ndarray::Array2;

/// Which patch supplies a pixel in the merged tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeamSide {
    /// Source side of the cut: the pixel comes from the first patch
    First,
    /// Sink side of the cut: the pixel comes from the second patch
    Second,
}

/// Per-pixel result of a solved graft
#[derive(Debug, Clone)]
pub struct SeamMask {
    sides: Array2<SeamSide>,
}

impl SeamMask {
    /// Mask width in pixels
    pub fn width(&self) -> usize {
        self.sides.ncols()
    }

    /// Mask height in pixels
    pub fn height(&self) -> usize {
        self.sides.nrows()
    }

    /// The side a pixel landed on
    ///
    /// Out-of-bounds queries report [`SeamSide::Second`], matching the
    /// free-node convention of the partition.
    pub fn side(&self, x: usize, y: usize) -> SeamSide {
        self.sides
            .get((y, x))
            .copied()
            .unwrap_or(SeamSide::Second)
    }

    /// Number of pixels on the source side
    pub fn first_count(&self) -> usize {
        self.sides
            .iter()
            .filter(|&&side| side == SeamSide::First)
            .count()
    }
}

/// A pixel grid lifted into a flow network
///
/// Holds the network by composition together with a coordinate-to-node map;
/// grid-specific queries live here while the solver stays untouched
/// underneath.
#[derive(Debug)]
pub struct SeamGraph {
    network: FlowNetwork,
    nodes: Array2<NodeId>,
    model: EdgeWeightModel,
}

impl SeamGraph {
    /// Build the grid network for a Wang tile graft
    ///
    /// # Errors
    ///
    /// Returns [`SeamError::InvalidTileSize`] unless the patches are square
    /// with an even side length, and propagates weight-model and graph
    /// construction failures.
    pub fn new(model: EdgeWeightModel, solver: SolverConfig) -> Result<Self> {
        let width = model.width();
        let height = model.height();
        if width != height || width == 0 || width % 2 != 0 {
            return Err(SeamError::InvalidTileSize { width, height });
        }

        let mut network = FlowNetwork::with_config(solver);
        let nodes = Array2::from_shape_fn((height, width), |_| network.add_node());

        let mut graph = Self {
            network,
            nodes,
            model,
        };
        graph.connect_neighbors()?;
        if graph.model.config().diagonal_edges {
            graph.connect_diagonals()?;
        }
        graph.wire_terminals()?;
        Ok(graph)
    }

    /// Tile side length in pixels
    pub fn size(&self) -> usize {
        self.nodes.ncols()
    }

    /// The underlying flow network
    pub const fn network(&self) -> &FlowNetwork {
        &self.network
    }

    /// The weight model the capacities came from
    pub const fn model(&self) -> &EdgeWeightModel {
        &self.model
    }

    /// The network node for a pixel
    ///
    /// # Errors
    ///
    /// Returns [`SeamError::InvalidParameter`] for out-of-bounds
    /// coordinates.
    pub fn node(&self, x: usize, y: usize) -> Result<NodeId> {
        self.nodes
            .get((y, x))
            .copied()
            .ok_or(SeamError::InvalidParameter {
                parameter: "position",
                value: format!("({x}, {y})"),
                reason: "outside the tile".to_string(),
            })
    }

    /// Capacity between two axis-adjacent pixels, delegated to the model
    ///
    /// # Errors
    ///
    /// Propagates weight-model failures.
    pub fn weight(&self, sx: usize, sy: usize, tx: usize, ty: usize) -> Result<f64> {
        self.model.weight(sx, sy, tx, ty)
    }

    fn connect_neighbors(&mut self) -> Result<()> {
        let size = self.size();
        for y in 0..size {
            for x in 0..size {
                let node = self.node(x, y)?;
                if x > 0 {
                    let left = self.node(x - 1, y)?;
                    let weight = self.model.weight(x - 1, y, x, y)?;
                    self.network.add_edge(left, node, weight)?;
                    self.network.add_edge(node, left, weight)?;
                }
                if y > 0 {
                    let above = self.node(x, y - 1)?;
                    let weight = self.model.weight(x, y - 1, x, y)?;
                    self.network.add_edge(node, above, weight)?;
                    self.network.add_edge(above, node, weight)?;
                }
            }
        }
        Ok(())
    }

    fn capacity(&self, from: NodeId, to: NodeId) -> Result<f64> {
        self.network
            .edge(from, to)
            .map(Edge::capacity)
            .ok_or_else(|| solver_error("diagonals", &"axis edge missing during diagonal pass"))
    }

    /// Diagonal capacities as the smaller hypotenuse of the two adjacent
    /// axis-edge pairs
    fn connect_diagonals(&mut self) -> Result<()> {
        let size = self.size();
        for x in 0..size {
            for y in 1..size {
                let node = self.node(x, y)?;
                let above = self.node(x, y - 1)?;
                let above_weight = self.capacity(node, above)?;

                if x > 0 {
                    let left = self.node(x - 1, y)?;
                    let corner = self.node(x - 1, y - 1)?;
                    let left_weight = self.capacity(node, left)?;
                    let left_up = self.capacity(left, corner)?;
                    let up_left = self.capacity(above, corner)?;
                    let weight = left_weight
                        .hypot(left_up)
                        .min(above_weight.hypot(up_left));
                    self.network.add_edge(node, corner, weight)?;
                    self.network.add_edge(corner, node, weight)?;
                }
                if x < size - 1 {
                    let right = self.node(x + 1, y)?;
                    let corner = self.node(x + 1, y - 1)?;
                    let right_weight = self.capacity(node, right)?;
                    let right_up = self.capacity(right, corner)?;
                    let up_right = self.capacity(above, corner)?;
                    let weight = right_weight
                        .hypot(right_up)
                        .min(above_weight.hypot(up_right));
                    self.network.add_edge(node, corner, weight)?;
                    self.network.add_edge(corner, node, weight)?;
                }
            }
        }
        Ok(())
    }

    /// Wire the Wang terminal layout
    ///
    /// All four borders feed SOURCE (corners wired exactly once); the two
    /// interior diagonals feed SINK. With an even side length the diagonals
    /// never intersect a border pixel or each other, so no node is wired to
    /// both terminals.
    fn wire_terminals(&mut self) -> Result<()> {
        let size = self.size();
        for x in 0..size {
            let top = self.node(x, 0)?;
            let bottom = self.node(x, size - 1)?;
            self.network.set_multi_source(top)?;
            self.network.set_multi_source(bottom)?;
        }
        for y in 1..size - 1 {
            let left = self.node(0, y)?;
            let right = self.node(size - 1, y)?;
            self.network.set_multi_source(left)?;
            self.network.set_multi_source(right)?;
        }
        for i in 1..size - 1 {
            let falling = self.node(i, i)?;
            let rising = self.node(i, size - 1 - i)?;
            self.network.set_multi_sink(falling)?;
            self.network.set_multi_sink(rising)?;
        }
        Ok(())
    }

    /// Solve the network and read the partition back as a pixel mask
    ///
    /// # Errors
    ///
    /// Propagates solver failures, including the single-use rejection on a
    /// second call.
    pub fn compute_graft(&mut self) -> Result<SeamMask> {
        self.network.solve()?;

        let size = self.size();
        let mut sides = Array2::from_elem((size, size), SeamSide::Second);
        for y in 0..size {
            for x in 0..size {
                let node = self.node(x, y)?;
                if self.network.is_source_side(node)
                    && let Some(slot) = sides.get_mut((y, x))
                {
                    *slot = SeamSide::First;
                }
            }
        }
        Ok(SeamMask { sides })
    }

    /// Total flow of the solved network
    pub fn max_flow(&self) -> f64 {
        self.network.max_flow()
    }
}

#[cfg(test)]
mod tests {
    use super::{SeamGraph, SeamSide};
    use crate::flow::SolverConfig;
    use crate::io::error::Result;
    use crate::pixel::PixelGrid;
    use crate::seam::weight::{EdgeWeightModel, WeightConfig};
    use image::{Rgba, RgbaImage};

    fn model(side: u32) -> Result<EdgeWeightModel> {
        let a = PixelGrid::new(RgbaImage::from_pixel(side, side, Rgba([40, 80, 120, 255])));
        let b = PixelGrid::new(RgbaImage::from_pixel(side, side, Rgba([120, 80, 40, 255])));
        EdgeWeightModel::new(a, b, None, WeightConfig::default())
    }

    #[test]
    fn odd_or_rectangular_tiles_are_rejected() -> Result<()> {
        let graph = SeamGraph::new(model(7)?, SolverConfig::default());
        assert!(graph.is_err());

        let a = PixelGrid::new(RgbaImage::new(8, 6));
        let b = PixelGrid::new(RgbaImage::new(8, 6));
        let rectangular = EdgeWeightModel::new(a, b, None, WeightConfig::default())?;
        assert!(SeamGraph::new(rectangular, SolverConfig::default()).is_err());
        Ok(())
    }

    #[test]
    fn grid_nodes_and_edges_are_complete() -> Result<()> {
        let graph = SeamGraph::new(model(6)?, SolverConfig::default())?;
        // 36 pixels + 2 terminals
        assert_eq!(graph.network().node_count(), 38);

        // Interior off-diagonal pixels see exactly their four neighbors
        let interior = graph.node(1, 2)?;
        assert_eq!(graph.network().neighbors(interior).len(), 4);

        // Diagonal pixels pick up the extra sink link
        let seam_target = graph.node(3, 3)?;
        assert_eq!(graph.network().neighbors(seam_target).len(), 5);
        Ok(())
    }

    #[test]
    fn diagonal_edges_extend_connectivity() -> Result<()> {
        let a = PixelGrid::new(RgbaImage::from_pixel(6, 6, Rgba([0, 0, 0, 255])));
        let b = PixelGrid::new(RgbaImage::from_pixel(6, 6, Rgba([255, 255, 255, 255])));
        let config = WeightConfig {
            diagonal_edges: true,
            ..WeightConfig::default()
        };
        let eight = EdgeWeightModel::new(a, b, None, config)?;
        let graph = SeamGraph::new(eight, SolverConfig::default())?;

        let interior = graph.node(1, 2)?;
        // Four axis neighbors plus four diagonal corners
        assert_eq!(graph.network().neighbors(interior).len(), 8);
        Ok(())
    }

    #[test]
    fn graft_labels_every_pixel() -> Result<()> {
        let mut graph = SeamGraph::new(model(6)?, SolverConfig::default())?;
        let mask = graph.compute_graft()?;

        assert_eq!(mask.width(), 6);
        assert_eq!(mask.height(), 6);
        // Border pixels carry infinite source wiring
        assert_eq!(mask.side(0, 0), SeamSide::First);
        assert_eq!(mask.side(5, 3), SeamSide::First);
        // Sink-wired diagonal pixels stay with the second patch
        assert_eq!(mask.side(2, 2), SeamSide::Second);
        Ok(())
    }
}
