//! Edge capacities derived from the two candidate patches
//!
//! The capacity of a grid edge measures how visible a seam crossing it would
//! be: the summed perceptual color difference between the patches at both
//! endpoints, optionally divided by the local gradient energy so the cut
//! prefers already-busy image regions. Edges near a terminal zone (the tile
//! border or the diagonal seam target) are boosted so the cut keeps its
//! distance from the terminals.

use crate::color::{delta_e, magnitude};
use crate::io::configuration::{
    BIAS_WEIGHT_FLOOR, DEFAULT_TERMINAL_BOOST, DEFAULT_TERMINAL_DECAY, GRADIENT_SUM_FLOOR,
};
use crate::io::error::{Result, SeamError};
use crate::pixel::PixelGrid;

/// Tuning for edge capacity computation
///
/// Passed at construction so concurrent grafts can run with different
/// tuning; nothing here is shared or mutable after construction.
#[derive(Debug, Clone, Copy)]
pub struct WeightConfig {
    /// Multiplier applied to edges on a terminal zone
    pub terminal_boost: f64,
    /// Per-step decay of the boost away from the nearest terminal zone
    pub terminal_decay: f64,
    /// Divide color differences by local gradient energy
    pub gradient_scaling: bool,
    /// Also connect diagonal neighbors (8-connected grid)
    pub diagonal_edges: bool,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            terminal_boost: DEFAULT_TERMINAL_BOOST,
            terminal_decay: DEFAULT_TERMINAL_DECAY,
            gradient_scaling: true,
            diagonal_edges: false,
        }
    }
}

/// Capacity model over two equal-size patches and an optional bias image
#[derive(Debug, Clone)]
pub struct EdgeWeightModel {
    first: PixelGrid,
    second: PixelGrid,
    bias: Option<PixelGrid>,
    config: WeightConfig,
}

impl EdgeWeightModel {
    /// Build a model over two patches, validating dimensions
    ///
    /// # Errors
    ///
    /// Returns [`SeamError::DimensionMismatch`] when the patches (or the
    /// bias image, if provided) differ in size, and
    /// [`SeamError::InvalidParameter`] for empty patches.
    pub fn new(
        first: PixelGrid,
        second: PixelGrid,
        bias: Option<PixelGrid>,
        config: WeightConfig,
    ) -> Result<Self> {
        if first.dimensions() != second.dimensions() {
            return Err(SeamError::DimensionMismatch {
                first: first.dimensions(),
                second: second.dimensions(),
            });
        }
        if first.width() == 0 || first.height() == 0 {
            return Err(SeamError::InvalidParameter {
                parameter: "patches",
                value: format!("{}x{}", first.width(), first.height()),
                reason: "patches must be non-empty".to_string(),
            });
        }
        if let Some(bias_grid) = &bias
            && bias_grid.dimensions() != first.dimensions()
        {
            return Err(SeamError::DimensionMismatch {
                first: first.dimensions(),
                second: bias_grid.dimensions(),
            });
        }

        Ok(Self {
            first,
            second,
            bias,
            config,
        })
    }

    /// The first (source-side) patch
    pub const fn first(&self) -> &PixelGrid {
        &self.first
    }

    /// The second (sink-side) patch
    pub const fn second(&self) -> &PixelGrid {
        &self.second
    }

    /// The active tuning
    pub const fn config(&self) -> &WeightConfig {
        &self.config
    }

    /// Patch width in pixels
    pub fn width(&self) -> usize {
        self.first.width()
    }

    /// Patch height in pixels
    pub fn height(&self) -> usize {
        self.first.height()
    }

    /// Perceptual difference between the two patches at one pixel
    pub fn color_difference(&self, x: usize, y: usize) -> f64 {
        delta_e(self.first.lab(x, y), self.second.lab(x, y))
    }

    /// Steps from a pixel to the nearest terminal zone
    ///
    /// Terminal zones are the outer border (wired to SOURCE) and the two
    /// diagonals of the square tile (wired to SINK).
    fn zone_distance(&self, x: usize, y: usize) -> usize {
        let w = self.width();
        let h = self.height();
        let border = x.min(y).min(w - 1 - x).min(h - 1 - y);
        let diagonal = x.abs_diff(y).min(x.abs_diff(h - 1 - y));
        border.min(diagonal)
    }

    /// Distance-decayed boost for an edge, from its nearer endpoint
    fn terminal_multiplier(&self, sx: usize, sy: usize, tx: usize, ty: usize) -> f64 {
        let steps = self.zone_distance(sx, sy).min(self.zone_distance(tx, ty));
        let boosted = self.config.terminal_boost * self.config.terminal_decay.powi(steps as i32);
        boosted.max(1.0)
    }

    /// Summed directional gradient energy at both endpoints of an edge
    fn gradient_energy(&self, sx: usize, sy: usize, tx: usize, ty: usize) -> Result<f64> {
        let dx = tx as i32 - sx as i32;
        let dy = ty as i32 - sy as i32;
        let energy = magnitude(self.first.gradient(sx, sy, dx, dy)?)
            + magnitude(self.second.gradient(sx, sy, dx, dy)?)
            + magnitude(self.first.gradient(tx, ty, dx, dy)?)
            + magnitude(self.second.gradient(tx, ty, dx, dy)?);
        Ok(energy)
    }

    /// Capacity of the grid edge between two axis-adjacent pixels
    ///
    /// With a bias image, the capacity is the floored bias luminance and
    /// the color/gradient model is bypassed entirely.
    ///
    /// # Errors
    ///
    /// Returns [`SeamError::InvalidParameter`] when the positions are not
    /// axis-adjacent and gradient scaling is enabled.
    pub fn weight(&self, sx: usize, sy: usize, tx: usize, ty: usize) -> Result<f64> {
        if let Some(bias_grid) = &self.bias {
            let luminance = f64::from(bias_grid.color(sx, sy)[0]) / 255.0;
            return Ok(BIAS_WEIGHT_FLOOR + luminance);
        }

        let mut weight = self.color_difference(sx, sy) + self.color_difference(tx, ty);
        if self.config.gradient_scaling {
            let energy = self.gradient_energy(sx, sy, tx, ty)?;
            weight /= energy.max(GRADIENT_SUM_FLOOR);
        }

        Ok(self.terminal_multiplier(sx, sy, tx, ty) * weight)
    }
}
