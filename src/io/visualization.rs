//! Debug map rendering for edge weights, gradients, and color differences
//!
//! Diagnostic views onto the weight model, exported as grayscale PNGs.
//! These exist for tuning and inspection only; nothing in the solver
//! depends on them.

use crate::color::magnitude;
use crate::io::configuration::{
    DIFF_MAP_CEILING_DIVISOR, GRADIENT_MAP_CEILING, WEIGHT_MAP_MEAN_MULT,
};
use crate::io::error::Result;
use crate::io::image::export_png;
use crate::pixel::PixelGrid;
use crate::seam::EdgeWeightModel;
use image::{Rgba, RgbaImage};
use ndarray::Array2;
use std::path::Path;

/// Which grid edge orientation a map visualizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapAxis {
    /// Edges between horizontal neighbors
    Horizontal,
    /// Edges between vertical neighbors
    Vertical,
}

impl MapAxis {
    const fn step(self) -> (usize, usize) {
        match self {
            Self::Horizontal => (1, 0),
            Self::Vertical => (0, 1),
        }
    }
}

fn grayscale(values: &Array2<f64>, ceiling: f64) -> RgbaImage {
    let mut out = RgbaImage::new(values.ncols() as u32, values.nrows() as u32);
    for ((y, x), &value) in values.indexed_iter() {
        let level = if ceiling > 0.0 {
            ((value / ceiling).min(1.0) * 255.0) as u8
        } else {
            0
        };
        out.put_pixel(x as u32, y as u32, Rgba([level, level, level, 255]));
    }
    out
}

/// Map of edge weights along one axis, normalized against the mean weight
///
/// # Errors
///
/// Propagates weight-model failures.
pub fn weight_map(model: &EdgeWeightModel, axis: MapAxis) -> Result<RgbaImage> {
    let (dx, dy) = axis.step();
    let width = model.width();
    let height = model.height();

    let mut values = Array2::zeros((height, width));
    let mut sum = 0.0;
    let mut count = 0usize;
    for y in 0..height.saturating_sub(dy) {
        for x in 0..width.saturating_sub(dx) {
            let weight = model.weight(x, y, x + dx, y + dy)?;
            if let Some(slot) = values.get_mut((y, x)) {
                *slot = weight;
            }
            sum += weight;
            count += 1;
        }
    }

    let mean = if count == 0 { 0.0 } else { sum / count as f64 };
    Ok(grayscale(&values, mean * WEIGHT_MAP_MEAN_MULT))
}

/// Map of per-pixel perceptual differences between the two patches
pub fn diff_map(model: &EdgeWeightModel) -> RgbaImage {
    let width = model.width();
    let height = model.height();

    // Normalized against the distance between the Lab extremes, scaled for
    // contrast
    let ceiling = magnitude([100.0, 255.0, 255.0]) / DIFF_MAP_CEILING_DIVISOR;

    let values = Array2::from_shape_fn((height, width), |(y, x)| model.color_difference(x, y));
    grayscale(&values, ceiling)
}

/// Map of directional gradient magnitude for one patch
///
/// # Errors
///
/// Propagates gradient evaluation failures.
pub fn gradient_map(grid: &PixelGrid, axis: MapAxis) -> Result<RgbaImage> {
    let (dx, dy) = axis.step();
    let ceiling = magnitude(GRADIENT_MAP_CEILING);

    let mut values = Array2::zeros((grid.height(), grid.width()));
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let gradient = grid.gradient(x, y, dx as i32, dy as i32)?;
            if let Some(slot) = values.get_mut((y, x)) {
                *slot = magnitude(gradient);
            }
        }
    }
    Ok(grayscale(&values, ceiling))
}

/// Export the full debug map set into a directory
///
/// Writes horizontal/vertical weight maps, the color difference map, and
/// per-patch gradient maps for both axes.
///
/// # Errors
///
/// Propagates map construction and export failures.
pub fn export_debug_maps(model: &EdgeWeightModel, directory: &Path) -> Result<()> {
    export_png(
        &weight_map(model, MapAxis::Horizontal)?,
        &directory.join("weight_x.png"),
    )?;
    export_png(
        &weight_map(model, MapAxis::Vertical)?,
        &directory.join("weight_y.png"),
    )?;
    export_png(&diff_map(model), &directory.join("diff.png"))?;

    for (grid, label) in [(model.first(), "a"), (model.second(), "b")] {
        export_png(
            &gradient_map(grid, MapAxis::Horizontal)?,
            &directory.join(format!("gradient_x_{label}.png")),
        )?;
        export_png(
            &gradient_map(grid, MapAxis::Vertical)?,
            &directory.join(format!("gradient_y_{label}.png")),
        )?;
    }
    Ok(())
}
