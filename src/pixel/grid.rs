//! Read-only view over an RGBA buffer with cached Lab colors
//!
//! The Lab cache is filled eagerly at construction: every pixel is consulted
//! several times during edge weighting (once per incident edge, plus the 3×3
//! gradient neighborhoods), so the one-time conversion pays for itself on
//! even the smallest tiles.

use crate::color::{Lab, rgb_to_lab};
use crate::io::error::{Result, SeamError};
use image::RgbaImage;
use ndarray::Array2;

// Sobel kernels, indexed [row][col] with the row axis along y
const SOBEL_POS_X: [[f64; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_POS_Y: [[f64; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Read-only pixel view over a decoded RGBA image
///
/// Exposes raw colors, cached Lab colors, and directional 3×3 gradients.
/// All sampling is edge-clamped: coordinates outside the buffer resolve to
/// the nearest border pixel.
#[derive(Debug, Clone)]
pub struct PixelGrid {
    image: RgbaImage,
    lab: Array2<Lab>,
}

impl PixelGrid {
    /// Wrap an RGBA buffer, converting every pixel to Lab up front
    pub fn new(image: RgbaImage) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let lab = Array2::from_shape_fn((height, width), |(y, x)| {
            let p = image.get_pixel(x as u32, y as u32).0;
            rgb_to_lab([p[0], p[1], p[2]])
        });

        Self { image, lab }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.image.width() as usize
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.image.height() as usize
    }

    /// Dimensions as (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// The underlying RGBA buffer
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }

    fn clamp_coords(&self, x: i64, y: i64) -> (u32, u32) {
        let cx = x.clamp(0, (self.width() as i64 - 1).max(0)) as u32;
        let cy = y.clamp(0, (self.height() as i64 - 1).max(0)) as u32;
        (cx, cy)
    }

    /// RGBA color at (x, y), edge-clamped
    pub fn color(&self, x: usize, y: usize) -> [u8; 4] {
        let (cx, cy) = self.clamp_coords(x as i64, y as i64);
        self.image.get_pixel(cx, cy).0
    }

    /// Cached Lab color at (x, y), edge-clamped
    pub fn lab(&self, x: usize, y: usize) -> Lab {
        self.lab_signed(x as i64, y as i64)
    }

    fn lab_signed(&self, x: i64, y: i64) -> Lab {
        let (cx, cy) = self.clamp_coords(x, y);
        self.lab
            .get((cy as usize, cx as usize))
            .copied()
            .unwrap_or(Lab {
                l: 0.0,
                a: 0.0,
                b: 0.0,
            })
    }

    /// Directional gradient at (x, y) via 3×3 Sobel convolution over Lab
    ///
    /// The direction must be one of the four axis steps (±1, 0) or (0, ±1);
    /// the gradient of the opposite direction is the negation, so only the
    /// kernel sign flips. Returns the per-channel Lab gradient vector.
    ///
    /// # Errors
    ///
    /// Returns [`SeamError::InvalidParameter`] when (dx, dy) is not an axis
    /// step.
    pub fn gradient(&self, x: usize, y: usize, dx: i32, dy: i32) -> Result<[f64; 3]> {
        let (kernel, flip) = match (dx, dy) {
            (1, 0) => (&SOBEL_POS_X, false),
            (-1, 0) => (&SOBEL_POS_X, true),
            (0, 1) => (&SOBEL_POS_Y, false),
            (0, -1) => (&SOBEL_POS_Y, true),
            _ => {
                return Err(SeamError::InvalidParameter {
                    parameter: "direction",
                    value: format!("({dx}, {dy})"),
                    reason: "gradient direction must be a unit axis step".to_string(),
                });
            }
        };

        let mut out = [0.0_f64; 3];
        for (ky, row) in kernel.iter().enumerate() {
            for (kx, &k) in row.iter().enumerate() {
                let sample = self.lab_signed(x as i64 + kx as i64 - 1, y as i64 + ky as i64 - 1);
                let [l, a, b] = sample.to_array();
                out[0] = k.mul_add(l, out[0]);
                out[1] = k.mul_add(a, out[1]);
                out[2] = k.mul_add(b, out[2]);
            }
        }

        if flip {
            out = [-out[0], -out[1], -out[2]];
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::PixelGrid;
    use crate::color::magnitude;
    use image::RgbaImage;

    fn ramp_image() -> PixelGrid {
        // Horizontal lightness ramp: gradient along x, flat along y
        let image = RgbaImage::from_fn(8, 8, |x, _| image::Rgba([(x * 30) as u8, 0, 0, 255]));
        PixelGrid::new(image)
    }

    #[test]
    fn horizontal_ramp_has_x_gradient_only() {
        let grid = ramp_image();
        let gx = grid.gradient(4, 4, 1, 0).map(magnitude).unwrap_or(0.0);
        let gy = grid.gradient(4, 4, 0, 1).map(magnitude).unwrap_or(f64::MAX);
        assert!(gx > 1.0, "expected strong x gradient, got {gx}");
        assert!(gy < 1e-9, "expected flat y gradient, got {gy}");
    }

    #[test]
    fn opposite_directions_negate() {
        let grid = ramp_image();
        let pos = grid.gradient(3, 3, 1, 0).unwrap_or([0.0; 3]);
        let neg = grid.gradient(3, 3, -1, 0).unwrap_or([0.0; 3]);
        for (p, n) in pos.iter().zip(&neg) {
            assert!((p + n).abs() < 1e-12);
        }
    }

    #[test]
    fn diagonal_direction_is_rejected() {
        let grid = ramp_image();
        assert!(grid.gradient(2, 2, 1, 1).is_err());
        assert!(grid.gradient(2, 2, 0, 0).is_err());
    }

    #[test]
    fn sampling_is_edge_clamped() {
        let grid = ramp_image();
        // Corner gradients must not read out of bounds; clamping keeps them finite
        for &(x, y) in &[(0, 0), (7, 0), (0, 7), (7, 7)] {
            let g = grid.gradient(x, y, 0, 1).unwrap_or([f64::NAN; 3]);
            assert!(g.iter().all(|c| c.is_finite()));
        }
    }
}
