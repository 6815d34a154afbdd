//! sRGB to CIE Lab conversion and perceptual distance
//!
//! Standard D65 two-degree observer constants. Distances are plain Euclidean
//! in Lab space, which is close enough to ΔE*76 for seam-cost purposes.

/// A color in CIE Lab space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    /// Lightness, 0..=100
    pub l: f64,
    /// Green-red opponent axis
    pub a: f64,
    /// Blue-yellow opponent axis
    pub b: f64,
}

impl Lab {
    /// Components as an array, in `[l, a, b]` order
    pub const fn to_array(self) -> [f64; 3] {
        [self.l, self.a, self.b]
    }
}

// sRGB linearization breakpoint
const SRGB_THRESHOLD: f64 = 0.04045;
// Lab cube-root breakpoint
const LAB_THRESHOLD: f64 = 0.008_856;
// D65 reference white
const WHITE_X: f64 = 95.047;
const WHITE_Y: f64 = 100.0;
const WHITE_Z: f64 = 108.883;

fn linearize(channel: f64) -> f64 {
    if channel > SRGB_THRESHOLD {
        ((channel + 0.055) / 1.055).powf(2.4)
    } else {
        channel / 12.92
    }
}

/// Convert an 8-bit sRGB color to XYZ (0..~100 per channel)
pub fn rgb_to_xyz(rgb: [u8; 3]) -> [f64; 3] {
    let r = linearize(f64::from(rgb[0]) / 255.0) * 100.0;
    let g = linearize(f64::from(rgb[1]) / 255.0) * 100.0;
    let b = linearize(f64::from(rgb[2]) / 255.0) * 100.0;

    [
        r.mul_add(0.4124, g.mul_add(0.3576, b * 0.1805)),
        r.mul_add(0.2126, g.mul_add(0.7152, b * 0.0722)),
        r.mul_add(0.0193, g.mul_add(0.1192, b * 0.9505)),
    ]
}

fn lab_f(t: f64) -> f64 {
    if t > LAB_THRESHOLD {
        t.cbrt()
    } else {
        7.787_f64.mul_add(t, 16.0 / 116.0)
    }
}

/// Convert an XYZ color to CIE Lab
pub fn xyz_to_lab(xyz: [f64; 3]) -> Lab {
    let fx = lab_f(xyz[0] / WHITE_X);
    let fy = lab_f(xyz[1] / WHITE_Y);
    let fz = lab_f(xyz[2] / WHITE_Z);

    Lab {
        l: 116.0_f64.mul_add(fy, -16.0),
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Convert an 8-bit sRGB color directly to Lab
pub fn rgb_to_lab(rgb: [u8; 3]) -> Lab {
    xyz_to_lab(rgb_to_xyz(rgb))
}

/// Euclidean norm of a 3-vector
pub fn magnitude(v: [f64; 3]) -> f64 {
    v[0].mul_add(v[0], v[1].mul_add(v[1], v[2] * v[2])).sqrt()
}

/// Perceptual distance between two Lab colors (Euclidean, ΔE*76)
pub fn delta_e(c1: Lab, c2: Lab) -> f64 {
    magnitude([c1.l - c2.l, c1.a - c2.a, c1.b - c2.b])
}

#[cfg(test)]
mod tests {
    use super::{Lab, delta_e, magnitude, rgb_to_lab, rgb_to_xyz};

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn white_maps_to_reference_white() {
        let xyz = rgb_to_xyz([255, 255, 255]);
        assert_close(xyz[0], 95.047, 0.01);
        assert_close(xyz[1], 100.0, 0.01);
        assert_close(xyz[2], 108.883, 0.01);

        let lab = rgb_to_lab([255, 255, 255]);
        assert_close(lab.l, 100.0, 0.01);
        assert_close(lab.a, 0.0, 0.01);
        assert_close(lab.b, 0.0, 0.01);
    }

    #[test]
    fn black_has_zero_lightness() {
        let lab = rgb_to_lab([0, 0, 0]);
        assert_close(lab.l, 0.0, 0.01);
        assert_close(lab.a, 0.0, 0.01);
        assert_close(lab.b, 0.0, 0.01);
    }

    #[test]
    fn mid_gray_is_neutral() {
        let lab = rgb_to_lab([119, 119, 119]);
        assert_close(lab.a, 0.0, 0.05);
        assert_close(lab.b, 0.0, 0.05);
        assert!(lab.l > 40.0 && lab.l < 60.0, "gray lightness {}", lab.l);
    }

    #[test]
    fn primary_red_reference_values() {
        // Reference values from the standard sRGB/D65 tables
        let lab = rgb_to_lab([255, 0, 0]);
        assert_close(lab.l, 53.24, 0.1);
        assert_close(lab.a, 80.09, 0.1);
        assert_close(lab.b, 67.20, 0.1);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let red = rgb_to_lab([200, 30, 30]);
        let blue = rgb_to_lab([30, 30, 200]);
        assert_close(delta_e(red, red), 0.0, 1e-12);
        assert_close(delta_e(red, blue), delta_e(blue, red), 1e-12);
        assert!(delta_e(red, blue) > 50.0);
    }

    #[test]
    fn magnitude_of_unit_axes() {
        assert_close(magnitude([3.0, 4.0, 0.0]), 5.0, 1e-12);
        let lab = Lab {
            l: 1.0,
            a: 0.0,
            b: 0.0,
        };
        assert_close(magnitude(lab.to_array()), 1.0, 1e-12);
    }
}
