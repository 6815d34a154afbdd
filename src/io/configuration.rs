//! Tuning constants and runtime configuration defaults

// Numeric policy
/// Rounding tolerance for residual capacity comparisons
///
/// Capacities are continuous image-derived measurements; repeated
/// additions and subtractions accumulate drift that this absorbs when a
/// residual is compared against or clamped to zero.
pub const DEFAULT_ROUNDING_TOLERANCE: f64 = 0.001;

// Edge weighting
/// Weight multiplier applied on terminal-adjacent zones
pub const DEFAULT_TERMINAL_BOOST: f64 = 5.0;
/// Per-step decay of the terminal multiplier away from a terminal zone
pub const DEFAULT_TERMINAL_DECAY: f64 = 0.6;
/// Floor added to bias-image luminance when a weight bias is supplied
pub const BIAS_WEIGHT_FLOOR: f64 = 0.1;
/// Smallest allowed gradient divisor, guarding flat regions
pub const GRADIENT_SUM_FLOOR: f64 = 1e-6;

// Debug map normalization ceilings
/// Largest representable Lab color difference, scaled down for contrast
pub const DIFF_MAP_CEILING_DIVISOR: f64 = 4.0;
/// Gradient maps are normalized against the magnitude of this Lab extreme
pub const GRADIENT_MAP_CEILING: [f64; 3] = [100.0, -128.0, -128.0];
/// Weight maps are normalized against this multiple of the mean weight
pub const WEIGHT_MAP_MEAN_MULT: f64 = 2.0;

// Output settings
/// Suffix added to output filenames when no explicit output is given
pub const OUTPUT_SUFFIX: &str = "_tile";
