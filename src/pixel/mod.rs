//! Pixel-level image access
//!
//! Wraps a decoded RGBA buffer behind a read-only view that caches per-pixel
//! Lab colors and evaluates directional Sobel gradients with edge clamping.

/// Read-only pixel grid with Lab cache and gradients
pub mod grid;

pub use grid::PixelGrid;
