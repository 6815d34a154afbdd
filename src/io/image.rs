//! PNG pair loading and merged tile export

use crate::io::error::{Result, SeamError};
use crate::pixel::PixelGrid;
use crate::seam::{SeamMask, SeamSide};
use image::{Rgba, RgbaImage};
use std::path::Path;

// Two-tone mask rendering: source side in cyan, sink side in charcoal
const MASK_FIRST_COLOR: [u8; 4] = [0, 255, 255, 255];
const MASK_SECOND_COLOR: [u8; 4] = [40, 40, 40, 255];

/// Load a patch image from disk, decoding to RGBA
///
/// # Errors
///
/// Returns [`SeamError::ImageLoad`] when the file cannot be opened or
/// decoded.
pub fn load_patch(path: &Path) -> Result<PixelGrid> {
    let decoded = image::open(path).map_err(|e| SeamError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(PixelGrid::new(decoded.to_rgba8()))
}

/// Merge the two patches through a solved seam mask
///
/// Source-side pixels come from the first patch, sink-side pixels from the
/// second.
///
/// # Errors
///
/// Returns [`SeamError::DimensionMismatch`] when the patches and mask do
/// not share dimensions.
pub fn compose_tile(
    first: &PixelGrid,
    second: &PixelGrid,
    mask: &SeamMask,
) -> Result<RgbaImage> {
    let (width, height) = first.dimensions();
    if second.dimensions() != (width, height) {
        return Err(SeamError::DimensionMismatch {
            first: first.dimensions(),
            second: second.dimensions(),
        });
    }
    if (mask.width(), mask.height()) != (width, height) {
        return Err(SeamError::DimensionMismatch {
            first: first.dimensions(),
            second: (mask.width(), mask.height()),
        });
    }

    let mut tile = RgbaImage::new(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            let color = match mask.side(x, y) {
                SeamSide::First => first.color(x, y),
                SeamSide::Second => second.color(x, y),
            };
            tile.put_pixel(x as u32, y as u32, Rgba(color));
        }
    }
    Ok(tile)
}

/// Render a seam mask as a two-tone image for inspection
pub fn mask_image(mask: &SeamMask) -> RgbaImage {
    let mut out = RgbaImage::new(mask.width() as u32, mask.height() as u32);
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            let color = match mask.side(x, y) {
                SeamSide::First => MASK_FIRST_COLOR,
                SeamSide::Second => MASK_SECOND_COLOR,
            };
            out.put_pixel(x as u32, y as u32, Rgba(color));
        }
    }
    out
}

/// Save an image as PNG, creating parent directories as needed
///
/// # Errors
///
/// Returns [`SeamError::FileSystem`] when the parent directory cannot be
/// created and [`SeamError::ImageExport`] when encoding or writing fails.
pub fn export_png(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| SeamError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    image.save(path).map_err(|e| SeamError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
