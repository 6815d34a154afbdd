//! Validates tile composition and PNG export paths

use image::{Rgba, RgbaImage};
use seamtile::Result;
use seamtile::flow::SolverConfig;
use seamtile::io::image::{compose_tile, export_png, load_patch, mask_image};
use seamtile::io::visualization::export_debug_maps;
use seamtile::pixel::PixelGrid;
use seamtile::seam::{EdgeWeightModel, SeamGraph, SeamSide, WeightConfig};

fn solid(side: u32, color: [u8; 4]) -> PixelGrid {
    PixelGrid::new(RgbaImage::from_pixel(side, side, Rgba(color)))
}

const RED: [u8; 4] = [200, 20, 20, 255];
const BLUE: [u8; 4] = [20, 20, 200, 255];

fn solved_tile() -> Result<(SeamGraph, seamtile::seam::SeamMask)> {
    let model = EdgeWeightModel::new(
        solid(6, RED),
        solid(6, BLUE),
        None,
        WeightConfig::default(),
    )?;
    let mut seam = SeamGraph::new(model, SolverConfig::default())?;
    let mask = seam.compute_graft()?;
    Ok((seam, mask))
}

#[test]
fn composed_pixels_follow_the_mask() -> Result<()> {
    let (seam, mask) = solved_tile()?;
    let tile = compose_tile(seam.model().first(), seam.model().second(), &mask)?;

    for y in 0..6 {
        for x in 0..6 {
            let expected = match mask.side(x as usize, y as usize) {
                SeamSide::First => RED,
                SeamSide::Second => BLUE,
            };
            assert_eq!(tile.get_pixel(x, y).0, expected, "pixel ({x}, {y})");
        }
    }
    Ok(())
}

#[test]
fn compose_rejects_foreign_masks() -> Result<()> {
    let (_, mask) = solved_tile()?;
    let wrong_size = solid(8, RED);
    assert!(compose_tile(&wrong_size, &wrong_size, &mask).is_err());
    Ok(())
}

#[test]
fn mask_renders_two_tones() -> Result<()> {
    let (_, mask) = solved_tile()?;
    let rendered = mask_image(&mask);

    let border = rendered.get_pixel(0, 0).0;
    let core = rendered.get_pixel(2, 2).0;
    assert_ne!(border, core);
    Ok(())
}

#[test]
fn export_roundtrips_through_png() -> Result<()> {
    let directory = tempfile::tempdir().map_err(|e| seamtile::SeamError::FileSystem {
        path: "tempdir".into(),
        operation: "create",
        source: e,
    })?;

    let (seam, mask) = solved_tile()?;
    let tile = compose_tile(seam.model().first(), seam.model().second(), &mask)?;

    // Nested directories are created on demand
    let path = directory.path().join("nested/out/tile.png");
    export_png(&tile, &path)?;
    assert!(path.exists());

    let reloaded = load_patch(&path)?;
    assert_eq!(reloaded.dimensions(), (6, 6));
    assert_eq!(reloaded.color(0, 0), RED);
    Ok(())
}

#[test]
fn debug_maps_cover_every_view() -> Result<()> {
    let directory = tempfile::tempdir().map_err(|e| seamtile::SeamError::FileSystem {
        path: "tempdir".into(),
        operation: "create",
        source: e,
    })?;

    let (seam, _) = solved_tile()?;
    export_debug_maps(seam.model(), directory.path())?;

    for name in [
        "weight_x.png",
        "weight_y.png",
        "diff.png",
        "gradient_x_a.png",
        "gradient_y_a.png",
        "gradient_x_b.png",
        "gradient_y_b.png",
    ] {
        assert!(
            directory.path().join(name).exists(),
            "missing debug map {name}"
        );
    }
    Ok(())
}

#[test]
fn missing_input_reports_load_error() {
    let result = load_patch(std::path::Path::new("does/not/exist.png"));
    assert!(matches!(result, Err(seamtile::SeamError::ImageLoad { .. })));
}
