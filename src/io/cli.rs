//! Command-line interface for computing a Wang tile graft from two patches

use crate::flow::SolverConfig;
use crate::io::configuration::{
    DEFAULT_ROUNDING_TOLERANCE, DEFAULT_TERMINAL_BOOST, DEFAULT_TERMINAL_DECAY, OUTPUT_SUFFIX,
};
use crate::io::error::{Result, SeamError};
use crate::io::image::{compose_tile, export_png, load_patch, mask_image};
use crate::io::progress::ProgressManager;
use crate::io::visualization::export_debug_maps;
use crate::seam::{EdgeWeightModel, SeamGraph, WeightConfig};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "seamtile")]
#[command(
    author,
    version,
    about = "Blend two image patches along a minimum-cost seam"
)]
/// Command-line arguments for the tile blending tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// First patch PNG; supplies the tile border (source side)
    #[arg(value_name = "IMAGE_A")]
    pub first: PathBuf,

    /// Second patch PNG; supplies the diagonal core (sink side)
    #[arg(value_name = "IMAGE_B")]
    pub second: PathBuf,

    /// Output path for the merged tile (defaults to <IMAGE_A stem>_tile.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Weight-bias image overriding the color/gradient model
    #[arg(short, long)]
    pub bias: Option<PathBuf>,

    /// Connect diagonal neighbors (8-connected grid)
    #[arg(short, long)]
    pub diagonal: bool,

    /// Disable gradient scaling of edge weights
    #[arg(short, long)]
    pub flat_weights: bool,

    /// Weight multiplier on terminal zones
    #[arg(long, default_value_t = DEFAULT_TERMINAL_BOOST)]
    pub boost: f64,

    /// Per-step decay of the terminal multiplier
    #[arg(long, default_value_t = DEFAULT_TERMINAL_DECAY)]
    pub decay: f64,

    /// Residual capacity rounding tolerance
    #[arg(long, default_value_t = DEFAULT_ROUNDING_TOLERANCE)]
    pub tolerance: f64,

    /// Export the seam mask next to the tile
    #[arg(short, long)]
    pub mask: bool,

    /// Directory for debug weight/gradient maps
    #[arg(long, value_name = "DIR")]
    pub debug_maps: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    fn validate(&self) -> Result<()> {
        if !self.boost.is_finite() || self.boost < 1.0 {
            return Err(SeamError::InvalidParameter {
                parameter: "boost",
                value: format!("{}", self.boost),
                reason: "terminal boost must be finite and at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.decay) {
            return Err(SeamError::InvalidParameter {
                parameter: "decay",
                value: format!("{}", self.decay),
                reason: "decay must lie in 0..=1".to_string(),
            });
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(SeamError::InvalidParameter {
                parameter: "tolerance",
                value: format!("{}", self.tolerance),
                reason: "tolerance must be a positive finite value".to_string(),
            });
        }
        Ok(())
    }

    fn weight_config(&self) -> WeightConfig {
        WeightConfig {
            terminal_boost: self.boost,
            terminal_decay: self.decay,
            gradient_scaling: !self.flat_weights,
            diagonal_edges: self.diagonal,
        }
    }

    fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            tolerance: self.tolerance,
        }
    }
}

/// Derive the default output path from the first patch
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "tile".to_string(), |s| s.to_string_lossy().to_string());
    let file_name = format!("{stem}{OUTPUT_SUFFIX}.png");
    input.with_file_name(file_name)
}

/// Orchestrates one graft: load, build, solve, compose, export
pub struct GraftProcessor {
    cli: Cli,
    progress: Option<ProgressManager>,
}

impl GraftProcessor {
    /// Create a processor from parsed CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress = cli.should_show_progress().then(ProgressManager::new);
        Self { cli, progress }
    }

    /// Run the graft end to end
    ///
    /// # Errors
    ///
    /// Returns an error when argument validation, image loading, graph
    /// construction, solving, or export fails.
    pub fn process(&mut self) -> Result<()> {
        self.cli.validate()?;

        let first = load_patch(&self.cli.first)?;
        let second = load_patch(&self.cli.second)?;
        let bias = self.cli.bias.as_deref().map(load_patch).transpose()?;

        let model = EdgeWeightModel::new(first, second, bias, self.cli.weight_config())?;

        let build = self
            .progress
            .as_ref()
            .map(|pm| pm.spinner("building grid"));
        let mut graph = SeamGraph::new(model, self.cli.solver_config())?;
        if let Some(bar) = build {
            bar.finish_with_message("grid built");
        }

        let solve = self.progress.as_ref().map(|pm| pm.spinner("solving"));
        let mask = graph.compute_graft()?;
        if let Some(bar) = solve {
            bar.finish_with_message(format!("solved, max flow {:.3}", graph.max_flow()));
        }

        let tile = compose_tile(graph.model().first(), graph.model().second(), &mask)?;
        let output = self
            .cli
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.cli.first));

        let artifacts =
            1 + u64::from(self.cli.mask) + u64::from(self.cli.debug_maps.is_some());
        let export = self
            .progress
            .as_ref()
            .map(|pm| pm.stage("exporting", artifacts));

        export_png(&tile, &output)?;
        if let Some(bar) = &export {
            bar.inc(1);
        }
        if self.cli.mask {
            let mask_path = output.with_extension("mask.png");
            export_png(&mask_image(&mask), &mask_path)?;
            if let Some(bar) = &export {
                bar.inc(1);
            }
        }
        if let Some(directory) = &self.cli.debug_maps {
            export_debug_maps(graph.model(), directory)?;
            if let Some(bar) = &export {
                bar.inc(1);
            }
        }
        if let Some(bar) = &export {
            bar.finish_with_message("exported");
        }

        if let Some(pm) = &self.progress {
            pm.announce(&format!("wrote {}", output.display()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::default_output_path;
    use std::path::Path;

    #[test]
    fn output_path_appends_suffix() {
        let out = default_output_path(Path::new("patches/alpha.png"));
        assert_eq!(out, Path::new("patches/alpha_tile.png"));
    }
}
