//! CLI entry point for minimum-cost seam tile blending

use clap::Parser;
use seamtile::io::cli::{Cli, GraftProcessor};

fn main() -> seamtile::Result<()> {
    let cli = Cli::parse();
    let mut processor = GraftProcessor::new(cli);
    processor.process()
}
