//! CLI entry point for histogram-matched photo mosaics

use clap::Parser;
use histomosaic::io::cli::{Cli, MosaicProcessor};

fn main() -> histomosaic::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .format_timestamp_millis()
        .init();

    let processor = MosaicProcessor::new(cli);
    processor.process()
}
