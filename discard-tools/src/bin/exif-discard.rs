use std::process::ExitCode;

use clap::Parser;
use discard_tools::Args;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::Layer::default().compact())
        .init();

    match discard_tools::run(&args) {
        Ok(outcome) => {
            tracing::info!("{outcome:?}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error occurred while discarding Exif data: {err}");
            ExitCode::FAILURE
        }
    }
}
