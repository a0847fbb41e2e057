use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use stlvertex::config::Config;
use stlvertex::processor;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Binary STL files to convert; each gets a sibling .vertex file
    #[arg(required = true, value_name = "FILES")]
    inputs: Vec<PathBuf>,
}

fn init_logger() {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stderr);
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    if let Err(err) = builder.try_init() {
        eprintln!("Failed to initialize logger: {}", err);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger();

    let config = Config::default();
    let outcomes = processor::convert_files(cli.inputs.as_slice(), &config);

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => log::info!(
                "Exported {} triangles to {}",
                report.stats.triangles,
                report.output.display()
            ),
            Err(e) => {
                failed += 1;
                log::error!("{}: {}", outcome.input.display(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed to convert", failed, outcomes.len());
    }

    Ok(())
}
