use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use env_logger::Env;
use log::info;
use variant_gen::{GenerateOptions, generate_tree};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Expand *.dtype.* templates into per-datatype source files"
)]
struct Cli {
    /// Root directory containing *.dtype.* template files
    #[arg(value_name = "INPUT_DIR")]
    input: PathBuf,

    /// Output directory mirroring the input tree
    #[arg(value_name = "OUTPUT_DIR")]
    output: PathBuf,

    /// Regenerate every template even if the destination is up to date
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let summary = generate_tree(GenerateOptions {
        input_root: cli.input,
        output_root: cli.output,
        force: cli.force,
    })?;
    info!(
        "Completed generation: {} template(s), {} written, {} up to date, {} failed",
        summary.templates, summary.written, summary.up_to_date, summary.failed
    );
    if summary.failed > 0 {
        bail!("{} template(s) failed to generate", summary.failed);
    }
    Ok(())
}
