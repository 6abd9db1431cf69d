use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use covmerge::{merge_all, parse_coverage, write_coverage};

const DEFAULT_OUTPUT: &str = "coverage.xml";

#[derive(Parser)]
#[command(name = "covmerge")]
#[command(about = "Utility to merge multiple Cobertura coverage XML files into one")]
#[command(version)]
struct Cli {
    /// Input Cobertura XML files, merged left to right
    #[arg(value_name = "input.xml", required = true)]
    inputs: Vec<PathBuf>,

    /// Output path for the merged report
    #[arg(short, long, value_name = "coverage.xml", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut inputs = Vec::with_capacity(cli.inputs.len());
    for path in &cli.inputs {
        let coverage = parse_coverage(path)
            .with_context(|| format!("Could not load {}", path.display()))?;
        inputs.push(coverage);
    }

    let merged = merge_all(&inputs)?;

    write_coverage(&merged, &cli.output)
        .with_context(|| format!("Could not write {}", cli.output.display()))?;

    println!(
        "{} Merged {} report(s) into {}",
        "✓".green(),
        cli.inputs.len(),
        cli.output.display().to_string().cyan()
    );

    Ok(())
}
