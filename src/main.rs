#![forbid(unsafe_code)]
//! # Ticket Insights CLI
//!
//! Command-line front end for the `ticket_insights` crate. Point it at a
//! ticket export (CSV, TSV, XLSX, XLS, ODS or best-effort Numbers) or at a
//! directory to search, and it prints the analysis report and writes
//! `ticket_insights.json` next to the input.
//!
//! ## Example
//! ```bash
//! cargo run --release -- exports/ --prefix Q425 --prefix tickets
//! ```
//!
//! See `--help` for all available options.

use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process;
use ticket_insights::{
    AnalysisOptions, DEFAULT_OUTPUT_NAME, DirectorySearch, ExplicitPath, TicketSource,
    render_report, run_pipeline,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Ticket file, or a directory to search for one
    path: PathBuf,

    /// Name of the summary file written beside the input
    #[arg(long, default_value = DEFAULT_OUTPUT_NAME)]
    output: String,

    /// File-name prefixes to look for when PATH is a directory, in order of preference
    #[arg(long = "prefix", default_values_t = vec!["tickets".to_string()])]
    prefixes: Vec<String>,

    /// How deep to search when PATH is a directory
    #[arg(long, default_value_t = 1)]
    depth: usize,

    /// Do not print the report (default: false)
    #[arg(long, default_value_t = false)]
    no_report: bool,

    /// Run the analyzers one after another instead of in parallel
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let opts = AnalysisOptions {
        parallel: !cli.sequential,
        output_name: cli.output.clone(),
        ..AnalysisOptions::default()
    };

    let source: Box<dyn TicketSource> = if cli.path.is_dir() {
        Box::new(DirectorySearch::new(&cli.path, cli.prefixes.clone(), cli.depth))
    } else {
        Box::new(ExplicitPath(cli.path.clone()))
    };

    match run_pipeline(source.as_ref(), &opts) {
        Ok(run) => {
            println!("Found ticket file: {}", run.input.display());
            println!("Loaded {} tickets", run.row_count);
            println!("Columns: {}", run.columns.join(", "));
            if !cli.no_report {
                println!();
                println!("{}", render_report(&run.insights, &opts));
            }
            if let Some(path) = run.output {
                println!("Insights saved to {}", path.display());
            }
        }
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    }
}
