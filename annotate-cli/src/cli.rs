use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "annotate", about = "Semantic annotation engine CLI", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the operation plan for a semantic map without touching the store
    Plan {
        /// Path to the semantic map (JSON)
        map: PathBuf,

        /// Write the rendered queries as .rq files into this directory
        #[arg(long, value_name = "DIR")]
        save_queries: Option<PathBuf>,
    },

    /// Execute a semantic map against the SPARQL store
    Run {
        /// Path to the semantic map (JSON)
        map: PathBuf,

        /// Override the store endpoint declared in the map
        #[arg(long)]
        endpoint: Option<String>,

        /// Plan and report without posting anything
        #[arg(long)]
        dry_run: bool,

        /// Skip the quality-control checks after insertion
        #[arg(long)]
        no_verify: bool,

        /// Write the run report (JSON) to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Run only the quality-control checks for a semantic map
    Verify {
        /// Path to the semantic map (JSON)
        map: PathBuf,

        /// Override the store endpoint declared in the map
        #[arg(long)]
        endpoint: Option<String>,
    },
}
