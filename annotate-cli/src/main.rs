mod cli;
mod commands;
mod error;
mod input;

use clap::Parser;
use cli::{Cli, Commands};
use error::exit_with_error;

fn init_tracing(cli: &Cli) {
    // CLI tracing policy:
    //   --quiet  → always "off"
    //   --verbose → RUST_LOG if set, otherwise "info"
    //   default  → "off" (clean terminal; logs go to stderr only on request)
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = run(cli).await {
        exit_with_error(e);
    }
}

async fn run(cli: Cli) -> error::CliResult<()> {
    match cli.command {
        Commands::Plan { map, save_queries } => commands::plan::run(&map, save_queries.as_deref()),

        Commands::Run {
            map,
            endpoint,
            dry_run,
            no_verify,
            report,
        } => {
            commands::run::run(
                &map,
                endpoint.as_deref(),
                dry_run,
                !no_verify,
                report.as_deref(),
            )
            .await
        }

        Commands::Verify { map, endpoint } => {
            commands::verify::run(&map, endpoint.as_deref()).await
        }
    }
}
