//! Ocean Pipeline - Main Entry Point

use clap::Parser;
use ocean_pipeline::cli::{cmd_info, cmd_run, Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ocean_pipeline=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { data, config, seed, target, fit_scope, report } => {
            cmd_run(&data, config.as_deref(), seed, target, fit_scope.as_deref(), report.as_deref())?;
        }
        Commands::Info { data, delimiter } => {
            cmd_info(&data, delimiter)?;
        }
    }

    Ok(())
}
