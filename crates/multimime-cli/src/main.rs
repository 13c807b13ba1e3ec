//! CLI entry point - the composition root.
//!
//! This is the ONLY place where adapters are wired together via bootstrap.
//! Command dispatch routes to handlers which delegate to the core.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use multimime_cli::handlers::check::CheckArgs;
use multimime_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads MULTIMIME_REGISTRY
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    // No command provided - show help
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(true);
    };

    match command {
        Commands::Check {
            file,
            name,
            sniffed,
            actor,
            allow,
            no_sniff,
            json,
        } => {
            let mut config = CliConfig::new(cli.registry);
            if no_sniff {
                config = config.without_sniffing();
            }
            let ctx = bootstrap(config);
            let args = CheckArgs {
                file,
                name,
                sniffed,
                actor,
                allow,
                json,
            };
            handlers::check::execute(&ctx, args).await
        }
        Commands::Table { json } => {
            let ctx = bootstrap(CliConfig::new(cli.registry));
            handlers::table::execute(&ctx, json)
        }
        Commands::Registry { command } => {
            let ctx = bootstrap(CliConfig::new(cli.registry));
            handlers::registry::execute(&ctx, command)
        }
    }
}
