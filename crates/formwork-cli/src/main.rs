//! # formwork CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// formwork: declarative configuration validation and the entries API.
#[derive(Parser, Debug)]
#[command(name = "formwork", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate configuration and print the resolved values.
    Check(formwork_cli::check::CheckArgs),
    /// Print the configuration JSON Schema.
    Schema(formwork_cli::schema::SchemaArgs),
    /// Validate configuration and run the HTTP API.
    Serve(formwork_cli::serve::ServeArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => formwork_cli::check::run(&args),
        Commands::Schema(args) => formwork_cli::schema::run(&args),
        Commands::Serve(args) => formwork_cli::serve::run(&args),
    }
}
