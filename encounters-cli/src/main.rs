//! encounters CLI - runs the encounters REST backend
//!
//! Subcommands:
//! - `serve`: HTTP API over PostgreSQL or the in-memory store
//! - `completions`: shell completion scripts

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod tracing_setup;

use tracing_setup::{Telemetry, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "encounters",
    author,
    version,
    about = "REST backend for tourism encounters (social and hidden-location)",
    long_about = "Serve the encounters API: base encounters plus their social and \
                  hidden-location specializations, stored in PostgreSQL or in memory."
)]
struct Cli {
    /// Debug logging (used when RUST_LOG is not set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export spans over OTLP (needs the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let telemetry = Telemetry::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::Completions(args) => run_completions(args),
    };

    telemetry.shutdown();
    result
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
