//! # mdr CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::path::PathBuf;

use clap::Parser;

/// MDR Stack CLI — regulatory record validation and tamper-evident ledger.
///
/// Validates compliance records, drives gated lifecycle promotions, and
/// verifies per-record ledger chains over a JSON dataset file.
#[derive(Parser, Debug)]
#[command(name = "mdr", version, about)]
struct Cli {
    /// Path to the JSON dataset file.
    #[arg(long, global = true, default_value = "mdr-data.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run a record's validation rule set.
    Validate(mdr_cli::validate::ValidateArgs),
    /// Request a gated lifecycle transition.
    Promote(mdr_cli::promote::PromoteArgs),
    /// Apply a field patch to a record.
    Update(mdr_cli::update::UpdateArgs),
    /// Verify a record's ledger chain.
    VerifyChain(mdr_cli::verify::VerifyArgs),
    /// Write a demonstration dataset.
    Seed(mdr_cli::seed::SeedArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Validate(args) => mdr_cli::validate::run(args, &cli.data),
        Commands::Promote(args) => mdr_cli::promote::run(args, &cli.data),
        Commands::Update(args) => mdr_cli::update::run(args, &cli.data),
        Commands::VerifyChain(args) => mdr_cli::verify::run(args, &cli.data),
        Commands::Seed(args) => mdr_cli::seed::run(args, &cli.data),
    }
}
