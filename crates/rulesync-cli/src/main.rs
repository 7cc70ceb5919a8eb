use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod output;

#[derive(Parser)]
#[command(
    name = "rulesync",
    version,
    about = "Keep rules, commands and subagents in sync across AI coding assistants"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: output::OutputFormat,

    /// Project root containing .rulesync/ and rulesync.json
    #[arg(long, global = true, env = "RULESYNC_ROOT", default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: commands::Commands,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        commands::Commands::Init(args) => commands::init::run(args, &cli.root),
        commands::Commands::Generate(args) => commands::generate::run(args, &cli.root, cli.format),
        commands::Commands::Import(args) => commands::import::run(args, &cli.root, cli.format),
        commands::Commands::Tools => commands::tools::run(&cli.root, cli.format),
        commands::Commands::Config => commands::config::run(&cli.root, cli.format),
    }
}
