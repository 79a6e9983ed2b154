use clap::Parser;
use tracing_subscriber::EnvFilter;

use muun::cli::Cli;

fn main() {
    // stdout carries command output (and --json), so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("MUUN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = muun::run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
