//! # textcde: Enrichment from the Command Line
//!
//! Thin entrypoint. All logic lives in the `textcde_cli` library crate.

use anyhow::Result;
use clap::Parser;
use textcde_cli::{run, Cli};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the command's output.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive("textcde=info".parse()?))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("[textcde error] Failed to execute command: {e:?}");
        std::process::exit(1);
    }

    Ok(())
}
