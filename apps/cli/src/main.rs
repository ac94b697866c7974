//! firmscope CLI: company profiles from Czech public registries.
//!
//! Looks a company up by its registry number and prints the normalized
//! profile, discovered annual reports and public-contract context as JSON.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
