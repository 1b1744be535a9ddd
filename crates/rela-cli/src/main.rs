//! Rela CLI
//!
//! Query an entity relationship graph snapshot from the command line.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use rela_cli::{CliArgs, RelaCli};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    let cli = RelaCli::from_args("rela", &args)?;
    cli.run(args).await?;
    Ok(())
}
