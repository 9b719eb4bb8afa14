//! # Zaynar Storefront CLI
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        zaynar                                           │
//! │                                                                         │
//! │  argv ──► Cli (clap) ──► StorefrontConfig ──► Catalog                   │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                         SQLite kv_store ◄──► CartStore ──► stdout       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each invocation restores the saved bag, runs one command and exits.

use anyhow::Context;
use clap::Parser;
use zaynar_storefront::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    zaynar_storefront::init_tracing();

    let cli = Cli::parse();
    let output = zaynar_storefront::run(cli)
        .await
        .context("zaynar command failed")?;

    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
