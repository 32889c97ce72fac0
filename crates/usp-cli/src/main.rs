//! Entrypoint for the `usp` CLI binary.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    usp_cli::run().await
}
