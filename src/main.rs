use anyhow::Result;
use planner::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
