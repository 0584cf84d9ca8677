use insightforge::cli;
use insightforge::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    cli::Cli::run().await
}
