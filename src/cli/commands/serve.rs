use crate::cli::args::ServeArgs;
use crate::error::Result;

/// Serve the data directory as a JSON API
pub async fn execute(args: ServeArgs) -> Result<()> {
    crate::serve::serve(&args.host, args.port, args.data_dir).await
}
