use crate::cli::args::MonitorArgs;
use crate::error::Result;
use crate::ops::monitor;

/// Print or continuously refresh collection progress
pub async fn execute(args: MonitorArgs) -> Result<()> {
    monitor::run(&args.output, &args.regions, args.years, args.watch).await
}
