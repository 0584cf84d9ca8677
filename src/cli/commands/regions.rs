use std::time::Duration;

use crate::api::sgis::SgisClient;
use crate::api::ClientConfig;
use crate::cli::args::RegionsArgs;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;
use crate::output::format_region_summary;
use crate::progress::{messages, ProgressManager};

/// Walk the SGIS address hierarchy and save the national region tree
pub async fn execute(args: RegionsArgs, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let (service_id, security_key) = config.sgis_credentials()?;

    let client = SgisClient::new(service_id, security_key, ClientConfig::default());
    let collector = crate::collect::RegionCollector::new(client)
        .with_call_delay(Duration::from_millis(args.call_delay));

    let progress = ProgressManager::new(false);
    let spinner = progress.create_spinner(messages::CONNECTING);
    let tree = collector.collect_to_file(&args.output).await?;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    println!("{}", format_region_summary(&tree, format)?);
    println!("저장: {}", args.output.display());
    Ok(())
}
