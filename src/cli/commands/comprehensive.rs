use colored::Colorize;

use crate::api::sgis::SgisClient;
use crate::api::types::RegionTree;
use crate::api::ClientConfig;
use crate::cli::args::ComprehensiveArgs;
use crate::collect::{read_required_json, ComprehensiveCollector};
use crate::config::Config;
use crate::error::Result;

/// Collect one census year with the region tree's naming context attached
pub async fn execute(args: ComprehensiveArgs) -> Result<()> {
    let config = Config::load()?;
    let (service_id, security_key) = config.sgis_credentials()?;

    let tree: RegionTree = read_required_json(&args.regions)?;

    let client = SgisClient::new(service_id, security_key, ClientConfig::default());
    let collector = ComprehensiveCollector::new(client).with_workers(args.workers);
    let stats = collector.stats();

    let output = collector.collect(&tree, &args.year, &args.output).await?;

    println!(
        "{} {}년 종합 통계: {}개 지역 ({}건 오류)",
        "✅".green(),
        args.year,
        output.metadata.total_regions,
        stats.errors()
    );
    println!("저장: {}", args.output.display());
    Ok(())
}
