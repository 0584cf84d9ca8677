use colored::Colorize;

use crate::api::sgis::SgisClient;
use crate::api::types::RegionTree;
use crate::api::ClientConfig;
use crate::cli::args::StatsArgs;
use crate::collect::multiyear::DEFAULT_YEARS;
use crate::collect::{read_required_json, MultiyearCollector, StatsProfile};
use crate::config::Config;
use crate::error::Result;
use crate::progress::ProgressManager;
use std::sync::Arc;

/// Collect multiyear census statistics for every emdong in the region tree
pub async fn execute(args: StatsArgs) -> Result<()> {
    let profile: StatsProfile = args.profile.parse()?;

    let config = Config::load()?;
    let (service_id, security_key) = config.sgis_credentials()?;

    let tree: RegionTree = read_required_json(&args.regions)?;
    let codes = tree.emdong_codes();

    let years: Vec<String> = args
        .years
        .unwrap_or_else(|| DEFAULT_YEARS.iter().map(|y| y.to_string()).collect());

    let output = args.output.unwrap_or_else(|| {
        let name = match profile {
            StatsProfile::Core => "sgis_multiyear_stats.json",
            StatsProfile::Enhanced => "sgis_enhanced_multiyear_stats.json",
        };
        config.data_dir().join(name)
    });
    let progress = output.with_extension("progress.json");

    println!(
        "{} {} 프로파일, {}개 지역 × {}개 연도 (워커 {})",
        "📊".cyan(),
        profile.as_str(),
        codes.len(),
        years.len(),
        args.workers
    );

    let client = SgisClient::new(service_id, security_key, ClientConfig::default());
    let collector = MultiyearCollector::new(client)
        .with_workers(args.workers)
        .with_save_every(args.save_every)
        .with_progress(Arc::new(ProgressManager::new(false)));
    let stats = collector.stats();

    match profile {
        StatsProfile::Core => {
            collector
                .collect_core(&codes, &years, &output, &progress)
                .await?;
        }
        StatsProfile::Enhanced => {
            collector
                .collect_enhanced(&codes, &years, &output, &progress)
                .await?;
        }
    }

    println!(
        "{} 수집 {}건, 오류 {}건 ({:.0}개/시간)",
        "✅".green(),
        stats.collected(),
        stats.errors(),
        stats.rate_per_hour()
    );
    println!("저장: {}", output.display());
    Ok(())
}
