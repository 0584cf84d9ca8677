use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::types::{AssemblyRoster, Politician};
use crate::api::{ClientConfig, NaverNewsClient};
use crate::cli::args::{NewsArgs, NewsCommand};
use crate::collect::{read_required_json, NewsCollector};
use crate::config::Config;
use crate::convert::elections::ElectionData;
use crate::error::{ForgeError, Result};
use crate::progress::ProgressManager;

/// Collect news articles for each politician in a roster
pub async fn execute(args: NewsArgs) -> Result<()> {
    let config = Config::load()?;
    let (client_id, client_secret) = config.naver_credentials()?;
    let client = NaverNewsClient::new(client_id, client_secret, ClientConfig::default());

    let (members, output, per_member, suffix) = match args.command {
        NewsCommand::Assembly {
            roster,
            output,
            per_member,
            suffix,
        } => (assembly_members(&roster)?, output, per_member, suffix),
        NewsCommand::Local {
            elections,
            round,
            output,
            per_member,
            suffix,
        } => (local_members(&elections, &round)?, output, per_member, suffix),
    };

    println!("{} {}명 뉴스 수집 시작", "📰".cyan(), members.len());

    let collector = NewsCollector::new(client)
        .with_query_suffix(&suffix)
        .with_articles_per_member(per_member)
        .with_progress(Arc::new(ProgressManager::new(false)));
    let summary = collector.collect(&members, &output).await?;

    println!(
        "{} {}명 처리, 신규 기사 {}건, 실패 {}명",
        "✅".green(),
        summary.members,
        summary.new_articles,
        summary.failed_members
    );
    println!("저장: {}", output.display());
    Ok(())
}

fn assembly_members(roster_path: &Path) -> Result<Vec<Politician>> {
    let roster: AssemblyRoster = read_required_json(roster_path)?;
    Ok(roster.all_members())
}

fn local_members(elections_path: &PathBuf, round: &str) -> Result<Vec<Politician>> {
    let elections: ElectionData = read_required_json(elections_path)?;
    let local = elections.local_elections.get(round).ok_or_else(|| {
        ForgeError::NotFound(format!("Local election round {} not in {}", round, elections_path.display()))
    })?;

    let mut members = Vec::new();
    for group in [&local.si_uiwon, &local.gu_uiwon, &local.mayors] {
        for district_members in group.values() {
            members.extend(district_members.iter().cloned());
        }
    }
    Ok(members)
}
