use futures::stream::{self, StreamExt};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use super::checkpoint::CollectionProgress;
use super::{read_json_or_default, write_json, CollectorStats};
use crate::api::sgis::{
    AgeSexRecord, CompanyRecord, HouseRecord, HouseholdRecord, PopulationRecord, SgisClient,
};
use crate::api::types::{
    AgeGroup, CompanyStats, CoreStats, EnhancedStats, HouseStats, HouseholdStats,
    MultiyearOutput, PopulationBasics,
};
use crate::api::StatsDataset;
use crate::error::Result;
use crate::progress::{messages, ProgressManager};

/// Census years covered by a default multi-year run
pub const DEFAULT_YEARS: [&str; 9] = [
    "2015", "2016", "2017", "2018", "2019", "2020", "2021", "2022", "2023",
];

/// Which dataset family a multi-year run collects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsProfile {
    /// Household, house, and company counts
    Core,
    /// Population basics plus 10-year age/sex buckets
    Enhanced,
}

impl StatsProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Enhanced => "enhanced",
        }
    }
}

impl std::str::FromStr for StatsProfile {
    type Err = crate::error::ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "core" => Ok(Self::Core),
            "enhanced" => Ok(Self::Enhanced),
            other => Err(crate::error::ForgeError::InvalidInput(format!(
                "Unknown stats profile: {} (expected core or enhanced)",
                other
            ))),
        }
    }
}

/// Collects per-emdong statistics for a span of census years, resumable at
/// region granularity.
pub struct MultiyearCollector {
    client: Arc<SgisClient>,
    workers: usize,
    save_every: usize,
    stats: Arc<CollectorStats>,
    progress: Option<Arc<ProgressManager>>,
}

impl MultiyearCollector {
    pub fn new(client: SgisClient) -> Self {
        Self {
            client: Arc::new(client),
            workers: 8,
            save_every: 100,
            stats: Arc::new(CollectorStats::new()),
            progress: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_save_every(mut self, save_every: usize) -> Self {
        self.save_every = save_every.max(1);
        self
    }

    pub fn with_progress(mut self, progress: Arc<ProgressManager>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn stats(&self) -> Arc<CollectorStats> {
        Arc::clone(&self.stats)
    }

    /// Collect household/house/company counts for every code and year
    pub async fn collect_core(
        &self,
        codes: &[String],
        years: &[String],
        output_path: &Path,
        progress_path: &Path,
    ) -> Result<MultiyearOutput<CoreStats>> {
        let stats = self.stats();
        self.run_years(
            codes,
            years,
            output_path,
            progress_path,
            "SGIS 다년도 통계 (읍면동 레벨)",
            move |client, year, code| {
                let stats = Arc::clone(&stats);
                async move { fetch_core(&client, &year, &code, &stats).await }
            },
        )
        .await
    }

    /// Collect population basics and age/sex buckets for every code and year
    pub async fn collect_enhanced(
        &self,
        codes: &[String],
        years: &[String],
        output_path: &Path,
        progress_path: &Path,
    ) -> Result<MultiyearOutput<EnhancedStats>> {
        let stats = self.stats();
        self.run_years(
            codes,
            years,
            output_path,
            progress_path,
            "SGIS 연령별 상세 통계 (읍면동 레벨)",
            move |client, year, code| {
                let stats = Arc::clone(&stats);
                async move { fetch_enhanced(&client, &year, &code, &stats).await }
            },
        )
        .await
    }

    /// The shared year-by-year loop: skip completed years, fetch missing codes
    /// with a bounded worker pool, save every `save_every` regions and at each
    /// year boundary.
    async fn run_years<T, F, Fut>(
        &self,
        codes: &[String],
        years: &[String],
        output_path: &Path,
        progress_path: &Path,
        description: &str,
        fetch: F,
    ) -> Result<MultiyearOutput<T>>
    where
        T: Serialize + DeserializeOwned + Clone + Default,
        F: Fn(Arc<SgisClient>, String, String) -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        let mut output: MultiyearOutput<T> = read_json_or_default(output_path);
        if output.regions_by_year.is_empty() {
            output = MultiyearOutput::new(years, description);
        }

        let mut progress = CollectionProgress::load(progress_path);
        let fetch = &fetch;

        for year in years {
            if progress.is_year_complete(year) {
                info!("Year {} already complete, skipping", year);
                continue;
            }

            let existing: HashSet<String> = output
                .regions_by_year
                .entry(year.clone())
                .or_default()
                .keys()
                .cloned()
                .collect();
            let todo: Vec<String> = codes
                .iter()
                .filter(|code| !existing.contains(*code))
                .cloned()
                .collect();

            info!(
                "Year {}: {} regions already collected, {} to go",
                year,
                existing.len(),
                todo.len()
            );

            let bar = self.progress.as_ref().and_then(|p| {
                p.create_collection_progress(todo.len() as u64, &messages::collecting_year(year))
            });

            let mut results = stream::iter(todo.into_iter().map(|code| {
                let client = Arc::clone(&self.client);
                let year = year.clone();
                async move {
                    let value = fetch(client, year, code.clone()).await;
                    (code, value)
                }
            }))
            .buffer_unordered(self.workers);

            let mut save_counter = 0usize;
            while let Some((code, value)) = results.next().await {
                if let Some(bar) = &bar {
                    bar.inc(1);
                }
                let Some(value) = value else { continue };

                output
                    .regions_by_year
                    .entry(year.clone())
                    .or_default()
                    .insert(code, value);
                self.stats.record_collected();
                save_counter += 1;

                if save_counter >= self.save_every {
                    write_json(output_path, &output)?;
                    info!(
                        "Year {}: {} collected ({:.0}/h, {} errors)",
                        year,
                        output.collected_total(),
                        self.stats.rate_per_hour(),
                        self.stats.errors()
                    );
                    save_counter = 0;
                }
            }

            write_json(output_path, &output)?;
            progress.mark_year_complete(year);
            progress.save(progress_path)?;

            let year_count = output
                .regions_by_year
                .get(year)
                .map(|m| m.len())
                .unwrap_or(0);
            if let Some(bar) = bar {
                bar.finish_with_message(messages::collection_complete(year, year_count));
            }
            info!("Year {} complete: {} regions", year, year_count);
        }

        Ok(output)
    }
}

/// Fetch one emdong's household/house/company counts. Regions where all
/// three datasets are empty yield `None` and are retried on the next run.
pub(crate) async fn fetch_core(
    client: &SgisClient,
    year: &str,
    code: &str,
    stats: &CollectorStats,
) -> Option<CoreStats> {
    let household: Vec<HouseholdRecord> =
        fetch_rows(client, StatsDataset::Household, year, code, stats).await?;
    let house: Vec<HouseRecord> =
        fetch_rows(client, StatsDataset::House, year, code, stats).await?;
    let company: Vec<CompanyRecord> =
        fetch_rows(client, StatsDataset::Company, year, code, stats).await?;

    if household.is_empty() && house.is_empty() && company.is_empty() {
        return None;
    }

    let household = household.into_iter().next().unwrap_or_default();
    let house = house.into_iter().next().unwrap_or_default();
    let company = company.into_iter().next().unwrap_or_default();

    Some(CoreStats {
        code: code.to_string(),
        household: HouseholdStats {
            household_cnt: household.household_cnt,
            family_member_cnt: household.family_member_cnt,
            avg_family_member_cnt: household.avg_family_member_cnt,
        },
        house: HouseStats {
            house_cnt: house.house_cnt,
        },
        company: CompanyStats {
            corp_cnt: company.corp_cnt,
            tot_worker: company.tot_worker,
        },
    })
}

/// Fetch one emdong's population basics plus decoded age/sex buckets
async fn fetch_enhanced(
    client: &SgisClient,
    year: &str,
    code: &str,
    stats: &CollectorStats,
) -> Option<EnhancedStats> {
    let population: Vec<PopulationRecord> =
        fetch_rows_low(client, StatsDataset::Population, year, code, false, stats).await?;
    let base = population.into_iter().next()?;

    let age_rows: Vec<AgeSexRecord> =
        fetch_rows_low(client, StatsDataset::SearchPopulation, year, code, true, stats)
            .await
            .unwrap_or_default();

    let mut enhanced = EnhancedStats {
        basic: PopulationBasics {
            total_population: base.tot_ppltn,
            avg_age: base.avg_age,
            population_density: base.ppltn_dnsty,
            oldage_support_ratio: base.oldage_suprt_per,
            youth_support_ratio: base.juv_suprt_per,
            aging_index: base.aged_child_idx,
        },
        ..Default::default()
    };

    for row in &age_rows {
        let Some((label, is_female)) = age_bucket(&row.adm_cd) else {
            continue;
        };
        let group = enhanced.age_groups.entry(label).or_insert_with(AgeGroup::default);
        if is_female {
            group.female = row.population;
        } else {
            group.male = row.population;
        }
        group.total = group.male + group.female;
    }

    Some(enhanced)
}

async fn fetch_rows<T: DeserializeOwned>(
    client: &SgisClient,
    dataset: StatsDataset,
    year: &str,
    code: &str,
    stats: &CollectorStats,
) -> Option<Vec<T>> {
    fetch_rows_low(client, dataset, year, code, true, stats).await
}

async fn fetch_rows_low<T: DeserializeOwned>(
    client: &SgisClient,
    dataset: StatsDataset,
    year: &str,
    code: &str,
    low_search: bool,
    stats: &CollectorStats,
) -> Option<Vec<T>> {
    match client.stats(dataset, year, Some(code), low_search).await {
        Ok(rows) => Some(rows),
        Err(e) => {
            warn!("{} fetch failed for {} ({}): {}", dataset.as_str(), code, year, e);
            stats.record_error();
            None
        }
    }
}

/// Decode a `searchpopulation` row's age/sex suffix (last six digits of the
/// returned code). Only 10-year buckets (leading `2`) are kept; a detail
/// value of 100 and above marks the female series.
fn age_bucket(adm_cd: &str) -> Option<(String, bool)> {
    if adm_cd.len() < 6 || !adm_cd.is_ascii() {
        return None;
    }
    let suffix = &adm_cd[adm_cd.len() - 6..];
    let granularity: u32 = suffix[..2].parse().ok()?;
    if granularity != 2 {
        return None;
    }

    let detail: u32 = suffix[2..].parse().ok()?;
    let is_female = detail >= 100;
    let idx = if is_female { detail / 100 } else { detail / 10 };

    let label = match idx {
        0 => "0-9세",
        1 => "10-19세",
        2 => "20-29세",
        3 => "30-39세",
        4 => "40-49세",
        5 => "50-59세",
        6 => "60-69세",
        7 => "70-79세",
        8 | 9 => "80세 이상",
        _ => "기타",
    };

    Some((label.to_string(), is_female))
}
