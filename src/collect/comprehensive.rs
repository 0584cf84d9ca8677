use chrono::Local;
use futures::stream::{self, StreamExt};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::{read_json_or_default, write_json, CollectorStats};
use crate::api::sgis::SgisClient;
use crate::api::types::{CompanyStats, HouseStats, HouseholdStats, RegionTree};
use crate::error::Result;

/// `sgis_comprehensive_stats.json`: one census year of core statistics with
/// full region context (names, addresses, coordinates) per emdong. This is
/// the join surface for the registry code mapping.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ComprehensiveOutput {
    pub metadata: ComprehensiveMetadata,
    pub regions: BTreeMap<String, ComprehensiveRegion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ComprehensiveMetadata {
    pub collection_date: String,
    pub year: String,
    pub total_regions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ComprehensiveRegion {
    pub code: String,
    pub sido_code: String,
    pub sido_name: String,
    pub sigungu_code: String,
    pub sigungu_name: String,
    pub emdong_name: String,
    #[serde(default)]
    pub full_address: String,
    #[serde(default)]
    pub x_coord: String,
    #[serde(default)]
    pub y_coord: String,
    pub household: HouseholdStats,
    pub house: HouseStats,
    pub company: CompanyStats,
    pub year: String,
}

/// Collects one year of household/house/company statistics for every emdong
/// in a region tree, annotated with the tree's naming context.
pub struct ComprehensiveCollector {
    client: Arc<SgisClient>,
    workers: usize,
    save_every: usize,
    stats: Arc<CollectorStats>,
}

impl ComprehensiveCollector {
    pub fn new(client: SgisClient) -> Self {
        Self {
            client: Arc::new(client),
            workers: 8,
            save_every: 100,
            stats: Arc::new(CollectorStats::new()),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn stats(&self) -> Arc<CollectorStats> {
        Arc::clone(&self.stats)
    }

    pub async fn collect(
        &self,
        tree: &RegionTree,
        year: &str,
        output_path: &Path,
    ) -> Result<ComprehensiveOutput> {
        let mut output: ComprehensiveOutput = read_json_or_default(output_path);
        output.metadata.year = year.to_string();

        // Flatten the tree into work items carrying their naming context
        let mut todo: Vec<ComprehensiveRegion> = Vec::new();
        for sido in tree.regions.values() {
            for sigungu in &sido.sigungu_list {
                for emdong in &sigungu.emdong_list {
                    if output.regions.contains_key(&emdong.emdong_code) {
                        continue;
                    }
                    todo.push(ComprehensiveRegion {
                        code: emdong.emdong_code.clone(),
                        sido_code: sido.sido_code.clone(),
                        sido_name: sido.sido_name.clone(),
                        sigungu_code: sigungu.sigungu_code.clone(),
                        sigungu_name: sigungu.sigungu_name.clone(),
                        emdong_name: emdong.emdong_name.clone(),
                        full_address: emdong.full_address.clone(),
                        x_coord: emdong.x_coord.clone(),
                        y_coord: emdong.y_coord.clone(),
                        year: year.to_string(),
                        ..Default::default()
                    });
                }
            }
        }

        info!(
            "Comprehensive collection for {}: {} regions done, {} to go",
            year,
            output.regions.len(),
            todo.len()
        );

        let mut results = stream::iter(todo.into_iter().map(|mut region| {
            let client = Arc::clone(&self.client);
            let stats = Arc::clone(&self.stats);
            let year = year.to_string();
            async move {
                match super::multiyear::fetch_core(&client, &year, &region.code, &stats).await {
                    Some(core) => {
                        region.household = core.household;
                        region.house = core.house;
                        region.company = core.company;
                        Some(region)
                    }
                    None => None,
                }
            }
        }))
        .buffer_unordered(self.workers);

        let mut save_counter = 0usize;
        while let Some(result) = results.next().await {
            let Some(region) = result else { continue };
            output.regions.insert(region.code.clone(), region);
            self.stats.record_collected();
            save_counter += 1;

            if save_counter >= self.save_every {
                output.metadata.total_regions = output.regions.len();
                write_json(output_path, &output)?;
                info!(
                    "Comprehensive: {} regions ({:.0}/h, {} errors)",
                    output.regions.len(),
                    self.stats.rate_per_hour(),
                    self.stats.errors()
                );
                save_counter = 0;
            }
        }

        output.metadata.total_regions = output.regions.len();
        output.metadata.collection_date = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        write_json(output_path, &output)?;
        info!(
            "Comprehensive collection saved: {} regions",
            output.metadata.total_regions
        );

        Ok(output)
    }
}
