use chrono::Local;
use log::{info, warn};
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;

use super::write_json;
use crate::api::sgis::SgisClient;
use crate::api::types::{Emdong, RegionMetadata, RegionTree, Sido, Sigungu};
use crate::error::Result;

/// Walks the full sido → sigungu → emdong hierarchy via `addr/stage.json`
/// and assembles the national region tree.
pub struct RegionCollector {
    client: SgisClient,
    call_delay: Duration,
}

impl RegionCollector {
    pub fn new(client: SgisClient) -> Self {
        Self {
            client,
            // Polite pacing between listing calls
            call_delay: Duration::from_millis(500),
        }
    }

    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = delay;
        self
    }

    /// Collect the full tree and write it to `output`
    pub async fn collect_to_file(&self, output: &Path) -> Result<RegionTree> {
        let tree = self.collect().await?;
        write_json(output, &tree)?;
        info!(
            "Region tree saved to {}: {} sido / {} sigungu / {} emdong",
            output.display(),
            tree.metadata.total_sido,
            tree.metadata.total_sigungu,
            tree.metadata.total_emdong
        );
        Ok(tree)
    }

    pub async fn collect(&self) -> Result<RegionTree> {
        let sido_list = self.client.stage(None).await?;
        info!("Listing regions: {} sido", sido_list.len());

        let mut tree = RegionTree::default();
        let mut total_sigungu = 0;
        let mut total_emdong = 0;

        for sido_item in &sido_list {
            sleep(self.call_delay).await;

            let sigungu_list = match self.client.stage(Some(&sido_item.cd)).await {
                Ok(list) => list,
                Err(e) => {
                    // A failed subtree should not abandon the whole walk
                    warn!("Sigungu listing failed for {}: {}", sido_item.cd, e);
                    continue;
                }
            };
            total_sigungu += sigungu_list.len();

            let mut sido = Sido {
                sido_code: sido_item.cd.clone(),
                sido_name: sido_item.addr_name.clone(),
                sigungu_list: Vec::with_capacity(sigungu_list.len()),
            };

            for sigungu_item in &sigungu_list {
                sleep(self.call_delay).await;

                let emdong_list = match self.client.stage(Some(&sigungu_item.cd)).await {
                    Ok(list) => list,
                    Err(e) => {
                        warn!("Emdong listing failed for {}: {}", sigungu_item.cd, e);
                        Vec::new()
                    }
                };
                total_emdong += emdong_list.len();

                sido.sigungu_list.push(Sigungu {
                    sigungu_code: sigungu_item.cd.clone(),
                    sigungu_name: sigungu_item.addr_name.clone(),
                    full_address: sigungu_item.full_addr.clone(),
                    x_coord: sigungu_item.x_coor.clone(),
                    y_coord: sigungu_item.y_coor.clone(),
                    emdong_list: emdong_list
                        .into_iter()
                        .map(|emdong| Emdong {
                            emdong_code: emdong.cd,
                            emdong_name: emdong.addr_name,
                            full_address: emdong.full_addr,
                            x_coord: emdong.x_coor,
                            y_coord: emdong.y_coor,
                        })
                        .collect(),
                });
            }

            info!(
                "{} ({}): {} sigungu",
                sido.sido_name,
                sido.sido_code,
                sido.sigungu_list.len()
            );
            tree.regions.insert(sido_item.cd.clone(), sido);
        }

        tree.metadata = RegionMetadata {
            total_sido: sido_list.len(),
            total_sigungu,
            total_emdong,
            collection_date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        Ok(tree)
    }
}
