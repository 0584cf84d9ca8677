//! Live progress view over a running multiyear collection.
//!
//! The monitor only reads the collector's output file, so it can run on a
//! different machine than the collection as long as the data directory is
//! shared.

use chrono::Local;
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::api::types::RegionTree;
use crate::collect::read_json;
use crate::error::Result;

/// Fallback emdong count when no region file is available
const DEFAULT_TOTAL_REGIONS: usize = 3558;

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone)]
pub struct YearStatus {
    pub year: String,
    pub collected: usize,
    pub percent: f64,
    pub done: bool,
}

#[derive(Debug, Clone)]
pub struct MonitorSnapshot {
    pub per_year: Vec<YearStatus>,
    pub total_collected: usize,
    pub total_target: usize,
    pub overall_percent: f64,
}

/// Read the collection output and summarize per-year progress.
/// Returns `None` until the collector has written its first save.
pub fn snapshot(output_path: &Path, total_regions: usize, total_years: usize) -> Option<MonitorSnapshot> {
    let raw = fs::read_to_string(output_path).ok()?;
    let data: Value = serde_json::from_str(&raw).ok()?;
    let by_year = data.get("regions_by_year")?.as_object()?;

    let mut per_year: Vec<YearStatus> = by_year
        .iter()
        .map(|(year, regions)| {
            let collected = regions.as_object().map_or(0, |r| r.len());
            let percent = if total_regions > 0 {
                collected as f64 / total_regions as f64 * 100.0
            } else {
                0.0
            };
            YearStatus {
                year: year.clone(),
                collected,
                percent,
                // A handful of codes never answer, so near-complete counts as done
                done: total_regions > 0 && percent >= 99.0,
            }
        })
        .collect();
    per_year.sort_by(|a, b| a.year.cmp(&b.year));

    let total_collected: usize = per_year.iter().map(|y| y.collected).sum();
    let total_target = total_regions * total_years.max(per_year.len());

    Some(MonitorSnapshot {
        per_year,
        total_collected,
        total_target,
        overall_percent: if total_target > 0 {
            total_collected as f64 / total_target as f64 * 100.0
        } else {
            0.0
        },
    })
}

/// Emdong count from a collected region file, or the national default
pub fn total_regions_from(regions_path: &Path) -> usize {
    match read_json::<RegionTree>(regions_path) {
        Ok(tree) => {
            let count = tree.emdong_codes().len();
            if count > 0 {
                count
            } else {
                DEFAULT_TOTAL_REGIONS
            }
        }
        Err(_) => DEFAULT_TOTAL_REGIONS,
    }
}

/// Reachability probe against a public resolver, as a rough proxy for
/// whether the collector can still reach the API
async fn network_status() -> &'static str {
    let connect = tokio::net::TcpStream::connect("8.8.8.8:53");
    match tokio::time::timeout(Duration::from_secs(2), connect).await {
        Ok(Ok(_)) => "🌐 네트워크: ✅ 정상",
        Ok(Err(_)) => "🌐 네트워크: ⚠️ 불안정",
        Err(_) => "🌐 네트워크: ❓ 확인 불가",
    }
}

fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64) as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn render(snapshot: &MonitorSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "📊 수집 모니터  {}\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str("📅 연도별 수집 현황:\n");
    for year in &snapshot.per_year {
        let status = if year.done { "✅" } else { "🔄" };
        out.push_str(&format!(
            "{} {}: [{}] {:5.1}% ({}개)\n",
            status,
            year.year,
            progress_bar(year.percent),
            year.percent,
            year.collected
        ));
    }
    out.push_str(&format!(
        "\n전체 진행률: {:.2}% ({} / {})\n",
        snapshot.overall_percent, snapshot.total_collected, snapshot.total_target
    ));
    out
}

/// Print progress once, or keep refreshing every `interval` seconds
pub async fn run(
    output_path: &Path,
    regions_path: &Path,
    total_years: usize,
    interval: Option<u64>,
) -> Result<()> {
    let total_regions = total_regions_from(regions_path);
    let started = Instant::now();
    let mut last_total: Option<usize> = None;

    loop {
        match snapshot(output_path, total_regions, total_years) {
            Some(snap) => {
                if interval.is_some() {
                    // ANSI clear so the view refreshes in place
                    print!("\x1B[2J\x1B[1;1H");
                }
                print!("{}", render(&snap));

                let elapsed = started.elapsed().as_secs_f64();
                if let Some(last) = last_total {
                    if elapsed > 0.0 && snap.total_collected > last {
                        let rate = (snap.total_collected - last) as f64 / (elapsed / 3600.0);
                        let remaining = snap.total_target.saturating_sub(snap.total_collected);
                        let eta_hours = remaining as f64 / rate;
                        println!(
                            "⚡ 수집 속도: {}개/시간  ⏱️ 남은 시간: 약 {:.1}시간",
                            rate as u64, eta_hours
                        );
                    }
                }
                if last_total.is_none() {
                    last_total = Some(snap.total_collected);
                }
            }
            None => println!("{}", "⏳ 수집 시작 대기 중...".yellow()),
        }

        if interval.is_some() {
            println!("{}", network_status().await);
        }

        let Some(secs) = interval else {
            return Ok(());
        };
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }
}
