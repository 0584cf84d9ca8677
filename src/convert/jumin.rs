use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{decode_record, open_csv, parse_count, parse_month_column, parse_ratio, parse_region_cell};
use crate::collect::write_json;
use crate::error::{ForgeError, Result};

/// Registry files are named like `202201_202512_주민등록인구및세대현황.csv`
static FILE_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})\d{2}_").expect("file year regex"));

/// Emdong-level registry codes are ten digits; shorter codes are rollups
const EMDONG_CODE_LEN: usize = 10;

// --- snapshot -------------------------------------------------------------

/// `jumin_population_<stamp>.json`: the latest monthly block per emdong
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JuminSnapshot {
    pub metadata: SnapshotMetadata,
    pub regions: BTreeMap<String, SnapshotRegion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnapshotMetadata {
    pub source: String,
    pub year_month: String,
    pub total_regions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SnapshotRegion {
    pub code: String,
    pub full_name: String,
    pub total_population: i64,
    pub household_cnt: i64,
    pub avg_household_size: f64,
    pub male_population: i64,
    pub female_population: i64,
    pub year_month: String,
}

/// Convert the latest monthly block of a population registry export.
///
/// The header carries one six-column family per month (total population,
/// households, average household size, male, female, sex ratio); the last
/// `총인구수` column marks the most recent month.
pub fn convert_snapshot(input: &Path, output: &Path) -> Result<JuminSnapshot> {
    let mut reader = open_csv(input)?;
    let mut records = reader.byte_records();

    let header = match records.next() {
        Some(record) => decode_record(&record?),
        None => return Err(ForgeError::InvalidInput("Empty CSV file".to_string())),
    };

    let mut latest: Option<(usize, String)> = None;
    for (index, column) in header.iter().enumerate() {
        if let Some((year, month, measure)) = parse_month_column(column) {
            if measure == "총인구수" {
                latest = Some((index, format!("{}-{:02}", year, month)));
            }
        }
    }
    let (sep_idx, year_month) = latest.ok_or_else(|| {
        ForgeError::InvalidInput("No monthly population columns in header".to_string())
    })?;

    info!("Snapshot month {} (column {})", year_month, sep_idx);

    let mut snapshot = JuminSnapshot {
        metadata: SnapshotMetadata {
            source: "행정안전부 주민등록 인구통계".to_string(),
            year_month: year_month.clone(),
            total_regions: 0,
        },
        regions: BTreeMap::new(),
    };

    for record in records {
        let row = decode_record(&record?);
        let Some(cell) = row.first() else { continue };
        let Some((full_name, code)) = parse_region_cell(cell) else {
            continue;
        };
        if code.len() < EMDONG_CODE_LEN {
            continue;
        }

        let cell_at = |offset: usize| row.get(sep_idx + offset).map(String::as_str).unwrap_or("");

        snapshot.regions.insert(
            code.clone(),
            SnapshotRegion {
                code,
                full_name,
                total_population: parse_count(cell_at(0)),
                household_cnt: parse_count(cell_at(1)),
                avg_household_size: parse_ratio(cell_at(2)),
                male_population: parse_count(cell_at(3)),
                female_population: parse_count(cell_at(4)),
                year_month: year_month.clone(),
            },
        );
    }

    snapshot.metadata.total_regions = snapshot.regions.len();
    write_json(output, &snapshot)?;
    info!(
        "Snapshot saved: {} regions for {}",
        snapshot.metadata.total_regions, snapshot.metadata.year_month
    );
    Ok(snapshot)
}

// --- population growth ----------------------------------------------------

/// `jumin_growth_<stamp>.json`: the latest month's change figures per emdong
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GrowthOutput {
    pub metadata: SnapshotMetadata,
    pub regions: BTreeMap<String, GrowthRegion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GrowthRegion {
    pub code: String,
    pub full_name: String,
    pub prev_month: i64,
    pub curr_month: i64,
    pub change: i64,
    pub male_change: i64,
    pub female_change: i64,
}

/// Extract the most recent month's population-change figures from a
/// registry change export. The change exports carry previous/current
/// month totals and the increase split by sex, one column family per month.
pub fn convert_growth(input: &Path, output: &Path) -> Result<GrowthOutput> {
    let mut reader = open_csv(input)?;
    let mut records = reader.byte_records();

    let header = match records.next() {
        Some(record) => decode_record(&record?),
        None => return Err(ForgeError::InvalidInput("Empty CSV file".to_string())),
    };

    let mut latest: Option<(u16, u8)> = None;
    for column in &header {
        if let Some((year, month, _)) = parse_month_column(column) {
            if latest.map_or(true, |(y, m)| (year, month) > (y, m)) {
                latest = Some((year, month));
            }
        }
    }
    let (year, month) = latest.ok_or_else(|| {
        ForgeError::InvalidInput("No monthly change columns in header".to_string())
    })?;
    let year_month = format!("{}-{:02}", year, month);

    // Column index per measure, latest month only
    let mut columns: BTreeMap<&str, usize> = BTreeMap::new();
    for (index, column) in header.iter().enumerate() {
        if let Some((col_year, col_month, measure)) = parse_month_column(column) {
            if (col_year, col_month) == (year, month) {
                columns.insert(measure, index);
            }
        }
    }

    info!("Growth month {}", year_month);

    let mut growth = GrowthOutput {
        metadata: SnapshotMetadata {
            source: "행정안전부 주민등록 인구증감".to_string(),
            year_month: year_month.clone(),
            total_regions: 0,
        },
        regions: BTreeMap::new(),
    };

    for record in records {
        let row = decode_record(&record?);
        let Some(cell) = row.first() else { continue };
        let Some((full_name, code)) = parse_region_cell(cell) else {
            continue;
        };
        if code.len() < EMDONG_CODE_LEN {
            continue;
        }

        let at = |measure: &str| {
            columns
                .get(measure)
                .and_then(|&index| row.get(index))
                .map(|cell| parse_count(cell))
                .unwrap_or(0)
        };

        growth.regions.insert(
            code.clone(),
            GrowthRegion {
                code,
                full_name,
                prev_month: at("전월인구수_계"),
                curr_month: at("당월인구수_계"),
                change: at("인구증감_계"),
                male_change: at("인구증감_남자인구수"),
                female_change: at("인구증감_여자인구수"),
            },
        );
    }

    growth.metadata.total_regions = growth.regions.len();
    write_json(output, &growth)?;
    info!(
        "Growth saved: {} regions for {}",
        growth.metadata.total_regions, growth.metadata.year_month
    );
    Ok(growth)
}

// --- monthly time series --------------------------------------------------

/// `jumin_monthly_population.json`: full monthly series per region
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MonthlySeries {
    pub data_source: String,
    pub period: String,
    pub total_regions: usize,
    pub regions: BTreeMap<String, MonthlyRegion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MonthlyRegion {
    pub code: String,
    pub name: String,
    pub monthly: Vec<MonthlyPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MonthlyPoint {
    pub year: u16,
    pub month: u8,
    pub date: String,
    pub population: i64,
    pub male: i64,
    pub female: i64,
    pub household: i64,
    pub change: i64,
}

/// Convert month columns from `min_year` onward across one or more exports
/// into a per-region time series. Overlapping months across files collapse
/// to a single point; month-over-month change is computed after sorting.
pub fn convert_monthly(
    inputs: &[PathBuf],
    min_year: u16,
    output: &Path,
) -> Result<MonthlySeries> {
    // Points keyed by (year, month) so overlapping exports dedup and sort
    let mut regions: BTreeMap<String, (String, BTreeMap<(u16, u8), MonthlyPoint>)> =
        BTreeMap::new();

    for input in inputs {
        info!("Reading {}", input.display());
        let mut reader = open_csv(input)?;
        let mut records = reader.byte_records();

        let header = match records.next() {
            Some(record) => decode_record(&record?),
            None => continue,
        };

        // (year, month) -> per-measure column indices
        let mut months: BTreeMap<(u16, u8), MonthColumns> = BTreeMap::new();
        for (index, column) in header.iter().enumerate() {
            let Some((year, month, measure)) = parse_month_column(column) else {
                continue;
            };
            if year < min_year {
                continue;
            }
            let entry = months.entry((year, month)).or_default();
            if measure == "총인구수" {
                entry.total = Some(index);
            } else if measure.contains("남자") {
                entry.male = Some(index);
            } else if measure.contains("여자") {
                entry.female = Some(index);
            } else if measure == "세대수" {
                entry.household = Some(index);
            }
        }

        for record in records {
            let row = decode_record(&record?);
            let Some(cell) = row.first() else { continue };
            let Some((name, code)) = parse_region_cell(cell) else {
                continue;
            };

            let (region_name, points) = regions
                .entry(code.clone())
                .or_insert_with(|| (name.clone(), BTreeMap::new()));
            // Later exports carry the current region name
            if !name.is_empty() {
                *region_name = name;
            }

            for (&(year, month), columns) in &months {
                let Some(total_idx) = columns.total else { continue };
                let population = parse_count(row.get(total_idx).map(String::as_str).unwrap_or(""));
                if population == 0 {
                    continue;
                }

                let at = |idx: Option<usize>| {
                    idx.and_then(|i| row.get(i))
                        .map(|cell| parse_count(cell))
                        .unwrap_or(0)
                };

                points.insert(
                    (year, month),
                    MonthlyPoint {
                        year,
                        month,
                        date: format!("{}-{:02}", year, month),
                        population,
                        male: at(columns.male),
                        female: at(columns.female),
                        household: at(columns.household),
                        change: 0,
                    },
                );
            }
        }
    }

    let mut series = MonthlySeries {
        data_source: "주민등록인구통계".to_string(),
        period: String::new(),
        total_regions: regions.len(),
        regions: BTreeMap::new(),
    };

    let mut first_date: Option<String> = None;
    let mut last_date: Option<String> = None;

    for (code, (name, points)) in regions {
        let mut monthly: Vec<MonthlyPoint> = points.into_values().collect();
        for i in 1..monthly.len() {
            monthly[i].change = monthly[i].population - monthly[i - 1].population;
        }

        if let (Some(first), Some(last)) = (monthly.first(), monthly.last()) {
            if first_date.as_deref().map_or(true, |d| first.date.as_str() < d) {
                first_date = Some(first.date.clone());
            }
            if last_date.as_deref().map_or(true, |d| last.date.as_str() > d) {
                last_date = Some(last.date.clone());
            }
        }

        series
            .regions
            .insert(code.clone(), MonthlyRegion { code, name, monthly });
    }

    if let (Some(first), Some(last)) = (first_date, last_date) {
        series.period = format!("{} ~ {}", first, last);
    }

    write_json(output, &series)?;
    info!(
        "Monthly series saved: {} regions, period {}",
        series.total_regions, series.period
    );
    Ok(series)
}

#[derive(Debug, Default)]
struct MonthColumns {
    total: Option<usize>,
    male: Option<usize>,
    female: Option<usize>,
    household: Option<usize>,
}

// --- yearly aggregation ---------------------------------------------------

/// One year's aggregates in `jumin_yearly_population.json`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct YearEntry {
    pub population: BTreeMap<String, PopulationYear>,
    pub population_change: BTreeMap<String, ChangeYear>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PopulationYear {
    pub total_population: i64,
    pub households: i64,
    pub male: Option<i64>,
    pub female: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ChangeYear {
    pub births: Option<i64>,
    pub deaths: Option<i64>,
    pub move_in: Option<i64>,
    pub move_out: Option<i64>,
    pub net_change: Option<i64>,
}

/// Aggregate monthly registry exports into per-year figures.
///
/// Population and household counts average across the months of the year;
/// the change components (births, deaths, moves, net change) sum. The
/// source year comes from the export filename.
pub fn convert_yearly(
    population_inputs: &[PathBuf],
    change_inputs: &[PathBuf],
    output: &Path,
) -> Result<BTreeMap<String, YearEntry>> {
    let mut yearly: BTreeMap<String, YearEntry> = BTreeMap::new();

    for input in population_inputs {
        let Some(year) = file_year(input) else {
            warn!("No year in filename, skipping {}", input.display());
            continue;
        };
        let entry = yearly.entry(year.to_string()).or_default();

        for_each_region_row(input, year, |region, measures| {
            let avg = |filter: &dyn Fn(&str) -> bool| -> Option<i64> {
                let values: Vec<i64> = measures
                    .iter()
                    .filter(|(measure, _)| filter(measure))
                    .map(|(_, value)| *value)
                    .collect();
                if values.is_empty() {
                    None
                } else {
                    Some(values.iter().sum::<i64>() / values.len() as i64)
                }
            };

            let total = avg(&|m| m.contains("총인구수")).unwrap_or(0);
            if total > 0 {
                entry.population.insert(
                    region.to_string(),
                    PopulationYear {
                        total_population: total,
                        households: avg(&|m| m.contains("세대수")).unwrap_or(0),
                        male: avg(&|m| m.contains("남자")),
                        female: avg(&|m| m.contains("여자")),
                    },
                );
            }
        })?;
    }

    for input in change_inputs {
        let Some(year) = file_year(input) else {
            warn!("No year in filename, skipping {}", input.display());
            continue;
        };
        let entry = yearly.entry(year.to_string()).or_default();

        for_each_region_row(input, year, |region, measures| {
            let sum = |needle: &str| -> Option<i64> {
                let values: Vec<i64> = measures
                    .iter()
                    .filter(|(measure, _)| measure.contains(needle))
                    .map(|(_, value)| *value)
                    .collect();
                if values.is_empty() {
                    None
                } else {
                    Some(values.iter().sum())
                }
            };

            entry.population_change.insert(
                region.to_string(),
                ChangeYear {
                    births: sum("출생"),
                    deaths: sum("사망"),
                    move_in: sum("전입"),
                    move_out: sum("전출"),
                    net_change: sum("증감"),
                },
            );
        })?;
    }

    write_json(output, &yearly)?;
    info!("Yearly aggregates saved: {} years", yearly.len());
    Ok(yearly)
}

fn file_year(path: &Path) -> Option<u16> {
    let name = path.file_name()?.to_string_lossy();
    let captures = FILE_YEAR_RE.captures(&name)?;
    let year: u16 = captures.get(1)?.as_str().parse().ok()?;
    if year < 2008 {
        return None;
    }
    Some(year)
}

/// Walk one export's data rows, handing each region its `(measure, value)`
/// pairs for the file's own year
fn for_each_region_row(
    input: &Path,
    year: u16,
    mut visit: impl FnMut(&str, &[(String, i64)]),
) -> Result<()> {
    let mut reader = open_csv(input)?;
    let mut records = reader.byte_records();

    let header = match records.next() {
        Some(record) => decode_record(&record?),
        None => return Ok(()),
    };

    let columns: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .filter_map(|(index, column)| {
            let (col_year, _, measure) = parse_month_column(column)?;
            (col_year == year).then(|| (index, measure.to_string()))
        })
        .collect();

    if columns.is_empty() {
        warn!("No {} columns in {}", year, input.display());
        return Ok(());
    }

    for record in records {
        let row = decode_record(&record?);
        let Some(region) = row.first() else { continue };
        let region = region.trim();
        if region.is_empty() {
            continue;
        }

        let measures: Vec<(String, i64)> = columns
            .iter()
            .filter_map(|(index, measure)| {
                row.get(*index)
                    .map(|cell| (measure.clone(), parse_count(cell)))
            })
            .collect();

        visit(region, &measures);
    }

    Ok(())
}
