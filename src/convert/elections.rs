use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{decode_record, open_csv};
use crate::api::types::Politician;
use crate::collect::write_json;
use crate::error::Result;

static LOCAL_ROUND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"제(\d+)회").expect("round regex"));
static NATIONAL_TERM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"제(\d+)대").expect("term regex"));
static DISTRICT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+구)\]").expect("district regex"));

/// Local election rounds and their terms of office
const LOCAL_TERMS: [(&str, &str, &str); 4] = [
    ("5", "2010-07-01", "2014-06-30"),
    ("6", "2014-07-01", "2018-06-30"),
    ("7", "2018-07-01", "2022-06-30"),
    ("8", "2022-07-01", "2026-06-30"),
];

/// National assembly terms
const NATIONAL_TERMS: [(&str, &str, &str); 7] = [
    ("16", "2000-05-30", "2004-05-29"),
    ("17", "2004-05-30", "2008-05-29"),
    ("18", "2008-05-30", "2012-05-29"),
    ("19", "2012-05-30", "2016-05-29"),
    ("20", "2016-05-30", "2020-05-29"),
    ("21", "2020-05-30", "2024-05-29"),
    ("22", "2024-05-30", "2028-05-29"),
];

/// Roster exports prepend title rows and a column header before the data
const HEADER_SKIP_ROWS: usize = 6;

/// Korean personal names fit in five characters; longer first cells are
/// title or header rows
const MAX_NAME_CHARS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ElectionData {
    /// Local election rounds keyed by round number
    pub local_elections: BTreeMap<String, LocalRound>,
    /// National assembly elections keyed by term number
    pub national_elections: BTreeMap<String, NationalTerm>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalRound {
    pub term: TermDates,
    /// City council members keyed by district name
    pub si_uiwon: BTreeMap<String, Vec<Politician>>,
    /// District council members keyed by district name
    pub gu_uiwon: BTreeMap<String, Vec<Politician>>,
    pub mayors: BTreeMap<String, Vec<Politician>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NationalTerm {
    pub term: TermDates,
    pub politicians: Vec<Politician>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TermDates {
    pub start: String,
    pub end: String,
}

fn term_dates(table: &[(&str, &str, &str)], key: &str) -> Option<TermDates> {
    table.iter().find(|(k, _, _)| *k == key).map(|(_, start, end)| TermDates {
        start: start.to_string(),
        end: end.to_string(),
    })
}

/// Convert election roster CSV directories into one grouped JSON file.
///
/// `si_dir` and `gu_dir` hold local rosters named with `제N회` and a
/// bracketed district (`[강남구]`); `national_dir` holds assembly rosters
/// named with `제N대`. Proportional (비례) roster files are excluded.
pub fn convert_elections(
    si_dir: &Path,
    gu_dir: &Path,
    national_dir: &Path,
    output: &Path,
) -> Result<ElectionData> {
    let mut data = ElectionData::default();

    for (dir, position, is_si) in [(si_dir, "시의원", true), (gu_dir, "구의원", false)] {
        for file in csv_files(dir)? {
            let name = file.file_name().map(|n| n.to_string_lossy().into_owned());
            let Some(name) = name else { continue };
            if name.contains("비례") {
                continue;
            }

            let Some(round) = capture(&LOCAL_ROUND_RE, &name) else {
                continue;
            };
            let Some(term) = term_dates(&LOCAL_TERMS, &round) else {
                warn!("Unknown local round {} in {}", round, name);
                continue;
            };
            let Some(district) = capture(&DISTRICT_RE, &name) else {
                warn!("No district in roster filename {}", name);
                continue;
            };

            let politicians = read_roster(&file, position, Some(&district))?;
            if politicians.is_empty() {
                continue;
            }
            info!("제{}회 {} {}: {} members", round, district, position, politicians.len());

            let entry = data.local_elections.entry(round).or_insert_with(|| LocalRound {
                term,
                ..Default::default()
            });
            let bucket = if is_si {
                &mut entry.si_uiwon
            } else {
                &mut entry.gu_uiwon
            };
            bucket.insert(district, politicians);
        }
    }

    for file in csv_files(national_dir)? {
        let name = file.file_name().map(|n| n.to_string_lossy().into_owned());
        let Some(name) = name else { continue };

        let Some(term_num) = capture(&NATIONAL_TERM_RE, &name) else {
            continue;
        };
        let Some(term) = term_dates(&NATIONAL_TERMS, &term_num) else {
            warn!("Unknown assembly term {} in {}", term_num, name);
            continue;
        };

        let politicians = read_roster(&file, "국회의원", None)?;
        if politicians.is_empty() {
            continue;
        }
        info!("제{}대: {} members", term_num, politicians.len());

        data.national_elections
            .insert(term_num, NationalTerm { term, politicians });
    }

    write_json(output, &data)?;
    info!(
        "Election data saved: {} local rounds, {} assembly terms",
        data.local_elections.len(),
        data.national_elections.len()
    );
    Ok(data)
}

fn capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "csv").unwrap_or(false))
        .collect();
    files.sort();
    Ok(files)
}

/// Parse one roster file. The first cells of a data row are name and party;
/// assembly rosters carry the district in the third cell.
fn read_roster(path: &Path, position: &str, district: Option<&str>) -> Result<Vec<Politician>> {
    let mut reader = open_csv(path)?;
    let mut politicians = Vec::new();

    for (index, record) in reader.byte_records().enumerate() {
        if index < HEADER_SKIP_ROWS {
            continue;
        }
        let row = decode_record(&record?);
        let values: Vec<&str> = row
            .iter()
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
            .collect();
        if values.len() < 2 {
            continue;
        }

        let name = values[0];
        if name.chars().count() > MAX_NAME_CHARS {
            continue;
        }

        let district = match district {
            Some(district) => district.to_string(),
            None => values.get(2).unwrap_or(&"서울").to_string(),
        };

        politicians.push(Politician {
            name: name.to_string(),
            party: values[1].to_string(),
            district,
            position: position.to_string(),
        });
    }

    Ok(politicians)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SI_ROSTER: &str = "\
제8회 전국동시지방선거,,,
당선인 명부,,,
,,,
,,,
,,,
성명,정당,선거구,득표수
김당선,가나당,강남구 제1선거구,\"15,234\"
박당선,다라당,강남구 제2선거구,\"14,101\"
아주아주긴이름입니다,가나당,강남구 제3선거구,\"9,000\"
";

    const NATIONAL_ROSTER: &str = "\
제22대 국회의원선거,,,
당선인 명부,,,
,,,
,,,
,,,
성명,정당,선거구,득표수
이의원,가나당,강남구갑,\"52,000\"
정의원,다라당,강남구을,\"48,500\"
";

    fn setup(dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
        let si = dir.join("si");
        let gu = dir.join("gu");
        let national = dir.join("national");
        for d in [&si, &gu, &national] {
            fs::create_dir_all(d).unwrap();
        }

        fs::write(si.join("제8회 시의원 당선인 [강남구].csv"), SI_ROSTER).unwrap();
        fs::write(si.join("제8회 시의원 비례 [강남구].csv"), SI_ROSTER).unwrap();
        fs::write(gu.join("제7회 구의원 당선인 [강남구].csv"), SI_ROSTER).unwrap();
        fs::write(national.join("제22대 국회의원.csv"), NATIONAL_ROSTER).unwrap();
        (si, gu, national)
    }

    #[test]
    fn test_convert_elections_groups_by_round_and_term() {
        let dir = TempDir::new().unwrap();
        let (si, gu, national) = setup(dir.path());
        let output = dir.path().join("elections.json");

        let data = convert_elections(&si, &gu, &national, &output).unwrap();

        let round8 = data.local_elections.get("8").unwrap();
        assert_eq!(round8.term.start, "2022-07-01");
        let members = round8.si_uiwon.get("강남구").unwrap();
        // The over-long name row is dropped, the header row too
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "김당선");
        assert_eq!(members[0].party, "가나당");
        assert_eq!(members[0].district, "강남구");
        assert_eq!(members[0].position, "시의원");

        let round7 = data.local_elections.get("7").unwrap();
        assert_eq!(round7.term.start, "2018-07-01");
        assert!(round7.gu_uiwon.contains_key("강남구"));
        assert!(round7.si_uiwon.is_empty());

        let term22 = data.national_elections.get("22").unwrap();
        assert_eq!(term22.politicians.len(), 2);
        assert_eq!(term22.politicians[0].district, "강남구갑");
        assert_eq!(term22.politicians[0].position, "국회의원");
    }

    #[test]
    fn test_unknown_round_is_skipped() {
        let dir = TempDir::new().unwrap();
        let (si, gu, national) = setup(dir.path());
        fs::write(si.join("제4회 시의원 [강남구].csv"), SI_ROSTER).unwrap();

        let output = dir.path().join("elections.json");
        let data = convert_elections(&si, &gu, &national, &output).unwrap();
        assert!(!data.local_elections.contains_key("4"));
    }

    #[test]
    fn test_missing_directories_yield_empty_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("elections.json");
        let data = convert_elections(
            &dir.path().join("absent"),
            &dir.path().join("absent"),
            &dir.path().join("absent"),
            &output,
        )
        .unwrap();
        assert!(data.local_elections.is_empty());
        assert!(data.national_elections.is_empty());
    }
}
