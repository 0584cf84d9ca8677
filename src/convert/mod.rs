//! Converters for local CSV exports: the resident registration (주민등록)
//! population tables and election rosters.
//!
//! The registry exports share a few conventions handled here: digits are
//! comma-grouped, region cells look like `서울특별시 강남구 개포1동  (1168064000)`,
//! and monthly measures live in column families named `YYYY년MM월_<측정값>`.

pub mod elections;
pub mod jumin;
pub mod mapping;

use encoding_rs::EUC_KR;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::path::Path;

use crate::error::Result;

static REGION_CELL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((\d+)\)").expect("region cell regex"));

static MONTH_COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})년(\d{1,2})월_(.+)$").expect("month column regex"));

/// Parse a comma-grouped count cell; blanks and junk become 0
pub fn parse_count(cell: &str) -> i64 {
    let cleaned = cell.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return 0;
    }
    cleaned
        .parse::<i64>()
        .or_else(|_| cleaned.parse::<f64>().map(|f| f as i64))
        .unwrap_or(0)
}

/// Parse a ratio cell the same way, defaulting to 0.0
pub fn parse_ratio(cell: &str) -> f64 {
    let cleaned = cell.replace(',', "");
    cleaned.trim().parse().unwrap_or(0.0)
}

/// Split a region cell into its name and administrative code
pub fn parse_region_cell(cell: &str) -> Option<(String, String)> {
    let captures = REGION_CELL_RE.captures(cell)?;
    let code = captures.get(1)?.as_str().to_string();
    let name = cell.split('(').next().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return None;
    }
    Some((name, code))
}

/// Split a `YYYY년MM월_<측정값>` column header into (year, month, measure)
pub fn parse_month_column(header: &str) -> Option<(u16, u8, &str)> {
    let captures = MONTH_COLUMN_RE.captures(header)?;
    let year = captures.get(1)?.as_str().parse().ok()?;
    let month = captures.get(2)?.as_str().parse().ok()?;
    let measure = captures.get(3)?.as_str();
    Some((year, month, measure))
}

/// Open a CSV export with flexible row lengths. Records are read as bytes
/// and decoded per field, since the downloads come in CP949 as often as
/// UTF-8.
pub fn open_csv(path: &Path) -> Result<csv::Reader<File>> {
    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)?)
}

/// Decode one byte record into owned strings. Fields that are not valid
/// UTF-8 are decoded as CP949 (the ministry portals still export in it);
/// CP949 trail bytes never collide with the CSV delimiters, so splitting
/// before decoding is safe.
pub fn decode_record(record: &csv::ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| match std::str::from_utf8(field) {
            Ok(text) => text.to_string(),
            Err(_) => EUC_KR.decode(field).0.into_owned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("12,345"), 12345);
        assert_eq!(parse_count(" 17 "), 17);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("-"), 0);
        assert_eq!(parse_count("2.7"), 2);
        assert_eq!(parse_count("-120"), -120);
    }

    #[test]
    fn test_parse_region_cell() {
        assert_eq!(
            parse_region_cell("서울특별시 강남구 개포1동  (1168064000)"),
            Some(("서울특별시 강남구 개포1동".to_string(), "1168064000".to_string()))
        );
        assert_eq!(parse_region_cell("전국  (1000000000)").unwrap().0, "전국");
        assert_eq!(parse_region_cell("코드 없는 행"), None);
        assert_eq!(parse_region_cell("  (123)"), None);
    }

    #[test]
    fn test_decode_record_handles_cp949_fields() {
        let name = "서울특별시 강남구 개포1동  (1168064000)";
        let (encoded, _, _) = EUC_KR.encode(name);

        let mut record = csv::ByteRecord::new();
        record.push_field(&encoded);
        record.push_field(b"25,050");
        record.push_field(name.as_bytes());

        let row = decode_record(&record);
        assert_eq!(row[0], name);
        assert_eq!(row[1], "25,050");
        assert_eq!(row[2], name);
    }

    #[test]
    fn test_parse_month_column() {
        assert_eq!(
            parse_month_column("2022년01월_총인구수"),
            Some((2022, 1, "총인구수"))
        );
        assert_eq!(
            parse_month_column("2025년9월_남자 인구수"),
            Some((2025, 9, "남자 인구수"))
        );
        assert_eq!(parse_month_column("행정구역"), None);
    }
}
