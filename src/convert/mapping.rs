use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::jumin::JuminSnapshot;
use crate::collect::comprehensive::ComprehensiveOutput;
use crate::collect::{read_required_json, write_json};
use crate::error::Result;

/// `code_mapping.json`: SGIS emdong codes joined to registry codes by their
/// full address strings. Unmatched codes are listed explicitly so gaps in
/// the join are visible instead of silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CodeMapping {
    pub metadata: MappingMetadata,
    pub mapping: BTreeMap<String, MappingEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MappingMetadata {
    pub total_matched: usize,
    pub sgis_codes: usize,
    pub jumin_codes: usize,
    #[serde(default)]
    pub unmatched_sgis: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MappingEntry {
    pub sgis_code: String,
    pub jumin_code: String,
    pub full_address: String,
}

impl CodeMapping {
    /// Registry code for an SGIS emdong code
    pub fn jumin_for(&self, sgis_code: &str) -> Option<&str> {
        self.mapping.get(sgis_code).map(|e| e.jumin_code.as_str())
    }
}

/// Join the comprehensive SGIS file and the registry snapshot by full
/// address and write `code_mapping.json`
pub fn create_code_mapping(
    sgis_path: &Path,
    jumin_path: &Path,
    output: &Path,
) -> Result<CodeMapping> {
    let sgis: ComprehensiveOutput = read_required_json(sgis_path)?;
    let jumin: JuminSnapshot = read_required_json(jumin_path)?;

    let jumin_by_name: BTreeMap<&str, &str> = jumin
        .regions
        .iter()
        .map(|(code, region)| (region.full_name.as_str(), code.as_str()))
        .collect();

    let mut result = CodeMapping {
        metadata: MappingMetadata {
            sgis_codes: sgis.regions.len(),
            jumin_codes: jumin.regions.len(),
            ..Default::default()
        },
        mapping: BTreeMap::new(),
    };

    for (sgis_code, region) in &sgis.regions {
        match jumin_by_name.get(region.full_address.as_str()) {
            Some(jumin_code) => {
                result.mapping.insert(
                    sgis_code.clone(),
                    MappingEntry {
                        sgis_code: sgis_code.clone(),
                        jumin_code: (*jumin_code).to_string(),
                        full_address: region.full_address.clone(),
                    },
                );
            }
            None => {
                result
                    .metadata
                    .unmatched_sgis
                    .push(format!("{}: {}", sgis_code, region.full_address));
            }
        }
    }

    result.metadata.total_matched = result.mapping.len();
    if !result.metadata.unmatched_sgis.is_empty() {
        warn!(
            "{} SGIS codes have no registry counterpart",
            result.metadata.unmatched_sgis.len()
        );
    }

    write_json(output, &result)?;
    info!(
        "Code mapping saved: {} matched of {} SGIS codes",
        result.metadata.total_matched, result.metadata.sgis_codes
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::comprehensive::ComprehensiveRegion;
    use crate::convert::jumin::SnapshotRegion;
    use tempfile::TempDir;

    fn sgis_region(code: &str, address: &str) -> ComprehensiveRegion {
        ComprehensiveRegion {
            code: code.to_string(),
            full_address: address.to_string(),
            ..Default::default()
        }
    }

    fn jumin_region(code: &str, name: &str) -> SnapshotRegion {
        SnapshotRegion {
            code: code.to_string(),
            full_name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_mapping_joins_by_address_and_lists_unmatched() {
        let dir = TempDir::new().unwrap();
        let sgis_path = dir.path().join("sgis.json");
        let jumin_path = dir.path().join("jumin.json");
        let output = dir.path().join("mapping.json");

        let mut sgis = ComprehensiveOutput::default();
        sgis.regions.insert(
            "11230680".to_string(),
            sgis_region("11230680", "서울특별시 강남구 개포1동"),
        );
        sgis.regions.insert(
            "11230690".to_string(),
            sgis_region("11230690", "서울특별시 강남구 개포2동"),
        );
        write_json(&sgis_path, &sgis).unwrap();

        let mut jumin = JuminSnapshot::default();
        jumin.regions.insert(
            "1168064000".to_string(),
            jumin_region("1168064000", "서울특별시 강남구 개포1동"),
        );
        write_json(&jumin_path, &jumin).unwrap();

        let mapping = create_code_mapping(&sgis_path, &jumin_path, &output).unwrap();

        assert_eq!(mapping.metadata.total_matched, 1);
        assert_eq!(mapping.metadata.sgis_codes, 2);
        assert_eq!(mapping.metadata.jumin_codes, 1);
        assert_eq!(mapping.jumin_for("11230680"), Some("1168064000"));
        assert_eq!(mapping.jumin_for("11230690"), None);
        assert_eq!(
            mapping.metadata.unmatched_sgis,
            vec!["11230690: 서울특별시 강남구 개포2동"]
        );
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = create_code_mapping(
            &dir.path().join("absent.json"),
            &dir.path().join("absent.json"),
            &dir.path().join("out.json"),
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::ForgeError::NotFound(_)));
    }
}
