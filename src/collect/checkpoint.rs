use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{read_json_or_default, write_json};
use crate::error::Result;

/// Progress checkpoint for multi-year collection runs.
///
/// Years are marked complete only after every region for that year has been
/// attempted; within a year, the partial output file itself is the resume
/// source (codes already present are skipped).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CollectionProgress {
    #[serde(default)]
    pub completed_years: Vec<String>,
}

impl CollectionProgress {
    /// Load from disk; a missing or corrupt file starts a fresh run
    pub fn load(path: &Path) -> Self {
        read_json_or_default(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    pub fn is_year_complete(&self, year: &str) -> bool {
        self.completed_years.iter().any(|y| y == year)
    }

    pub fn mark_year_complete(&mut self, year: &str) {
        if !self.is_year_complete(year) {
            self.completed_years.push(year.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_and_dedup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");

        let mut progress = CollectionProgress::default();
        progress.mark_year_complete("2015");
        progress.mark_year_complete("2015");
        progress.mark_year_complete("2016");
        progress.save(&path).unwrap();

        let loaded = CollectionProgress::load(&path);
        assert_eq!(loaded.completed_years, vec!["2015", "2016"]);
        assert!(loaded.is_year_complete("2015"));
        assert!(!loaded.is_year_complete("2023"));
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "not json").unwrap();

        let loaded = CollectionProgress::load(&path);
        assert!(loaded.completed_years.is_empty());
    }
}
