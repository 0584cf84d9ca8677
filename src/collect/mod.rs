//! Resumable collection pipelines over the SGIS and Naver APIs.
//!
//! Every collector follows the same shape: load whatever partial output
//! already exists on disk, skip work that is already done, fetch the rest
//! with retry handled by the API clients, and save incrementally so an
//! interrupted run loses at most one save window.

pub mod checkpoint;
pub mod comprehensive;
pub mod multiyear;
pub mod news;
pub mod regions;

pub use comprehensive::ComprehensiveCollector;
pub use multiyear::{MultiyearCollector, StatsProfile};
pub use news::NewsCollector;
pub use regions::RegionCollector;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::error::{ForgeError, Result};

/// Shared per-run counters, updated from concurrent workers
pub struct CollectorStats {
    collected: AtomicUsize,
    errors: AtomicUsize,
    started: Instant,
}

impl CollectorStats {
    pub fn new() -> Self {
        Self {
            collected: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    pub fn record_collected(&self) {
        self.collected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn collected(&self) -> usize {
        self.collected.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    /// Collection rate in regions per hour since the run started
    pub fn rate_per_hour(&self) -> f64 {
        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed <= 0.0 {
            return 0.0;
        }
        self.collected() as f64 / (elapsed / 3600.0)
    }
}

impl Default for CollectorStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Read and parse a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Like [`read_json`] but a missing or unparseable file yields the default.
/// Collectors use this to resume from whatever partial output survives.
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
        Err(_) => T::default(),
    }
}

/// Write a value as pretty-printed JSON, creating parent directories
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let raw = serde_json::to_string_pretty(value)?;
    fs::write(path, raw)?;
    Ok(())
}

/// Load a required input file with a readable error when it is missing
pub fn read_required_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(ForgeError::NotFound(format!(
            "Input file not found: {}",
            path.display()
        )));
    }
    read_json(path)
}
