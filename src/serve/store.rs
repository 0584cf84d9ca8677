use flate2::read::GzDecoder;
use log::{debug, warn};
use lru::LruCache;
use serde_json::Value;
use std::fs::{self, File};
use std::io::Read;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Parsed-JSON cache over the data directory.
///
/// Files are parsed once and shared; a `<name>.json.gz` sibling is preferred
/// when present so large outputs can ship compressed. Missing or unparseable
/// files read as `None`, which handlers translate into empty JSON shapes.
pub struct DataStore {
    data_dir: PathBuf,
    cache: Mutex<LruCache<String, Arc<Value>>>,
}

const CACHE_CAPACITY: usize = 32;

impl DataStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(CACHE_CAPACITY).expect("nonzero cache capacity"),
            )),
        }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Load a JSON file by name, consulting the cache first
    pub fn load(&self, filename: &str) -> Option<Arc<Value>> {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(value) = cache.get(filename) {
                return Some(Arc::clone(value));
            }
        }

        let value = self.read_from_disk(filename)?;
        let value = Arc::new(value);
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(filename.to_string(), Arc::clone(&value));
        }
        Some(value)
    }

    /// Load the lexically-last file whose name starts with `prefix`.
    /// Timestamped outputs sort so the newest wins.
    pub fn load_latest(&self, prefix: &str) -> Option<Arc<Value>> {
        let mut candidates: Vec<String> = fs::read_dir(&self.data_dir)
            .ok()?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(prefix) && name.ends_with(".json"))
            .collect();
        candidates.sort();
        let latest = candidates.pop()?;
        debug!("Latest {}* file: {}", prefix, latest);
        self.load(&latest)
    }

    fn read_from_disk(&self, filename: &str) -> Option<Value> {
        let gz_path = self.data_dir.join(format!("{}.gz", filename));
        if gz_path.exists() {
            match File::open(&gz_path) {
                Ok(file) => {
                    let mut raw = String::new();
                    let mut decoder = GzDecoder::new(file);
                    match decoder.read_to_string(&mut raw) {
                        Ok(_) => match serde_json::from_str(&raw) {
                            Ok(value) => return Some(value),
                            Err(e) => warn!("Bad JSON in {}: {}", gz_path.display(), e),
                        },
                        Err(e) => warn!("Failed to decompress {}: {}", gz_path.display(), e),
                    }
                }
                Err(e) => warn!("Failed to open {}: {}", gz_path.display(), e),
            }
        }

        let path = self.data_dir.join(filename);
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Bad JSON in {}: {}", path.display(), e);
                None
            }
        }
    }
}
