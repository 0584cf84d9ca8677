use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

/// Progress indicator manager for long-running collections
pub struct ProgressManager {
    multi: Arc<MultiProgress>,
    enabled: bool,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(quiet: bool) -> Self {
        // Only enable progress if we're in a terminal and not in quiet mode
        let enabled = !quiet && io::stdout().is_terminal();

        Self {
            multi: Arc::new(MultiProgress::new()),
            enabled,
        }
    }

    /// Create a spinner for an open-ended operation (API walk, conversion)
    pub fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap()
                .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Some(pb)
    }

    /// Create a progress bar for a collection with a known region count
    pub fn create_collection_progress(&self, total: u64, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let pb = self.multi.add(ProgressBar::new(total));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg}\n{bar:40.cyan/blue} {pos}/{len} ({percent}%) {per_sec}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        pb.set_message(message.to_string());

        Some(pb)
    }

    /// Check if progress is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Progress messages for collection operations
pub mod messages {
    pub const CONNECTING: &str = "서버 연결 중...";
    pub const CONVERTING: &str = "변환 중...";

    pub fn collecting_year(year: &str) -> String {
        format!("{}년 통계 수집 중...", year)
    }

    pub fn collecting_member(name: &str) -> String {
        format!("{} 뉴스 수집 중...", name)
    }

    pub fn collection_complete(year: &str, count: usize) -> String {
        format!("{}년: {}개 지역 완료", year, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_manager_creation() {
        // Quiet mode disables progress
        let manager = ProgressManager::new(true);
        assert!(!manager.is_enabled());
    }

    #[test]
    fn test_progress_messages() {
        assert_eq!(messages::collecting_year("2023"), "2023년 통계 수집 중...");
        assert_eq!(messages::collecting_member("김의원"), "김의원 뉴스 수집 중...");
        assert_eq!(messages::collection_complete("2023", 3558), "2023년: 3558개 지역 완료");
    }

    #[test]
    fn test_disabled_progress_yields_no_bars() {
        let manager = ProgressManager::new(true);
        assert!(manager.create_spinner("테스트").is_none());
        assert!(manager.create_collection_progress(10, "테스트").is_none());
    }
}
