use chrono::Local;
use log::{info, warn};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;

use super::{read_json_or_default, write_json};
use crate::api::naver::NewsSource;
use crate::api::types::{MemberNews, Politician};
use crate::error::Result;
use crate::progress::{messages, ProgressManager};
use std::sync::Arc;

/// Outcome of one news collection pass
#[derive(Debug, Default, PartialEq)]
pub struct NewsRunSummary {
    pub members: usize,
    pub new_articles: usize,
    pub failed_members: usize,
}

/// Collects news per politician through a [`NewsSource`], deduplicating by
/// article link against previously collected data.
pub struct NewsCollector<S: NewsSource> {
    source: S,
    query_suffix: String,
    articles_per_member: u32,
    pace: Duration,
    save_every: usize,
    progress: Option<Arc<ProgressManager>>,
}

impl<S: NewsSource> NewsCollector<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            // "이름 국정감사" is the search phrase that surfaces committee work
            query_suffix: "국정감사".to_string(),
            articles_per_member: 50,
            // Naver allows ten calls per second
            pace: Duration::from_millis(100),
            save_every: 10,
            progress: None,
        }
    }

    pub fn with_query_suffix(mut self, suffix: &str) -> Self {
        self.query_suffix = suffix.to_string();
        self
    }

    pub fn with_articles_per_member(mut self, count: u32) -> Self {
        self.articles_per_member = count.clamp(1, 100);
        self
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_save_every(mut self, save_every: usize) -> Self {
        self.save_every = save_every.max(1);
        self
    }

    pub fn with_progress(mut self, progress: Arc<ProgressManager>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run one collection pass over `members`, merging into `output`
    pub async fn collect(&self, members: &[Politician], output: &Path) -> Result<NewsRunSummary> {
        let mut all_data: BTreeMap<String, MemberNews> = read_json_or_default(output);
        let mut summary = NewsRunSummary {
            members: members.len(),
            ..Default::default()
        };

        info!("Collecting news for {} members", members.len());
        let bar = self
            .progress
            .as_ref()
            .and_then(|p| p.create_collection_progress(members.len() as u64, "뉴스 수집"));

        for (index, member) in members.iter().enumerate() {
            if let Some(bar) = &bar {
                bar.set_message(messages::collecting_member(&member.name));
                bar.inc(1);
            }
            let query = if self.query_suffix.is_empty() {
                member.name.clone()
            } else {
                format!("{} {}", member.name, self.query_suffix)
            };

            let articles = match self
                .source
                .search(&query, self.articles_per_member, 1)
                .await
            {
                Ok(articles) => articles,
                Err(e) => {
                    warn!("News search failed for {}: {}", member.name, e);
                    summary.failed_members += 1;
                    sleep(self.pace).await;
                    continue;
                }
            };

            let entry = all_data
                .entry(member.name.clone())
                .or_insert_with(|| MemberNews {
                    member_info: member.clone(),
                    collected_date: Local::now().format("%Y%m%d").to_string(),
                    ..Default::default()
                });

            let existing_links: HashSet<&str> =
                entry.news.iter().map(|a| a.link.as_str()).collect();
            let fresh: Vec<_> = articles
                .into_iter()
                .filter(|a| !existing_links.contains(a.link.as_str()))
                .collect();

            summary.new_articles += fresh.len();
            entry.news.extend(fresh);
            entry.total_count = entry.news.len();
            entry.last_updated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

            if (index + 1) % self.save_every == 0 {
                write_json(output, &all_data)?;
                info!("Saved after {}/{} members", index + 1, members.len());
            }

            sleep(self.pace).await;
        }

        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        write_json(output, &all_data)?;
        info!(
            "News collection done: {} new articles, {} failed members",
            summary.new_articles, summary.failed_members
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::NewsArticle;
    use crate::error::ForgeError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FakeSource {
        responses: Mutex<BTreeMap<String, Vec<NewsArticle>>>,
        queries: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn new(responses: BTreeMap<String, Vec<NewsArticle>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NewsSource for FakeSource {
        async fn search(&self, query: &str, _display: u32, _start: u32) -> Result<Vec<NewsArticle>> {
            self.queries.lock().unwrap().push(query.to_string());
            self.responses
                .lock()
                .unwrap()
                .get(query)
                .cloned()
                .ok_or(ForgeError::RateLimit)
        }
    }

    fn article(link: &str, title: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            description: String::new(),
            link: link.to_string(),
            pub_date: "Mon, 20 Oct 2025 09:00:00 +0900".to_string(),
            original_link: String::new(),
        }
    }

    fn member(name: &str) -> Politician {
        Politician {
            name: name.to_string(),
            party: "A당".to_string(),
            district: "강남구갑".to_string(),
            position: String::new(),
        }
    }

    #[tokio::test]
    async fn test_collect_dedups_by_link_across_runs() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("news.json");

        let mut responses = BTreeMap::new();
        responses.insert(
            "김의원 국정감사".to_string(),
            vec![article("https://n/1", "기사1"), article("https://n/2", "기사2")],
        );
        let members = vec![member("김의원")];

        let collector = NewsCollector::new(FakeSource::new(responses.clone()))
            .with_pace(Duration::ZERO);
        let first = collector.collect(&members, &output).await.unwrap();
        assert_eq!(first.new_articles, 2);

        // Second run returns one old and one new article
        responses.insert(
            "김의원 국정감사".to_string(),
            vec![article("https://n/2", "기사2"), article("https://n/3", "기사3")],
        );
        let collector =
            NewsCollector::new(FakeSource::new(responses)).with_pace(Duration::ZERO);
        let second = collector.collect(&members, &output).await.unwrap();
        assert_eq!(second.new_articles, 1);

        let saved: BTreeMap<String, MemberNews> = super::super::read_json(&output).unwrap();
        let entry = saved.get("김의원").unwrap();
        assert_eq!(entry.total_count, 3);
        assert_eq!(entry.member_info.party, "A당");
        assert!(!entry.last_updated.is_empty());
    }

    #[tokio::test]
    async fn test_failed_member_does_not_abort_run() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("news.json");

        let mut responses = BTreeMap::new();
        responses.insert(
            "이의원 국정감사".to_string(),
            vec![article("https://n/9", "기사")],
        );
        let source = FakeSource::new(responses);

        let members = vec![member("김의원"), member("이의원")];
        let collector = NewsCollector::new(source).with_pace(Duration::ZERO);
        let summary = collector.collect(&members, &output).await.unwrap();

        assert_eq!(summary.failed_members, 1);
        assert_eq!(summary.new_articles, 1);

        let saved: BTreeMap<String, MemberNews> = super::super::read_json(&output).unwrap();
        assert!(saved.contains_key("이의원"));
        assert!(!saved.contains_key("김의원"));
    }

    #[tokio::test]
    async fn test_custom_query_suffix() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("news.json");

        let mut responses = BTreeMap::new();
        responses.insert("박구청장 구정".to_string(), vec![]);
        let source = FakeSource::new(responses);

        let collector = NewsCollector::new(source)
            .with_query_suffix("구정")
            .with_pace(Duration::ZERO);
        collector
            .collect(&[member("박구청장")], &output)
            .await
            .unwrap();

        let saved: BTreeMap<String, MemberNews> = super::super::read_json(&output).unwrap();
        assert_eq!(saved.get("박구청장").unwrap().total_count, 0);
    }
}
