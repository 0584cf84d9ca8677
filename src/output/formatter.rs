use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::analyze::MemberAnalysis;
use crate::api::types::RegionTree;
use crate::cli::OutputFormat;
use crate::error::Result;
use std::collections::BTreeMap;

pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format a region tree as a per-sido summary
    pub fn format_region_summary(&self, tree: &RegionTree) -> Result<String> {
        match self.format {
            OutputFormat::Table => self.format_region_table(tree),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&tree.metadata)?),
        }
    }

    /// Format analyzed member news as a per-member summary
    pub fn format_analysis_summary(
        &self,
        analyzed: &BTreeMap<String, MemberAnalysis>,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Table => self.format_analysis_table(analyzed),
            OutputFormat::Json => {
                let summary: BTreeMap<&str, usize> = analyzed
                    .iter()
                    .map(|(name, analysis)| (name.as_str(), analysis.total_count))
                    .collect();
                Ok(serde_json::to_string_pretty(&summary)?)
            }
        }
    }

    fn format_region_table(&self, tree: &RegionTree) -> Result<String> {
        let mut table = Table::new();
        table.set_header(vec![
            Cell::new("코드").fg(Color::Cyan),
            Cell::new("시도").fg(Color::Cyan),
            Cell::new("시군구").fg(Color::Cyan),
            Cell::new("읍면동").fg(Color::Cyan),
        ]);

        for (code, sido) in &tree.regions {
            let emdong_count: usize = sido
                .sigungu_list
                .iter()
                .map(|sigungu| sigungu.emdong_list.len())
                .sum();
            table.add_row(vec![
                Cell::new(code),
                Cell::new(&sido.sido_name),
                Cell::new(sido.sigungu_list.len().to_string()),
                Cell::new(emdong_count.to_string()),
            ]);
        }
        table.set_content_arrangement(ContentArrangement::Dynamic);

        let mut result = String::new();
        result.push_str(&format!(
            "\n{} 시도 {} | 시군구 {} | 읍면동 {}\n\n",
            "📊".cyan(),
            tree.metadata.total_sido.to_string().yellow(),
            tree.metadata.total_sigungu.to_string().yellow(),
            tree.metadata.total_emdong.to_string().yellow()
        ));
        result.push_str(&table.to_string());
        Ok(result)
    }

    fn format_analysis_table(&self, analyzed: &BTreeMap<String, MemberAnalysis>) -> Result<String> {
        let mut table = Table::new();
        table.set_header(vec![
            Cell::new("이름").fg(Color::Cyan),
            Cell::new("지역구").fg(Color::Cyan),
            Cell::new("기사").fg(Color::Cyan),
            Cell::new("주요 이슈").fg(Color::Cyan),
        ]);

        for (name, analysis) in analyzed {
            let top_issue = analysis
                .issues
                .first()
                .map(|issue| format!("{} ({})", issue.category, issue.count))
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![
                Cell::new(name),
                Cell::new(truncate_string(&analysis.member_info.district, 20)),
                Cell::new(analysis.total_count.to_string()),
                Cell::new(top_issue),
            ]);
        }
        table.set_content_arrangement(ContentArrangement::Dynamic);

        let mut result = String::new();
        result.push_str(&format!(
            "\n{} 분석 대상: {}명\n\n",
            "📰".cyan(),
            analyzed.len().to_string().yellow()
        ));
        result.push_str(&table.to_string());
        Ok(result)
    }
}

/// Truncate a string to a maximum character count, appending an ellipsis
fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Emdong, Politician, Sido, Sigungu};

    fn sample_tree() -> RegionTree {
        let mut tree = RegionTree::default();
        tree.metadata.total_sido = 1;
        tree.metadata.total_sigungu = 1;
        tree.metadata.total_emdong = 2;
        tree.regions.insert(
            "11".to_string(),
            Sido {
                sido_code: "11".to_string(),
                sido_name: "서울특별시".to_string(),
                sigungu_list: vec![Sigungu {
                    sigungu_code: "11230".to_string(),
                    sigungu_name: "강남구".to_string(),
                    emdong_list: vec![Emdong::default(), Emdong::default()],
                    ..Default::default()
                }],
            },
        );
        tree
    }

    #[test]
    fn test_region_table_contains_counts() {
        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.format_region_summary(&sample_tree()).unwrap();
        assert!(output.contains("서울특별시"));
        assert!(output.contains('2'));
    }

    #[test]
    fn test_region_json_is_metadata() {
        let formatter = Formatter::new(OutputFormat::Json);
        let output = formatter.format_region_summary(&sample_tree()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total_emdong"], 2);
    }

    #[test]
    fn test_analysis_table_shows_top_issue() {
        let mut analyzed = BTreeMap::new();
        analyzed.insert(
            "김의원".to_string(),
            MemberAnalysis {
                member_info: Politician {
                    name: "김의원".to_string(),
                    district: "서울 강남구갑".to_string(),
                    ..Default::default()
                },
                total_count: 12,
                issues: vec![crate::analyze::Issue {
                    category: "예산·재정".to_string(),
                    count: 7,
                    ..Default::default()
                }],
                ..Default::default()
            },
        );

        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.format_analysis_summary(&analyzed).unwrap();
        assert!(output.contains("예산·재정 (7)"));
        assert!(output.contains("12"));
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("짧은 이름", 20), "짧은 이름");
        assert_eq!(truncate_string("아주아주아주아주 긴 지역구 이름", 10), "아주아주아주아...");
    }
}
