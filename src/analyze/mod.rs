//! Keyword-bucket classification of collected news.
//!
//! Each article is assigned to the first issue category whose keyword list
//! matches its title or description; everything else lands in 기타. Topic
//! keywords per category come from simple word-frequency counting over a
//! noun-ish token stream, not from an actual topic model.

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use crate::api::types::{MemberNews, NewsArticle, Politician};
use crate::collect::{read_required_json, write_json};
use crate::error::Result;

/// Issue categories with their matching keywords, checked in order
const CATEGORIES: [(&str, &[&str]); 15] = [
    ("국정감사·질의", &["국정감사", "질의", "답변", "지적", "질문", "청문회"]),
    ("예산·재정", &["예산", "예산안", "재정", "세금", "세출", "세입", "결산"]),
    ("법안·입법", &["법안", "법률", "개정", "입법", "조례", "심의", "의결", "발의"]),
    ("지역개발", &["개발", "재개발", "재건축", "신축", "건설", "조성"]),
    ("교통·인프라", &["교통", "도로", "지하철", "버스", "주차", "철도"]),
    ("주택·부동산", &["주택", "아파트", "부동산", "임대", "분양"]),
    ("복지·의료", &["복지", "의료", "건강", "병원", "보건", "돌봄"]),
    ("일자리·경제", &["일자리", "고용", "청년", "취업", "경제", "소상공인"]),
    ("교육·보육", &["교육", "학교", "학생", "어린이집", "유치원", "보육"]),
    ("문화·체육", &["문화", "체육", "예술", "축제", "공연", "도서관"]),
    ("환경·기후", &["환경", "기후", "쓰레기", "재활용", "대기", "녹지"]),
    ("안전·재난", &["안전", "재난", "방역", "소방", "범죄", "치안"]),
    ("정책발표", &["정책", "공약", "발표", "계획", "방안", "추진"]),
    ("민원·주민", &["민원", "주민", "청원", "간담회", "설명회", "토론회"]),
    ("기타", &[]),
];

const STOPWORDS: [&str; 35] = [
    "이", "가", "을", "를", "의", "에", "에서", "으로", "로", "은", "는", "과", "와", "도", "만",
    "하다", "되다", "이다", "있다", "없다", "한다", "된다", "했다", "됐다", "하는", "되는", "등",
    "및", "위해", "통해", "대한", "위한", "관련", "따른", "것",
];

const VERB_ENDINGS: [&str; 12] = [
    "하다", "되다", "이다", "있다", "없다", "했다", "됐다", "한다", "된다", "하는", "되는", "있는",
];

/// Analysis output per member, keyed by member name in the output file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemberAnalysis {
    pub member_info: Politician,
    pub total_count: usize,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub collected_date: String,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Issue {
    pub category: String,
    pub count: usize,
    /// `(keyword, frequency)` pairs, highest frequency first
    pub top_keywords: Vec<(String, usize)>,
    /// Ten most recent articles in the category
    pub articles: Vec<NewsArticle>,
}

/// Analyze every member in a collected news file and write the result
pub fn analyze_news_file(input: &Path, output: &Path) -> Result<BTreeMap<String, MemberAnalysis>> {
    let raw: BTreeMap<String, MemberNews> = read_required_json(input)?;
    info!("Analyzing news for {} members", raw.len());

    let mut analyzed = BTreeMap::new();
    for (name, member_news) in raw {
        if member_news.news.is_empty() {
            continue;
        }
        analyzed.insert(name, analyze_member(&member_news));
    }

    write_json(output, &analyzed)?;
    info!("Analysis saved: {} members", analyzed.len());
    Ok(analyzed)
}

/// Classify one member's articles and extract per-category keywords
pub fn analyze_member(member_news: &MemberNews) -> MemberAnalysis {
    let classified = classify_articles(&member_news.news);

    let mut issues = Vec::new();
    for (category, _) in CATEGORIES {
        let Some(articles) = classified.get(category) else {
            continue;
        };
        if articles.is_empty() {
            continue;
        }

        let top_keywords = top_keywords(articles, 10);

        let mut sorted: Vec<NewsArticle> = articles.iter().map(|a| (*a).clone()).collect();
        sorted.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        sorted.truncate(10);

        issues.push(Issue {
            category: category.to_string(),
            count: articles.len(),
            top_keywords,
            articles: sorted,
        });
    }

    MemberAnalysis {
        member_info: member_news.member_info.clone(),
        total_count: member_news.news.len(),
        last_updated: member_news.last_updated.clone(),
        collected_date: member_news.collected_date.clone(),
        issues,
    }
}

/// Assign each article to the first category whose keywords match; every
/// article lands in exactly one bucket
fn classify_articles<'a>(articles: &'a [NewsArticle]) -> HashMap<&'static str, Vec<&'a NewsArticle>> {
    let mut classified: HashMap<&'static str, Vec<&NewsArticle>> = HashMap::new();
    let mut categorized: HashSet<&str> = HashSet::new();

    for (category, keywords) in CATEGORIES {
        if keywords.is_empty() {
            continue;
        }
        for article in articles {
            if categorized.contains(article.link.as_str()) {
                continue;
            }
            let text = format!("{} {}", article.title, article.description);
            if keywords.iter().any(|keyword| text.contains(keyword)) {
                classified.entry(category).or_default().push(article);
                categorized.insert(article.link.as_str());
            }
        }
    }

    for article in articles {
        if !categorized.contains(article.link.as_str()) {
            classified.entry("기타").or_default().push(article);
        }
    }

    classified
}

/// Count noun-ish tokens across articles and return the most frequent
fn top_keywords(articles: &[&NewsArticle], top_n: usize) -> Vec<(String, usize)> {
    let mut frequencies: HashMap<String, usize> = HashMap::new();

    for article in articles {
        let text = format!("{} {}", article.title, article.description);
        for noun in extract_nouns(&text) {
            *frequencies.entry(noun).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = frequencies.into_iter().collect();
    // Ties break alphabetically so output is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top_n);
    ranked
}

/// Whitespace tokenization with punctuation stripping, stopword and
/// verb-ending removal. A rough stand-in for a morphological analyzer.
fn extract_nouns(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| ".,!?()[]\"':;".contains(c)))
        .filter(|cleaned| cleaned.chars().count() >= 2)
        .filter(|cleaned| !STOPWORDS.contains(cleaned))
        .filter(|cleaned| !VERB_ENDINGS.iter().any(|ending| cleaned.ends_with(ending)))
        .filter(|cleaned| !cleaned.chars().all(|c| c.is_ascii_digit()))
        .map(|cleaned| cleaned.to_string())
        .collect()
}
