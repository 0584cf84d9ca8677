use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full administrative-region tree as written to `sgis_national_regions.json`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegionTree {
    pub metadata: RegionMetadata,
    /// Keyed by 2-digit sido code
    #[serde(default)]
    pub regions: BTreeMap<String, Sido>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegionMetadata {
    pub total_sido: usize,
    pub total_sigungu: usize,
    pub total_emdong: usize,
    pub collection_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Sido {
    pub sido_code: String,
    pub sido_name: String,
    #[serde(default)]
    pub sigungu_list: Vec<Sigungu>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Sigungu {
    pub sigungu_code: String,
    pub sigungu_name: String,
    #[serde(default)]
    pub full_address: String,
    #[serde(default)]
    pub x_coord: String,
    #[serde(default)]
    pub y_coord: String,
    #[serde(default)]
    pub emdong_list: Vec<Emdong>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Emdong {
    pub emdong_code: String,
    pub emdong_name: String,
    #[serde(default)]
    pub full_address: String,
    #[serde(default)]
    pub x_coord: String,
    #[serde(default)]
    pub y_coord: String,
}

impl RegionTree {
    /// Flatten to the list of emdong codes, the unit of collection work
    pub fn emdong_codes(&self) -> Vec<String> {
        self.regions
            .values()
            .flat_map(|sido| &sido.sigungu_list)
            .flat_map(|sigungu| &sigungu.emdong_list)
            .map(|emdong| emdong.emdong_code.clone())
            .collect()
    }

    /// Locate a sigungu subtree by its 5-digit code
    pub fn find_sigungu(&self, sigungu_code: &str) -> Option<&Sigungu> {
        self.regions
            .values()
            .flat_map(|sido| &sido.sigungu_list)
            .find(|sigungu| sigungu.sigungu_code == sigungu_code)
    }

    /// Locate an emdong leaf by its full code
    pub fn find_emdong(&self, emdong_code: &str) -> Option<&Emdong> {
        self.regions
            .values()
            .flat_map(|sido| &sido.sigungu_list)
            .flat_map(|sigungu| &sigungu.emdong_list)
            .find(|emdong| emdong.emdong_code == emdong_code)
    }
}

/// Core per-emdong statistics (household / house / company datasets)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CoreStats {
    pub code: String,
    pub household: HouseholdStats,
    pub house: HouseStats,
    pub company: CompanyStats,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HouseholdStats {
    pub household_cnt: u64,
    pub family_member_cnt: u64,
    pub avg_family_member_cnt: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HouseStats {
    pub house_cnt: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CompanyStats {
    pub corp_cnt: u64,
    pub tot_worker: u64,
}

/// Enhanced per-emdong statistics (population basics + age buckets)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EnhancedStats {
    pub basic: PopulationBasics,
    /// Keyed by bucket label ("0-9세" .. "80세 이상")
    #[serde(default)]
    pub age_groups: BTreeMap<String, AgeGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PopulationBasics {
    pub total_population: u64,
    pub avg_age: f64,
    pub population_density: f64,
    pub oldage_support_ratio: f64,
    pub youth_support_ratio: f64,
    pub aging_index: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AgeGroup {
    pub male: u64,
    pub female: u64,
    pub total: u64,
}

/// Multi-year collection output: `regions_by_year[year][emdong_code]`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MultiyearOutput<T> {
    pub metadata: MultiyearMetadata,
    #[serde(default = "BTreeMap::new")]
    pub regions_by_year: BTreeMap<String, BTreeMap<String, T>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MultiyearMetadata {
    pub collection_date: String,
    #[serde(default)]
    pub years: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl<T> MultiyearOutput<T> {
    pub fn new(years: &[String], description: &str) -> Self {
        Self {
            metadata: MultiyearMetadata {
                collection_date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                years: years.to_vec(),
                description: description.to_string(),
            },
            regions_by_year: BTreeMap::new(),
        }
    }

    pub fn collected_total(&self) -> usize {
        self.regions_by_year.values().map(|m| m.len()).sum()
    }
}

/// One news article as returned by the Naver search API, highlight tags stripped
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub link: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    #[serde(rename = "originallink", default)]
    pub original_link: String,
}

/// Roster entry for one politician
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Politician {
    pub name: String,
    #[serde(default)]
    pub party: String,
    #[serde(default)]
    pub district: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub position: String,
}

/// Accumulated news per politician, keyed by name in the output file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemberNews {
    pub member_info: Politician,
    pub collected_date: String,
    pub total_count: usize,
    #[serde(default)]
    pub news: Vec<NewsArticle>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_updated: String,
}

/// Assembly roster file layout (`assembly_by_region.json`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssemblyRoster {
    /// District members keyed by sido name
    #[serde(default)]
    pub regional: BTreeMap<String, Vec<Politician>>,
    /// Proportional members keyed by party name
    #[serde(default)]
    pub proportional: BTreeMap<String, Vec<Politician>>,
}

impl AssemblyRoster {
    /// Flatten regional and proportional members into one collection list
    pub fn all_members(&self) -> Vec<Politician> {
        let mut members = Vec::new();

        for member_list in self.regional.values() {
            for member in member_list {
                if !member.name.is_empty() {
                    members.push(member.clone());
                }
            }
        }

        for (party, member_list) in &self.proportional {
            for member in member_list {
                if !member.name.is_empty() {
                    members.push(Politician {
                        name: member.name.clone(),
                        party: party.clone(),
                        district: "비례대표".to_string(),
                        position: member.position.clone(),
                    });
                }
            }
        }

        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> RegionTree {
        let mut tree = RegionTree::default();
        tree.regions.insert(
            "11".to_string(),
            Sido {
                sido_code: "11".to_string(),
                sido_name: "서울특별시".to_string(),
                sigungu_list: vec![Sigungu {
                    sigungu_code: "11230".to_string(),
                    sigungu_name: "강남구".to_string(),
                    emdong_list: vec![
                        Emdong {
                            emdong_code: "11230680".to_string(),
                            emdong_name: "개포1동".to_string(),
                            ..Default::default()
                        },
                        Emdong {
                            emdong_code: "11230690".to_string(),
                            emdong_name: "개포2동".to_string(),
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                }],
            },
        );
        tree
    }

    #[test]
    fn test_emdong_codes_flattening() {
        let tree = sample_tree();
        let codes = tree.emdong_codes();
        assert_eq!(codes, vec!["11230680", "11230690"]);
    }

    #[test]
    fn test_find_sigungu_and_emdong() {
        let tree = sample_tree();
        assert_eq!(
            tree.find_sigungu("11230").map(|s| s.sigungu_name.as_str()),
            Some("강남구")
        );
        assert_eq!(
            tree.find_emdong("11230690").map(|e| e.emdong_name.as_str()),
            Some("개포2동")
        );
        assert!(tree.find_sigungu("99999").is_none());
    }

    #[test]
    fn test_roster_flattening_marks_proportional() {
        let mut roster = AssemblyRoster::default();
        roster.regional.insert(
            "서울특별시".to_string(),
            vec![Politician {
                name: "김의원".to_string(),
                party: "A당".to_string(),
                district: "강남구갑".to_string(),
                ..Default::default()
            }],
        );
        roster.proportional.insert(
            "B당".to_string(),
            vec![Politician {
                name: "이의원".to_string(),
                ..Default::default()
            }],
        );

        let members = roster.all_members();
        assert_eq!(members.len(), 2);

        let proportional = members.iter().find(|m| m.name == "이의원").unwrap();
        assert_eq!(proportional.district, "비례대표");
        assert_eq!(proportional.party, "B당");
    }

    #[test]
    fn test_multiyear_collected_total() {
        let mut output: MultiyearOutput<CoreStats> =
            MultiyearOutput::new(&["2022".to_string(), "2023".to_string()], "test");
        output
            .regions_by_year
            .entry("2022".to_string())
            .or_default()
            .insert("11230680".to_string(), CoreStats::default());
        assert_eq!(output.collected_total(), 1);
    }
}
