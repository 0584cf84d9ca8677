pub mod deserializers;
pub mod http_client;
pub mod naver;
pub mod sgis;
pub mod types;

pub use naver::{NaverNewsClient, NewsSource};
pub use sgis::SgisClient;

/// SGIS statistics datasets exposed by the collectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsDataset {
    /// Basic population statistics (총조사 인구)
    Population,
    /// Age/sex population breakdown (연령별/성별 인구)
    SearchPopulation,
    /// Household statistics (가구)
    Household,
    /// Housing statistics (주택)
    House,
    /// Company statistics (사업체)
    Company,
}

impl StatsDataset {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "population" => Some(Self::Population),
            "searchpopulation" | "agesex" => Some(Self::SearchPopulation),
            "household" => Some(Self::Household),
            "house" => Some(Self::House),
            "company" => Some(Self::Company),
            _ => None,
        }
    }

    /// Path segment under `/OpenAPI3/stats/`
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Population => "population.json",
            Self::SearchPopulation => "searchpopulation.json",
            Self::Household => "household.json",
            Self::House => "house.json",
            Self::Company => "company.json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Population => "population",
            Self::SearchPopulation => "searchpopulation",
            Self::Household => "household",
            Self::House => "house",
            Self::Company => "company",
        }
    }
}

/// Client timeouts and retry policy shared by both API clients
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds
    pub timeout: u64,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Base delay for exponential backoff (milliseconds)
    pub retry_base_delay: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: 15,
            max_retries: 5,
            retry_base_delay: 500,
            user_agent: format!("insightforge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_endpoints() {
        assert_eq!(StatsDataset::Population.endpoint(), "population.json");
        assert_eq!(StatsDataset::Household.endpoint(), "household.json");
        assert_eq!(
            StatsDataset::SearchPopulation.endpoint(),
            "searchpopulation.json"
        );
    }

    #[test]
    fn test_dataset_from_str() {
        assert_eq!(
            StatsDataset::from_str("agesex"),
            Some(StatsDataset::SearchPopulation)
        );
        assert_eq!(StatsDataset::from_str("COMPANY"), Some(StatsDataset::Company));
        assert_eq!(StatsDataset::from_str("unknown"), None);
    }
}
