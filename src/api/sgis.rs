use log::{debug, info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{sleep, Instant};

use super::deserializers::{lenient_f64, lenient_string, lenient_u64};
use super::http_client::create_custom_client;
use super::{ClientConfig, StatsDataset};
use crate::error::{ForgeError, Result};

const DEFAULT_BASE_URL: &str = "https://sgisapi.kostat.go.kr/OpenAPI3";

/// SGIS error code signalling an expired access token
const ERR_TOKEN_EXPIRED: i64 = 100;

/// Message fragment marking a normal "no results for this region" response
const NO_RESULTS_MSG: &str = "검색결과가 존재하지 않습니다";

/// Tokens officially last an hour; refresh proactively before that
const TOKEN_TTL: Duration = Duration::from_secs(50 * 60);

struct TokenState {
    token: String,
    issued_at: Instant,
}

/// SGIS (Statistical Geographic Information Service) API client.
///
/// Handles token issue/refresh, region-tree listing, and the per-dataset
/// statistics endpoints, with flat retry and exponential backoff on
/// transient failures.
pub struct SgisClient {
    service_id: String,
    security_key: String,
    config: ClientConfig,
    base_url: String,
    http_client: Client,
    token: RwLock<Option<TokenState>>,
}

impl SgisClient {
    pub fn new(service_id: String, security_key: String, config: ClientConfig) -> Self {
        Self::with_base_url(service_id, security_key, config, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at an alternate base URL (tests use this for mock servers)
    pub fn with_base_url(
        service_id: String,
        security_key: String,
        config: ClientConfig,
        base_url: String,
    ) -> Self {
        let http_client = create_custom_client(config.timeout, &config.user_agent);

        Self {
            service_id,
            security_key,
            config,
            base_url,
            http_client,
            token: RwLock::new(None),
        }
    }

    /// Get a valid access token, issuing or refreshing as needed
    pub async fn access_token(&self) -> Result<String> {
        {
            let guard = self.token.read().await;
            if let Some(state) = guard.as_ref() {
                if state.issued_at.elapsed() < TOKEN_TTL {
                    return Ok(state.token.clone());
                }
            }
        }
        self.refresh_token().await
    }

    /// Force a new token, replacing whatever is cached
    pub async fn refresh_token(&self) -> Result<String> {
        let mut last_error = None;
        let mut retry_delay = Duration::from_millis(self.config.retry_base_delay);

        for attempt in 0..self.config.max_retries {
            if attempt > 0 {
                sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let url = format!(
                "{}/auth/authentication.json?consumer_key={}&consumer_secret={}",
                self.base_url, self.service_id, self.security_key
            );

            match self.http_client.get(&url).send().await {
                Ok(response) => {
                    let raw: AuthResponse = match response.json().await {
                        Ok(parsed) => parsed,
                        Err(e) => {
                            warn!("Token response parse failed (attempt {}): {}", attempt + 1, e);
                            last_error = Some(ForgeError::Network(e));
                            continue;
                        }
                    };

                    if raw.err_cd == 0 {
                        if let Some(result) = raw.result {
                            info!("SGIS access token issued");
                            let mut guard = self.token.write().await;
                            *guard = Some(TokenState {
                                token: result.access_token.clone(),
                                issued_at: Instant::now(),
                            });
                            return Ok(result.access_token);
                        }
                    }

                    warn!(
                        "Token issue failed (attempt {}/{}): {}",
                        attempt + 1,
                        self.config.max_retries,
                        raw.err_msg
                    );
                    last_error = Some(ForgeError::api_error(
                        raw.err_cd.to_string(),
                        raw.err_msg,
                        Some("Check your SGIS service_id and security_key.".to_string()),
                    ));
                }
                Err(e) => {
                    warn!("Token request failed (attempt {}): {}", attempt + 1, e);
                    last_error = Some(ForgeError::Network(e));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| ForgeError::Other("Token issue failed after all retries".to_string())))
    }

    /// List administrative regions one level below `parent_code`.
    ///
    /// No parent lists sido; a sido code lists sigungu; a sigungu code
    /// lists emdong.
    pub async fn stage(&self, parent_code: Option<&str>) -> Result<Vec<StageItem>> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(cd) = parent_code {
            params.push(("cd", cd.to_string()));
        }
        self.request_list("addr/stage.json", params).await
    }

    /// Fetch one statistics dataset for one region and census year
    pub async fn stats<T>(
        &self,
        dataset: StatsDataset,
        year: &str,
        adm_cd: Option<&str>,
        low_search: bool,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut params: Vec<(&str, String)> = vec![("year", year.to_string())];
        if let Some(cd) = adm_cd {
            params.push(("adm_cd", cd.to_string()));
        }
        if low_search {
            params.push(("low_search", "1".to_string()));
        }

        let path = format!("stats/{}", dataset.endpoint());
        self.request_list(&path, params).await
    }

    /// Execute a token-authenticated list request with retry, backoff, and
    /// automatic token refresh on expiry
    async fn request_list<T>(&self, path: &str, params: Vec<(&str, String)>) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut last_error = None;
        let mut retry_delay = Duration::from_millis(self.config.retry_base_delay);

        for attempt in 0..self.config.max_retries {
            if attempt > 0 {
                sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let token = self.access_token().await?;

            let mut query: Vec<(&str, String)> = vec![("accessToken", token)];
            query.extend(params.iter().map(|(k, v)| (*k, v.clone())));

            let url = reqwest::Url::parse_with_params(
                &format!("{}/{}", self.base_url, path),
                &query,
            )
            .map_err(|e| ForgeError::Parse(e.to_string()))?;

            let response = match self.http_client.get(url).send().await {
                Ok(response) => response,
                Err(e) => {
                    debug!("Request failed (attempt {}): {}", attempt + 1, e);
                    last_error = Some(ForgeError::Network(e));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 {
                last_error = Some(ForgeError::RateLimit);
                continue;
            }
            if status.is_server_error() {
                last_error = Some(ForgeError::ServerError(format!(
                    "Server returned status {}",
                    status
                )));
                continue;
            }
            if !status.is_success() {
                return Err(ForgeError::api_error(
                    status.to_string(),
                    format!("API request failed with status {}", status),
                    None,
                ));
            }

            let envelope: SgisEnvelope<T> = match response.json().await {
                Ok(parsed) => parsed,
                Err(e) => {
                    last_error = Some(ForgeError::Network(e));
                    continue;
                }
            };

            if envelope.err_cd == ERR_TOKEN_EXPIRED {
                info!("Access token expired, refreshing");
                self.refresh_token().await?;
                last_error = Some(ForgeError::TokenExpired);
                continue;
            }

            if envelope.err_cd == 0 {
                return Ok(envelope.result.unwrap_or_default());
            }

            // "No results" for a region is a normal outcome, not an error
            if envelope.err_msg.contains(NO_RESULTS_MSG) {
                return Ok(Vec::new());
            }

            return Err(ForgeError::api_error(
                envelope.err_cd.to_string(),
                envelope.err_msg,
                None,
            ));
        }

        Err(last_error
            .unwrap_or_else(|| ForgeError::Other("Request failed after all retries".to_string())))
    }
}

// SGIS response envelopes. All endpoints share the errCd/errMsg wrapper;
// auth returns an object result while the rest return arrays.

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(rename = "errCd", default)]
    err_cd: i64,
    #[serde(rename = "errMsg", default)]
    err_msg: String,
    result: Option<AuthResult>,
}

#[derive(Debug, Deserialize)]
struct AuthResult {
    #[serde(rename = "accessToken")]
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SgisEnvelope<T> {
    #[serde(rename = "errCd", default)]
    err_cd: i64,
    #[serde(rename = "errMsg", default)]
    err_msg: String,
    // A missing field already deserializes to None; a `default` attribute
    // here would force a `T: Default` bound onto every payload type
    result: Option<Vec<T>>,
}

/// One region row from `addr/stage.json`
#[derive(Debug, Clone, Deserialize)]
pub struct StageItem {
    #[serde(deserialize_with = "lenient_string")]
    pub cd: String,
    #[serde(default)]
    pub addr_name: String,
    #[serde(default)]
    pub full_addr: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub x_coor: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub y_coor: String,
}

/// Row from `stats/population.json`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PopulationRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub adm_cd: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub tot_ppltn: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_age: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ppltn_dnsty: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub oldage_suprt_per: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub juv_suprt_per: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub aged_child_idx: f64,
}

/// Row from `stats/searchpopulation.json` (age/sex breakdown)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AgeSexRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub adm_cd: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub population: u64,
}

/// Row from `stats/household.json`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct HouseholdRecord {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub household_cnt: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub family_member_cnt: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_family_member_cnt: f64,
}

/// Row from `stats/house.json`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct HouseRecord {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub house_cnt: u64,
}

/// Row from `stats/company.json`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompanyRecord {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub corp_cnt: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub tot_worker: u64,
}
