//! Route handlers. Each one reads collected files through the [`DataStore`]
//! and answers with plain `serde_json::Value` shapes so the frontend sees
//! the files as they were written, merged where a view needs more than one.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use super::{files, AppState};
use crate::collect::multiyear::DEFAULT_YEARS;

/// Seoul sigungu codes to district names, for the politician lookup
const GU_NAMES: [(&str, &str); 25] = [
    ("11110", "종로구"),
    ("11140", "중구"),
    ("11170", "용산구"),
    ("11200", "성동구"),
    ("11215", "광진구"),
    ("11230", "강남구"),
    ("11260", "동대문구"),
    ("11290", "중랑구"),
    ("11305", "성북구"),
    ("11320", "강북구"),
    ("11350", "도봉구"),
    ("11380", "노원구"),
    ("11410", "은평구"),
    ("11440", "서대문구"),
    ("11470", "마포구"),
    ("11500", "양천구"),
    ("11530", "강서구"),
    ("11545", "구로구"),
    ("11560", "금천구"),
    ("11590", "영등포구"),
    ("11620", "동작구"),
    ("11650", "관악구"),
    ("11680", "서초구"),
    ("11710", "송파구"),
    ("11740", "강동구"),
];

fn str_of<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

fn u64_of(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0)
}

fn i64_of(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}

fn year_param(params: &HashMap<String, String>) -> String {
    params
        .get("year")
        .cloned()
        .unwrap_or_else(|| "2023".to_string())
}

/// Find a sigungu object anywhere in the region tree
fn find_sigungu(tree: &Value, code: &str) -> Option<Value> {
    let regions = tree.get("regions")?.as_object()?;
    for sido in regions.values() {
        for sigungu in sido.get("sigungu_list")?.as_array()? {
            if str_of(sigungu, "sigungu_code") == code {
                return Some(sigungu.clone());
            }
        }
    }
    None
}

/// Find an emdong object anywhere in the region tree
fn find_emdong(tree: &Value, code: &str) -> Option<Value> {
    let regions = tree.get("regions")?.as_object()?;
    for sido in regions.values() {
        for sigungu in sido.get("sigungu_list")?.as_array()? {
            for emdong in sigungu.get("emdong_list")?.as_array()? {
                if str_of(emdong, "emdong_code") == code {
                    return Some(emdong.clone());
                }
            }
        }
    }
    None
}

/// Registry code for an emdong from `code_mapping.json`, if mapped
fn jumin_code_for(state: &AppState, emdong_code: &str) -> Option<String> {
    let mapping = state.store.load(files::CODE_MAPPING)?;
    mapping
        .get("mapping")?
        .get(emdong_code)?
        .get("jumin_code")?
        .as_str()
        .map(str::to_string)
}

fn latest_snapshot(state: &AppState) -> Option<Arc<Value>> {
    state.store.load_latest(files::JUMIN_SNAPSHOT_PREFIX)
}

/// GET /api/national/sido
pub async fn sido_list(State(state): State<AppState>) -> Json<Value> {
    let Some(data) = state.store.load(files::REGIONS) else {
        return Json(json!([]));
    };
    let Some(regions) = data.get("regions").and_then(Value::as_object) else {
        return Json(json!([]));
    };

    let list: Vec<Value> = regions
        .iter()
        .map(|(code, sido)| {
            json!({
                "sido_cd": code,
                "sido_nm": str_of(sido, "sido_name"),
                "sigungu_count": sido
                    .get("sigungu_list")
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len),
            })
        })
        .collect();
    Json(Value::Array(list))
}

/// GET /api/national/sido/:code
pub async fn sido_detail(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Json<Value> {
    let sido = state
        .store
        .load(files::REGIONS)
        .and_then(|data| data.get("regions")?.get(&code).cloned());
    Json(sido.unwrap_or_else(|| json!({})))
}

/// GET /api/national/sigungu/:code
pub async fn sigungu_summary(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Json<Value> {
    let sigungu = state
        .store
        .load(files::REGIONS)
        .and_then(|data| find_sigungu(&data, &code));
    Json(sigungu.unwrap_or_else(|| json!({})))
}

/// GET /api/national/sigungu/:code/detail
///
/// The sigungu object plus population/household totals summed over its
/// emdong. Population and households come from the registry snapshot via
/// the code mapping; houses and companies from the comprehensive SGIS file.
pub async fn sigungu_detail(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Json<Value> {
    let basic = state
        .store
        .load(files::REGIONS)
        .and_then(|data| find_sigungu(&data, &code))
        .unwrap_or_else(|| json!({}));

    let snapshot = latest_snapshot(&state);
    let comprehensive = state.store.load(files::COMPREHENSIVE);

    let mut total_household = 0u64;
    let mut total_population = 0u64;
    let mut total_male = 0u64;
    let mut total_female = 0u64;
    let mut total_house = 0u64;
    let mut total_company = 0u64;
    let mut total_worker = 0u64;
    let mut emdong_count = 0usize;

    if let Some(emdong_list) = basic.get("emdong_list").and_then(Value::as_array) {
        for emdong in emdong_list {
            let emdong_code = str_of(emdong, "emdong_code");
            emdong_count += 1;

            if let Some(jumin_code) = jumin_code_for(&state, emdong_code) {
                if let Some(info) = snapshot
                    .as_deref()
                    .and_then(|s| s.get("regions")?.get(&jumin_code).cloned())
                {
                    total_household += u64_of(&info, "household_cnt");
                    total_population += u64_of(&info, "total_population");
                    total_male += u64_of(&info, "male_population");
                    total_female += u64_of(&info, "female_population");
                }
            }

            if let Some(stats) = comprehensive
                .as_deref()
                .and_then(|c| c.get("regions")?.get(emdong_code).cloned())
            {
                total_house += stats.get("house").map_or(0, |h| u64_of(h, "house_cnt"));
                if let Some(company) = stats.get("company") {
                    total_company += u64_of(company, "corp_cnt");
                    total_worker += u64_of(company, "tot_worker");
                }
            }
        }
    }

    let data_year = snapshot
        .as_deref()
        .and_then(|s| s.get("metadata"))
        .map(|m| str_of(m, "year_month").to_string())
        .unwrap_or_default();

    let mut result = basic.as_object().cloned().unwrap_or_default();
    result.insert("sigungu_code".into(), json!(code));
    result.insert(
        "household".into(),
        json!({
            "household_cnt": total_household,
            "family_member_cnt": total_population,
            "avg_family_member_cnt": if total_household > 0 {
                total_population as f64 / total_household as f64
            } else {
                0.0
            },
            "male_population": total_male,
            "female_population": total_female,
        }),
    );
    result.insert("house".into(), json!({ "house_cnt": total_house }));
    result.insert(
        "company".into(),
        json!({ "corp_cnt": total_company, "tot_worker": total_worker }),
    );
    result.insert(
        "data_source".into(),
        json!(format!("주민등록 {} (인구/가구 합산)", data_year)),
    );
    result.insert("data_year".into(), json!(data_year));
    result.insert("emdong_count".into(), json!(emdong_count));

    Json(Value::Object(result))
}

/// GET /api/national/emdong/:code?year=
pub async fn emdong_stats(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let year = year_param(&params);
    let stats = state
        .store
        .load(files::MULTIYEAR_ENHANCED)
        .and_then(|data| data.get("regions_by_year")?.get(&year)?.get(&code).cloned());
    Json(stats.unwrap_or_else(|| json!({})))
}

/// GET /api/emdong/:code/enhanced?year=
///
/// The region-tree entry merged with comprehensive SGIS statistics, with
/// household figures overridden by the registry snapshot when the code maps
/// and a `population_growth` block when a converted growth file is present.
pub async fn emdong_enhanced(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let year = year_param(&params);

    let mut result: Map<String, Value> = Map::new();

    if let Some(base) = state
        .store
        .load(files::REGIONS)
        .and_then(|data| find_emdong(&data, &code))
    {
        if let Some(obj) = base.as_object() {
            result.extend(obj.clone());
        }
    }

    if let Some(stats) = state
        .store
        .load(files::COMPREHENSIVE)
        .and_then(|c| c.get("regions")?.get(&code).cloned())
    {
        if let Some(obj) = stats.as_object() {
            result.extend(obj.clone());
        }
    }

    result.insert("data_source".into(), json!("SGIS"));
    result.insert("data_year".into(), json!(year));

    // Registry figures win over the census where the code maps
    if let Some(jumin_code) = jumin_code_for(&state, &code) {
        if let Some(info) = latest_snapshot(&state)
            .and_then(|s| s.get("regions")?.get(&jumin_code).cloned())
        {
            let year_month = str_of(&info, "year_month").to_string();
            result.insert(
                "household".into(),
                json!({
                    "household_cnt": u64_of(&info, "household_cnt"),
                    "family_member_cnt": u64_of(&info, "total_population"),
                    "avg_family_member_cnt": info
                        .get("avg_household_size")
                        .and_then(Value::as_f64)
                        .unwrap_or(0.0),
                    "male_population": u64_of(&info, "male_population"),
                    "female_population": u64_of(&info, "female_population"),
                }),
            );
            result.insert("data_source".into(), json!(format!("주민등록 {}", year_month)));
            result.insert("data_year".into(), json!(year_month));
        }

        if let Some(growth) = state
            .store
            .load_latest(files::JUMIN_GROWTH_PREFIX)
            .and_then(|g| g.get("regions")?.get(&jumin_code).cloned())
        {
            result.insert(
                "population_growth".into(),
                json!({
                    "prev_month": i64_of(&growth, "prev_month"),
                    "curr_month": i64_of(&growth, "curr_month"),
                    "change": i64_of(&growth, "change"),
                    "male_change": i64_of(&growth, "male_change"),
                    "female_change": i64_of(&growth, "female_change"),
                }),
            );
        }
    }

    Json(Value::Object(result))
}

/// GET /api/emdong/:code/timeseries
///
/// Monthly registry population joined with yearly census business figures.
pub async fn emdong_timeseries(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Json<Value> {
    let jumin_code = jumin_code_for(&state, &code);

    let timeseries = jumin_code
        .as_deref()
        .and_then(|jc| monthly_series(&state, jc))
        .unwrap_or_else(|| json!([]));

    let mut yearly_business: Vec<Value> = Vec::new();
    if let Some(core) = state.store.load(files::MULTIYEAR_CORE) {
        if let Some(by_year) = core.get("regions_by_year").and_then(Value::as_object) {
            for (year, regions) in by_year {
                let Some(stats) = regions.get(&code) else { continue };
                let company = stats.get("company").cloned().unwrap_or_else(|| json!({}));
                let house = stats.get("house").cloned().unwrap_or_else(|| json!({}));
                yearly_business.push(json!({
                    "year": year.parse::<u32>().unwrap_or(0),
                    "company_cnt": u64_of(&company, "corp_cnt"),
                    "worker_cnt": u64_of(&company, "tot_worker"),
                    "house_cnt": u64_of(&house, "house_cnt"),
                }));
            }
        }
    }

    Json(json!({
        "emdong_code": code,
        "jumin_code": jumin_code,
        "timeseries": timeseries,
        "yearly_business": yearly_business,
    }))
}

/// GET /api/sigungu/:code/timeseries
pub async fn sigungu_timeseries(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Json<Value> {
    // Sigungu-level registry codes are the 5-digit prefix zero-padded to 10
    let full_code = if code.len() == 5 {
        format!("{}00000", code)
    } else {
        code.clone()
    };
    let timeseries = monthly_series(&state, &full_code).unwrap_or_else(|| json!([]));
    Json(json!({ "sigungu_code": code, "timeseries": timeseries }))
}

/// GET /api/sido/:code/timeseries
pub async fn sido_timeseries(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Json<Value> {
    let full_code = if code.len() == 2 {
        format!("{}00000000", code)
    } else {
        code.clone()
    };
    let timeseries = monthly_series(&state, &full_code).unwrap_or_else(|| json!([]));
    Json(json!({ "sido_code": code, "timeseries": timeseries }))
}

fn monthly_series(state: &AppState, jumin_code: &str) -> Option<Value> {
    let monthly = state.store.load(files::MONTHLY)?;
    monthly
        .get("regions")?
        .get(jumin_code)?
        .get("monthly")
        .cloned()
}

/// GET /api/regions
pub async fn regions(State(state): State<AppState>) -> Json<Value> {
    let data = state.store.load(files::REGIONS);
    Json(data.map(|d| (*d).clone()).unwrap_or_else(|| json!({})))
}

/// GET /api/years
pub async fn years() -> Json<Value> {
    Json(json!({ "years": DEFAULT_YEARS }))
}

/// GET /api/politicians/emdong/:code
///
/// Every politician whose constituency covers the emdong's district:
/// the mayor and borough chief from the analyzed local-politician file,
/// council members from the converted election rosters, and assembly
/// members whose district names the borough.
pub async fn politicians_for_emdong(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Json<Value> {
    // The path parameter is client-controlled and may not be ASCII digits;
    // a failed slice just means no district match
    let sigungu_code = code.get(..5).unwrap_or(code.as_str());
    let gu_name = GU_NAMES
        .iter()
        .find(|(prefix, _)| *prefix == sigungu_code)
        .map(|(_, name)| *name);

    let mut politicians: Vec<Value> = Vec::new();

    if let Some(local) = state.store.load("local_politicians_analysis.json") {
        if let Some(members) = local.as_object() {
            for (name, analysis) in members {
                let Some(info) = analysis.get("member_info") else { continue };
                let position = str_of(info, "position");
                let district = str_of(info, "district");
                if position == "시장" && sigungu_code.starts_with("11") {
                    politicians.push(json!({
                        "name": name,
                        "position": "서울시장",
                        "party": str_of(info, "party"),
                        "district": district,
                    }));
                } else if position == "구청장" {
                    if gu_name.is_some_and(|gu| district.contains(gu)) {
                        politicians.push(json!({
                            "name": name,
                            "position": "구청장",
                            "party": str_of(info, "party"),
                            "district": district,
                        }));
                    }
                }
            }
        }
    }

    if let (Some(gu), Some(elections)) = (gu_name, state.store.load(files::ELECTIONS)) {
        if let Some(round) = elections.get("local_elections").and_then(|l| l.get("8")) {
            // Council rosters are keyed by the district they were filed under
            for (list_key, position) in [("si_uiwon", "시의원"), ("gu_uiwon", "구의원")] {
                let members = round
                    .get(list_key)
                    .and_then(|m| m.get(gu))
                    .and_then(Value::as_array);
                let Some(members) = members else { continue };
                for member in members {
                    politicians.push(json!({
                        "name": str_of(member, "name"),
                        "position": position,
                        "party": str_of(member, "party"),
                        "district": str_of(member, "district"),
                    }));
                }
            }
        }
    }

    if let (Some(gu), Some(assembly)) = (gu_name, state.store.load(files::ASSEMBLY)) {
        if let Some(seoul) = assembly
            .get("regional")
            .and_then(|r| r.get("서울특별시"))
            .and_then(Value::as_array)
        {
            let gu_stem = gu.trim_end_matches('구');
            for member in seoul {
                let district = str_of(member, "district");
                if district.contains(gu_stem) {
                    politicians.push(json!({
                        "name": str_of(member, "name"),
                        "position": "국회의원",
                        "party": str_of(member, "party"),
                        "district": district,
                    }));
                }
            }
        }
    }

    Json(Value::Array(politicians))
}

/// GET /api/network/assembly
pub async fn assembly_network(State(state): State<AppState>) -> Json<Value> {
    let data = state.store.load(files::NETWORK);
    Json(data.map(|d| (*d).clone()).unwrap_or_else(|| json!({})))
}

/// GET /api/search?q=
pub async fn search(Query(_params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({ "results": [] }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serve::router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn write(dir: &TempDir, name: &str, value: Value) {
        fs::write(dir.path().join(name), serde_json::to_string(&value).unwrap()).unwrap();
    }

    fn seed_regions(dir: &TempDir) {
        write(
            dir,
            files::REGIONS,
            json!({
                "metadata": {"total_sido": 1, "total_sigungu": 1, "total_emdong": 1,
                             "collection_date": "2025-10-01"},
                "regions": {
                    "11": {
                        "sido_code": "11",
                        "sido_name": "서울특별시",
                        "sigungu_list": [{
                            "sigungu_code": "11230",
                            "sigungu_name": "강남구",
                            "emdong_list": [{
                                "emdong_code": "11230680",
                                "emdong_name": "개포1동",
                                "full_address": "서울특별시 강남구 개포1동"
                            }]
                        }]
                    }
                }
            }),
        );
    }

    async fn get_json(app: axum::Router, uri: &str) -> Value {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_sido_list_counts_sigungu() {
        let dir = TempDir::new().unwrap();
        seed_regions(&dir);
        let app = router(AppState::new(dir.path().to_path_buf()));

        let body = get_json(app, "/api/national/sido").await;
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["sido_cd"], "11");
        assert_eq!(list[0]["sido_nm"], "서울특별시");
        assert_eq!(list[0]["sigungu_count"], 1);
    }

    #[tokio::test]
    async fn test_missing_files_answer_with_empty_shapes() {
        let dir = TempDir::new().unwrap();
        let app = router(AppState::new(dir.path().to_path_buf()));

        assert_eq!(get_json(app.clone(), "/api/national/sido").await, json!([]));
        assert_eq!(
            get_json(app.clone(), "/api/national/sido/11").await,
            json!({})
        );
        assert_eq!(
            get_json(app.clone(), "/api/national/emdong/11230680").await,
            json!({})
        );
        let ts = get_json(app, "/api/sigungu/11230/timeseries").await;
        assert_eq!(ts["timeseries"], json!([]));
    }

    #[tokio::test]
    async fn test_emdong_stats_picks_requested_year() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            files::MULTIYEAR_ENHANCED,
            json!({
                "metadata": {"collection_date": "", "years": ["2020"], "description": ""},
                "regions_by_year": {
                    "2020": {"11230680": {"basic": {"total_population": 25000}}},
                    "2023": {"11230680": {"basic": {"total_population": 26000}}}
                }
            }),
        );
        let app = router(AppState::new(dir.path().to_path_buf()));

        let body = get_json(
            app.clone(),
            "/api/national/emdong/11230680?year=2020",
        )
        .await;
        assert_eq!(body["basic"]["total_population"], 25000);

        // Default year is 2023
        let body = get_json(app, "/api/national/emdong/11230680").await;
        assert_eq!(body["basic"]["total_population"], 26000);
    }

    #[tokio::test]
    async fn test_enhanced_prefers_registry_household() {
        let dir = TempDir::new().unwrap();
        seed_regions(&dir);
        write(
            &dir,
            files::COMPREHENSIVE,
            json!({
                "metadata": {"collection_date": "", "year": "2023", "total_regions": 1},
                "regions": {
                    "11230680": {
                        "code": "11230680",
                        "house": {"house_cnt": 8100},
                        "household": {"household_cnt": 9000, "family_member_cnt": 24000,
                                      "avg_family_member_cnt": 2.6},
                        "company": {"corp_cnt": 310, "tot_worker": 2100}
                    }
                }
            }),
        );
        write(
            &dir,
            files::CODE_MAPPING,
            json!({
                "metadata": {"total_matched": 1, "sgis_codes": 1, "jumin_codes": 1},
                "mapping": {
                    "11230680": {
                        "sgis_code": "11230680",
                        "jumin_code": "1168064000",
                        "full_address": "서울특별시 강남구 개포1동"
                    }
                }
            }),
        );
        write(
            &dir,
            "jumin_population_202510.json",
            json!({
                "metadata": {"source": "행정안전부 주민등록 인구통계",
                             "year_month": "2025-10", "total_regions": 1},
                "regions": {
                    "1168064000": {
                        "code": "1168064000",
                        "full_name": "서울특별시 강남구 개포1동",
                        "total_population": 25050,
                        "household_cnt": 9120,
                        "avg_household_size": 2.75,
                        "male_population": 12000,
                        "female_population": 13050,
                        "year_month": "2025-10"
                    }
                }
            }),
        );
        let app = router(AppState::new(dir.path().to_path_buf()));

        let body = get_json(app, "/api/emdong/11230680/enhanced").await;
        assert_eq!(body["emdong_name"], "개포1동");
        assert_eq!(body["company"]["corp_cnt"], 310);
        // Registry override beats the census household block
        assert_eq!(body["household"]["household_cnt"], 9120);
        assert_eq!(body["household"]["family_member_cnt"], 25050);
        assert_eq!(body["data_source"], "주민등록 2025-10");
        assert_eq!(body["data_year"], "2025-10");
    }

    #[tokio::test]
    async fn test_enhanced_adds_growth_block_when_converted() {
        let dir = TempDir::new().unwrap();
        seed_regions(&dir);
        write(
            &dir,
            files::CODE_MAPPING,
            json!({
                "metadata": {"total_matched": 1, "sgis_codes": 1, "jumin_codes": 1},
                "mapping": {
                    "11230680": {"sgis_code": "11230680", "jumin_code": "1168064000",
                                   "full_address": "서울특별시 강남구 개포1동"}
                }
            }),
        );

        // No growth file converted yet
        let app = router(AppState::new(dir.path().to_path_buf()));
        let body = get_json(app, "/api/emdong/11230680/enhanced").await;
        assert!(body.get("population_growth").is_none());

        write(
            &dir,
            "jumin_growth_202510.json",
            json!({
                "metadata": {"source": "행정안전부 주민등록 인구증감",
                             "year_month": "2025-10", "total_regions": 1},
                "regions": {
                    "1168064000": {
                        "code": "1168064000",
                        "full_name": "서울특별시 강남구 개포1동",
                        "prev_month": 25100,
                        "curr_month": 25050,
                        "change": -50,
                        "male_change": -20,
                        "female_change": -30
                    }
                }
            }),
        );
        let app = router(AppState::new(dir.path().to_path_buf()));
        let body = get_json(app, "/api/emdong/11230680/enhanced").await;
        let growth = &body["population_growth"];
        assert_eq!(growth["prev_month"], 25100);
        assert_eq!(growth["curr_month"], 25050);
        assert_eq!(growth["change"], -50);
        assert_eq!(growth["male_change"], -20);
        assert_eq!(growth["female_change"], -30);
    }

    #[tokio::test]
    async fn test_emdong_timeseries_joins_monthly_and_business() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            files::CODE_MAPPING,
            json!({
                "metadata": {"total_matched": 1, "sgis_codes": 1, "jumin_codes": 1},
                "mapping": {
                    "11230680": {"sgis_code": "11230680", "jumin_code": "1168064000",
                                   "full_address": ""}
                }
            }),
        );
        write(
            &dir,
            files::MONTHLY,
            json!({
                "data_source": "주민등록인구통계",
                "period": "2024-01 ~ 2024-02",
                "total_regions": 1,
                "regions": {
                    "1168064000": {
                        "code": "1168064000",
                        "name": "개포1동",
                        "monthly": [
                            {"year": 2024, "month": 1, "date": "2024-01",
                             "population": 25000, "male": 12000, "female": 13000,
                             "household": 9000, "change": 0},
                            {"year": 2024, "month": 2, "date": "2024-02",
                             "population": 25100, "male": 12050, "female": 13050,
                             "household": 9010, "change": 100}
                        ]
                    }
                }
            }),
        );
        write(
            &dir,
            files::MULTIYEAR_CORE,
            json!({
                "metadata": {"collection_date": "", "years": ["2022", "2023"], "description": ""},
                "regions_by_year": {
                    "2022": {"11230680": {"code": "11230680",
                        "household": {"household_cnt": 0, "family_member_cnt": 0,
                                      "avg_family_member_cnt": 0.0},
                        "house": {"house_cnt": 8000},
                        "company": {"corp_cnt": 300, "tot_worker": 2000}}},
                    "2023": {"11230680": {"code": "11230680",
                        "household": {"household_cnt": 0, "family_member_cnt": 0,
                                      "avg_family_member_cnt": 0.0},
                        "house": {"house_cnt": 8100},
                        "company": {"corp_cnt": 310, "tot_worker": 2100}}}
                }
            }),
        );
        let app = router(AppState::new(dir.path().to_path_buf()));

        let body = get_json(app, "/api/emdong/11230680/timeseries").await;
        assert_eq!(body["jumin_code"], "1168064000");
        assert_eq!(body["timeseries"].as_array().unwrap().len(), 2);
        let business = body["yearly_business"].as_array().unwrap();
        assert_eq!(business.len(), 2);
        assert_eq!(business[0]["year"], 2022);
        assert_eq!(business[1]["company_cnt"], 310);
    }

    #[tokio::test]
    async fn test_sigungu_timeseries_widens_code() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            files::MONTHLY,
            json!({
                "data_source": "주민등록인구통계",
                "period": "2024-01 ~ 2024-01",
                "total_regions": 1,
                "regions": {
                    "1123000000": {
                        "code": "1123000000",
                        "name": "강남구",
                        "monthly": [
                            {"year": 2024, "month": 1, "date": "2024-01",
                             "population": 550000, "male": 260000, "female": 290000,
                             "household": 230000, "change": 0}
                        ]
                    }
                }
            }),
        );
        let app = router(AppState::new(dir.path().to_path_buf()));

        let body = get_json(app.clone(), "/api/sigungu/11230/timeseries").await;
        assert_eq!(body["sigungu_code"], "11230");
        assert_eq!(body["timeseries"][0]["population"], 550000);

        let body = get_json(app, "/api/sido/11/timeseries").await;
        // "11" widens to a sido code with no monthly entry here
        assert_eq!(body["timeseries"], json!([]));
    }

    #[tokio::test]
    async fn test_politicians_matched_by_district() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "local_politicians_analysis.json",
            json!({
                "오시장": {"member_info": {"name": "오시장", "party": "가당",
                           "district": "서울특별시", "position": "시장"},
                           "total_count": 0, "issues": []},
                "김구청": {"member_info": {"name": "김구청", "party": "나당",
                           "district": "서울 강남구", "position": "구청장"},
                           "total_count": 0, "issues": []}
            }),
        );
        write(
            &dir,
            files::ELECTIONS,
            json!({
                "local_elections": {
                    "8": {
                        "term": {"start": "2018-07-01", "end": "2022-06-30"},
                        "si_uiwon": {
                            "강남구": [
                                {"name": "박시의", "party": "가당",
                                 "district": "강남구 제1선거구", "position": "시의원"}
                            ],
                            "송파구": [
                                {"name": "최시의", "party": "나당",
                                 "district": "송파구 제2선거구", "position": "시의원"}
                            ]
                        },
                        "gu_uiwon": {
                            "강남구": [
                                {"name": "이구의", "party": "가당",
                                 "district": "강남구 가선거구", "position": "구의원"}
                            ]
                        },
                        "mayors": {}
                    }
                },
                "national_elections": {}
            }),
        );
        write(
            &dir,
            files::ASSEMBLY,
            json!({
                "regional": {
                    "서울특별시": [
                        {"name": "정의원", "party": "가당", "district": "강남갑",
                         "position": "국회의원"},
                        {"name": "한의원", "party": "나당", "district": "노원을",
                         "position": "국회의원"}
                    ]
                },
                "proportional": {}
            }),
        );
        let app = router(AppState::new(dir.path().to_path_buf()));

        let body = get_json(app, "/api/politicians/emdong/11230680").await;
        let list = body.as_array().unwrap();
        let names: Vec<&str> = list.iter().map(|p| str_of(p, "name")).collect();
        assert!(names.contains(&"오시장"));
        assert!(names.contains(&"김구청"));
        assert!(names.contains(&"박시의"));
        assert!(!names.contains(&"최시의"));
        assert!(names.contains(&"이구의"));
        // 강남구 -> 강남 matches the 강남갑 assembly district
        assert!(names.contains(&"정의원"));
        assert!(!names.contains(&"한의원"));
    }

    #[tokio::test]
    async fn test_politicians_tolerates_non_ascii_code() {
        let dir = TempDir::new().unwrap();
        let app = router(AppState::new(dir.path().to_path_buf()));

        // 강남구, percent-encoded: five bytes in is not a char boundary
        let body = get_json(
            app,
            "/api/politicians/emdong/%EA%B0%95%EB%82%A8%EA%B5%AC",
        )
        .await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_years_and_search() {
        let dir = TempDir::new().unwrap();
        let app = router(AppState::new(dir.path().to_path_buf()));

        let body = get_json(app.clone(), "/api/years").await;
        assert_eq!(body["years"].as_array().unwrap().len(), 9);
        assert_eq!(body["years"][0], "2015");

        let body = get_json(app, "/api/search?q=강남").await;
        assert_eq!(body, json!({"results": []}));
    }
}
