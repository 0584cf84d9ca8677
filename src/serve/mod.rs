//! JSON re-serving layer over the collected data directory.
//!
//! Every route reads from files the collectors and converters wrote; nothing
//! is computed ahead of time. Missing files or unknown codes answer with
//! empty JSON shapes rather than errors so a partially-collected data
//! directory still serves.

pub mod routes;
pub mod store;

use axum::routing::get;
use axum::Router;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::error::Result;
use store::DataStore;

/// File names the handlers expect inside the data directory
pub mod files {
    pub const REGIONS: &str = "sgis_national_regions.json";
    pub const MULTIYEAR_CORE: &str = "sgis_multiyear_stats.json";
    pub const MULTIYEAR_ENHANCED: &str = "sgis_enhanced_multiyear_stats.json";
    pub const COMPREHENSIVE: &str = "sgis_comprehensive_stats.json";
    pub const CODE_MAPPING: &str = "code_mapping.json";
    pub const MONTHLY: &str = "jumin_monthly_population.json";
    pub const ELECTIONS: &str = "all_elections_data.json";
    pub const ASSEMBLY: &str = "assembly_by_region.json";
    pub const NETWORK: &str = "assembly_network_graph.json";
    /// Snapshot and growth files are timestamped; the newest one wins
    pub const JUMIN_SNAPSHOT_PREFIX: &str = "jumin_population_";
    pub const JUMIN_GROWTH_PREFIX: &str = "jumin_growth_";
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DataStore>,
}

impl AppState {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            store: Arc::new(DataStore::new(data_dir)),
        }
    }
}

/// Build the full route table over a data directory
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/national/sido", get(routes::sido_list))
        .route("/api/national/sido/:code", get(routes::sido_detail))
        .route("/api/national/sigungu/:code", get(routes::sigungu_summary))
        .route(
            "/api/national/sigungu/:code/detail",
            get(routes::sigungu_detail),
        )
        .route("/api/national/emdong/:code", get(routes::emdong_stats))
        .route("/api/emdong/:code/enhanced", get(routes::emdong_enhanced))
        .route(
            "/api/emdong/:code/timeseries",
            get(routes::emdong_timeseries),
        )
        .route(
            "/api/sigungu/:code/timeseries",
            get(routes::sigungu_timeseries),
        )
        .route("/api/sido/:code/timeseries", get(routes::sido_timeseries))
        .route("/api/regions", get(routes::regions))
        .route("/api/years", get(routes::years))
        .route(
            "/api/politicians/emdong/:code",
            get(routes::politicians_for_emdong),
        )
        .route("/api/network/assembly", get(routes::assembly_network))
        .route("/api/search", get(routes::search))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(host: &str, port: u16, data_dir: PathBuf) -> Result<()> {
    let state = AppState::new(data_dir);
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Serving data API on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
