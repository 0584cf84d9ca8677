//! Environment health checks: configuration, data directory, and upstream
//! API reachability.

use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use std::path::Path;

use crate::api::sgis::SgisClient;
use crate::api::{ClientConfig, NaverNewsClient, NewsSource};
use crate::config::Config;
use crate::error::Result;
use crate::serve::files;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

#[derive(Debug, Clone)]
pub struct Check {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
}

impl Check {
    fn ok(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            detail: detail.into(),
        }
    }

    fn warn(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warn,
            detail: detail.into(),
        }
    }

    fn fail(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            detail: detail.into(),
        }
    }
}

/// Files the serve layer reads, checked for presence
const EXPECTED_FILES: [&str; 5] = [
    files::REGIONS,
    files::MULTIYEAR_CORE,
    files::MULTIYEAR_ENHANCED,
    files::CODE_MAPPING,
    files::MONTHLY,
];

/// Run every check. Network checks only run when the matching credentials
/// are configured.
pub async fn run_checks(config: &Config, data_dir: &Path) -> Vec<Check> {
    let mut checks = Vec::new();

    match Config::config_file_path() {
        Ok(path) if path.exists() => {
            checks.push(Check::ok("config", format!("{}", path.display())));
        }
        Ok(path) => {
            checks.push(Check::warn(
                "config",
                format!("{} not found (run `config init`)", path.display()),
            ));
        }
        Err(e) => checks.push(Check::fail("config", e.to_string())),
    }

    checks.push(data_dir_check(data_dir));

    match config.sgis_credentials() {
        Ok((service_id, security_key)) => {
            let client = SgisClient::new(service_id, security_key, ClientConfig::default());
            match client.access_token().await {
                Ok(_) => checks.push(Check::ok("sgis", "authenticated")),
                Err(e) => checks.push(Check::fail("sgis", e.to_string())),
            }
        }
        Err(_) => checks.push(Check::warn(
            "sgis",
            "credentials not configured (sgis.service_id / sgis.security_key)",
        )),
    }

    match config.naver_credentials() {
        Ok((client_id, client_secret)) => {
            let client = NaverNewsClient::new(client_id, client_secret, ClientConfig::default());
            match client.search("국정감사", 1, 1).await {
                Ok(_) => checks.push(Check::ok("naver", "authenticated")),
                Err(e) => checks.push(Check::fail("naver", e.to_string())),
            }
        }
        Err(_) => checks.push(Check::warn(
            "naver",
            "credentials not configured (naver.client_id / naver.client_secret)",
        )),
    }

    checks
}

fn data_dir_check(data_dir: &Path) -> Check {
    if !data_dir.exists() {
        return Check::warn(
            "data",
            format!("{} does not exist yet", data_dir.display()),
        );
    }

    let missing: Vec<&str> = EXPECTED_FILES
        .iter()
        .filter(|name| {
            let base = data_dir.join(name);
            let gz = data_dir.join(format!("{}.gz", name));
            !base.exists() && !gz.exists()
        })
        .copied()
        .collect();

    if missing.is_empty() {
        Check::ok("data", format!("{} (all serve inputs present)", data_dir.display()))
    } else {
        Check::warn("data", format!("missing: {}", missing.join(", ")))
    }
}

pub fn render(checks: &[Check]) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("검사").fg(Color::Cyan),
        Cell::new("상태").fg(Color::Cyan),
        Cell::new("내용").fg(Color::Cyan),
    ]);
    for check in checks {
        let status = match check.status {
            CheckStatus::Ok => Cell::new("✅ OK").fg(Color::Green),
            CheckStatus::Warn => Cell::new("⚠️ WARN").fg(Color::Yellow),
            CheckStatus::Fail => Cell::new("❌ FAIL").fg(Color::Red),
        };
        table.add_row(vec![Cell::new(&check.name), status, Cell::new(&check.detail)]);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.to_string()
}

/// Run the checks and print a report; `Ok(true)` when nothing failed
pub async fn run(config: &Config, data_dir: &Path) -> Result<bool> {
    let checks = run_checks(config, data_dir).await;
    println!("{}", render(&checks));

    let failed = checks.iter().filter(|c| c.status == CheckStatus::Fail).count();
    if failed > 0 {
        println!("{}", format!("{}개 검사 실패", failed).red());
    } else {
        println!("{}", "환경 점검 통과".green());
    }
    Ok(failed == 0)
}
