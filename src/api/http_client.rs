use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Build a reqwest client tuned for long collection runs: pooled keepalive
/// connections and a per-purpose request timeout.
pub fn create_custom_client(timeout_secs: u64, user_agent: &str) -> Client {
    ClientBuilder::new()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(timeout_secs))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .user_agent(user_agent.to_string())
        .use_rustls_tls()
        .build()
        .expect("Failed to create HTTP client with custom timeout")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_client_creation() {
        let _client = create_custom_client(10, "test-agent/1.0");
    }
}
