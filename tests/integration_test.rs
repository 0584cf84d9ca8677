use insightforge::collect::StatsProfile;
use insightforge::config::Config;
use insightforge::error::ForgeError;

#[test]
fn test_stats_profile_from_str() {
    assert_eq!("core".parse::<StatsProfile>().unwrap(), StatsProfile::Core);
    assert_eq!(
        "Enhanced".parse::<StatsProfile>().unwrap(),
        StatsProfile::Enhanced
    );
    assert!("unknown".parse::<StatsProfile>().is_err());
}

#[test]
fn test_config_path() {
    let path = Config::config_path();
    assert!(path.is_ok());
    let path = path.unwrap();
    assert!(path.to_string_lossy().contains(".insightforge"));
}

#[test]
fn test_missing_credentials_error() {
    let config = Config::default();
    match config.sgis_credentials() {
        Err(ForgeError::NoSgisCredentials) => (),
        other => panic!("Expected NoSgisCredentials, got {:?}", other.err()),
    }
    match config.naver_credentials() {
        Err(ForgeError::NoNaverCredentials) => (),
        other => panic!("Expected NoNaverCredentials, got {:?}", other.err()),
    }
}

#[cfg(test)]
mod api_tests {
    use insightforge::api::sgis::{SgisClient, StageItem};
    use insightforge::api::{ClientConfig, NaverNewsClient, NewsSource};
    use mockito::Matcher;

    fn test_config() -> ClientConfig {
        ClientConfig {
            max_retries: 2,
            retry_base_delay: 10,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_sgis_stage_walk_with_token() {
        let mut server = mockito::Server::new_async().await;

        let auth = server
            .mock("GET", "/auth/authentication.json")
            .match_query(Matcher::Any)
            .with_body(r#"{"errCd": 0, "errMsg": "Success", "result": {"accessToken": "tok"}}"#)
            .expect(1)
            .create_async()
            .await;
        let _stage = server
            .mock("GET", "/addr/stage.json")
            .match_query(Matcher::UrlEncoded("accessToken".into(), "tok".into()))
            .with_body(
                r#"{"errCd": 0, "errMsg": "Success", "result": [
                    {"cd": "11", "addr_name": "서울특별시"},
                    {"cd": "21", "addr_name": "부산광역시"}
                ]}"#,
            )
            .expect(2)
            .create_async()
            .await;

        let client = SgisClient::with_base_url(
            "id".to_string(),
            "key".to_string(),
            test_config(),
            server.url(),
        );

        let items: Vec<StageItem> = client.stage(None).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].cd, "11");

        // The cached token is reused for the second call
        let _ = client.stage(Some("11")).await.unwrap();
        auth.assert_async().await;
    }

    #[tokio::test]
    async fn test_naver_search_maps_articles() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/v1/search/news.json")
            .match_query(Matcher::UrlEncoded("query".into(), "김의원 국정감사".into()))
            .match_header("X-Naver-Client-Id", "cid")
            .with_body(
                r#"{"total": 1, "items": [
                    {"title": "<b>김의원</b> 질의", "description": "예산 <b>질의</b>",
                     "link": "https://n.news.naver.com/1", "originallink": "https://o/1",
                     "pubDate": "Tue, 21 Oct 2025 09:00:00 +0900"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = NaverNewsClient::with_base_url(
            "cid".to_string(),
            "sec".to_string(),
            test_config(),
            server.url(),
        );

        let articles = client.search("김의원 국정감사", 50, 1).await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "김의원 질의");
        assert_eq!(articles[0].description, "예산 질의");
    }
}
