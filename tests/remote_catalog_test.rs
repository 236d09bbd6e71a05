use httpmock::prelude::*;
use jumun_match::domain::model::{AbbrSource, MatchStatus, NewAbbreviation, Origin};
use jumun_match::domain::ports::{AbbreviationWriter, CatalogStore};
use jumun_match::{ConversionEngine, MatchEngine, RemoteCatalog};
use std::sync::Arc;

#[tokio::test]
async fn test_find_abbreviations_by_input() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/abbreviations")
            .query_param("input", "포터2")
            .query_param("active", "true");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([{
                "id": "a1",
                "input_abbr": "포터2",
                "standard_abbr": "포터2",
                "product_code": "16212",
                "product_name": "포터2 RH",
                "created_at": "2024-01-01T00:00:00Z",
                "source": "default",
                "usage_count": 3,
                "status": "active",
                "notes": "Initial Import"
            }]));
    });

    let catalog = RemoteCatalog::new(server.base_url());
    let records = catalog
        .find_abbreviations_by_input("포터2", true)
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].product_code, "16212");
    assert_eq!(records[0].source, AbbrSource::Default);
    assert_eq!(records[0].usage_count, 3);
}

#[tokio::test]
async fn test_find_products_by_prefix_passes_origin() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/products")
            .query_param("prefix", "포")
            .query_param("origin", "국산");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"code": "16211", "model": "포터2 LH", "origin": "국산"},
                {"code": "16212", "model": "포터2 RH", "origin": "국산"}
            ]));
    });

    let catalog = RemoteCatalog::new(server.base_url());
    let products = catalog
        .find_products_by_prefix("포", Some(Origin::Domestic))
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].origin, Origin::Domestic);
}

#[tokio::test]
async fn test_server_error_is_store_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/abbreviations");
        then.status(500);
    });

    let catalog = RemoteCatalog::new(server.base_url());
    let result = catalog.find_abbreviations_by_input("포터2", true).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_record_abbreviation_posts_entry() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/abbreviations")
            .json_body_partial(r#"{"input_abbr": "크루즈후", "source": "auto_learn"}"#);
        then.status(201)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"id": "new-1"}));
    });

    let catalog = RemoteCatalog::new(server.base_url());
    let id = catalog
        .record_abbreviation(NewAbbreviation {
            input_abbr: "크루즈후".to_string(),
            product_code: "14034".to_string(),
            product_name: "크루즈(후) RH".to_string(),
            source: AbbrSource::AutoLearn,
            notes: "자동 학습 (유사도 86%)".to_string(),
        })
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(id, "new-1");
}

#[tokio::test]
async fn test_increment_usage_hits_usage_endpoint() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/abbreviations/a1/usage");
        then.status(204);
    });

    let catalog = RemoteCatalog::new(server.base_url());
    catalog.increment_usage("a1").await.unwrap();

    api_mock.assert();
}

#[tokio::test]
async fn test_end_to_end_conversion_over_remote_catalog() {
    let server = MockServer::start();
    let abbr_mock = server.mock(|when, then| {
        when.method(GET).path("/abbreviations");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([]));
    });
    let product_mock = server.mock(|when, then| {
        when.method(GET).path("/products").query_param("prefix", "포");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"code": "16212", "model": "포터2 RH", "origin": "국산"}
            ]));
    });

    let catalog = Arc::new(RemoteCatalog::new(server.base_url()));
    let engine = ConversionEngine::new(MatchEngine::new(Arc::clone(&catalog), catalog));

    let session = engine.run("포터2 2개").await;
    engine.shutdown().await;

    abbr_mock.assert();
    product_mock.assert();

    let lines = session.finalize();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].status, MatchStatus::Pending);
    assert_eq!(lines[0].matched_code, "16212");
    assert_eq!(lines[0].confidence, 80);
}
