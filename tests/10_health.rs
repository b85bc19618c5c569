mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = reqwest::get(format!("{}/health", server.base_url)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn oversized_body_keeps_cors_header() -> Result<()> {
    let server = common::spawn_server().await?;
    let limit = privilege_shop_api::config::config().api.max_request_size_bytes;

    let res = reqwest::Client::new()
        .post(server.action_url("order"))
        .body(vec![b' '; limit + 1])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(res.headers()["content-type"], "application/json");

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body, serde_json::json!({ "error": "Request body too large" }));
    Ok(())
}

#[tokio::test]
async fn preflight_on_any_action() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    for action in ["privileges", "order_status", "whatever"] {
        let res = client
            .request(reqwest::Method::OPTIONS, server.action_url(action))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        let headers = res.headers().clone();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "GET, POST, PUT, OPTIONS");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type, X-Auth-Token");
        assert_eq!(headers["access-control-max-age"], "86400");
        assert!(res.text().await?.is_empty());
    }
    Ok(())
}

#[tokio::test]
async fn unknown_action_is_not_found() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = reqwest::Client::new()
        .delete(server.action_url("order"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()["content-type"], "application/json");

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body, serde_json::json!({ "error": "Not found" }));
    Ok(())
}
