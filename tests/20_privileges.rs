mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn privileges_listed_cheapest_first() -> Result<()> {
    let server = common::spawn_server().await?;
    server.store.seed_privilege("Premium", 990, &["fly", "kit premium"]);
    server.store.seed_privilege("Vip", 290, &["kit vip"]);
    server.store.seed_privilege("Elite", 590, &[]);

    let res = reqwest::get(server.action_url("privileges")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    let names: Vec<&str> = body["privileges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Vip", "Elite", "Premium"]);
    assert_eq!(body["privileges"][2]["features"], json!(["fly", "kit premium"]));
    Ok(())
}

#[tokio::test]
async fn creating_privilege_needs_admin() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let payload = json!({
        "name": "Legend",
        "description": "Everything",
        "price": 1990,
        "features": ["fly", "god"],
        "duration": "forever"
    });

    let res = client.post(server.action_url("privilege")).json(&payload).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let token = common::login_as(&server, "root", "toor").await?;
    let res = client
        .post(server.action_url("privilege"))
        .header("X-Auth-Token", &token)
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let id = res.json::<Value>().await?["id"].clone();

    let listed = reqwest::get(server.action_url("privileges")).await?.json::<Value>().await?;
    assert_eq!(listed["privileges"][0]["id"], id);
    assert_eq!(listed["privileges"][0]["duration"], "forever");
    Ok(())
}
