//! Integration tests for the DeepSeek balance check.
//!
//! Every failure mode must collapse to `None`; a missing key must not
//! touch the network at all.

use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use docbench::balance::{check_balance, BalanceChecker, BalanceStatus};
use docbench::config::Config;
use docbench::models::Provider;

fn config_for(server: &MockServer, key: Option<&str>) -> Config {
    let mut config = Config::default();
    config.balance.url = format!("{}/user/balance", server.uri());
    match key {
        Some(key) => config.with_api_key(Provider::DeepSeek, key),
        None => config,
    }
}

fn balance_body(is_available: bool, total: &str) -> serde_json::Value {
    serde_json::json!({
        "is_available": is_available,
        "balance_infos": [{
            "currency": "USD",
            "total_balance": total,
            "granted_balance": "0.00",
            "topped_up_balance": total
        }]
    })
}

#[tokio::test]
async fn test_balance_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/balance"))
        .and(header("authorization", "Bearer sk-deepseek"))
        .respond_with(ResponseTemplate::new(200).set_body_json(balance_body(true, "7.42")))
        .expect(1)
        .mount(&server)
        .await;

    let info = check_balance(&config_for(&server, Some("sk-deepseek")))
        .await
        .expect("balance should be available");

    assert!(info.is_available);
    assert_eq!(
        info.status(),
        BalanceStatus::Available {
            total: "7.42".to_string()
        }
    );
}

#[tokio::test]
async fn test_missing_key_skips_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(balance_body(true, "1.00")))
        .expect(0)
        .mount(&server)
        .await;

    let result = check_balance(&config_for(&server, None)).await;

    assert!(result.is_none());
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_non_200_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/balance"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    assert!(check_balance(&config_for(&server, Some("bad"))).await.is_none());
}

#[tokio::test]
async fn test_malformed_body_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    assert!(check_balance(&config_for(&server, Some("k"))).await.is_none());
}

#[tokio::test]
async fn test_timeout_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/balance"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(balance_body(true, "1.00"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server, Some("k"));
    config.balance.timeout_secs = 1;
    let checker = BalanceChecker::new(&config).unwrap();

    assert!(checker.check_balance().await.is_none());
}

#[tokio::test]
async fn test_empty_balance_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(balance_body(false, "0.00")))
        .mount(&server)
        .await;

    let info = check_balance(&config_for(&server, Some("k"))).await.unwrap();
    assert!(matches!(info.status(), BalanceStatus::Insufficient { .. }));
}
