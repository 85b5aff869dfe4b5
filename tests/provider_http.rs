//! Provider integration tests
//!
//! Runs the minerstat client and the calculation session against a mock
//! coins API

use assert_matches::assert_matches;
use block_hit_calculator::format::ResultDisplay;
use block_hit_calculator::{
    CalculationRequest, CalculationState, Error, MarketDataProvider, MinerstatClient, Session,
};
use mockito::{Matcher, Server};
use std::time::Duration;

fn client(server: &Server) -> MinerstatClient {
    MinerstatClient::new(server.url(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_snapshot_with_string_numbers() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/v2/coins")
        .match_query(Matcher::UrlEncoded("list".into(), "BTC".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{
    "coin": "BTC",
    "name": "Bitcoin",
    "algorithm": "SHA-256",
    "difficulty": "1000000",
    "reward_block": "6.25",
    "price": 2.0,
    "is_mineable": true
}]"#,
        )
        .create_async()
        .await;

    let snapshot = client(&server).fetch_snapshot("BTC").await.unwrap();

    assert_eq!(snapshot.symbol, "BTC");
    assert_eq!(snapshot.name, "Bitcoin");
    assert_eq!(snapshot.difficulty, 1_000_000.0);
    assert_eq!(snapshot.block_reward, 6.25);
    assert_eq!(snapshot.price_usd, Some(2.0));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_key_header() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/v2/coins")
        .match_query(Matcher::Any)
        .match_header("x-api-key", "secret")
        .with_status(200)
        .with_body(r#"[{"coin": "LTC", "difficulty": 1, "reward_block": 6.25}]"#)
        .create_async()
        .await;

    let provider = client(&server).with_api_key(Some("secret".to_string()));
    let snapshot = provider.fetch_snapshot("LTC").await.unwrap();
    assert_eq!(snapshot.price_usd, None);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_error_status() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/v2/coins")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("oops")
        .create_async()
        .await;

    let err = client(&server).fetch_snapshot("BTC").await.unwrap_err();
    assert_matches!(err, Error::Transport { .. });
    assert_eq!(err.to_string(), "Network error: Internal Server Error");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unknown_symbol() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/v2/coins")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let err = client(&server).fetch_snapshot("NOPE").await.unwrap_err();
    assert_eq!(err.to_string(), "Data for NOPE is not available.");
}

#[tokio::test]
async fn test_malformed_body() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/v2/coins")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client(&server).fetch_snapshot("BTC").await.unwrap_err();
    assert_matches!(err, Error::Http(_));
}

#[tokio::test]
async fn test_session_end_to_end() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/v2/coins")
        .match_query(Matcher::UrlEncoded("list".into(), "BTC".into()))
        .with_status(200)
        .with_body(
            r#"[{"coin": "BTC", "name": "Bitcoin", "difficulty": 1000000, "reward_block": 6.25, "price": 2.0}]"#,
        )
        .create_async()
        .await;

    let provider = client(&server);
    let mut session = Session::new();
    let request = CalculationRequest::new("BTC", "100", "TH/s", "1");

    session.run(&provider, &request).await;

    match session.state() {
        CalculationState::Success { calculation } => {
            assert_eq!(calculation.display.time_text, "42.9 seconds");
            assert!(calculation.display.coin_earnings_text.starts_with("12447.12"));
            assert!(calculation.display.coin_earnings_text.ends_with(" BTC"));
            assert_eq!(calculation.display.price_text, "$2.00");
            assert_eq!(calculation.display.usd_earnings_text, "$24,894.25/day");
        }
        other => panic!("unexpected state: {:?}", other),
    }
}

#[tokio::test]
async fn test_session_not_mineable() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/v2/coins")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"[{"coin": "USDT", "name": "Tether", "difficulty": 1, "reward_block": 1, "price": 1.0, "is_mineable": false}]"#,
        )
        .create_async()
        .await;

    let provider = client(&server);
    let mut session = Session::new();

    session
        .run(&provider, &CalculationRequest::new("USDT", "1", "GH/s", ""))
        .await;

    assert_matches!(
        session.state(),
        CalculationState::Error { message, .. } if message == "Tether (USDT) is not mineable."
    );
    assert_eq!(session.display(), &ResultDisplay::reset());
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let provider = MinerstatClient::new(&url, Duration::from_secs(5)).unwrap();
    let err = provider.fetch_snapshot("BTC").await.unwrap_err();
    assert_matches!(err, Error::Http(_));
    assert_eq!(err.category(), "transport");
    assert!(err.to_string().starts_with("Network error: "));

    let mut session = Session::new();
    session
        .run(&provider, &CalculationRequest::new("BTC", "100", "TH/s", "1"))
        .await;

    assert_matches!(
        session.state(),
        CalculationState::Error { category: "transport", .. }
    );
    assert_eq!(session.display(), &ResultDisplay::reset());
}
