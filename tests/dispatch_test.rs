use bracketbot::api::{ApiAuth, MarketDataClient, TradingClient};
use bracketbot::error::{DispatchError, OrderError};
use bracketbot::execution::{generate_paired_ratios, Dispatcher};
use bracketbot::models::{Ratio, Side};
use bracketbot::Config;

fn test_config(base_url: &str) -> Config {
    Config {
        api_key: "test-key".to_string(),
        api_secret: "test-secret".to_string(),
        data_url: base_url.to_string(),
        trading_url: base_url.to_string(),
        symbol: "NDAQ".to_string(),
        qty: 1,
        max_ratio: 20,
        max_in_flight: 4,
    }
}

const QUOTE_BODY: &str = r#"{"symbol":"NDAQ","trade":{"p":100.0,"s":10,"t":"2024-12-06T21:00:00Z"}}"#;

#[tokio::test]
async fn test_dispatch_submits_one_order_per_ratio() {
    let mut server = mockito::Server::new_async().await;

    let quote_mock = server
        .mock("GET", "/stocks/NDAQ/trades/latest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(QUOTE_BODY)
        .expect(1)
        .create_async()
        .await;

    let order_mock = server
        .mock("POST", "/orders")
        .with_status(200)
        .with_body(r#"{"id":"order-1","status":"accepted"}"#)
        .expect(3)
        .create_async()
        .await;

    let ratios = vec![
        Ratio { take_profit: 0.01, stop_loss: 0.01 },
        Ratio { take_profit: 0.02, stop_loss: 0.01 },
        Ratio { take_profit: 0.03, stop_loss: 0.02 },
    ];

    let dispatcher = Dispatcher::new(&test_config(&server.url()));
    let results = dispatcher
        .dispatch("NDAQ", Side::Buy, &ratios, 1)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    for (result, ratio) in results.iter().zip(&ratios) {
        // Aggregated results stay associated with their originating ratio
        assert_eq!(result.ratio, *ratio);
        let body = result.outcome.as_ref().unwrap();
        assert!(body.contains("accepted"));
    }

    quote_mock.assert_async().await;
    order_mock.assert_async().await;
}

#[tokio::test]
async fn test_quote_failure_aborts_whole_dispatch() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/stocks/NDAQ/trades/latest")
        .with_status(503)
        .create_async()
        .await;

    let order_mock = server
        .mock("POST", "/orders")
        .expect(0)
        .create_async()
        .await;

    let ratios = generate_paired_ratios(3);
    let dispatcher = Dispatcher::new(&test_config(&server.url()));
    let err = dispatcher
        .dispatch("NDAQ", Side::Buy, &ratios, 1)
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::Quote(_)));
    // Zero order submissions occur
    order_mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_ratios_fetches_quote_and_submits_nothing() {
    let mut server = mockito::Server::new_async().await;

    let quote_mock = server
        .mock("GET", "/stocks/NDAQ/trades/latest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(QUOTE_BODY)
        .expect(1)
        .create_async()
        .await;

    let order_mock = server
        .mock("POST", "/orders")
        .expect(0)
        .create_async()
        .await;

    let dispatcher = Dispatcher::new(&test_config(&server.url()));
    let results = dispatcher.dispatch("NDAQ", Side::Buy, &[], 1).await.unwrap();

    assert!(results.is_empty());
    quote_mock.assert_async().await;
    order_mock.assert_async().await;
}

#[tokio::test]
async fn test_zero_price_ratio_is_isolated() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/stocks/NDAQ/trades/latest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(QUOTE_BODY)
        .create_async()
        .await;

    // Only the two valid ratios should reach the order endpoint
    let order_mock = server
        .mock("POST", "/orders")
        .with_status(200)
        .with_body(r#"{"id":"order-2","status":"accepted"}"#)
        .expect(2)
        .create_async()
        .await;

    let ratios = vec![
        Ratio { take_profit: 0.02, stop_loss: 0.01 },
        // Stop-loss ratio of 1.0 at price 100 rounds the stop to exactly 0.00
        Ratio { take_profit: 1.0, stop_loss: 1.0 },
        Ratio { take_profit: 0.05, stop_loss: 0.03 },
    ];

    let dispatcher = Dispatcher::new(&test_config(&server.url()));
    let results = dispatcher
        .dispatch("NDAQ", Side::Buy, &ratios, 1)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert!(results[0].outcome.is_ok());
    assert!(matches!(
        results[1].outcome,
        Err(OrderError::ZeroBracketPrice { .. })
    ));
    assert!(results[2].outcome.is_ok());

    order_mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_order_is_isolated() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/stocks/NDAQ/trades/latest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(QUOTE_BODY)
        .create_async()
        .await;

    // Each order matches on its own stop-loss leg: reject the 0.02/0.01
    // bracket (stop at 99.00), accept the 0.05/0.03 bracket (stop at 97.00).
    let reject_mock = server
        .mock("POST", "/orders")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"stop_loss":{"stop_price":"99.00"}}"#.to_string(),
        ))
        .with_status(403)
        .with_body(r#"{"message":"account is restricted"}"#)
        .expect(1)
        .create_async()
        .await;

    let accept_mock = server
        .mock("POST", "/orders")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"stop_loss":{"stop_price":"97.00"}}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"id":"order-3","status":"accepted"}"#)
        .expect(1)
        .create_async()
        .await;

    let ratios = vec![
        Ratio { take_profit: 0.02, stop_loss: 0.01 },
        Ratio { take_profit: 0.05, stop_loss: 0.03 },
    ];

    let dispatcher = Dispatcher::new(&test_config(&server.url()));
    let results = dispatcher
        .dispatch("NDAQ", Side::Buy, &ratios, 1)
        .await
        .unwrap();

    match &results[0].outcome {
        Err(OrderError::Rejected { status, body }) => {
            assert_eq!(*status, 403);
            assert!(body.contains("restricted"));
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
    assert!(results[1].outcome.is_ok());

    reject_mock.assert_async().await;
    accept_mock.assert_async().await;
}

#[tokio::test]
async fn test_dispatch_random_pins_direction_with_seeded_rng() {
    use rand::SeedableRng;

    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/stocks/NDAQ/trades/latest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(QUOTE_BODY)
        .create_async()
        .await;

    // Whichever direction the seed picks, the payload side must match it
    let mut probe = rand::rngs::StdRng::seed_from_u64(99);
    let expected_side = Side::random(&mut probe);

    let order_mock = server
        .mock("POST", "/orders")
        .match_body(mockito::Matcher::PartialJsonString(format!(
            r#"{{"side":"{}"}}"#,
            expected_side
        )))
        .with_status(200)
        .with_body(r#"{"id":"order-4","status":"accepted"}"#)
        .expect(1)
        .create_async()
        .await;

    let ratios = vec![Ratio { take_profit: 0.02, stop_loss: 0.01 }];
    let mut rng = rand::rngs::StdRng::seed_from_u64(99);

    let dispatcher = Dispatcher::new(&test_config(&server.url()));
    let results = dispatcher
        .dispatch_random("NDAQ", &ratios, 1, &mut rng)
        .await
        .unwrap();

    assert!(results[0].outcome.is_ok());
    order_mock.assert_async().await;
}

#[tokio::test]
async fn test_paired_mode_full_fanout() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/stocks/NDAQ/trades/latest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(QUOTE_BODY)
        .create_async()
        .await;

    // max_ratio 5 -> 15 pairs, all valid at price 100
    let order_mock = server
        .mock("POST", "/orders")
        .with_status(200)
        .with_body(r#"{"id":"order-5","status":"accepted"}"#)
        .expect(15)
        .create_async()
        .await;

    let ratios = generate_paired_ratios(5);
    assert_eq!(ratios.len(), 15);

    let dispatcher = Dispatcher::new(&test_config(&server.url()));
    let results = dispatcher
        .dispatch("NDAQ", Side::Sell, &ratios, 1)
        .await
        .unwrap();

    assert_eq!(results.len(), 15);
    assert!(results.iter().all(|r| r.outcome.is_ok()));
    order_mock.assert_async().await;
}

#[tokio::test]
async fn test_cancel_and_close_utilities() {
    let mut server = mockito::Server::new_async().await;

    let cancel_mock = server
        .mock("DELETE", "/orders")
        .with_status(207)
        .with_body("[]")
        .create_async()
        .await;

    let close_mock = server
        .mock("DELETE", "/positions")
        .with_status(207)
        .with_body("[]")
        .create_async()
        .await;

    let auth = ApiAuth::new("test-key".to_string(), "test-secret".to_string());
    let client = TradingClient::new(server.url(), auth);

    assert_eq!(client.cancel_all_orders().await.unwrap(), "[]");
    assert_eq!(client.close_all_positions().await.unwrap(), "[]");

    cancel_mock.assert_async().await;
    close_mock.assert_async().await;
}

#[tokio::test]
async fn test_market_data_client_reads_trade_price() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/stocks/AAPL/trades/latest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"symbol":"AAPL","trade":{"p":231.41}}"#)
        .create_async()
        .await;

    let auth = ApiAuth::new("test-key".to_string(), "test-secret".to_string());
    let client = MarketDataClient::new(server.url(), auth);

    let price = client.latest_trade_price("AAPL").await.unwrap();
    assert!((price - 231.41).abs() < 1e-9);
}
