// Integration tests for `WanIpResolver` consensus behavior using wiremock.
#![allow(clippy::unwrap_used)]

use std::net::IpAddr;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sgsync_api::{Error, TransportConfig, WanIpResolver};

// ── Helpers ─────────────────────────────────────────────────────────

/// Start one mock provider that answers with the given body.
async fn provider(body: &str, status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

fn resolver_for(servers: &[&MockServer]) -> WanIpResolver {
    let urls = servers
        .iter()
        .map(|s| s.uri().parse().unwrap())
        .collect::<Vec<_>>();
    WanIpResolver::with_providers(&TransportConfig::default(), urls).unwrap()
}

// ── Consensus ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_majority_wins() {
    let a = provider("203.0.113.7\n", 200).await;
    let b = provider("203.0.113.7", 200).await;
    let c = provider("198.51.100.9", 200).await;

    let resolver = resolver_for(&[&a, &b, &c]);
    let ip = resolver.external_ip().await.unwrap();

    assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().unwrap());
}

#[tokio::test]
async fn test_unanimous_with_failures_tolerated() {
    let a = provider("203.0.113.7", 200).await;
    let b = provider("service unavailable", 503).await;
    let c = provider("203.0.113.7", 200).await;

    let resolver = resolver_for(&[&a, &b, &c]);
    let ip = resolver.external_ip().await.unwrap();

    assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().unwrap());
}

#[tokio::test]
async fn test_ipv6_answer() {
    let a = provider("2001:db8::7", 200).await;
    let b = provider("2001:db8::7\n", 200).await;

    let resolver = resolver_for(&[&a, &b]);
    let ip = resolver.external_ip().await.unwrap();

    assert!(ip.is_ipv6());
    assert_eq!(ip, "2001:db8::7".parse::<IpAddr>().unwrap());
}

// ── No consensus ────────────────────────────────────────────────────

#[tokio::test]
async fn test_even_split_is_no_consensus() {
    let a = provider("203.0.113.7", 200).await;
    let b = provider("198.51.100.9", 200).await;

    let resolver = resolver_for(&[&a, &b]);
    let result = resolver.external_ip().await;

    match result {
        Err(Error::NoConsensus { queried, answered }) => {
            assert_eq!(queried, 2);
            assert_eq!(answered, 2);
        }
        other => panic!("expected NoConsensus, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_all_providers_failing_is_no_consensus() {
    let a = provider("oops", 500).await;
    let b = provider("<html>not an ip</html>", 200).await;

    let resolver = resolver_for(&[&a, &b]);
    let result = resolver.external_ip().await;

    match result {
        Err(Error::NoConsensus { queried, answered }) => {
            assert_eq!(queried, 2);
            assert_eq!(answered, 0);
        }
        other => panic!("expected NoConsensus, got: {other:?}"),
    }
}
