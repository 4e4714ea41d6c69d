//! Integration tests for the HTTP API
//!
//! Exercises the router with in-process requests. Upstream clients are
//! pointed at an unroutable local address (or left without API keys) so
//! every test runs offline and lands on the documented fallback chains.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceExt;

use repfinder::cache::MemoryCache;
use repfinder::data::{
    Chamber, CivicClient, DataSource, FinanceClient, Legislator, LegislatorsClient, VotesClient,
};
use repfinder::server::{router, AppState};

/// Builds state whose upstreams are all unreachable
fn offline_state() -> Arc<AppState> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(250))
        .build()
        .expect("HTTP client should build");

    Arc::new(AppState {
        cache: MemoryCache::new(),
        legislators: LegislatorsClient::with_client(http.clone())
            .with_url("http://127.0.0.1:1/roster.json"),
        civic: CivicClient::new(http.clone(), None),
        finance: FinanceClient::new(http.clone(), None),
        votes: VotesClient::new(http, None),
        cache_ttl_secs: 600,
        roster_ttl_secs: 600,
        started_at: Instant::now(),
    })
}

/// Issues a GET request against a fresh router over the given state
async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let response = router(state)
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("Request should build"),
        )
        .await
        .expect("Request should complete");

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Body should collect")
        .to_bytes();
    let json: Value = serde_json::from_slice(&body).expect("Body should be JSON");
    (status, json)
}

fn vermont_roster() -> Vec<Legislator> {
    vec![
        Legislator {
            name: "Bernie Sanders".to_string(),
            bioguide_id: "S000033".to_string(),
            party: "Independent".to_string(),
            state: "VT".to_string(),
            chamber: Chamber::Senate,
            district: None,
            phone: None,
            website: None,
        },
        Legislator {
            name: "Peter Welch".to_string(),
            bioguide_id: "W000800".to_string(),
            party: "Democrat".to_string(),
            state: "VT".to_string(),
            chamber: Chamber::Senate,
            district: None,
            phone: None,
            website: None,
        },
        Legislator {
            name: "Becca Balint".to_string(),
            bioguide_id: "B001318".to_string(),
            party: "Democrat".to_string(),
            state: "VT".to_string(),
            chamber: Chamber::House,
            district: Some(1),
            phone: None,
            website: None,
        },
    ]
}

#[tokio::test]
async fn test_health_returns_ok() {
    let (status, body) = get(offline_state(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let state = offline_state();
    let response = router(state)
        .oneshot(
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_zip_is_400() {
    let (status, body) = get(offline_state(), "/api/congressman/9021x").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("9021x"));
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_zip_lookup_with_no_upstream_returns_fallback() {
    let (status, body) = get(offline_state(), "/api/congressman/10001").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "NY");
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["query"], "10001");
    assert_eq!(body["approximate"], true);

    let members = body["members"].as_array().expect("Members should be an array");
    assert_eq!(members.len(), 3);
    for member in members {
        assert_eq!(member["party"], "Data Temporarily Unavailable");
    }
}

#[tokio::test]
async fn test_unknown_zip_prefix_defaults_to_ca() {
    // 715 is an unassigned prefix block
    let (status, body) = get(offline_state(), "/api/congressman/71500").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "CA");
}

#[tokio::test]
async fn test_zip_lookup_serves_cached_roster() {
    let state = offline_state();
    state
        .cache
        .insert("roster", &vermont_roster(), 600)
        .await
        .expect("Roster should cache");

    // 05401 is Burlington, VT
    let (status, body) = get(state, "/api/congressman/05401").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "VT");
    assert_eq!(body["source"], "cache");

    let members = body["members"].as_array().expect("Members should be an array");
    assert_eq!(members.len(), 3);
    // Senators sort before the representative
    assert_eq!(members[0]["name"], "Bernie Sanders");
    assert_eq!(members[2]["name"], "Becca Balint");
}

#[tokio::test]
async fn test_zip_lookup_serves_stale_roster_when_fetch_fails() {
    let state = offline_state();
    // Expired immediately; the roster upstream is unreachable, so the
    // handler must fall back to this stale copy rather than placeholders
    state
        .cache
        .insert("roster", &vermont_roster(), 0)
        .await
        .expect("Roster should cache");
    tokio::time::sleep(Duration::from_millis(10)).await;

    let (status, body) = get(state, "/api/congressman/05401").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "VT");
    assert_eq!(body["source"], "cache");
    let members = body["members"].as_array().expect("Members should be an array");
    assert_eq!(members.len(), 3);
    assert_eq!(members[0]["name"], "Bernie Sanders");
}

#[tokio::test]
async fn test_representatives_without_address_is_400() {
    let (status, body) = get(offline_state(), "/api/representatives").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("address"));
}

#[tokio::test]
async fn test_representatives_falls_back_to_zip_in_address() {
    let uri = "/api/representatives?address=123%20Main%20St%2C%20Albany%2C%20NY%2012207";
    let (status, body) = get(offline_state(), uri).await;

    assert_eq!(status, StatusCode::OK);
    // No Civic key, so the ZIP 12207 drives the static-table path
    assert_eq!(body["state"], "NY");
    assert_eq!(body["source"], "fallback");
}

#[tokio::test]
async fn test_representatives_without_zip_uses_default_state() {
    let uri = "/api/representatives?address=Somewhere%20Nice";
    let (status, body) = get(offline_state(), uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "CA");
    assert_eq!(body["district"], 1);
    assert_eq!(body["source"], "fallback");
}

#[tokio::test]
async fn test_campaign_finance_fallback_payload() {
    let (status, body) = get(offline_state(), "/api/campaign-finance/Jane%20Doe").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["candidate_name"], "Jane Doe");
    assert_eq!(body["note"], "Data Temporarily Unavailable");
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["receipts_display"], "$0");
}

#[tokio::test]
async fn test_campaign_finance_serves_fresh_cache() {
    use repfinder::data::finance::fallback_summary;

    let state = offline_state();

    // Seed the exact cache key the handler uses
    let mut seeded = fallback_summary("Jane Doe", 2024);
    seeded.total_receipts = 1_200_000.0;
    seeded.receipts_display = "$1.2M".to_string();
    seeded.note = None;
    seeded.source = DataSource::Live;
    state
        .cache
        .insert("finance-jane doe-2024", &seeded, 600)
        .await
        .expect("Summary should cache");

    let (status, body) = get(state, "/api/campaign-finance/Jane%20Doe").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "cache");
    assert_eq!(body["receipts_display"], "$1.2M");
}

#[tokio::test]
async fn test_campaign_finance_serves_stale_cache_on_failure() {
    use repfinder::data::finance::fallback_summary;

    let state = offline_state();

    // Seed an already-expired entry; with no FEC key the fetch fails and
    // the handler must degrade to this stale data, not the placeholder
    let mut seeded = fallback_summary("Jane Doe", 2024);
    seeded.total_receipts = 1_200_000.0;
    seeded.receipts_display = "$1.2M".to_string();
    seeded.note = None;
    seeded.source = DataSource::Live;
    state
        .cache
        .insert("finance-jane doe-2024", &seeded, 0)
        .await
        .expect("Summary should cache");
    tokio::time::sleep(Duration::from_millis(10)).await;

    let (status, body) = get(state, "/api/campaign-finance/Jane%20Doe").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "cache");
    assert_eq!(body["receipts_display"], "$1.2M");
    assert_eq!(body["note"], Value::Null);
}

#[tokio::test]
async fn test_voting_record_serves_stale_cache_when_member_unresolved() {
    use repfinder::data::votes::fallback_record;

    let state = offline_state();

    // An expired record for a member the (unavailable) roster can't resolve
    let mut seeded = fallback_record("Bernie Sanders");
    seeded.bioguide_id = Some("S000033".to_string());
    seeded.note = None;
    seeded.source = DataSource::Live;
    state
        .cache
        .insert("votes-bernie sanders", &seeded, 0)
        .await
        .expect("Record should cache");
    tokio::time::sleep(Duration::from_millis(10)).await;

    let (status, body) = get(state, "/api/voting-record/Bernie%20Sanders").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "cache");
    assert_eq!(body["bioguide_id"], "S000033");
    assert_eq!(body["note"], Value::Null);
}

#[tokio::test]
async fn test_voting_record_fallback_payload() {
    let (status, body) = get(offline_state(), "/api/voting-record/Jane%20Doe").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"], "Jane Doe");
    assert_eq!(body["note"], "Data Temporarily Unavailable");
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
    assert!(body["transcript_url"]
        .as_str()
        .unwrap()
        .contains("congressional-record"));
}

#[tokio::test]
async fn test_voting_record_unresolved_member_with_roster() {
    let state = offline_state();
    state
        .cache
        .insert("roster", &vermont_roster(), 600)
        .await
        .expect("Roster should cache");

    // Roster is present but has no such member; upstream has no key either
    let (status, body) = get(state, "/api/voting-record/Nobody%20Here").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["bioguide_id"], Value::Null);
}
