//! HTTP route layer for the representative lookup API
//!
//! Exposes the consolidated endpoints over the data clients:
//!
//! - `GET /health`
//! - `GET /api/congressman/:zipcode`
//! - `GET /api/representatives?address=`
//! - `GET /api/voting-record/:name`
//! - `GET /api/campaign-finance/:name`
//!
//! Invalid input is a 400; downstream failures degrade to stale cache data
//! and then to the documented fallback payloads, always with a 200 and a
//! `source` marker so consumers can tell the difference.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::cache::MemoryCache;
use crate::cli::ServiceConfig;
use crate::data::finance::{fallback_summary, DEFAULT_CYCLE};
use crate::data::legislators::{fallback_members, members_for};
use crate::data::votes::fallback_record;
use crate::data::{
    estimate_district, extract_zip, state_for_zip, validate_zip, CivicClient, DataSource,
    FinanceClient, FinanceSummary, Legislator, LegislatorsClient, MembersPayload, VotesClient,
    VotingRecord,
};
use crate::error::ApiError;

/// Cache key for the legislator roster
const ROSTER_CACHE_KEY: &str = "roster";

/// Shared application state behind every handler
pub struct AppState {
    /// In-memory response cache
    pub cache: MemoryCache,
    /// Current-legislator roster client
    pub legislators: LegislatorsClient,
    /// Address lookup client
    pub civic: CivicClient,
    /// Campaign finance client
    pub finance: FinanceClient,
    /// Voting record client
    pub votes: VotesClient,
    /// TTL for finance/voting-record cache entries
    pub cache_ttl_secs: u64,
    /// TTL for the roster cache entry
    pub roster_ttl_secs: u64,
    /// When the server started, for the health endpoint
    pub started_at: Instant,
}

impl AppState {
    /// Builds application state from runtime configuration
    ///
    /// All clients share one HTTP client carrying the outbound timeout.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            cache: MemoryCache::new(),
            legislators: LegislatorsClient::with_client(http_client.clone()),
            civic: CivicClient::new(http_client.clone(), config.civic_api_key.clone()),
            finance: FinanceClient::new(http_client.clone(), config.fec_api_key.clone()),
            votes: VotesClient::new(http_client, config.congress_api_key.clone()),
            cache_ttl_secs: config.cache_ttl_secs,
            roster_ttl_secs: config.roster_ttl_secs,
            started_at: Instant::now(),
        })
    }

    /// Returns the legislator roster, preferring fresh cache, then a live
    /// fetch, then stale cache
    ///
    /// The `DataSource` in the result says which of those happened. Returns
    /// `None` only when there has never been a successful fetch.
    pub async fn roster(&self) -> Option<(Vec<Legislator>, DataSource)> {
        if let Some(cached) = self.cache.get::<Vec<Legislator>>(ROSTER_CACHE_KEY).await {
            if !cached.is_expired {
                return Some((cached.data, DataSource::Cache));
            }
        }

        match self.legislators.fetch_roster().await {
            Ok(roster) => {
                if let Err(e) = self
                    .cache
                    .insert(ROSTER_CACHE_KEY, &roster, self.roster_ttl_secs)
                    .await
                {
                    warn!("Failed to cache roster: {}", e);
                }
                Some((roster, DataSource::Live))
            }
            Err(e) => {
                warn!("Roster fetch failed: {}", e);
                // Serve stale roster if we have one
                self.cache
                    .get::<Vec<Legislator>>(ROSTER_CACHE_KEY)
                    .await
                    .map(|cached| (cached.data, DataSource::Cache))
            }
        }
    }
}

/// Builds the API router over shared state
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/congressman/:zipcode", get(congressman))
        .route("/api/representatives", get(representatives))
        .route("/api/voting-record/:name", get(voting_record))
        .route("/api/campaign-finance/:name", get(campaign_finance))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check response body
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// ZIP code lookup endpoint
///
/// Resolves the ZIP to a state and estimated district via the static tables,
/// then pulls the matching members from the roster.
async fn congressman(
    State(state): State<Arc<AppState>>,
    Path(zipcode): Path<String>,
) -> Result<Json<MembersPayload>, ApiError> {
    validate_zip(&zipcode)?;

    let us_state = state_for_zip(&zipcode);
    let district = estimate_district(&zipcode);
    debug!("ZIP {} resolved to {}-{}", zipcode, us_state, district);

    Ok(Json(
        members_payload(&state, zipcode, us_state, district).await,
    ))
}

/// Query parameters for the address lookup endpoint
#[derive(Debug, Deserialize)]
pub struct AddressQuery {
    pub address: Option<String>,
}

/// Address lookup endpoint
///
/// Tries the Civic Information API first. On any failure it extracts a ZIP
/// from the address and resolves via the static tables; with no ZIP either,
/// it returns the documented fallback payload.
async fn representatives(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AddressQuery>,
) -> Result<Json<MembersPayload>, ApiError> {
    let address = query
        .address
        .filter(|a| !a.trim().is_empty())
        .ok_or(ApiError::MissingAddress)?;

    match state.civic.fetch_representatives(&address).await {
        Ok(lookup) => {
            let district = lookup
                .district
                .or_else(|| extract_zip(&address).map(|zip| estimate_district(&zip)))
                .unwrap_or(1);

            Ok(Json(MembersPayload {
                query: address,
                state: lookup.state,
                district,
                approximate: lookup.district.is_none(),
                members: lookup.members,
                source: DataSource::Live,
                fetched_at: Utc::now(),
            }))
        }
        Err(e) => {
            warn!("Civic lookup failed for '{}': {}", address, e);

            match extract_zip(&address) {
                Some(zip) => {
                    let us_state = state_for_zip(&zip);
                    let district = estimate_district(&zip);
                    Ok(Json(
                        members_payload(&state, address, us_state, district).await,
                    ))
                }
                None => {
                    let us_state = crate::data::DEFAULT_STATE;
                    Ok(Json(MembersPayload {
                        query: address,
                        state: us_state.to_string(),
                        district: 1,
                        approximate: true,
                        members: fallback_members(us_state, 1),
                        source: DataSource::Fallback,
                        fetched_at: Utc::now(),
                    }))
                }
            }
        }
    }
}

/// Voting record endpoint
///
/// Resolves the name against the roster to get a bioguide ID, then fetches
/// recent sponsored legislation. Always 200; failures yield the documented
/// placeholder record.
async fn voting_record(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<VotingRecord>, ApiError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::MissingName);
    }

    let cache_key = format!("votes-{}", name.to_lowercase());
    if let Some(cached) = state.cache.get::<VotingRecord>(&cache_key).await {
        if !cached.is_expired {
            let mut record = cached.data;
            record.source = DataSource::Cache;
            return Ok(Json(record));
        }
    }

    let Some(member) = resolve_member(&state, &name).await else {
        warn!("Could not resolve member '{}' in roster", name);
        if let Some(cached) = state.cache.get::<VotingRecord>(&cache_key).await {
            let mut record = cached.data;
            record.source = DataSource::Cache;
            return Ok(Json(record));
        }
        return Ok(Json(fallback_record(&name)));
    };

    match state.votes.fetch_record(&member).await {
        Ok(record) => {
            if let Err(e) = state
                .cache
                .insert(&cache_key, &record, state.cache_ttl_secs)
                .await
            {
                warn!("Failed to cache voting record: {}", e);
            }
            Ok(Json(record))
        }
        Err(e) => {
            warn!("Voting record fetch failed for '{}': {}", name, e);
            if let Some(cached) = state.cache.get::<VotingRecord>(&cache_key).await {
                let mut record = cached.data;
                record.source = DataSource::Cache;
                return Ok(Json(record));
            }
            Ok(Json(fallback_record(&name)))
        }
    }
}

/// Campaign finance endpoint
///
/// Cache key shape is `finance-<name>-<cycle>`. Always 200; failures yield
/// stale cache data, then the documented placeholder summary.
async fn campaign_finance(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<FinanceSummary>, ApiError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::MissingName);
    }

    let cycle = DEFAULT_CYCLE;
    let cache_key = format!("finance-{}-{}", name.to_lowercase(), cycle);
    if let Some(cached) = state.cache.get::<FinanceSummary>(&cache_key).await {
        if !cached.is_expired {
            let mut summary = cached.data;
            summary.source = DataSource::Cache;
            return Ok(Json(summary));
        }
    }

    match state.finance.fetch_summary(&name, cycle).await {
        Ok(summary) => {
            if let Err(e) = state
                .cache
                .insert(&cache_key, &summary, state.cache_ttl_secs)
                .await
            {
                warn!("Failed to cache finance summary: {}", e);
            }
            Ok(Json(summary))
        }
        Err(e) => {
            warn!("Finance fetch failed for '{}': {}", name, e);
            if let Some(cached) = state.cache.get::<FinanceSummary>(&cache_key).await {
                let mut summary = cached.data;
                summary.source = DataSource::Cache;
                return Ok(Json(summary));
            }
            Ok(Json(fallback_summary(&name, cycle)))
        }
    }
}

/// Assembles a members payload for a resolved state/district
///
/// Uses the roster when available; otherwise the documented fallback list.
async fn members_payload(
    state: &AppState,
    query: String,
    us_state: &str,
    district: u16,
) -> MembersPayload {
    let (members, source) = match state.roster().await {
        Some((roster, source)) => {
            let members = members_for(&roster, us_state, district);
            if members.is_empty() {
                (fallback_members(us_state, district), DataSource::Fallback)
            } else {
                (members, source)
            }
        }
        None => (fallback_members(us_state, district), DataSource::Fallback),
    };

    MembersPayload {
        query,
        state: us_state.to_string(),
        district,
        approximate: true,
        members,
        source,
        fetched_at: Utc::now(),
    }
}

/// Finds a roster member whose name matches the query, case-insensitively
///
/// An exact name match wins; otherwise the first member whose full name
/// contains the query is taken (the original services matched loosely on
/// name as well).
async fn resolve_member(state: &AppState, name: &str) -> Option<Legislator> {
    let (roster, _) = state.roster().await?;
    let needle = name.to_lowercase();

    roster
        .iter()
        .find(|member| member.name.to_lowercase() == needle)
        .or_else(|| {
            roster
                .iter()
                .find(|member| member.name.to_lowercase().contains(&needle))
        })
        .cloned()
}
