//! Google Civic Information API client for address-based lookups
//!
//! Resolves a free-form postal address to its congressional delegation via
//! the Civic Information `representatives` endpoint. Requires an API key;
//! without one every lookup fails with a permanent error so callers can go
//! straight to the ZIP-table fallback chain.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{sort_members, Chamber, Legislator};

/// Base URL for the Civic Information representatives endpoint
const CIVIC_BASE_URL: &str = "https://www.googleapis.com/civicinfo/v2/representatives";

/// Errors that can occur when looking up representatives by address
#[derive(Debug, Error)]
pub enum CivicError {
    /// No API key was configured; lookups can never succeed
    #[error("No Google Civic API key configured")]
    MissingApiKey,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse API response
    #[error("Failed to parse Civic API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The response contained no congressional offices for the address
    #[error("No congressional representatives found for address")]
    NoResults,
}

/// Result of an address lookup: resolved location plus its delegation
#[derive(Debug, Clone)]
pub struct CivicLookup {
    /// State resolved from the normalized address
    pub state: String,
    /// District parsed from the House office's division ID, if present
    pub district: Option<u16>,
    /// Senators first, then the representative
    pub members: Vec<Legislator>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CivicResponse {
    normalized_input: Option<NormalizedInput>,
    #[serde(default)]
    offices: Vec<Office>,
    #[serde(default)]
    officials: Vec<Official>,
}

#[derive(Debug, Deserialize)]
struct NormalizedInput {
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Office {
    division_id: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    official_indices: Vec<usize>,
}

#[derive(Debug, Deserialize)]
struct Official {
    name: String,
    party: Option<String>,
    #[serde(default)]
    phones: Vec<String>,
    #[serde(default)]
    urls: Vec<String>,
}

/// Client for the Google Civic Information API
#[derive(Debug, Clone)]
pub struct CivicClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl CivicClient {
    /// Creates a new CivicClient
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client (carries the outbound timeout)
    /// * `api_key` - Civic Information API key, if configured
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: CIVIC_BASE_URL.to_string(),
        }
    }

    /// Overrides the base URL (for testing)
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Looks up the congressional delegation for a free-form address
    ///
    /// # Returns
    /// * `Ok(CivicLookup)` - Resolved state/district and member list
    /// * `Err(CivicError::MissingApiKey)` - No key configured (permanent)
    /// * `Err(CivicError)` - Request, parse, or empty-result failure
    pub async fn fetch_representatives(&self, address: &str) -> Result<CivicLookup, CivicError> {
        let api_key = self.api_key.as_deref().ok_or(CivicError::MissingApiKey)?;

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("address", address),
                ("levels", "country"),
                ("roles", "legislatorUpperBody"),
                ("roles", "legislatorLowerBody"),
                ("key", api_key),
            ])
            .send()
            .await?;
        let text = response.text().await?;
        let api_response: CivicResponse = serde_json::from_str(&text)?;

        parse_response(api_response)
    }
}

/// Maps the Civic response's office/official index structure into members
///
/// The Civic API does not expose bioguide IDs, so members parsed here carry
/// an empty `bioguide_id`; callers that need one resolve it via the roster.
fn parse_response(response: CivicResponse) -> Result<CivicLookup, CivicError> {
    let state = response
        .normalized_input
        .and_then(|input| input.state)
        .unwrap_or_default();

    let mut district = None;
    let mut members = Vec::new();

    for office in &response.offices {
        let chamber = if office.roles.iter().any(|r| r == "legislatorUpperBody") {
            Chamber::Senate
        } else if office.roles.iter().any(|r| r == "legislatorLowerBody") {
            Chamber::House
        } else {
            continue;
        };

        let office_district = office
            .division_id
            .as_deref()
            .and_then(district_from_division);
        if chamber == Chamber::House {
            district = district.or(office_district);
        }

        for &index in &office.official_indices {
            let Some(official) = response.officials.get(index) else {
                continue;
            };

            members.push(Legislator {
                name: official.name.clone(),
                bioguide_id: String::new(),
                party: official
                    .party
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
                state: state.clone(),
                chamber,
                district: match chamber {
                    Chamber::Senate => None,
                    Chamber::House => office_district.or(Some(1)),
                },
                phone: official.phones.first().cloned(),
                website: official.urls.first().cloned(),
            });
        }
    }

    if members.is_empty() {
        return Err(CivicError::NoResults);
    }

    sort_members(&mut members);
    Ok(CivicLookup {
        state,
        district,
        members,
    })
}

/// Parses a district number out of an OCD division ID
///
/// Division IDs look like `ocd-division/country:us/state:nc/cd:2`.
fn district_from_division(division_id: &str) -> Option<u16> {
    division_id
        .rsplit('/')
        .find_map(|segment| segment.strip_prefix("cd:"))
        .and_then(|d| d.parse().ok())
}
