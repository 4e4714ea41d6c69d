//! FEC campaign finance API client
//!
//! Resolves a candidate by name via the FEC search endpoint, then fetches
//! that candidate's totals for an election cycle. Totals are formatted into
//! the compact `$1.2M` display strings the API consumers expect.

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{DataSource, FinanceSummary};

/// Base URL for the FEC API
const FEC_BASE_URL: &str = "https://api.open.fec.gov/v1";

/// Election cycle used when the caller doesn't specify one
pub const DEFAULT_CYCLE: u16 = 2024;

/// Errors that can occur when fetching campaign finance data
#[derive(Debug, Error)]
pub enum FinanceError {
    /// No API key was configured; lookups can never succeed
    #[error("No FEC API key configured")]
    MissingApiKey,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse API response
    #[error("Failed to parse FEC response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The candidate search returned no matches
    #[error("No FEC candidate found matching '{0}'")]
    CandidateNotFound(String),

    /// The candidate exists but has no totals for the cycle
    #[error("No finance totals available for candidate {0}")]
    NoTotals(String),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<CandidateResult>,
}

#[derive(Debug, Deserialize)]
struct CandidateResult {
    candidate_id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TotalsResponse {
    #[serde(default)]
    results: Vec<TotalsResult>,
}

#[derive(Debug, Deserialize)]
struct TotalsResult {
    #[serde(default)]
    receipts: Option<f64>,
    #[serde(default)]
    disbursements: Option<f64>,
    #[serde(default)]
    last_cash_on_hand_end_period: Option<f64>,
}

/// Client for fetching campaign finance totals from the FEC API
#[derive(Debug, Clone)]
pub struct FinanceClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl FinanceClient {
    /// Creates a new FinanceClient
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client (carries the outbound timeout)
    /// * `api_key` - FEC API key, if configured
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: FEC_BASE_URL.to_string(),
        }
    }

    /// Overrides the base URL (for testing)
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches campaign finance totals for a candidate by name
    ///
    /// Searches FEC candidates for the name and takes the first match, then
    /// fetches that candidate's totals for the given cycle.
    ///
    /// # Arguments
    /// * `name` - Candidate name to search for
    /// * `cycle` - Election cycle (e.g. 2024)
    ///
    /// # Returns
    /// * `Ok(FinanceSummary)` - Totals with display-formatted amounts
    /// * `Err(FinanceError)` - Missing key, request/parse failure, or no match
    pub async fn fetch_summary(
        &self,
        name: &str,
        cycle: u16,
    ) -> Result<FinanceSummary, FinanceError> {
        let api_key = self.api_key.as_deref().ok_or(FinanceError::MissingApiKey)?;

        let candidate = self.search_candidate(name, api_key).await?;
        let totals = self.fetch_totals(&candidate.candidate_id, cycle, api_key).await?;

        let receipts = totals.receipts.unwrap_or(0.0);
        let disbursements = totals.disbursements.unwrap_or(0.0);
        let cash_on_hand = totals.last_cash_on_hand_end_period.unwrap_or(0.0);

        Ok(FinanceSummary {
            candidate_name: candidate.name,
            candidate_id: Some(candidate.candidate_id),
            cycle,
            total_receipts: receipts,
            total_disbursements: disbursements,
            cash_on_hand,
            receipts_display: format_currency(receipts),
            disbursements_display: format_currency(disbursements),
            cash_on_hand_display: format_currency(cash_on_hand),
            note: None,
            source: DataSource::Live,
            fetched_at: Utc::now(),
        })
    }

    /// Searches FEC candidates by name and takes the first result
    async fn search_candidate(
        &self,
        name: &str,
        api_key: &str,
    ) -> Result<CandidateResult, FinanceError> {
        let url = format!("{}/candidates/search/", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", name), ("api_key", api_key), ("sort", "-first_file_date")])
            .send()
            .await?;
        let text = response.text().await?;
        let search: SearchResponse = serde_json::from_str(&text)?;

        search
            .results
            .into_iter()
            .next()
            .ok_or_else(|| FinanceError::CandidateNotFound(name.to_string()))
    }

    /// Fetches totals for a candidate ID and cycle, taking the first result
    async fn fetch_totals(
        &self,
        candidate_id: &str,
        cycle: u16,
        api_key: &str,
    ) -> Result<TotalsResult, FinanceError> {
        let url = format!("{}/candidate/{}/totals/", self.base_url, candidate_id);
        let cycle_str = cycle.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", api_key), ("cycle", cycle_str.as_str())])
            .send()
            .await?;
        let text = response.text().await?;
        let totals: TotalsResponse = serde_json::from_str(&text)?;

        totals
            .results
            .into_iter()
            .next()
            .ok_or_else(|| FinanceError::NoTotals(candidate_id.to_string()))
    }
}

/// Formats a dollar amount into a compact display string
///
/// Amounts of a million or more render as `$1.2M`, a thousand or more as
/// `$345.6K`, and smaller amounts as whole dollars (`$789`). Negative
/// amounts keep their sign in front of the dollar symbol.
pub fn format_currency(amount: f64) -> String {
    let (sign, magnitude) = if amount < 0.0 {
        ("-", -amount)
    } else {
        ("", amount)
    };

    if magnitude >= 1_000_000.0 {
        format!("{}${:.1}M", sign, magnitude / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{}${:.1}K", sign, magnitude / 1_000.0)
    } else {
        format!("{}${:.0}", sign, magnitude)
    }
}

/// Builds the documented placeholder summary for when the FEC API is
/// unavailable
pub fn fallback_summary(name: &str, cycle: u16) -> FinanceSummary {
    FinanceSummary {
        candidate_name: name.to_string(),
        candidate_id: None,
        cycle,
        total_receipts: 0.0,
        total_disbursements: 0.0,
        cash_on_hand: 0.0,
        receipts_display: format_currency(0.0),
        disbursements_display: format_currency(0.0),
        cash_on_hand_display: format_currency(0.0),
        note: Some("Data Temporarily Unavailable".to_string()),
        source: DataSource::Fallback,
        fetched_at: Utc::now(),
    }
}
