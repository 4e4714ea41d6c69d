//! Congress.gov voting record client
//!
//! Fetches a member's recently sponsored legislation from the Congress.gov
//! (data.gov) API by bioguide ID and turns it into short voting-record
//! snippets, plus calendar and transcript links built from the member's
//! identity.

use chrono::{NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{Chamber, DataSource, Legislator, VoteItem, VotingRecord};

/// Base URL for the Congress.gov API
const CONGRESS_BASE_URL: &str = "https://api.congress.gov/v3";

/// Maximum number of legislative items to include in a snippet
const MAX_ITEMS: usize = 5;

/// Errors that can occur when fetching a voting record
#[derive(Debug, Error)]
pub enum VotesError {
    /// No API key was configured; lookups can never succeed
    #[error("No Congress.gov API key configured")]
    MissingApiKey,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse API response
    #[error("Failed to parse Congress.gov response: {0}")]
    ParseError(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SponsoredResponse {
    #[serde(default)]
    sponsored_legislation: Vec<SponsoredItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SponsoredItem {
    number: Option<BillNumber>,
    title: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    latest_action: Option<LatestAction>,
}

/// Congress.gov serializes bill numbers inconsistently across item types
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BillNumber {
    Num(u64),
    Str(String),
}

impl BillNumber {
    fn display(&self) -> String {
        match self {
            BillNumber::Num(n) => n.to_string(),
            BillNumber::Str(s) => s.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestAction {
    action_date: Option<NaiveDate>,
    text: Option<String>,
}

/// Client for fetching voting record snippets from Congress.gov
#[derive(Debug, Clone)]
pub struct VotesClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl VotesClient {
    /// Creates a new VotesClient
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client (carries the outbound timeout)
    /// * `api_key` - data.gov API key, if configured
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: CONGRESS_BASE_URL.to_string(),
        }
    }

    /// Overrides the base URL (for testing)
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches a voting record snippet for a resolved member
    ///
    /// # Arguments
    /// * `member` - Roster entry for the member (provides the bioguide ID)
    ///
    /// # Returns
    /// * `Ok(VotingRecord)` - Recent items plus calendar/transcript links
    /// * `Err(VotesError)` - Missing key or request/parse failure
    pub async fn fetch_record(&self, member: &Legislator) -> Result<VotingRecord, VotesError> {
        let api_key = self.api_key.as_deref().ok_or(VotesError::MissingApiKey)?;

        let url = format!(
            "{}/member/{}/sponsored-legislation",
            self.base_url, member.bioguide_id
        );
        let limit = MAX_ITEMS.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", api_key),
                ("format", "json"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;
        let text = response.text().await?;
        let api_response: SponsoredResponse = serde_json::from_str(&text)?;

        let items = api_response
            .sponsored_legislation
            .into_iter()
            .take(MAX_ITEMS)
            .map(parse_item)
            .collect();

        Ok(VotingRecord {
            member: member.name.clone(),
            bioguide_id: Some(member.bioguide_id.clone()),
            items,
            calendar_url: calendar_url(member.chamber),
            transcript_url: transcript_url(&member.name),
            note: None,
            source: DataSource::Live,
            fetched_at: Utc::now(),
        })
    }
}

/// Maps a sponsored-legislation item into a snippet entry
fn parse_item(item: SponsoredItem) -> VoteItem {
    let number = item
        .number
        .map(|n| n.display())
        .unwrap_or_else(|| "?".to_string());
    let bill = bill_label(item.kind.as_deref().unwrap_or(""), &number);

    let (date, action) = match item.latest_action {
        Some(latest) => (
            latest.action_date,
            latest.text.unwrap_or_else(|| "No recorded action".to_string()),
        ),
        None => (None, "No recorded action".to_string()),
    };

    VoteItem {
        bill,
        title: item.title.unwrap_or_else(|| "Untitled".to_string()),
        date,
        action,
    }
}

/// Formats a bill type code and number into the conventional citation
fn bill_label(kind: &str, number: &str) -> String {
    let prefix = match kind.to_ascii_uppercase().as_str() {
        "HR" => "H.R.",
        "S" => "S.",
        "HRES" => "H.Res.",
        "SRES" => "S.Res.",
        "HJRES" => "H.J.Res.",
        "SJRES" => "S.J.Res.",
        "HCONRES" => "H.Con.Res.",
        "SCONRES" => "S.Con.Res.",
        _ => return format!("Bill {}", number),
    };
    format!("{} {}", prefix, number)
}

/// Floor calendar link for a member's chamber
fn calendar_url(chamber: Chamber) -> String {
    match chamber {
        Chamber::Senate => {
            "https://www.senate.gov/legislative/schedule/floor_schedule.htm".to_string()
        }
        Chamber::House => "https://docs.house.gov/floor/".to_string(),
    }
}

/// Congressional Record search link for a member's floor remarks
fn transcript_url(name: &str) -> String {
    format!(
        "https://www.congress.gov/congressional-record?q={}",
        name.replace(' ', "+")
    )
}

/// Builds the documented placeholder record for when the upstream is
/// unavailable or the member could not be resolved
pub fn fallback_record(name: &str) -> VotingRecord {
    VotingRecord {
        member: name.to_string(),
        bioguide_id: None,
        items: Vec::new(),
        calendar_url: "https://www.congress.gov/committee-schedule".to_string(),
        transcript_url: transcript_url(name),
        note: Some("Data Temporarily Unavailable".to_string()),
        source: DataSource::Fallback,
        fetched_at: Utc::now(),
    }
}
