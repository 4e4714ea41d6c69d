//! Current-legislator roster client for the TheUnitedStates.io dataset
//!
//! Fetches the community-maintained legislators-current JSON file and parses
//! it into typed `Legislator` records. The roster is the source of truth for
//! ZIP-based lookups and for resolving member names to bioguide IDs.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{sort_members, Chamber, Legislator};

/// URL of the current-legislators dataset
const ROSTER_URL: &str =
    "https://unitedstates.github.io/congress-legislators/legislators-current.json";

/// Errors that can occur when fetching the legislator roster
#[derive(Debug, Error)]
pub enum RosterError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse roster JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The dataset parsed but contained no usable records
    #[error("Roster dataset was empty")]
    EmptyRoster,
}

/// A raw roster record from the dataset
#[derive(Debug, Deserialize)]
struct RosterRecord {
    id: RecordId,
    name: RecordName,
    #[serde(default)]
    terms: Vec<RecordTerm>,
}

#[derive(Debug, Deserialize)]
struct RecordId {
    bioguide: String,
}

#[derive(Debug, Deserialize)]
struct RecordName {
    first: String,
    last: String,
    official_full: Option<String>,
}

/// A single term of service; the last entry is the member's current term
#[derive(Debug, Deserialize)]
struct RecordTerm {
    #[serde(rename = "type")]
    kind: String,
    state: String,
    #[serde(default)]
    district: Option<i32>,
    party: Option<String>,
    phone: Option<String>,
    url: Option<String>,
}

/// Client for fetching the current-legislator roster
#[derive(Debug, Clone)]
pub struct LegislatorsClient {
    client: Client,
    url: String,
}

impl Default for LegislatorsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LegislatorsClient {
    /// Creates a new LegislatorsClient with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            url: ROSTER_URL.to_string(),
        }
    }

    /// Creates a new LegislatorsClient with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            url: ROSTER_URL.to_string(),
        }
    }

    /// Overrides the dataset URL (for testing)
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Fetches and parses the full current-legislator roster
    ///
    /// # Returns
    /// * `Ok(Vec<Legislator>)` - All current members with a recognizable term
    /// * `Err(RosterError)` - If the request or parsing fails
    pub async fn fetch_roster(&self) -> Result<Vec<Legislator>, RosterError> {
        let response = self.client.get(&self.url).send().await?;
        let text = response.text().await?;
        let records: Vec<RosterRecord> = serde_json::from_str(&text)?;

        let roster = parse_roster(records);
        if roster.is_empty() {
            return Err(RosterError::EmptyRoster);
        }
        Ok(roster)
    }
}

/// Maps raw roster records to `Legislator` values
///
/// Uses each record's most recent term. Records whose term type is neither
/// "sen" nor "rep" are skipped. At-large House seats appear in the dataset
/// as district 0 and are normalized to district 1 to match the estimator.
fn parse_roster(records: Vec<RosterRecord>) -> Vec<Legislator> {
    records
        .into_iter()
        .filter_map(|record| {
            let term = record.terms.into_iter().last()?;
            let chamber = match term.kind.as_str() {
                "sen" => Chamber::Senate,
                "rep" => Chamber::House,
                _ => return None,
            };

            let district = match chamber {
                Chamber::Senate => None,
                Chamber::House => Some(term.district.unwrap_or(0).max(1) as u16),
            };

            let name = record.name.official_full.unwrap_or_else(|| {
                format!("{} {}", record.name.first, record.name.last)
            });

            Some(Legislator {
                name,
                bioguide_id: record.id.bioguide,
                party: term.party.unwrap_or_else(|| "Unknown".to_string()),
                state: term.state,
                chamber,
                district,
                phone: term.phone,
                website: term.url,
            })
        })
        .collect()
}

/// Selects the members for a state and district from a roster
///
/// Returns both senators for the state plus the representative for the
/// district, senators sorted before representatives.
pub fn members_for(roster: &[Legislator], state: &str, district: u16) -> Vec<Legislator> {
    let mut members: Vec<Legislator> = roster
        .iter()
        .filter(|member| {
            member.state == state
                && match member.chamber {
                    Chamber::Senate => true,
                    Chamber::House => member.district == Some(district),
                }
        })
        .cloned()
        .collect();

    sort_members(&mut members);
    members
}

/// Builds the documented placeholder member list for when no roster data is
/// available at all
pub fn fallback_members(state: &str, district: u16) -> Vec<Legislator> {
    vec![
        Legislator {
            name: format!("Senior Senator for {}", state),
            bioguide_id: "UNAVAILABLE".to_string(),
            party: "Data Temporarily Unavailable".to_string(),
            state: state.to_string(),
            chamber: Chamber::Senate,
            district: None,
            phone: None,
            website: Some("https://www.senate.gov/senators/".to_string()),
        },
        Legislator {
            name: format!("Junior Senator for {}", state),
            bioguide_id: "UNAVAILABLE".to_string(),
            party: "Data Temporarily Unavailable".to_string(),
            state: state.to_string(),
            chamber: Chamber::Senate,
            district: None,
            phone: None,
            website: Some("https://www.senate.gov/senators/".to_string()),
        },
        Legislator {
            name: format!("Representative for {}-{}", state, district),
            bioguide_id: "UNAVAILABLE".to_string(),
            party: "Data Temporarily Unavailable".to_string(),
            state: state.to_string(),
            chamber: Chamber::House,
            district: Some(district),
            phone: None,
            website: Some("https://www.house.gov/representatives".to_string()),
        },
    ]
}
