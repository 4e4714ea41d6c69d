//! Core data models for the representative lookup service
//!
//! This module contains the data types used throughout the service for
//! representing members of Congress, campaign finance summaries, and
//! voting records, along with the per-source API clients.

pub mod civic;
pub mod districts;
pub mod finance;
pub mod legislators;
pub mod votes;

pub use civic::{CivicClient, CivicError};
pub use districts::{
    estimate_district, extract_zip, state_for_zip, validate_zip, ZipError, DEFAULT_STATE,
};
pub use finance::{FinanceClient, FinanceError};
pub use legislators::{LegislatorsClient, RosterError};
pub use votes::{VotesClient, VotesError};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which chamber of Congress a member sits in
///
/// Ordering is significant: `Senate < House`, so sorting member lists by
/// chamber puts senators before representatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Chamber {
    Senate,
    House,
}

/// A current member of Congress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legislator {
    /// Full display name (e.g. "Nancy Pelosi")
    pub name: String,
    /// Bioguide ID used by Congress.gov-family APIs
    pub bioguide_id: String,
    /// Party affiliation (e.g. "Democrat")
    pub party: String,
    /// Two-letter state code
    pub state: String,
    /// Chamber the member sits in
    pub chamber: Chamber,
    /// District number for House members; `None` for senators
    pub district: Option<u16>,
    /// Office phone number, if published
    pub phone: Option<String>,
    /// Official website URL, if published
    pub website: Option<String>,
}

/// Where a response payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Fetched from the upstream API for this request
    Live,
    /// Served from the in-memory cache
    Cache,
    /// Hardcoded placeholder returned because the upstream was unavailable
    Fallback,
}

/// Members of Congress resolved for a ZIP code or address query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembersPayload {
    /// The original query (ZIP code or address)
    pub query: String,
    /// Resolved two-letter state code
    pub state: String,
    /// Resolved congressional district number
    pub district: u16,
    /// Whether the district was estimated from ZIP tables rather than geocoded
    pub approximate: bool,
    /// Senators first, then the district's representative
    pub members: Vec<Legislator>,
    /// Where this payload came from
    pub source: DataSource,
    /// When this payload was assembled
    pub fetched_at: DateTime<Utc>,
}

/// Campaign finance totals for a candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceSummary {
    /// Candidate name as matched by the FEC search
    pub candidate_name: String,
    /// FEC candidate ID, if resolved
    pub candidate_id: Option<String>,
    /// Election cycle the totals cover (e.g. 2024)
    pub cycle: u16,
    /// Total receipts in dollars
    pub total_receipts: f64,
    /// Total disbursements in dollars
    pub total_disbursements: f64,
    /// Cash on hand at the end of the reporting period, in dollars
    pub cash_on_hand: f64,
    /// Human-readable receipts (e.g. "$1.2M")
    pub receipts_display: String,
    /// Human-readable disbursements
    pub disbursements_display: String,
    /// Human-readable cash on hand
    pub cash_on_hand_display: String,
    /// Explanatory note attached to placeholder payloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Where this payload came from
    pub source: DataSource,
    /// When this payload was assembled
    pub fetched_at: DateTime<Utc>,
}

/// A single recent legislative item attributed to a member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteItem {
    /// Bill identifier (e.g. "H.R. 1234")
    pub bill: String,
    /// Short title or description of the item
    pub title: String,
    /// Latest action date, if known
    pub date: Option<NaiveDate>,
    /// Latest recorded action text (e.g. "Introduced in House")
    pub action: String,
}

/// Voting record snippet for a member, with calendar/transcript links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingRecord {
    /// Member name as queried
    pub member: String,
    /// Bioguide ID, if the member was resolved
    pub bioguide_id: Option<String>,
    /// Recent sponsored/acted-on items, newest first
    pub items: Vec<VoteItem>,
    /// Link to the congressional calendar for this member's chamber
    pub calendar_url: String,
    /// Link to floor transcripts featuring this member
    pub transcript_url: String,
    /// Explanatory note attached to placeholder payloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Where this payload came from
    pub source: DataSource,
    /// When this payload was assembled
    pub fetched_at: DateTime<Utc>,
}

/// Sorts members so senators come before representatives, alphabetically
/// within each chamber
pub fn sort_members(members: &mut [Legislator]) {
    members.sort_by(|a, b| a.chamber.cmp(&b.chamber).then_with(|| a.name.cmp(&b.name)));
}
