//! Static ZIP code to state/district lookup tables
//!
//! Maps 3-digit ZIP prefixes to state codes and estimates a congressional
//! district from the full ZIP. This is an approximation: ZIP codes do not
//! align with district boundaries, and a real geocoding service would be
//! needed for accurate results.

use thiserror::Error;

/// Default state returned when a ZIP prefix is not in the table
pub const DEFAULT_STATE: &str = "CA";

/// Errors that can occur when validating a ZIP code
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZipError {
    /// The ZIP code is not exactly five ASCII digits
    #[error("Invalid ZIP code: '{0}' (expected exactly 5 digits)")]
    InvalidFormat(String),
}

/// A contiguous range of 3-digit ZIP prefixes assigned to one state
#[derive(Debug, Clone, Copy)]
pub struct ZipRange {
    /// First 3-digit prefix in the range (inclusive)
    pub start: u16,
    /// Last 3-digit prefix in the range (inclusive)
    pub end: u16,
    /// Two-letter state code
    pub state: &'static str,
}

/// USPS 3-digit ZIP prefix assignments by state
///
/// Ranges follow the national SCF allocation. Prefixes not covered here
/// (unassigned blocks, territories, military) fall through to
/// [`DEFAULT_STATE`].
pub static ZIP_RANGES: [ZipRange; 57] = [
    ZipRange { start: 5, end: 5, state: "NY" },
    ZipRange { start: 10, end: 27, state: "MA" },
    ZipRange { start: 28, end: 29, state: "RI" },
    ZipRange { start: 30, end: 38, state: "NH" },
    ZipRange { start: 39, end: 49, state: "ME" },
    ZipRange { start: 50, end: 59, state: "VT" },
    ZipRange { start: 60, end: 69, state: "CT" },
    ZipRange { start: 70, end: 89, state: "NJ" },
    ZipRange { start: 100, end: 149, state: "NY" },
    ZipRange { start: 150, end: 196, state: "PA" },
    ZipRange { start: 197, end: 199, state: "DE" },
    ZipRange { start: 200, end: 205, state: "DC" },
    ZipRange { start: 206, end: 219, state: "MD" },
    ZipRange { start: 220, end: 246, state: "VA" },
    ZipRange { start: 247, end: 268, state: "WV" },
    ZipRange { start: 270, end: 289, state: "NC" },
    ZipRange { start: 290, end: 299, state: "SC" },
    ZipRange { start: 300, end: 319, state: "GA" },
    ZipRange { start: 320, end: 349, state: "FL" },
    ZipRange { start: 350, end: 369, state: "AL" },
    ZipRange { start: 370, end: 385, state: "TN" },
    ZipRange { start: 386, end: 397, state: "MS" },
    ZipRange { start: 398, end: 399, state: "GA" },
    ZipRange { start: 400, end: 427, state: "KY" },
    ZipRange { start: 430, end: 459, state: "OH" },
    ZipRange { start: 460, end: 479, state: "IN" },
    ZipRange { start: 480, end: 499, state: "MI" },
    ZipRange { start: 500, end: 528, state: "IA" },
    ZipRange { start: 530, end: 549, state: "WI" },
    ZipRange { start: 550, end: 567, state: "MN" },
    ZipRange { start: 570, end: 577, state: "SD" },
    ZipRange { start: 580, end: 588, state: "ND" },
    ZipRange { start: 590, end: 599, state: "MT" },
    ZipRange { start: 600, end: 629, state: "IL" },
    ZipRange { start: 630, end: 658, state: "MO" },
    ZipRange { start: 660, end: 679, state: "KS" },
    ZipRange { start: 680, end: 693, state: "NE" },
    ZipRange { start: 700, end: 714, state: "LA" },
    ZipRange { start: 716, end: 729, state: "AR" },
    ZipRange { start: 730, end: 749, state: "OK" },
    ZipRange { start: 750, end: 799, state: "TX" },
    ZipRange { start: 800, end: 816, state: "CO" },
    ZipRange { start: 820, end: 831, state: "WY" },
    ZipRange { start: 832, end: 838, state: "ID" },
    ZipRange { start: 840, end: 847, state: "UT" },
    ZipRange { start: 850, end: 865, state: "AZ" },
    ZipRange { start: 870, end: 884, state: "NM" },
    ZipRange { start: 885, end: 885, state: "TX" },
    ZipRange { start: 889, end: 898, state: "NV" },
    ZipRange { start: 900, end: 961, state: "CA" },
    ZipRange { start: 962, end: 966, state: "CA" },
    ZipRange { start: 967, end: 968, state: "HI" },
    ZipRange { start: 969, end: 969, state: "HI" },
    ZipRange { start: 970, end: 979, state: "OR" },
    ZipRange { start: 980, end: 994, state: "WA" },
    ZipRange { start: 995, end: 999, state: "AK" },
    ZipRange { start: 0, end: 4, state: "NY" },
];

/// House seat counts per state after the 2020 apportionment
///
/// DC is listed with a single (non-voting delegate) seat so that district
/// estimation stays total over every state the ZIP table can produce.
pub static DISTRICT_COUNTS: [(&str, u16); 51] = [
    ("AL", 7),
    ("AK", 1),
    ("AZ", 9),
    ("AR", 4),
    ("CA", 52),
    ("CO", 8),
    ("CT", 5),
    ("DC", 1),
    ("DE", 1),
    ("FL", 28),
    ("GA", 14),
    ("HI", 2),
    ("ID", 2),
    ("IL", 17),
    ("IN", 9),
    ("IA", 4),
    ("KS", 4),
    ("KY", 6),
    ("LA", 6),
    ("ME", 2),
    ("MD", 8),
    ("MA", 9),
    ("MI", 13),
    ("MN", 8),
    ("MS", 4),
    ("MO", 8),
    ("MT", 2),
    ("NE", 3),
    ("NV", 4),
    ("NH", 2),
    ("NJ", 12),
    ("NM", 3),
    ("NY", 26),
    ("NC", 14),
    ("ND", 1),
    ("OH", 15),
    ("OK", 5),
    ("OR", 6),
    ("PA", 17),
    ("RI", 2),
    ("SC", 7),
    ("SD", 1),
    ("TN", 9),
    ("TX", 38),
    ("UT", 4),
    ("VT", 1),
    ("VA", 11),
    ("WA", 10),
    ("WV", 2),
    ("WI", 8),
    ("WY", 1),
];

/// Validates that a ZIP code is exactly five ASCII digits
///
/// # Arguments
/// * `zip` - The candidate ZIP code string
///
/// # Returns
/// * `Ok(())` if the ZIP is well formed
/// * `Err(ZipError::InvalidFormat)` otherwise
pub fn validate_zip(zip: &str) -> Result<(), ZipError> {
    if zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ZipError::InvalidFormat(zip.to_string()))
    }
}

/// Looks up the state for a validated 5-digit ZIP code
///
/// Unknown prefixes return [`DEFAULT_STATE`] rather than failing, so the
/// lookup is total over all well-formed ZIP codes.
pub fn state_for_zip(zip: &str) -> &'static str {
    let prefix: u16 = match zip.get(..3).and_then(|p| p.parse().ok()) {
        Some(p) => p,
        None => return DEFAULT_STATE,
    };

    ZIP_RANGES
        .iter()
        .find(|range| prefix >= range.start && prefix <= range.end)
        .map(|range| range.state)
        .unwrap_or(DEFAULT_STATE)
}

/// Returns the number of House seats for a state
///
/// Unknown state codes are treated as at-large (one seat).
pub fn district_count(state: &str) -> u16 {
    DISTRICT_COUNTS
        .iter()
        .find(|(code, _)| *code == state)
        .map(|(_, count)| *count)
        .unwrap_or(1)
}

/// Estimates a congressional district number for a validated ZIP code
///
/// Derives a deterministic district in `1..=district_count(state)` from the
/// low digits of the ZIP. At-large states always estimate district 1. This
/// is a rough stand-in for real district geocoding.
pub fn estimate_district(zip: &str) -> u16 {
    let state = state_for_zip(zip);
    let count = district_count(state);
    if count <= 1 {
        return 1;
    }

    let numeric: u32 = zip.parse().unwrap_or(0);
    ((numeric % 100) % u32::from(count)) as u16 + 1
}

/// Extracts the first 5-digit ZIP code from a free-form address string
///
/// Used as a fallback when the address-based upstream is unavailable.
/// Scans whitespace- and comma-separated tokens and returns the first token
/// whose leading five characters are digits (handles ZIP+4 suffixes).
pub fn extract_zip(address: &str) -> Option<String> {
    address
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| token.len() >= 5)
        .find_map(|token| {
            let head = token.get(..5)?;
            if head.bytes().all(|b| b.is_ascii_digit()) {
                // Reject longer all-digit runs that aren't ZIP+4 (e.g. phone numbers)
                match token.get(5..6) {
                    None => Some(head.to_string()),
                    Some("-") => Some(head.to_string()),
                    Some(_) => None,
                }
            } else {
                None
            }
        })
}
