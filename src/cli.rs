//! Command-line interface parsing for the repfinder server
//!
//! All options can also be supplied via environment variables, which is how
//! the API keys are normally provided.

use clap::Parser;
use std::time::Duration;

/// Congressional representative lookup API server
#[derive(Parser, Debug)]
#[command(name = "repfinder")]
#[command(about = "ZIP/address to congressional representative lookup API")]
#[command(version)]
pub struct Cli {
    /// Port to bind the HTTP server on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Google Civic Information API key (enables address lookups)
    #[arg(long, env = "GOOGLE_CIVIC_API_KEY")]
    pub civic_api_key: Option<String>,

    /// FEC API key (enables campaign finance lookups)
    #[arg(long, env = "FEC_API_KEY")]
    pub fec_api_key: Option<String>,

    /// data.gov API key for Congress.gov (enables voting record lookups)
    #[arg(long, env = "CONGRESS_API_KEY")]
    pub congress_api_key: Option<String>,

    /// How long finance/voting-record responses stay fresh, in seconds
    #[arg(long, default_value_t = 600)]
    pub cache_ttl_secs: u64,

    /// How long the legislator roster stays fresh, in seconds
    #[arg(long, default_value_t = 21_600)]
    pub roster_ttl_secs: u64,

    /// Timeout for outbound API requests, in seconds
    #[arg(long, default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Disable the background roster refresh task
    #[arg(long)]
    pub no_refresh: bool,
}

/// Runtime configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port to bind on
    pub port: u16,
    /// Google Civic Information API key
    pub civic_api_key: Option<String>,
    /// FEC API key
    pub fec_api_key: Option<String>,
    /// data.gov API key
    pub congress_api_key: Option<String>,
    /// TTL for per-request response caching
    pub cache_ttl_secs: u64,
    /// TTL for the legislator roster
    pub roster_ttl_secs: u64,
    /// Outbound request timeout
    pub request_timeout: Duration,
    /// Whether the background roster refresh runs
    pub refresh_enabled: bool,
}

impl ServiceConfig {
    /// Builds a ServiceConfig from parsed CLI arguments
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            port: cli.port,
            civic_api_key: cli.civic_api_key,
            fec_api_key: cli.fec_api_key,
            congress_api_key: cli.congress_api_key,
            cache_ttl_secs: cli.cache_ttl_secs,
            roster_ttl_secs: cli.roster_ttl_secs,
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
            refresh_enabled: !cli.no_refresh,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from_cli(Cli::parse_from(["repfinder"]))
    }
}
