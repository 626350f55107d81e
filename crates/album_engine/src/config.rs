//! Run configuration, loaded once at startup and passed to the exporter.
//!
//! Required keys are `ALBUM_ID` and `AUTH_TOKEN`; everything else has a
//! default. Values come from the process environment (the binary seeds it
//! from `.env` first) or from any lookup closure in tests.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::{ExportError, FetchSettings, TocFormat};

pub const ALBUM_ID_KEY: &str = "ALBUM_ID";
pub const AUTH_TOKEN_KEY: &str = "AUTH_TOKEN";
pub const API_URL_KEY: &str = "ALBUM_API_URL";
pub const OUTPUT_DIR_KEY: &str = "OUTPUT_DIR";
pub const PAGE_DELAY_KEY: &str = "PAGE_DELAY_MS";
pub const REQUEST_TIMEOUT_KEY: &str = "REQUEST_TIMEOUT_SECS";
pub const TOC_FORMAT_KEY: &str = "TOC_FORMAT";

pub const DEFAULT_API_URL: &str = "https://ifdian.net/api/user/get-album-post";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

/// The upstream rejects requests without a browser-like agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Clone)]
pub struct ExportConfig {
    pub album_id: String,
    pub auth_token: String,
    pub api_url: String,
    pub output_dir: PathBuf,
    pub page_delay: Duration,
    pub user_agent: String,
    pub toc_format: TocFormat,
    pub fetch: FetchSettings,
}

// Keeps the credential out of logs and panic messages.
impl fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportConfig")
            .field("album_id", &self.album_id)
            .field("auth_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("output_dir", &self.output_dir)
            .field("page_delay", &self.page_delay)
            .field("user_agent", &self.user_agent)
            .field("toc_format", &self.toc_format)
            .field("fetch", &self.fetch)
            .finish()
    }
}

impl ExportConfig {
    /// Builds a configuration with defaults for everything but the album and credential.
    ///
    /// `album_id` may be a bare id or a pasted album URL.
    pub fn new(
        album_id: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self, ExportError> {
        let album_id = parse_album_id(&require(ALBUM_ID_KEY, Some(album_id.into()))?);
        let auth_token = require(AUTH_TOKEN_KEY, Some(auth_token.into()))?;
        Ok(Self {
            album_id,
            auth_token,
            api_url: DEFAULT_API_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            page_delay: DEFAULT_PAGE_DELAY,
            user_agent: BROWSER_USER_AGENT.to_string(),
            toc_format: TocFormat::default(),
            fetch: FetchSettings::default(),
        })
    }

    /// Loads from the process environment.
    pub fn from_env() -> Result<Self, ExportError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads from an arbitrary key lookup. Blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let album_id = require(ALBUM_ID_KEY, lookup(ALBUM_ID_KEY))?;
        let auth_token = require(AUTH_TOKEN_KEY, lookup(AUTH_TOKEN_KEY))?;
        let mut config = Self::new(album_id, auth_token)?;

        if let Some(api_url) = optional(lookup(API_URL_KEY)) {
            config.api_url = api_url;
        }
        if let Some(dir) = optional(lookup(OUTPUT_DIR_KEY)) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = optional(lookup(PAGE_DELAY_KEY)) {
            config.page_delay = Duration::from_millis(parse_number(PAGE_DELAY_KEY, &raw)?);
        }
        if let Some(raw) = optional(lookup(REQUEST_TIMEOUT_KEY)) {
            let secs = parse_number(REQUEST_TIMEOUT_KEY, &raw)?;
            if secs == 0 {
                return Err(ExportError::configuration(
                    REQUEST_TIMEOUT_KEY,
                    "must be at least 1 second",
                ));
            }
            config.fetch.request_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = optional(lookup(TOC_FORMAT_KEY)) {
            config.toc_format = TocFormat::parse(&raw).ok_or_else(|| {
                ExportError::configuration(
                    TOC_FORMAT_KEY,
                    format!("invalid value {raw:?}: expected markdown or chapter_number"),
                )
            })?;
        }
        Ok(config)
    }
}

static ALBUM_URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)album/([a-f0-9]{32})").ok());

/// Extracts the 32-hex album id from a pasted album URL; anything else is returned trimmed.
pub fn parse_album_id(input: &str) -> String {
    let trimmed = input.trim();
    ALBUM_URL
        .as_ref()
        .and_then(|pattern| pattern.captures(trimmed))
        .and_then(|captures| captures.get(1))
        .map_or(trimmed, |id| id.as_str())
        .to_string()
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require(key: &'static str, value: Option<String>) -> Result<String, ExportError> {
    optional(value).ok_or_else(|| ExportError::configuration(key, "environment variable is not set"))
}

fn parse_number(key: &'static str, raw: &str) -> Result<u64, ExportError> {
    raw.parse::<u64>()
        .map_err(|err| ExportError::configuration(key, format!("invalid value {raw:?}: {err}")))
}
