use std::time::Duration;

use album_core::Page;
use album_logging::{album_debug, album_error, album_info, album_warn};
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use url::Url;

use crate::config::{API_URL_KEY, AUTH_TOKEN_KEY};
use crate::decode::decode_page;
use crate::{ExportConfig, ExportError, ExportEvent, FailureKind, FetchError, PageRequest};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ExportEvent);
}

/// Reports run progress through the `album_*` log macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: ExportEvent) {
        match event {
            ExportEvent::Started {
                album_id,
                output_dir,
            } => {
                album_info!(
                    "Starting download for album {} into {}",
                    album_id,
                    output_dir.display()
                );
            }
            ExportEvent::FetchingPage { page, last_rank } => {
                album_info!("Fetching page {} with lastRank={}", page, last_rank);
            }
            ExportEvent::TargetResolved { path } => {
                album_info!("Output filename determined: {}", path.display());
            }
            ExportEvent::PostsWritten { page, count, total } => {
                album_debug!("Page {}: wrote {} posts ({} total)", page, count, total);
            }
            ExportEvent::Failed { kind, message } => {
                album_error!("Export stopped ({:?}): {}", kind, message);
            }
            ExportEvent::Finished {
                output_path: Some(path),
                posts_written,
                stop,
            } => {
                album_info!(
                    "Download finished ({:?}): {} posts saved to {}",
                    stop,
                    posts_written,
                    path.display()
                );
            }
            ExportEvent::Finished {
                output_path: None,
                stop,
                ..
            } => {
                album_warn!("Download finished ({:?}): no posts, nothing written", stop);
            }
        }
    }
}

#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError>;
}

/// Listing endpoint client: one cookie-authenticated GET per page.
#[derive(Debug, Clone)]
pub struct ReqwestPageSource {
    client: reqwest::Client,
    endpoint: Url,
    settings: FetchSettings,
}

impl ReqwestPageSource {
    pub fn new(config: &ExportConfig) -> Result<Self, ExportError> {
        let endpoint = Url::parse(&config.api_url)
            .map_err(|err| ExportError::configuration(API_URL_KEY, err.to_string()))?;

        let mut cookie = HeaderValue::from_str(&format!("auth_token={};", config.auth_token))
            .map_err(|err| ExportError::configuration(AUTH_TOKEN_KEY, err.to_string()))?;
        cookie.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, cookie);

        let client = reqwest::Client::builder()
            .connect_timeout(config.fetch.connect_timeout)
            .timeout(config.fetch.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.fetch.redirect_limit))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|err| {
                ExportError::Network(FetchError::new(FailureKind::Network, err.to_string()))
            })?;

        Ok(Self {
            client,
            endpoint,
            settings: config.fetch.clone(),
        })
    }

    fn page_url(&self, request: &PageRequest) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("album_id", &request.album_id)
            .append_pair("lastRank", &request.last_rank.to_string())
            .append_pair("rankOrder", "asc")
            .append_pair("rankField", "rank");
        url
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl PageSource for ReqwestPageSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError> {
        let url = self.page_url(request);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = self.read_body(response).await?;
        decode_page(&bytes)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
