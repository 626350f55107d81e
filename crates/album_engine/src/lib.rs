//! Album engine: configuration, HTTP paging, decoding and export-file IO.
mod config;
mod decode;
mod document;
mod error;
mod exporter;
mod fetch;
mod filename;
mod persist;
mod types;

pub use album_core::{Page, Post, StopReason, TargetLabel};
pub use config::{
    parse_album_id, ExportConfig, ALBUM_ID_KEY, API_URL_KEY, AUTH_TOKEN_KEY, BROWSER_USER_AGENT,
    DEFAULT_API_URL, DEFAULT_OUTPUT_DIR, DEFAULT_PAGE_DELAY, OUTPUT_DIR_KEY, PAGE_DELAY_KEY,
    REQUEST_TIMEOUT_KEY, TOC_FORMAT_KEY,
};
pub use decode::{decode_page, SUCCESS_CODE};
pub use document::{render_post, TocFormat};
pub use error::{ErrorKind, ExportError};
pub use exporter::{AlbumExporter, ExportReport};
pub use fetch::{FetchSettings, LogProgressSink, PageSource, ProgressSink, ReqwestPageSource};
pub use filename::{export_filename, sanitize_filename};
pub use persist::{ensure_output_dir, ExportTarget, PersistError};
pub use types::{ExportEvent, FailureKind, FetchError, PageRequest};
