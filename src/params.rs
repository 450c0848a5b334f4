// src/params.rs
use std::path::PathBuf;

// Net config
pub const HOST: &str = "www.hklexlist.edu.hk";
/// Per-character page; `{id}` is the zero-padded character identifier.
pub const PAGE_TMPL: &str = "/chars/{id}.html";
/// Stroke-animation script next to the page: same id, different extension.
pub const SCRIPT_TMPL: &str = "/chars/{id}.js";

pub const FETCH_TIMEOUT_SECS: u64 = 30;
pub const FETCH_MAX_ATTEMPTS: u32 = 3;
/// Base back-off; attempt n sleeps n * this.
pub const FETCH_BACKOFF_MS: u64 = 2_000;
/// Pause between successful characters. Be polite.
pub const REQUEST_PAUSE_MS: u64 = 500;

// Output store
pub const DEFAULT_OUT_DIR: &str = "data";
pub const CHARS_SUBDIR: &str = "characters";
pub const INDEX_SUBDIR: &str = "index";
pub const FAILED_LOG: &str = "failed.log";

#[derive(Clone)]
pub struct Params {
    pub chars_file: Option<PathBuf>, // input listing: "id<TAB>glyph" per line
    pub out: PathBuf,                // output store root
    pub limit: Option<usize>,        // stop after N characters
    pub start: usize,                // skip the first N listing entries
    pub ids_filter: Option<Vec<String>>, // subset of identifiers
    pub delay_ms: u64,               // pause between successful fetches
    pub index_only: bool,            // skip the crawl, rebuild indexes
    pub skip_index: bool,            // crawl only, leave indexes stale
}

impl Params {
    pub fn new() -> Self {
        Self {
            chars_file: None,
            out: PathBuf::from(DEFAULT_OUT_DIR),
            limit: None,
            start: 0,
            ids_filter: None,
            delay_ms: REQUEST_PAUSE_MS,
            index_only: false,
            skip_index: false,
        }
    }
}

impl Default for Params {
    fn default() -> Self { Self::new() }
}
