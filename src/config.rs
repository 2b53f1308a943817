// src/config.rs

use std::{env, path::PathBuf, time::Duration};

/// The page holding the mouse database table.
pub const DATABASE_URL: &str = "https://www.eloshapes.com/mouse/database";

/// Browser-like request headers; the site serves a stripped page to unknown agents.
pub static BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    ),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.5"),
    ("Connection", "keep-alive"),
];

/// CSS selector for the data table: a `<table>` carrying the `table` class.
pub const TABLE_SELECTOR: &str = "table.table";

/// Shared stem of both output artifacts.
pub const FILE_PREFIX: &str = "eloshapes_mice";

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Keeps a double-clicked console window open long enough to read the report.
pub const POST_RUN_PAUSE: Duration = Duration::from_secs(10);

/// Opt-in switch for distinct exit codes per failure kind.
pub const STRICT_EXIT_VAR: &str = "ELOSHAPES_STRICT_EXIT";

/// Everything one run needs. `Default` is the production run; tests swap the
/// URL for a local responder and the output directory for a temp dir.
#[derive(Debug, Clone)]
pub struct Config {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub file_prefix: String,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub pause: Duration,
    pub strict_exit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DATABASE_URL.to_string(),
            headers: BROWSER_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            file_prefix: FILE_PREFIX.to_string(),
            output_dir: PathBuf::from("."),
            timeout: FETCH_TIMEOUT,
            pause: POST_RUN_PAUSE,
            strict_exit: false,
        }
    }
}

impl Config {
    /// Production defaults plus the strict-exit switch from the environment.
    pub fn from_env() -> Self {
        let value = env::var(STRICT_EXIT_VAR).ok();
        Self {
            strict_exit: strict_exit_from(value.as_deref()),
            ..Self::default()
        }
    }
}

/// `1` or `true` (any case, surrounding whitespace ignored) turns strict exit on.
pub fn strict_exit_from(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        v == "1" || v.eq_ignore_ascii_case("true")
    })
}
