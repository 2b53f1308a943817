// src/report.rs

use std::{
    fmt,
    io::{self, Write},
    path::Path,
};
use tracing::warn;

use crate::error::{ErrorKind, ScrapeError};

/// User-facing progress lines. Production writes to stdout; tests capture a `Vec<u8>`.
pub struct Reporter<W: Write> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Reporter::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    /// Report into any writer; lines are flushed as they are written.
    pub fn new(out: W) -> Self {
        Reporter { out }
    }

    /// Hand back the writer, e.g. to inspect captured output.
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn started(&mut self) {
        self.line(format_args!("Starting EloShapes mouse database scraper..."));
    }

    pub fn fetching(&mut self, url: &str) {
        self.line(format_args!("Fetching data from {url}..."));
    }

    pub fn saved(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        self.line(format_args!("Data saved to {name}"));
    }

    pub fn summary(&mut self, records: usize) {
        self.line(format_args!("Successfully scraped data for {records} mice."));
    }

    /// One line naming the failure category and its message.
    pub fn failed(&mut self, err: &ScrapeError) {
        match err.kind() {
            ErrorKind::Transport => self.line(format_args!("Error fetching the URL: {err}")),
            ErrorKind::StructureNotFound => {
                self.line(format_args!("Table not found on the page ({err})."))
            }
            ErrorKind::Extraction => self.line(format_args!("Error processing data: {err}")),
            ErrorKind::Serialization => self.line(format_args!("Error writing output: {err}")),
        }
    }

    pub fn completed(&mut self) {
        self.line(format_args!("Scraping completed."));
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{args}").and_then(|_| self.out.flush()) {
            warn!(error = %e, "console write failed");
        }
    }
}
