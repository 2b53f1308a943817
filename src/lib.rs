// src/lib.rs

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod table;
pub mod write;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{ErrorKind, ScrapeError};
pub use pipeline::{process_document, run, scrape, RunSummary};
pub use report::Reporter;
pub use table::Table;
