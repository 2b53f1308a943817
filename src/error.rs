// src/error.rs

use std::{io, path::PathBuf};

use thiserror::Error;

/// Everything that can stop a run short of writing both artifacts.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("{0}")]
    Fetch(#[from] reqwest::Error),

    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no element matches `{selector}`")]
    TableNotFound { selector: String },

    #[error("table has no <{section}> section")]
    MissingSection { section: &'static str },

    #[error("row {row} has {cells} cells but the header has {columns} columns")]
    RaggedRow {
        row: usize,
        cells: usize,
        columns: usize,
    },

    #[error("writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse grouping used for the console diagnostic and the strict exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    StructureNotFound,
    Extraction,
    Serialization,
}

impl ErrorKind {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Transport => 2,
            ErrorKind::StructureNotFound => 3,
            ErrorKind::Extraction => 4,
            ErrorKind::Serialization => 5,
        }
    }
}

impl ScrapeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::Fetch(_) | ScrapeError::InvalidUrl { .. } => ErrorKind::Transport,
            ScrapeError::TableNotFound { .. } => ErrorKind::StructureNotFound,
            ScrapeError::MissingSection { .. } | ScrapeError::RaggedRow { .. } => {
                ErrorKind::Extraction
            }
            ScrapeError::Write { .. } | ScrapeError::Csv(_) | ScrapeError::Json(_) => {
                ErrorKind::Serialization
            }
        }
    }
}

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;
