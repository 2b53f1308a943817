// src/table.rs

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::HashSet;
use tracing::{instrument, warn};

use crate::error::{Result, ScrapeError};
use crate::extract::RawTable;

/// A named column of text cells; `None` is the missing-value marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header text, made unique within the table.
    pub name: String,
    /// One cell per record, in record order.
    pub values: Vec<Option<String>>,
}

/// Ordered columns of equal length. No type inference: every cell stays text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    /// Pivot extracted rows into columns.
    ///
    /// - Repeated header names get a positional suffix (`Name`, `Name_2`, ...).
    /// - Rows shorter than the header are padded with missing cells.
    /// - Rows longer than the header are rejected.
    #[instrument(level = "debug", skip(raw), fields(rows = raw.rows.len()))]
    pub fn from_raw(raw: RawTable) -> Result<Self> {
        let names = unique_names(&raw.headers);
        let width = names.len();

        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::with_capacity(raw.rows.len()),
            })
            .collect();

        let num_rows = raw.rows.len();
        for (i, row) in raw.rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(ScrapeError::RaggedRow {
                    row: i + 1,
                    cells: row.len(),
                    columns: width,
                });
            }
            if row.len() < width {
                warn!(
                    row = i + 1,
                    cells = row.len(),
                    columns = width,
                    "short row padded with missing cells"
                );
            }
            let mut cells = row.into_iter();
            for col in columns.iter_mut() {
                col.values.push(cells.next().flatten());
            }
        }

        Ok(Table { columns, num_rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Text of one cell; `None` for a missing cell or out-of-range index.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.columns.get(col)?.values.get(row)?.as_deref()
    }

    /// Cells of one record, in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.columns
            .iter()
            .map(move |c| c.values.get(row).and_then(|v| v.as_deref()))
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<Option<&str>>> + '_ {
        (0..self.num_rows).map(move |r| self.row(r).collect())
    }
}

/// Serializes as an array of per-record objects, keys in column order.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.num_rows))?;
        for r in 0..self.num_rows {
            seq.serialize_element(&Record { table: self, row: r })?;
        }
        seq.end()
    }
}

struct Record<'a> {
    table: &'a Table,
    row: usize,
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.table.num_columns()))?;
        for (col, value) in self.table.columns.iter().zip(self.table.row(self.row)) {
            map.serialize_entry(&col.name, &value)?;
        }
        map.end()
    }
}

fn unique_names(headers: &[String]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut out = Vec::with_capacity(headers.len());

    for header in headers {
        if taken.insert(header.clone()) {
            out.push(header.clone());
            continue;
        }
        let mut n = 2;
        let renamed = loop {
            let candidate = format!("{header}_{n}");
            if !taken.contains(&candidate) && !headers.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        warn!(original = %header, renamed = %renamed, "duplicate column renamed");
        taken.insert(renamed.clone());
        out.push(renamed);
    }
    out
}
