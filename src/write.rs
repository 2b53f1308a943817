// src/write.rs

use chrono::{Local, NaiveDateTime};
use csv::WriterBuilder;
use std::{
    fmt, fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, warn};

use crate::error::{Result, ScrapeError};
use crate::table::Table;

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Local wall-clock second of a run, e.g. `20240131_235959`. Taken once and
/// shared by both artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStamp(String);

impl RunStamp {
    /// The current local time, to the second.
    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        RunStamp(dt.format(STAMP_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The CSV/JSON pair written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// `<dir>/<prefix>_<stamp>.csv`
    pub csv: PathBuf,
    /// `<dir>/<prefix>_<stamp>.json`
    pub json: PathBuf,
}

/// Both artifact paths for one stamp; the files share a stem.
pub fn artifact_paths(dir: &Path, prefix: &str, stamp: &RunStamp) -> Artifacts {
    Artifacts {
        csv: dir.join(format!("{prefix}_{stamp}.csv")),
        json: dir.join(format!("{prefix}_{stamp}.json")),
    }
}

/// Write `<prefix>_<stamp>.csv` then `<prefix>_<stamp>.json` into `dir`.
#[instrument(level = "debug", skip(table), fields(rows = table.num_rows()))]
pub fn write_artifacts(
    table: &Table,
    dir: &Path,
    prefix: &str,
    stamp: &RunStamp,
) -> Result<Artifacts> {
    let paths = artifact_paths(dir, prefix, stamp);
    write_atomic(&paths.csv, |w| write_csv(table, w))?;
    write_atomic(&paths.json, |w| write_json(table, w))?;
    Ok(paths)
}

/// Header line of column names, then one line per record. Missing cells are empty fields.
pub fn write_csv<W: Write>(table: &Table, w: W) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(w);
    writer.write_record(table.column_names())?;
    for row in table.rows() {
        writer.write_record(row.into_iter().map(|v| v.unwrap_or("")))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Array of `{column: value}` objects, missing cells as `null`.
pub fn write_json<W: Write>(table: &Table, w: W) -> Result<()> {
    serde_json::to_writer(w, table)?;
    Ok(())
}

/// Fill a dot-prefixed temp file next to `path`, then rename over it.
fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<fs::File>) -> Result<()>,
{
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

    let result = (|| {
        let file = fs::File::create(&tmp_path).map_err(|source| ScrapeError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        fill(&mut out)?;
        out.flush().map_err(|source| ScrapeError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, path).map_err(|source| ScrapeError::Write {
            path: path.to_path_buf(),
            source,
        })
    })();

    match result {
        Ok(()) => {
            debug!(path = %path.display(), "artifact written");
            Ok(())
        }
        Err(e) => {
            if let Err(rm) = fs::remove_file(&tmp_path) {
                warn!(path = %tmp_path.display(), error = %rm, "could not remove temp file");
            }
            Err(e)
        }
    }
}
