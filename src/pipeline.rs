// src/pipeline.rs

use std::io::Write;
use tracing::{info, instrument};

use crate::config::Config;
use crate::error::Result;
use crate::extract::extract_table;
use crate::fetch::{build_client, fetch_page};
use crate::report::Reporter;
use crate::table::Table;
use crate::write::{write_artifacts, Artifacts, RunStamp};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of body rows written to each artifact.
    pub records: usize,
    pub artifacts: Artifacts,
}

/// fetch → extract → tabularize → write, reporting each step. A failure is
/// reported before it is returned; the completion banner is printed either way.
pub fn run<W: Write>(config: &Config, reporter: &mut Reporter<W>) -> Result<RunSummary> {
    reporter.started();
    reporter.fetching(&config.url);

    let result = scrape(config);
    match &result {
        Ok(summary) => {
            reporter.saved(&summary.artifacts.csv);
            reporter.saved(&summary.artifacts.json);
            reporter.summary(summary.records);
        }
        Err(e) => reporter.failed(e),
    }

    reporter.completed();
    result
}

/// Process exit status for a finished run. Failures exit 0 unless `strict`
/// is set, in which case each error kind has its own code.
pub fn exit_code(result: &Result<RunSummary>, strict: bool) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) if strict => e.kind().exit_code(),
        Err(_) => 0,
    }
}

/// Unreported pipeline: one GET, then [`process_document`] with a fresh stamp.
#[instrument(level = "info", skip(config), fields(url = %config.url))]
pub fn scrape(config: &Config) -> Result<RunSummary> {
    let client = build_client(config)?;
    let html = fetch_page(&client, config)?;
    process_document(&html, config, &RunStamp::now())
}

/// Everything after the fetch. Nothing is written unless the table was extracted.
pub fn process_document(html: &str, config: &Config, stamp: &RunStamp) -> Result<RunSummary> {
    let raw = extract_table(html)?;
    let table = Table::from_raw(raw)?;
    let artifacts = write_artifacts(&table, &config.output_dir, &config.file_prefix, stamp)?;

    info!(
        records = table.num_rows(),
        columns = table.num_columns(),
        csv = %artifacts.csv.display(),
        json = %artifacts.json.display(),
        "artifacts written"
    );
    Ok(RunSummary {
        records: table.num_rows(),
        artifacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, ScrapeError};
    use crate::test_support::init_test_logging;
    use anyhow::Result;
    use glob::glob;
    use mockito::Server;
    use regex::Regex;
    use std::{fs, path::Path};
    use tempfile::tempdir;

    const PAGE: &str = r#"<html><body>
<h1>Mouse database</h1>
<table class="table">
  <thead><tr><th>Name</th><th>Generation</th></tr></thead>
  <tbody>
    <tr><td>Alice</td><td>F1</td></tr>
    <tr><td>Bob</td><td></td></tr>
  </tbody>
</table>
</body></html>"#;

    fn config_in(dir: &Path, url: String) -> Config {
        Config {
            url,
            output_dir: dir.to_path_buf(),
            ..Config::default()
        }
    }

    fn artifact_count(dir: &Path) -> usize {
        glob(&format!("{}/eloshapes_mice_*", dir.display()))
            .unwrap()
            .filter_map(|p| p.ok())
            .count()
    }

    #[test]
    fn test_end_to_end_against_local_server() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let mut server = Server::new();
        let page = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(PAGE)
            .create();
        let cfg = config_in(dir.path(), server.url());

        let mut reporter = Reporter::new(Vec::new());
        let result = run(&cfg, &mut reporter);
        page.assert();
        assert_eq!(exit_code(&result, true), 0);
        let summary = result?;
        assert_eq!(summary.records, 2);
        assert_eq!(artifact_count(dir.path()), 2);

        let name = Regex::new(r"^eloshapes_mice_\d{8}_\d{6}\.(csv|json)$")?;
        for p in [&summary.artifacts.csv, &summary.artifacts.json] {
            let file = p.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            assert!(name.is_match(file), "unexpected artifact name {file}");
        }
        assert_eq!(
            summary.artifacts.csv.file_stem(),
            summary.artifacts.json.file_stem()
        );

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary.artifacts.json)?)?;
        assert_eq!(json[1]["Name"], "Bob");
        assert!(json[1]["Generation"].is_null());

        let console = String::from_utf8(reporter.into_inner())?;
        let lines: Vec<&str> = console.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Starting EloShapes mouse database scraper...");
        assert!(lines[2].starts_with("Data saved to eloshapes_mice_"));
        assert!(lines[2].ends_with(".csv"));
        assert!(lines[3].ends_with(".json"));
        assert_eq!(lines[4], "Successfully scraped data for 2 mice.");
        assert_eq!(lines[5], "Scraping completed.");
        Ok(())
    }

    #[test]
    fn test_http_error_writes_nothing() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let mut server = Server::new();
        let gone = server
            .mock("GET", "/")
            .with_status(404)
            .with_body("gone")
            .create();
        let cfg = config_in(dir.path(), server.url());

        let mut reporter = Reporter::new(Vec::new());
        let result = run(&cfg, &mut reporter);
        gone.assert();
        let err = result.as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(artifact_count(dir.path()), 0);

        let console = String::from_utf8(reporter.into_inner())?;
        let lines: Vec<&str> = console.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("Error fetching the URL:"));
        assert_eq!(lines[3], "Scraping completed.");

        assert_eq!(exit_code(&result, false), 0);
        assert_eq!(exit_code(&result, true), 2);
        Ok(())
    }

    #[test]
    fn test_page_without_table_is_reported_and_writes_nothing() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let mut server = Server::new();
        let page = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><body><p>x</p></body></html>")
            .create();
        let cfg = config_in(dir.path(), server.url());

        let mut reporter = Reporter::new(Vec::new());
        let result = run(&cfg, &mut reporter);
        page.assert();
        let err = result.as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructureNotFound);
        assert_eq!(artifact_count(dir.path()), 0);

        let console = String::from_utf8(reporter.into_inner())?;
        let lines: Vec<&str> = console.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Starting EloShapes mouse database scraper...".to_string(),
                format!("Fetching data from {}...", server.url()),
                "Table not found on the page (no element matches `table.table`).".to_string(),
                "Scraping completed.".to_string(),
            ]
        );

        assert_eq!(exit_code(&result, false), 0);
        assert_eq!(exit_code(&result, true), 3);
        Ok(())
    }

    #[test]
    fn test_missing_table_writes_nothing() -> Result<()> {
        let dir = tempdir()?;
        let cfg = config_in(dir.path(), "http://unused.invalid/".into());
        let html = "<html><body><p>maintenance</p></body></html>";

        let err = process_document(html, &cfg, &RunStamp::now()).unwrap_err();
        assert!(matches!(err, ScrapeError::TableNotFound { .. }));
        assert_eq!(artifact_count(dir.path()), 0);
        Ok(())
    }

    #[test]
    fn test_ragged_table_writes_nothing() -> Result<()> {
        let dir = tempdir()?;
        let cfg = config_in(dir.path(), "http://unused.invalid/".into());
        let html = r#"<table class="table"><thead><tr><th>A</th></tr></thead>
            <tbody><tr><td>1</td><td>2</td></tr></tbody></table>"#;

        let err = process_document(html, &cfg, &RunStamp::now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extraction);
        assert_eq!(artifact_count(dir.path()), 0);
        Ok(())
    }
}
