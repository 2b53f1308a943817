// src/extract.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::config::TABLE_SELECTOR;
use crate::error::{Result, ScrapeError};

static TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(TABLE_SELECTOR).expect("table selector"));
static THEAD: Lazy<Selector> = Lazy::new(|| Selector::parse("thead").expect("thead selector"));
static TH: Lazy<Selector> = Lazy::new(|| Selector::parse("th").expect("th selector"));
static TBODY: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody").expect("tbody selector"));
static TR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("tr selector"));
static TD: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("td selector"));

/// Header texts and body rows exactly as they appear in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Trimmed `<th>` texts from the header section, in document order.
    pub headers: Vec<String>,
    /// One entry per `<tr>` in the body; `None` marks a cell whose trimmed text is empty.
    pub rows: Vec<Vec<Option<String>>>,
}

/// Locate the first `table.table` element and read its header and body.
#[instrument(level = "debug", skip(html), fields(bytes = html.len()))]
pub fn extract_table(html: &str) -> Result<RawTable> {
    let document = Html::parse_document(html);
    let table = document
        .select(&TABLE)
        .next()
        .ok_or_else(|| ScrapeError::TableNotFound {
            selector: TABLE_SELECTOR.to_string(),
        })?;

    let thead = table
        .select(&THEAD)
        .next()
        .ok_or(ScrapeError::MissingSection { section: "thead" })?;
    let headers: Vec<String> = thead.select(&TH).map(cell_text).collect();

    let tbody = table
        .select(&TBODY)
        .next()
        .ok_or(ScrapeError::MissingSection { section: "tbody" })?;
    let rows: Vec<Vec<Option<String>>> = tbody
        .select(&TR)
        .map(|tr| {
            tr.select(&TD)
                .map(|td| Some(cell_text(td)).filter(|t| !t.is_empty()))
                .collect()
        })
        .collect();

    debug!(columns = headers.len(), rows = rows.len(), "table extracted");
    Ok(RawTable { headers, rows })
}

/// All descendant text, trimmed.
fn cell_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
