// src/fetch.rs

use reqwest::blocking::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::error::{Result, ScrapeError};

/// Build the blocking client with the run's explicit timeout.
pub fn build_client(config: &Config) -> Result<Client> {
    Ok(Client::builder().timeout(config.timeout).build()?)
}

/// One GET, no retries. Any non-2xx status is an error.
#[instrument(level = "debug", skip(client, config), fields(url = %config.url))]
pub fn fetch_page(client: &Client, config: &Config) -> Result<String> {
    let url = Url::parse(&config.url).map_err(|source| ScrapeError::InvalidUrl {
        url: config.url.clone(),
        source,
    })?;

    let mut req = client.get(url);
    for (name, value) in &config.headers {
        req = req.header(name.as_str(), value.as_str());
    }

    let resp = req.send()?.error_for_status()?;
    debug!(status = %resp.status(), "response received");

    let body = resp.text()?;
    debug!(bytes = body.len(), "body read");
    Ok(body)
}
