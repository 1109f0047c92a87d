/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Fetching a foreca.fi city page and digging the station list and the
//! current observations out of its inline scripts.

use std::time::Duration;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::jsliteral;

lazy_static! {
    static ref HTTP_CLIENT: reqwest::Client = reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (X11; Fedora; Linux x86_64; rv:84.0) Gecko/20100101 Firefox/84.0")
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();
    static ref RE_STATIONS: Regex = Regex::new(r"(?s)var stations = (.*?);").unwrap();
    static ref RE_OBSERVATIONS: Regex = Regex::new(r"(?s)var observations = (.*?);").unwrap();
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to retrieve {url}: {source}")]
    Fetch {
        url: String,
        source: reqwest::Error,
    },
    #[error("failed to retrieve {url}: status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("no \"var {variable}\" assignment found in page")]
    Extraction { variable: &'static str },
    #[error("normalized {variable} literal is not valid JSON: {source}")]
    Json {
        variable: &'static str,
        source: serde_json::Error,
    },
}

async fn fetch_page(url: &str) -> Result<String, ScrapeError> {
    let resp = HTTP_CLIENT
        .get(url)
        .send()
        .await
        .map_err(|e| ScrapeError::Fetch {
            url: url.to_owned(),
            source: e,
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_owned(),
            status,
        });
    }

    resp.text().await.map_err(|e| ScrapeError::Fetch {
        url: url.to_owned(),
        source: e,
    })
}

fn extract_literal(page: &str, re: &Regex, variable: &'static str) -> Result<Value, ScrapeError> {
    let caps = re
        .captures(page)
        .ok_or(ScrapeError::Extraction { variable })?;
    let strict = jsliteral::normalize(&caps[1]);

    serde_json::from_str(&strict).map_err(|e| ScrapeError::Json {
        variable,
        source: e,
    })
}

/// Pulls the two embedded assignments out of the page text and parses
/// them into generic JSON values: the station array and the observation
/// mapping keyed by station id.
pub fn parse_page(page: &str) -> Result<(Value, Value), ScrapeError> {
    let stations = extract_literal(page, &RE_STATIONS, "stations")?;
    let observations = extract_literal(page, &RE_OBSERVATIONS, "observations")?;

    Ok((stations, observations))
}

pub async fn get_observations(url: &str) -> Result<(Value, Value), ScrapeError> {
    let page = fetch_page(url).await?;
    parse_page(&page)
}
