/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Building normalized per-station observation records from the parsed
//! station list and observation mapping, and rendering them as text.

use std::collections::HashMap;

use chrono::prelude::*;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

lazy_static! {
    static ref RE_DIGITS: Regex = Regex::new(r"[0-9]+").unwrap();
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("observation for unknown station id {0}")]
    UnknownStation(String),
    #[error("station entry without a string id and name")]
    MalformedStation,
    #[error("no day/month or hour/minute digits in {field} for station {station}")]
    MissingDigits {
        station: String,
        field: &'static str,
    },
    #[error("invalid observation time {day}.{month}.{year} {hour}.{minute} for station {station}")]
    InvalidTimestamp {
        station: String,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    },
}

/// One station's current observation. Fields absent from the source
/// record are `None`; values are kept as the raw strings from the page,
/// no unit conversion or numeric coercion.
#[derive(Debug)]
pub struct Observation {
    pub station: String,
    pub timestamp: NaiveDateTime,
    pub temperature: Option<String>,
    pub feels_like: Option<String>,
    pub windspeed: Option<String>,
    pub windalt: Option<String>,
    pub wx: Option<String>,
    pub pressure: Option<String>,
    pub humidity: Option<String>,
    pub dewpoint: Option<String>,
    pub visibility: Option<String>,
    pub visibility_unit: Option<String>,
    pub snow_depth: Option<String>,
}

/// Observations carry only a day and a month. The year is taken from the
/// current date, stepping back one year only for a December observation
/// seen in January. Nothing else is handled; older stale data would get
/// the current year.
fn infer_year(today: NaiveDate, obs_month: u32) -> i32 {
    if obs_month == 12 && today.month() == 1 {
        today.year() - 1
    } else {
        today.year()
    }
}

/// First two digit runs in the given field of a raw record, e.g. day and
/// month from "ma 19.2." or hour and minute from "klo 14.40".
fn two_digit_runs(
    record: &Value,
    station: &str,
    field: &'static str,
) -> Result<(u32, u32), BuildError> {
    let missing = || BuildError::MissingDigits {
        station: station.to_owned(),
        field,
    };

    let text = record[field].as_str().ok_or_else(missing)?;
    let mut runs = RE_DIGITS.find_iter(text);
    let first = runs.next().ok_or_else(missing)?;
    let second = runs.next().ok_or_else(missing)?;

    // Runs of at most a few digits, cannot overflow u32
    Ok((
        first.as_str().parse().map_err(|_| missing())?,
        second.as_str().parse().map_err(|_| missing())?,
    ))
}

fn field(record: &Value, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// Builds one record per entry of the raw observation mapping, in the
/// mapping's own order. Any unknown station id or broken date aborts the
/// whole build; there is no per-record skipping.
pub fn build_observations(
    stations: &Value,
    raw: &Value,
    today: NaiveDate,
) -> Result<Vec<Observation>, BuildError> {
    let mut names: HashMap<&str, &str> = HashMap::new();
    if let Some(list) = stations.as_array() {
        for s in list {
            match (s["id"].as_str(), s["n"].as_str()) {
                (Some(id), Some(n)) => {
                    names.insert(id, n);
                }
                _ => {
                    return Err(BuildError::MalformedStation);
                }
            }
        }
    }

    let mut data = Vec::new();

    if let Some(map) = raw.as_object() {
        for (id, o) in map {
            let station = names
                .get(id.as_str())
                .ok_or_else(|| BuildError::UnknownStation(id.clone()))?
                .to_string();

            let (day, month) = two_digit_runs(o, &station, "date")?;
            let (hour, minute) = two_digit_runs(o, &station, "time")?;
            let year = infer_year(today, month);

            let timestamp = NaiveDate::from_ymd_opt(year, month, day)
                .and_then(|d| d.and_hms_opt(hour, minute, 0))
                .ok_or_else(|| BuildError::InvalidTimestamp {
                    station: station.clone(),
                    year,
                    month,
                    day,
                    hour,
                    minute,
                })?;

            // o["snow"] is only an object when there is snow; "null"
            // (quoted by the normalizer) and absence both mean no data
            let snow_depth = o
                .get("snow")
                .and_then(|s| s.get("depth"))
                .and_then(Value::as_str)
                .map(str::to_owned);

            data.push(Observation {
                station,
                timestamp,
                temperature: field(o, "temp"),
                feels_like: field(o, "flike"),
                windspeed: field(o, "winds"),
                windalt: field(o, "windalt"),
                wx: field(o, "wx"),
                pressure: field(o, "pres"),
                humidity: field(o, "rhum"),
                dewpoint: field(o, "dewp"),
                visibility: field(o, "vis"),
                visibility_unit: field(o, "visunit"),
                snow_depth,
            });
        }
    }

    Ok(data)
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

pub fn generate_report(data: &[Observation]) -> String {
    let mut report = String::new();

    for o in data {
        report.push_str(&format!(
            "\n{}\n  \
             time:         {}\n  \
             weathertype:  {}\n  \
             temperature:  {}°C\n  \
             feels_like:   {}°C\n  \
             wind:         {} {}\n  \
             barometer:    {} hPa\n  \
             dewpoint:     {}°C\n  \
             humidity:     {}%\n  \
             visibility:   {} {}\n  \
             snow_depth:   {} cm\n",
            o.station,
            o.timestamp,
            opt(&o.wx),
            opt(&o.temperature),
            opt(&o.feels_like),
            opt(&o.windspeed),
            opt(&o.windalt),
            opt(&o.pressure),
            opt(&o.dewpoint),
            opt(&o.humidity),
            opt(&o.visibility),
            o.visibility_unit.as_deref().unwrap_or("km"),
            opt(&o.snow_depth),
        ));
    }

    report
}
