/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::env;
use std::process;

use chrono::prelude::*;
use log::error;

#[macro_use]
extern crate lazy_static;

mod jsliteral;
mod observation;
mod scrape;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let url = match env::args().nth(1) {
        Some(u) => u,
        None => {
            println!("usage: foreca https://www.foreca.fi/Finland/Helsinki");
            return;
        }
    };

    let (stations, raw) = match scrape::get_observations(&url).await {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let today = Local::now().date_naive();
    let data = match observation::build_observations(&stations, &raw, today) {
        Ok(d) => d,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    print!("{}", observation::generate_report(&data));
}
