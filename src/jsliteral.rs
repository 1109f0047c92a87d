/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Conversion of loosely-quoted JavaScript object literals into strict
//! JSON, the way foreca.fi embeds them in its city pages: keys unquoted
//! or single-quoted, string values single-quoted, numbers and other bare
//! tokens unquoted.
//!
//! The three passes assume the source data keeps this shape. Values with
//! colons or quotes outside it can get mis-quoted; the strict JSON parse
//! in the caller then fails instead of accepting corrupt data.

use regex::Regex;

lazy_static! {
    static ref RE_KEY: Regex = Regex::new(r#"(['"]?)(\w+)(['"]?):"#).unwrap();
    static ref RE_SINGLE_QUOTED: Regex = Regex::new(r": ?'([^']*)'").unwrap();
    static ref RE_BARE: Regex = Regex::new(r": ?([\w.:+-]+)").unwrap();
}

/// Double-quotes every key, whether it was bare, single-quoted or
/// already double-quoted.
fn quote_keys(literal: &str) -> String {
    RE_KEY.replace_all(literal, "\"$2\":").to_string()
}

/// Rewrites single-quoted values as double-quoted ones.
fn quote_single_quoted_values(literal: &str) -> String {
    RE_SINGLE_QUOTED.replace_all(literal, ": \"$1\"").to_string()
}

/// Wraps remaining bare values (numbers, identifiers, null, tokens with
/// dots or signs) in double quotes. Values quoted by the earlier passes
/// start with `"` and never match.
fn quote_bare_values(literal: &str) -> String {
    RE_BARE.replace_all(literal, ": \"$1\"").to_string()
}

/// Turns one loosely-quoted object/array literal into strict JSON text.
/// Every leaf value comes out as a string; numeric literals become quoted
/// strings, which downstream code parses back if it needs numbers.
pub fn normalize(literal: &str) -> String {
    let quoted_keys = quote_keys(literal);
    let quoted_values = quote_single_quoted_values(&quoted_keys);
    quote_bare_values(&quoted_values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys() {
        assert_eq!(quote_keys("{id: 1}"), "{\"id\": 1}");
        assert_eq!(quote_keys("{'id': 1}"), "{\"id\": 1}");
        assert_eq!(quote_keys("{\"id\": 1}"), "{\"id\": 1}");
        assert_eq!(quote_keys("{100971: {temp: 1}}"), "{\"100971\": {\"temp\": 1}}");
    }

    #[test]
    fn single_quoted_values() {
        assert_eq!(
            quote_single_quoted_values("{\"n\": 'Helsinki Kaisaniemi'}"),
            "{\"n\": \"Helsinki Kaisaniemi\"}"
        );
        assert_eq!(quote_single_quoted_values("{\"n\": ''}"), "{\"n\": \"\"}");
    }

    #[test]
    fn bare_values() {
        assert_eq!(quote_bare_values("{\"temp\": -1.3}"), "{\"temp\": \"-1.3\"}");
        assert_eq!(quote_bare_values("{\"snow\": null}"), "{\"snow\": \"null\"}");
        // Already double-quoted values stay untouched
        assert_eq!(quote_bare_values("{\"n\": \"Espoo\"}"), "{\"n\": \"Espoo\"}");
    }

    #[test]
    fn normalize_mixed_literal() {
        let parsed: serde_json::Value =
            serde_json::from_str(&normalize("{id: 123, n: 'Helsinki'}")).unwrap();
        assert_eq!(parsed, serde_json::json!({"id": "123", "n": "Helsinki"}));
    }

    #[test]
    fn normalize_is_idempotent_on_strict_json() {
        assert_eq!(normalize("{\"a\": \"1\"}"), "{\"a\": \"1\"}");

        let once = normalize("[{id: 1, n: 'Vantaa'}]");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_station_array() {
        let parsed: serde_json::Value = serde_json::from_str(&normalize(
            "[{id: 100971, n: 'Helsinki Kaisaniemi'}, {id: 101004, n: 'Espoo Tapiola'}]",
        ))
        .unwrap();
        assert_eq!(parsed[0]["id"], "100971");
        assert_eq!(parsed[1]["n"], "Espoo Tapiola");
    }

    #[test]
    fn colon_in_value_fails_strict_parse() {
        // '12:30' breaks the assumed shape: the key pass eats "12:" and
        // the result must be rejected by the JSON parser, not accepted.
        let mangled = normalize("{time: '12:30'}");
        assert!(serde_json::from_str::<serde_json::Value>(&mangled).is_err());
    }
}
