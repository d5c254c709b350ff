// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Response text formats.
//!
//! - text: `k=v` lines, each terminated by the separator
//! - JSON-like: `{k:'v',k2:[...]}`
//! - JSONP: `<callback>(<json>);`

use crate::config::LINE_SEPARATOR;
use crate::xhr::transaction::Dictionary;
use std::fmt::Write;

/// `k=v<sep>` for every entry.
pub fn to_text(dict: &Dictionary, separator: &str) -> String {
    let mut out = String::new();
    for (key, value) in dict.iter() {
        let _ = write!(out, "{}={}{}", key, value, separator);
    }
    out
}

/// `k=v\n` for every entry.
pub fn to_lines(dict: &Dictionary) -> String {
    to_text(dict, LINE_SEPARATOR)
}

/// Escape single quotes for a single-quoted script string.
pub fn escape_single_quotes(value: &str) -> String {
    value.replace('\'', "\\'")
}

/// Serialize as a script object literal.
///
/// Values that start with `[` or `{` are emitted raw; everything else is
/// single-quoted with embedded quotes escaped.
pub fn to_json(dict: &Dictionary) -> String {
    let fields: Vec<String> = dict
        .iter()
        .map(|(key, value)| {
            if value.starts_with('[') || value.starts_with('{') {
                format!("{}:{}", key, value)
            } else {
                format!("{}:'{}'", key, escape_single_quotes(value))
            }
        })
        .collect();
    format!("{{{}}}", fields.join(","))
}

/// Callback name carried by `url`: the text between `token` and the next `&`.
///
/// `None` when the token is empty, absent from the url, or names nothing.
pub fn callback_name<'a>(url: &'a str, token: &str) -> Option<&'a str> {
    if token.is_empty() {
        return None;
    }
    let start = url.find(token)? + token.len();
    let rest = &url[start..];
    let name = rest.find('&').map_or(rest, |end| &rest[..end]);
    (!name.is_empty()).then_some(name)
}

/// `name(json);`
pub fn wrap_jsonp(name: &str, json: &str) -> String {
    format!("{}({});", name, json)
}

/// Response text for a request to `url`: JSONP when the url carries the
/// callback token, `k=v` lines otherwise.
pub fn response_text(url: &str, token: &str, fields: &Dictionary) -> String {
    match callback_name(url, token) {
        Some(name) => wrap_jsonp(name, &to_json(fields)),
        None => to_lines(fields),
    }
}
