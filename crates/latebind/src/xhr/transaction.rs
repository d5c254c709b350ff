// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-request data: request line, headers, body parameters and response.

/// Text map with unique keys. Keeps first-insertion order; a repeated key
/// overwrites the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: Vec<(String, String)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

/// Parse a form-encoded body `k1=v1&k2=v2` into `into`.
///
/// Empty `&`/`=` separated pieces are skipped. The first remaining piece of a
/// pair is the key and the second the value; a key without a value maps to
/// the empty string. Returns the number of pairs read.
pub fn parse_form_body(body: &str, into: &mut Dictionary) -> usize {
    let mut count = 0;
    for pair in body.split('&').filter(|p| !p.is_empty()) {
        let mut pieces = pair.split('=').filter(|p| !p.is_empty());
        if let Some(key) = pieces.next() {
            into.insert(key, pieces.next().unwrap_or(""));
            count += 1;
        }
    }
    count
}

/// State of one request/response exchange. Replaced on every `open`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTransaction {
    pub method: String,
    pub url: String,
    pub is_async: bool,
    pub user: String,
    pub password: String,
    pub request_headers: Dictionary,
    /// Parameters parsed from the request body
    pub request_params: Dictionary,
    pub response_headers: Dictionary,
    /// Fields of the response body
    pub response_fields: Dictionary,
}

impl RequestTransaction {
    pub fn new(method: &str, url: &str, is_async: bool, user: &str, password: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            is_async,
            user: user.to_string(),
            password: password.to_string(),
            ..Self::default()
        }
    }
}
