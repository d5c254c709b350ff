// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transport collaborators performing the work behind `send`.

use crate::xhr::request::Request;

/// Executes a sent request.
///
/// Called by `send` after the body has been parsed. Returning `true` means
/// the request completed synchronously and `send` moves it to `DONE`.
/// Returning `false` leaves the request in flight; the transport later
/// continues it through [`Request::headers_received`], [`Request::loading`]
/// and [`Request::complete`] using [`Request::transaction_token`].
pub trait Transport: Send + Sync + 'static {
    fn process_request(&self, request: &Request) -> bool {
        let _ = request;
        true
    }
}

/// Transport that does nothing and reports immediate completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransport;

impl Transport for NullTransport {}

/// Loopback transport: answers every request with its own parameters.
///
/// Body parameters become response fields, request headers become response
/// headers, and the status is `200 OK`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoTransport;

impl Transport for EchoTransport {
    fn process_request(&self, request: &Request) -> bool {
        let token = request.transaction_token();
        let (params, headers) = request.with_transaction(|tx| {
            (tx.request_params.clone(), tx.request_headers.clone())
        });
        for (name, value) in headers.iter() {
            request.set_response_header(token, name, value);
        }
        for (key, value) in params.iter() {
            request.set_response_field(token, key, value);
        }
        request.set_status(token, 200, "OK");
        true
    }
}
