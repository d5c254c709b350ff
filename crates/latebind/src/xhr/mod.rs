// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pooled request objects built on the dispatch engine.
//!
//! # Overview
//!
//! - [`RequestFactory`] is constructed by the host; calling it yields a
//!   [`Request`] from its pool.
//! - A [`Request`] exposes `open` / `send` / `abort` / header accessors and
//!   the `readyState`, `status`, `responseText`... attributes, and fires
//!   `onreadystatechange` on every state transition.
//! - A [`Transport`] performs the work behind `send`, either synchronously or
//!   by continuing the request later with its [`TransactionToken`].
//!
//! # Response formats
//!
//! | Url                         | `responseText`        |
//! |-----------------------------|-----------------------|
//! | carries `callback=<name>`   | `<name>({k:'v',...});` |
//! | anything else               | `k=v\n` lines          |

mod factory;
pub mod format;
mod request;
mod state;
mod transaction;
mod transport;

pub use factory::{Factory, RequestFactory, FACTORY_CLASS_NAME};
pub use request::{Request, TransactionToken, XmlHttpRequest, CLASS_NAME};
pub use state::ReadyState;
pub use transaction::{parse_form_body, Dictionary, RequestTransaction};
pub use transport::{EchoTransport, NullTransport, Transport};

#[cfg(test)]
mod tests;
