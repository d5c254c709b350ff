// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The request object: a late-bound `XMLHttpRequest` look-alike.
//!
//! # State machine
//!
//! ```text
//! open ──► OPENED ──send──► [send marker] ──transport──► DONE
//!            │                    │
//!            │                    └─► HEADERS_RECEIVED ─► LOADING ─► DONE
//!            │                        (transport continuations)
//! abort: in flight ─► DONE (notified) ─► UNSENT (silent)
//! ```
//!
//! Every persisted transition and the send marker fire `onreadystatechange`
//! with the request itself as sole argument. No lock is held while the
//! handler runs, so handlers may call back into the request.

use crate::config::{RuntimeConfig, LINE_SEPARATOR};
use crate::dispatch::{
    Dispatch, DispatchError, DispatchFlags, DispatchResult, FromVariant, MemberId, Variant,
};
use crate::object::{Class, ClassBuilder, Invocable, LateBound, ObjectRef, Recyclable};
use crate::xhr::format;
use crate::xhr::state::{ReadyState, StateChange};
use crate::xhr::transaction::{parse_form_body, RequestTransaction};
use crate::xhr::transport::{NullTransport, Transport};
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};

/// Class name reported by request objects.
pub const CLASS_NAME: &str = "XMLHttpRequest";

const ON_READY_STATE_CHANGE: &str = "onreadystatechange";
const STATUS: &str = "status";
const STATUS_TEXT: &str = "statusText";
const RESPONSE_BODY: &str = "responseBody";

/// Counted handle to a request.
pub type Request = ObjectRef<XmlHttpRequest>;

/// Identifies one transaction of a request.
///
/// Captured by the transport at `send`; `abort` and a new `open` make it
/// stale, after which every continuation keyed by it is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionToken(u64);

struct RequestState {
    ready_state: ReadyState,
    transaction: RequestTransaction,
    generation: u64,
}

/// Request object state. Hosts hold it as a [`Request`].
pub struct XmlHttpRequest {
    core: LateBound<Request>,
    state: Mutex<RequestState>,
    transport: Arc<dyn Transport>,
    jsonp_token: String,
    default_status: i64,
}

fn request_class() -> &'static Class<Request> {
    static CLASS: OnceLock<Class<Request>> = OnceLock::new();
    CLASS.get_or_init(|| {
        ClassBuilder::<Request>::new(CLASS_NAME)
            .method("abort", |this: &Request| {
                this.abort();
                Ok(())
            })
            .method(
                "open",
                |this: &Request,
                 method: String,
                 url: String,
                 is_async: bool,
                 user: String,
                 password: String| {
                    this.open(&method, &url, is_async, &user, &password);
                    Ok(())
                },
            )
            .method("send", |this: &Request, body: String| this.send(&body))
            .method(
                "setRequestHeader",
                |this: &Request, name: String, value: String| {
                    this.set_request_header(&name, &value);
                    Ok(())
                },
            )
            .method("getResponseHeader", |this: &Request, name: String| {
                Ok(this.get_response_header(&name))
            })
            .method("getAllResponseHeaders", |this: &Request| {
                Ok(this.get_all_response_headers())
            })
            .property("timeout")
            .property("withCredentials")
            .property("responseType")
            .property("upload")
            .reader(RESPONSE_BODY, |this: &Request| Ok(this.response_body()))
            .reader("responseText", |this: &Request| Ok(this.response_text()))
            .reader("responseXML", |_: &Request| Ok(Variant::Empty))
            .reader("readyState", |this: &Request| Ok(this.ready_state().code()))
            .reader(STATUS, |this: &Request| Ok(this.status()))
            .reader(STATUS_TEXT, |this: &Request| Ok(this.status_text()))
            .writer(ON_READY_STATE_CHANGE, |this: &Request, handler: Variant| {
                this.set_onreadystatechange(handler);
                Ok(())
            })
            .build()
    })
}

impl XmlHttpRequest {
    /// New request (state `UNSENT`) executed by `transport`.
    pub fn new(transport: Arc<dyn Transport>, config: &RuntimeConfig) -> Self {
        Self {
            core: request_class().instantiate(),
            state: Mutex::new(RequestState {
                ready_state: ReadyState::Unsent,
                transaction: RequestTransaction::default(),
                generation: 0,
            }),
            transport,
            jsonp_token: config.jsonp_token.clone(),
            default_status: config.default_status,
        }
    }

    /// Unpooled request with the null transport and default configuration.
    pub fn create() -> Request {
        ObjectRef::new(Self::new(Arc::new(NullTransport), &RuntimeConfig::default()))
    }

    pub fn ready_state(&self) -> ReadyState {
        self.state.lock().ready_state
    }

    /// Stored status, or the default status while none is set.
    ///
    /// The slot is coerced like any integer argument, so a status written
    /// by the host as text (`"404"`) reads back as a number.
    pub fn status(&self) -> i64 {
        match i64::from_variant(&self.core.value(STATUS)).unwrap_or(0) {
            0 => self.default_status,
            code => code,
        }
    }

    pub fn status_text(&self) -> String {
        self.core.value(STATUS_TEXT).to_string()
    }

    pub fn response_body(&self) -> Variant {
        self.core.value(RESPONSE_BODY)
    }

    /// Response fields as text: JSONP when the url carries the callback
    /// token, `k=v` lines otherwise.
    pub fn response_text(&self) -> String {
        let st = self.state.lock();
        format::response_text(
            &st.transaction.url,
            &self.jsonp_token,
            &st.transaction.response_fields,
        )
    }

    pub fn get_response_header(&self, name: &str) -> String {
        self.state
            .lock()
            .transaction
            .response_headers
            .get(name)
            .unwrap_or_default()
            .to_string()
    }

    /// All response headers as `name=value` lines.
    pub fn get_all_response_headers(&self) -> String {
        format::to_text(&self.state.lock().transaction.response_headers, LINE_SEPARATOR)
    }

    pub fn set_request_header(&self, name: &str, value: &str) {
        self.state
            .lock()
            .transaction
            .request_headers
            .insert(name, value);
    }

    /// Install (or clear, with `Empty`) the state-change handler.
    pub fn set_onreadystatechange(&self, handler: Variant) {
        self.core.store(ON_READY_STATE_CHANGE, handler);
    }

    /// Late-bound attribute value, bypassing readers.
    pub fn attribute(&self, name: &str) -> Variant {
        self.core.value(name)
    }

    pub fn transaction_token(&self) -> TransactionToken {
        TransactionToken(self.state.lock().generation)
    }

    /// Run `f` over the current transaction.
    pub fn with_transaction<T>(&self, f: impl FnOnce(&RequestTransaction) -> T) -> T {
        f(&self.state.lock().transaction)
    }

    pub fn url(&self) -> String {
        self.with_transaction(|tx| tx.url.clone())
    }

    /// Body parameter parsed at `send`.
    pub fn request_param(&self, key: &str) -> Option<String> {
        self.with_transaction(|tx| tx.request_params.get(key).map(str::to_string))
    }

    pub fn request_header(&self, name: &str) -> Option<String> {
        self.with_transaction(|tx| tx.request_headers.get(name).map(str::to_string))
    }

    fn modify_current<T>(
        &self,
        token: TransactionToken,
        f: impl FnOnce(&mut RequestTransaction) -> T,
    ) -> Option<T> {
        let mut st = self.state.lock();
        (st.generation == token.0).then(|| f(&mut st.transaction))
    }

    fn is_current(&self, token: TransactionToken) -> bool {
        self.state.lock().generation == token.0
    }

    /// Set a response header. Returns false for a stale token.
    pub fn set_response_header(&self, token: TransactionToken, name: &str, value: &str) -> bool {
        self.modify_current(token, |tx| tx.response_headers.insert(name, value))
            .is_some()
    }

    /// Set a response body field. Returns false for a stale token.
    pub fn set_response_field(&self, token: TransactionToken, key: &str, value: &str) -> bool {
        self.modify_current(token, |tx| tx.response_fields.insert(key, value))
            .is_some()
    }

    /// Set status code and text. Returns false for a stale token.
    pub fn set_status(&self, token: TransactionToken, code: i64, text: &str) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.core.store(STATUS, code);
        self.core.store(STATUS_TEXT, text);
        true
    }

    /// Set the raw response body. Returns false for a stale token.
    pub fn set_response_body(&self, token: TransactionToken, body: impl Into<Variant>) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.core.store(RESPONSE_BODY, body)
    }
}

impl ObjectRef<XmlHttpRequest> {
    /// Start a new transaction.
    ///
    /// Discards the previous transaction and response, keeps the
    /// state-change handler, and moves to `OPENED`.
    pub fn open(&self, method: &str, url: &str, is_async: bool, user: &str, password: &str) {
        {
            let mut st = self.state.lock();
            st.transaction = RequestTransaction::new(method, url, is_async, user, password);
            st.generation += 1;
        }
        self.core.with_attributes(|attrs| {
            let handler = attrs
                .value(MemberId::of(ON_READY_STATE_CHANGE))
                .cloned()
                .unwrap_or_default();
            attrs.clear();
            attrs.store(MemberId::of(ON_READY_STATE_CHANGE), handler);
        });
        log::debug!("{} open {} {} (async={})", CLASS_NAME, method, url, is_async);
        self.advance(StateChange::Notify(ReadyState::Opened));
    }

    /// Send the request with a form-encoded `body`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::InvalidState`] unless the request is `OPENED`.
    pub fn send(&self, body: &str) -> DispatchResult<()> {
        let (token, is_async) = {
            let mut st = self.state.lock();
            if st.ready_state != ReadyState::Opened {
                return Err(DispatchError::invalid_state(format!(
                    "send requires readyState OPENED, found {}",
                    st.ready_state
                )));
            }
            parse_form_body(body, &mut st.transaction.request_params);
            (TransactionToken(st.generation), st.transaction.is_async)
        };

        if is_async {
            self.advance(StateChange::SendStarted);
            // the handler may have aborted or re-opened
            if !self.is_current(token) {
                log::debug!("{}: transaction replaced during send", CLASS_NAME);
                return Ok(());
            }
        }
        if self.transport.process_request(self) {
            self.complete(token);
        }
        Ok(())
    }

    /// Cancel the request. Safe to call in any state, any number of times.
    pub fn abort(&self) {
        let was_in_flight = {
            let mut st = self.state.lock();
            st.generation += 1;
            st.ready_state.is_in_flight()
        };
        if was_in_flight {
            self.advance(StateChange::Notify(ReadyState::Done));
        }
        self.advance(StateChange::Silent(ReadyState::Unsent));
    }

    /// Transport continuation: response headers arrived.
    pub fn headers_received(&self, token: TransactionToken) -> bool {
        self.continue_to(token, ReadyState::HeadersReceived)
    }

    /// Transport continuation: response body is loading.
    pub fn loading(&self, token: TransactionToken) -> bool {
        self.continue_to(token, ReadyState::Loading)
    }

    /// Transport continuation: the request finished.
    pub fn complete(&self, token: TransactionToken) -> bool {
        self.continue_to(token, ReadyState::Done)
    }

    fn continue_to(&self, token: TransactionToken, target: ReadyState) -> bool {
        {
            let mut st = self.state.lock();
            let current = st.ready_state;
            if st.generation != token.0 || !current.is_in_flight() || target <= current {
                log::debug!(
                    "{}: ignoring continuation to {} (state {})",
                    CLASS_NAME,
                    target,
                    current
                );
                return false;
            }
            st.ready_state = target;
        }
        self.notify();
        true
    }

    fn advance(&self, change: StateChange) {
        if let Some(target) = change.target() {
            self.state.lock().ready_state = target;
        }
        log::debug!("{}: {:?}", CLASS_NAME, change);
        if change.notifies() {
            self.notify();
        }
    }

    fn notify(&self) {
        let Variant::Object(handler) = self.core.value(ON_READY_STATE_CHANGE) else {
            return;
        };
        let mut args = [Variant::Object(self.clone().into_dispatch())];
        if let Err(e) = handler.invoke(MemberId::NONE, DispatchFlags::METHOD, &mut args) {
            log::warn!("{}: onreadystatechange handler failed: {}", CLASS_NAME, e);
        }
    }
}

impl Recyclable for XmlHttpRequest {
    fn reset(&mut self) {
        self.core.reset();
        let st = self.state.get_mut();
        st.ready_state = ReadyState::Unsent;
        st.transaction = RequestTransaction::default();
        st.generation += 1;
    }
}

impl Invocable for XmlHttpRequest {
    fn late_bound(&self) -> &LateBound<Request> {
        &self.core
    }
}
