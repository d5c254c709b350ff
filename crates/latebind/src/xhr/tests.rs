// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Request state machine tests.

use super::*;
use crate::config::RuntimeConfig;
use crate::dispatch::{
    Dispatch, DispatchError, DispatchRef, DispatchResult, Variant, INVALID_STATE_ERR,
};
use crate::object::callback;
use parking_lot::Mutex;
use std::sync::Arc;

/// Handler recording the `readyState` seen at each notification.
fn recorder() -> (DispatchRef, Arc<Mutex<Vec<i64>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handler = callback(move |args: &mut [Variant]| {
        let state = match args.first() {
            Some(Variant::Object(req)) => req.get("readyState")?,
            _ => Variant::Empty,
        };
        sink.lock().push(state.as_i64().unwrap_or(-1));
        Ok(Variant::Empty)
    });
    (handler, seen)
}

fn request_with(transport: Arc<dyn Transport>) -> Request {
    crate::object::ObjectRef::new(XmlHttpRequest::new(transport, &RuntimeConfig::default()))
}

/// Transport that leaves requests in flight and remembers their token.
#[derive(Default)]
struct PendingTransport {
    token: Mutex<Option<TransactionToken>>,
}

impl Transport for PendingTransport {
    fn process_request(&self, request: &Request) -> bool {
        *self.token.lock() = Some(request.transaction_token());
        false
    }
}

#[test]
fn sync_send_skips_send_marker() {
    let (handler, seen) = recorder();
    let req = XmlHttpRequest::create();
    req.set_onreadystatechange(Variant::Object(handler));

    req.open("GET", "http://x/", false, "", "");
    req.send("").unwrap();

    assert_eq!(*seen.lock(), vec![1, 4]);
    assert_eq!(req.ready_state(), ReadyState::Done);
}

#[test]
fn async_send_fires_send_marker_without_persisting() {
    let (handler, seen) = recorder();
    let req = XmlHttpRequest::create();
    req.set_onreadystatechange(Variant::Object(handler));

    req.open("POST", "http://x/", true, "", "");
    req.send("a=1").unwrap();

    // open, send marker (still OPENED), done
    assert_eq!(*seen.lock(), vec![1, 1, 4]);
    assert_eq!(req.request_param("a").as_deref(), Some("1"));
}

#[test]
fn send_before_open_is_invalid_state() {
    let req = XmlHttpRequest::create();
    assert!(matches!(req.send(""), Err(DispatchError::InvalidState(_))));

    // Through the host boundary the error becomes a coded exception.
    match req.call("send", &mut []) {
        Err(DispatchError::Exception(info)) => {
            assert_eq!(info.code, INVALID_STATE_ERR);
            assert_eq!(info.source, CLASS_NAME);
        }
        other => panic!("expected exception, got {:?}", other),
    }
}

#[test]
fn send_after_done_is_invalid_state() {
    let req = XmlHttpRequest::create();
    req.open("GET", "http://x/", false, "", "");
    req.send("").unwrap();
    assert!(req.send("").is_err());
}

#[test]
fn abort_notifies_done_then_resets_silently() {
    let (handler, seen) = recorder();
    let req = XmlHttpRequest::create();
    req.set_onreadystatechange(Variant::Object(handler));

    req.open("GET", "http://x/", true, "", "");
    req.abort();
    assert_eq!(*seen.lock(), vec![1, 4]);
    assert_eq!(req.ready_state(), ReadyState::Unsent);

    req.abort();
    assert_eq!(seen.lock().len(), 2);
    assert_eq!(req.ready_state(), ReadyState::Unsent);
}

#[test]
fn abort_from_unsent_is_idempotent() {
    let req = XmlHttpRequest::create();
    req.abort();
    req.abort();
    assert_eq!(req.ready_state(), ReadyState::Unsent);
    assert!(req.call("abort", &mut []).is_ok());
}

#[test]
fn open_discards_previous_transaction() {
    let transport = Arc::new(EchoTransport);
    let req = request_with(transport);
    req.open("GET", "http://x/", false, "", "");
    req.set_request_header("A", "1");
    req.send("k=v").unwrap();
    assert_eq!(req.get_response_header("A"), "1");

    req.open("GET", "http://y/", false, "", "");
    assert_eq!(req.request_header("A"), None);
    assert_eq!(req.get_response_header("A"), "");
    assert_eq!(req.get_all_response_headers(), "");
    assert_eq!(req.response_text(), "");
    assert_eq!(req.url(), "http://y/");
}

#[test]
fn open_keeps_state_change_handler() {
    let (handler, seen) = recorder();
    let req = XmlHttpRequest::create();
    req.set_onreadystatechange(Variant::Object(handler));
    req.open("GET", "http://x/", false, "", "");
    req.open("GET", "http://x/", false, "", "");
    assert_eq!(*seen.lock(), vec![1, 1]);
}

#[test]
fn status_defaults_until_set() {
    let req = request_with(Arc::new(PendingTransport::default()));
    assert_eq!(req.status(), 200);
    req.open("GET", "http://x/", true, "", "");
    req.send("").unwrap();
    let token = req.transaction_token();
    assert!(req.set_status(token, 404, "Not Found"));
    assert_eq!(req.status(), 404);
    assert_eq!(req.status_text(), "Not Found");
    assert_eq!(req.get("status").unwrap(), Variant::Int(404));
}

#[test]
fn status_written_as_text_reads_as_number() {
    let req = XmlHttpRequest::create();
    req.set("status", Variant::from("404")).unwrap();
    assert_eq!(req.status(), 404);
    assert_eq!(req.get("status").unwrap(), Variant::Int(404));

    crate::script::Interpreter::new(&req)
        .execute_line("status=503")
        .unwrap();
    assert_eq!(req.status(), 503);

    req.set("status", Variant::from("n/a")).unwrap();
    assert_eq!(req.status(), 200);
}

#[test]
fn echo_transport_round_trip() {
    let req = request_with(Arc::new(EchoTransport));
    req.open("POST", "http://x/form", false, "", "");
    req.set_request_header("X", "1");
    req.send("a=1&b=2").unwrap();

    assert_eq!(req.get_response_header("X"), "1");
    assert_eq!(req.get_all_response_headers(), "X=1\n");
    assert_eq!(req.response_text(), "a=1\nb=2\n");
    assert_eq!(req.status(), 200);
    assert_eq!(req.get("statusText").unwrap(), Variant::from("OK"));
}

#[test]
fn jsonp_response_text() {
    let req = request_with(Arc::new(PendingTransport::default()));
    req.open("GET", "http://x/?callback=foo&id=2", true, "", "");
    req.send("").unwrap();
    let token = req.transaction_token();
    assert!(req.set_response_field(token, "a", "1"));
    assert_eq!(req.response_text(), "foo({a:'1'});");
    assert_eq!(req.get("responseText").unwrap(), Variant::from("foo({a:'1'});"));
}

#[test]
fn jsonp_disabled_by_empty_token() {
    let config = RuntimeConfig::default().with_jsonp_token("");
    let req = crate::object::ObjectRef::new(XmlHttpRequest::new(
        Arc::new(PendingTransport::default()),
        &config,
    ));
    req.open("GET", "http://x/?callback=foo", true, "", "");
    req.send("").unwrap();
    req.set_response_field(req.transaction_token(), "a", "1");
    assert_eq!(req.response_text(), "a=1\n");
}

#[test]
fn transport_continuations_advance_in_order() {
    let transport = Arc::new(PendingTransport::default());
    let (handler, seen) = recorder();
    let req = request_with(transport.clone());
    req.set_onreadystatechange(Variant::Object(handler));

    req.open("GET", "http://x/", true, "", "");
    req.send("").unwrap();
    assert_eq!(req.ready_state(), ReadyState::Opened);

    let token = transport.token.lock().expect("token captured at send");
    assert!(req.headers_received(token));
    assert!(req.loading(token));
    assert!(req.complete(token));
    assert!(!req.complete(token));

    assert_eq!(*seen.lock(), vec![1, 1, 2, 3, 4]);
}

#[test]
fn stale_token_after_abort_is_ignored() {
    let transport = Arc::new(PendingTransport::default());
    let req = request_with(transport.clone());
    req.open("GET", "http://x/", true, "", "");
    req.send("").unwrap();
    let token = transport.token.lock().expect("token captured at send");

    req.abort();
    assert!(!req.headers_received(token));
    assert!(!req.set_response_field(token, "late", "1"));
    assert!(!req.set_status(token, 500, "late"));
    assert_eq!(req.ready_state(), ReadyState::Unsent);
}

#[test]
fn abort_from_inside_notification() {
    let transport = Arc::new(PendingTransport::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handler = callback(move |args: &mut [Variant]| -> DispatchResult<Variant> {
        let Some(Variant::Object(req)) = args.first() else {
            return Ok(Variant::Empty);
        };
        let state = req.get("readyState")?.as_i64().unwrap_or(-1);
        sink.lock().push(state);
        if state == 2 {
            req.call("abort", &mut [])?;
        }
        Ok(Variant::Empty)
    });

    let req = request_with(transport.clone());
    req.set_onreadystatechange(Variant::Object(handler));
    req.open("GET", "http://x/", true, "", "");
    req.send("").unwrap();
    let token = transport.token.lock().expect("token captured at send");

    assert!(req.headers_received(token));
    assert!(!req.loading(token));
    assert_eq!(*seen.lock(), vec![1, 1, 2, 4]);
    assert_eq!(req.ready_state(), ReadyState::Unsent);
}

/// Handler calling `member` on the request at its `nth` notification.
fn call_on_notification(nth: usize, member: &'static str) -> (DispatchRef, Arc<Mutex<Vec<i64>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handler = callback(move |args: &mut [Variant]| -> DispatchResult<Variant> {
        let Some(Variant::Object(req)) = args.first() else {
            return Ok(Variant::Empty);
        };
        let state = req.get("readyState")?.as_i64().unwrap_or(-1);
        let count = {
            let mut seen = sink.lock();
            seen.push(state);
            seen.len()
        };
        if count == nth {
            match member {
                "open" => {
                    req.call("open", &mut [Variant::from("GET"), Variant::from("http://y/")])?;
                }
                _ => {
                    req.call(member, &mut [])?;
                }
            }
        }
        Ok(Variant::Empty)
    });
    (handler, seen)
}

#[test]
fn abort_on_send_marker_skips_transport() {
    let (handler, seen) = call_on_notification(2, "abort");
    let req = request_with(Arc::new(EchoTransport));
    req.set_onreadystatechange(Variant::Object(handler));
    req.open("GET", "http://x/", true, "", "");
    req.set_request_header("X", "1");
    req.send("a=1").unwrap();

    // open, send marker, abort's DONE; no completion afterwards
    assert_eq!(*seen.lock(), vec![1, 1, 4]);
    assert_eq!(req.ready_state(), ReadyState::Unsent);
    assert_eq!(req.get_all_response_headers(), "");
    assert_eq!(req.response_text(), "");
    assert_eq!(req.status_text(), "");
}

#[test]
fn reopen_on_send_marker_skips_transport() {
    let (handler, seen) = call_on_notification(2, "open");
    let req = request_with(Arc::new(EchoTransport));
    req.set_onreadystatechange(Variant::Object(handler));
    req.open("POST", "http://x/", true, "", "");
    req.send("a=1").unwrap();

    assert_eq!(*seen.lock(), vec![1, 1, 1]);
    assert_eq!(req.ready_state(), ReadyState::Opened);
    assert_eq!(req.url(), "http://y/");
    assert_eq!(req.response_text(), "");
    assert!(req.send("").is_ok());
    assert_eq!(req.ready_state(), ReadyState::Done);
}

#[test]
fn failing_handler_does_not_break_transition() {
    let req = XmlHttpRequest::create();
    req.set_onreadystatechange(Variant::Object(callback(|_: &mut [Variant]| {
        Err(DispatchError::invalid_argument("boom"))
    })));
    req.open("GET", "http://x/", false, "", "");
    assert!(req.send("").is_ok());
    assert_eq!(req.ready_state(), ReadyState::Done);
}

#[test]
fn host_calling_convention_with_text_tokens() {
    let req = request_with(Arc::new(EchoTransport));
    let mut open_args = [
        Variant::from("POST"),
        Variant::from("http://x/"),
        Variant::from("false"),
    ];
    req.call("open", &mut open_args).unwrap();
    req.call(
        "setRequestHeader",
        &mut [Variant::from("X"), Variant::from("1")],
    )
    .unwrap();
    req.call("send", &mut [Variant::from("q=7")]).unwrap();

    assert_eq!(req.get("readyState").unwrap(), Variant::Int(4));
    assert_eq!(
        req.call("getResponseHeader", &mut [Variant::from("X")]).unwrap(),
        Variant::from("1")
    );
    assert_eq!(req.get("responseText").unwrap(), Variant::from("q=7\n"));
    assert_eq!(req.get("responseXML").unwrap(), Variant::Empty);
}

#[test]
fn plain_attributes_are_read_write() {
    let req = XmlHttpRequest::create();
    req.set("timeout", Variant::from("30")).unwrap();
    assert_eq!(req.get("timeout").unwrap(), Variant::from("30"));
    req.set("withCredentials", Variant::Bool(true)).unwrap();
    assert_eq!(req.get("withCredentials").unwrap(), Variant::Bool(true));
}

#[test]
fn handler_attribute_is_write_delegated() {
    let (handler, _seen) = recorder();
    let req = XmlHttpRequest::create();
    req.set("onreadystatechange", Variant::Object(handler.clone()))
        .unwrap();
    assert_eq!(
        req.get("onreadystatechange").unwrap(),
        Variant::Object(handler)
    );
    assert_eq!(req.attribute("onreadystatechange").type_name(), "object");
}

#[test]
fn factory_construct_yields_pooled_requests() {
    let factory = RequestFactory::new(
        Arc::new(NullTransport),
        RuntimeConfig::default().with_pool_capacity(2),
    );
    let created = factory.construct(&mut []).unwrap();
    let Variant::Object(host_ref) = created else {
        panic!("factory construct must return an object");
    };
    host_ref.set("timeout", Variant::Int(5)).unwrap();
    drop(host_ref);

    let stats = factory.pool_stats();
    assert_eq!((stats.created, stats.cached, stats.idle), (1, 1, 1));

    let reused = factory.create();
    assert_eq!(reused.attribute("timeout"), Variant::Empty);
    assert_eq!(reused.ready_state(), ReadyState::Unsent);
    assert_eq!(factory.pool_stats().reused, 1);
}
