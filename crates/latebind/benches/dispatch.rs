// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatch Benchmark
//!
//! Measures the hot paths a scripting host exercises on every call:
//! - member id hashing
//! - resolve + invoke with text arguments (coercion included)
//! - property reads through a delegated reader
//! - pooled request acquire / release

#![allow(clippy::uninlined_format_args)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use latebind::dispatch::{member_id, DispatchFlags};
use latebind::xhr::{NullTransport, RequestFactory};
use latebind::{Dispatch, RuntimeConfig, Variant};
use std::sync::Arc;

fn bench_member_id(c: &mut Criterion) {
    c.bench_function("member_id_hash", |b| {
        b.iter(|| member_id(black_box("getAllResponseHeaders")))
    });
}

fn bench_resolve_invoke(c: &mut Criterion) {
    let factory = RequestFactory::with_defaults();
    let request = factory.create();

    c.bench_function("resolve_invoke_text_args", |b| {
        b.iter(|| {
            let id = request.resolve(black_box("setRequestHeader")).unwrap();
            let mut args = [Variant::from("Accept"), Variant::from("text/plain")];
            request
                .invoke(id, DispatchFlags::METHOD, &mut args)
                .unwrap()
        })
    });

    let ready_state = request.resolve("readyState").unwrap();
    c.bench_function("property_get_delegated", |b| {
        b.iter(|| {
            request
                .invoke(black_box(ready_state), DispatchFlags::PROPERTY_GET, &mut [])
                .unwrap()
        })
    });
}

fn bench_pool(c: &mut Criterion) {
    let factory = RequestFactory::new(
        Arc::new(NullTransport),
        RuntimeConfig::default().with_pool_capacity(16),
    );

    c.bench_function("pool_acquire_release", |b| {
        b.iter(|| {
            let request = factory.create();
            black_box(request.ready_state());
        })
    });

    c.bench_function("open_send_cycle", |b| {
        b.iter(|| {
            let request = factory.create();
            request.open("GET", "http://bench/?callback=cb", false, "", "");
            request.send("a=1&b=2").unwrap();
            black_box(request.response_text())
        })
    });

    println!("pool stats: {:?}", factory.pool_stats());
}

criterion_group!(benches, bench_member_id, bench_resolve_invoke, bench_pool);
criterion_main!(benches);
