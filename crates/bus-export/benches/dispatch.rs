// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatch Hot Path Benchmark
//!
//! Measures:
//! - Registry lookup (exact hit, deep subtree hit, miss) with many exports
//! - Full dispatch of a bound method (lookup + resolve + arg check + invoke)
//! - Introspection of a populated subtree

#![allow(clippy::uninlined_format_args)]

use bus_export::{Call, Exportable, MethodSet, ObjectPath, ObjectServer};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

const IFACE: &str = "org.example.Bench";

struct Calc;

impl Exportable for Calc {
    fn export_methods(self: Arc<Self>, methods: &mut MethodSet) {
        methods.add("Double", |x: i64| x * 2);
    }
}

fn populated_server() -> ObjectServer {
    let server = ObjectServer::new();
    for i in 0..1_000 {
        let path = format!("/bench/n{}/leaf{}", i % 32, i);
        server.export(&path, IFACE, Arc::new(Calc)).expect("export");
    }
    server
        .export_subtree("/deep", IFACE, Arc::new(Calc))
        .expect("export");
    server
}

fn bench_lookup(c: &mut Criterion) {
    let server = populated_server();
    let registry = server.registry();
    let exact = ObjectPath::new("/bench/n3/leaf35").expect("path");
    let deep = ObjectPath::new("/deep/a/b/c/d/e/f/g").expect("path");
    let miss = ObjectPath::new("/nowhere/at/all").expect("path");

    c.bench_function("registry_lookup_exact", |b| {
        b.iter(|| black_box(registry.lookup(black_box(&exact), IFACE)))
    });
    c.bench_function("registry_lookup_deep_subtree", |b| {
        b.iter(|| black_box(registry.lookup(black_box(&deep), IFACE)))
    });
    c.bench_function("registry_lookup_miss", |b| {
        b.iter(|| black_box(registry.lookup(black_box(&miss), IFACE)))
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let server = populated_server();
    let path = ObjectPath::new("/bench/n3/leaf35").expect("path");

    c.bench_function("dispatch_bound_method", |b| {
        b.iter(|| {
            let call = Call::new(path.clone(), IFACE, "Double").arg(21i64);
            black_box(server.dispatch(call))
        })
    });
}

fn bench_introspect(c: &mut Criterion) {
    let server = populated_server();
    let path = ObjectPath::new("/bench").expect("path");

    c.bench_function("introspect_subtree", |b| {
        b.iter(|| black_box(server.introspect(black_box(&path))))
    });
}

criterion_group!(benches, bench_lookup, bench_dispatch, bench_introspect);
criterion_main!(benches);
