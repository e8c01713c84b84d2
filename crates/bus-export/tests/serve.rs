// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Async dispatch loop.

#![cfg(feature = "serve")]

use bus_export::message::Flags;
use bus_export::{
    Call, ErrorKind, MethodError, MethodTable, ObjectPath, ObjectServer, Reply, ReplyFn, Value,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

const IFACE: &str = "org.guelfey.DBus.Test";

fn server() -> Arc<ObjectServer> {
    let table = MethodTable::new()
        .method("Echo", |s: String| -> Result<String, MethodError> { Ok(s) })
        .method("Slow", |ms: u64| -> Result<u64, MethodError> {
            std::thread::sleep(Duration::from_millis(ms));
            Ok(ms)
        })
        .method("Explode", || -> Result<(), MethodError> { panic!("boom") });
    let server = ObjectServer::new();
    server
        .export_subtree_method_table("/", IFACE, table)
        .expect("export");
    Arc::new(server)
}

fn call(member: &str, serial: u32) -> Call {
    Call::new(ObjectPath::new("/svc").expect("path"), IFACE, member).serial(serial)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn every_call_gets_its_reply() {
    let (call_tx, call_rx) = mpsc::channel(16);
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<Reply>();
    let loop_handle = tokio::spawn(server().serve(call_rx, reply_tx));

    call_tx.send(call("Slow", 1).arg(50u64)).await.expect("send");
    call_tx.send(call("Explode", 2)).await.expect("send");
    call_tx.send(call("Echo", 3).arg("hi")).await.expect("send");
    drop(call_tx);

    let mut replies = Vec::new();
    while let Some(reply) = reply_rx.recv().await {
        replies.push(reply);
    }
    loop_handle.await.expect("serve loop");

    replies.sort_by_key(|r| r.token().serial);
    assert_eq!(replies.len(), 3);
    assert_eq!(replies[0].results(), Some(&[Value::UInt64(50)][..]));
    assert_eq!(replies[1].error_kind(), Some(ErrorKind::Failed));
    assert_eq!(replies[2].results(), Some(&[Value::from("hi")][..]));
}

#[tokio::test]
async fn slow_handler_does_not_block_siblings() {
    let (call_tx, call_rx) = mpsc::channel(16);
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<Reply>();
    let loop_handle = tokio::spawn(server().serve(call_rx, reply_tx));

    call_tx.send(call("Slow", 1).arg(500u64)).await.expect("send");
    call_tx.send(call("Echo", 2).arg("fast")).await.expect("send");

    let first = tokio::time::timeout(Duration::from_secs(5), reply_rx.recv())
        .await
        .expect("reply in time")
        .expect("reply");
    assert_eq!(first.token().serial, 2);

    drop(call_tx);
    loop_handle.await.expect("serve loop");
}

#[tokio::test]
async fn no_reply_expected_drops_reply() {
    let executed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&executed);
    let table = MethodTable::new().method("Notify", move || -> Result<(), MethodError> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let server = ObjectServer::new();
    server.export_method_table("/svc", IFACE, table).expect("export");

    let delivered = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let delivered = Arc::clone(&delivered);
        ReplyFn(move |reply: Reply| delivered.lock().expect("lock").push(reply))
    };

    let (call_tx, call_rx) = mpsc::channel(4);
    let loop_handle = tokio::spawn(Arc::new(server).serve(call_rx, sink));

    call_tx
        .send(call("Notify", 1).flags(Flags::NO_REPLY_EXPECTED))
        .await
        .expect("send");
    call_tx.send(call("Notify", 2)).await.expect("send");
    drop(call_tx);
    loop_handle.await.expect("serve loop");

    assert_eq!(executed.load(Ordering::SeqCst), 2);
    let delivered = delivered.lock().expect("lock");
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].token().serial, 2);
}
