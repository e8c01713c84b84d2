// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Async dispatch loop.
//!
//! The transport decodes calls and pushes them into a channel; every call is
//! served on its own blocking task so slow or misbehaving handlers never
//! stall the loop or sibling calls. Replies go out through a [`ReplySink`].

use super::ObjectServer;
use crate::message::{Call, Reply};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Outgoing side of the transport.
pub trait ReplySink: Send + Sync + 'static {
    fn deliver(&self, reply: Reply);
}

impl ReplySink for mpsc::UnboundedSender<Reply> {
    fn deliver(&self, reply: Reply) {
        if mpsc::UnboundedSender::send(self, reply).is_err() {
            log::debug!("[serve] reply channel closed, reply dropped");
        }
    }
}

/// Adapter turning a closure into a [`ReplySink`].
pub struct ReplyFn<F>(pub F);

impl<F> ReplySink for ReplyFn<F>
where
    F: Fn(Reply) + Send + Sync + 'static,
{
    fn deliver(&self, reply: Reply) {
        (self.0)(reply)
    }
}

impl ObjectServer {
    /// Dispatch calls from `calls` until the channel closes.
    ///
    /// Returns once every in-flight call has been answered. Replies to calls
    /// flagged `NO_REPLY_EXPECTED` are dropped.
    pub async fn serve<S: ReplySink>(self: Arc<Self>, mut calls: mpsc::Receiver<Call>, sink: S) {
        let sink = Arc::new(sink);
        let mut tasks = JoinSet::new();
        log::info!("[serve] dispatch loop started");

        while let Some(call) = calls.recv().await {
            let server = Arc::clone(&self);
            let sink = Arc::clone(&sink);
            tasks.spawn_blocking(move || {
                let expects_reply = call.expects_reply();
                let reply = server.dispatch(call);
                if expects_reply {
                    sink.deliver(reply);
                }
            });

            while let Some(done) = tasks.try_join_next() {
                if let Err(e) = done {
                    log::error!("[serve] dispatch task failed: {}", e);
                }
            }
        }

        while let Some(done) = tasks.join_next().await {
            if let Err(e) = done {
                log::error!("[serve] dispatch task failed: {}", e);
            }
        }

        let stats = self.stats();
        log::info!(
            "[serve] call channel closed ({} dispatched, {} failed)",
            stats.calls_dispatched,
            stats.calls_failed
        );
    }
}
