// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Call router.
//!
//! [`ObjectServer`] owns the [`Registry`] of one connection and turns every
//! incoming [`Call`] into exactly one [`Reply`]:
//!
//! ```text
//! Call -> Registry::find -> resolve -> invoke -> Reply::Return
//!              |               |          |
//!              +---------------+----------+--> Reply::Error
//! ```
//!
//! `Introspect` on the introspection interface and the Peer methods are
//! answered by the server itself when no registration claims them.
//!
//! # Example
//!
//! ```rust
//! use bus_export::{Call, MethodSet, ObjectPath, ObjectServer};
//! use bus_export::export::ExportEntry;
//!
//! let server = ObjectServer::new();
//! let entry = ExportEntry::methods(MethodSet::new().with("Double", |x: i64| x * 2));
//! server.registry().register_exact("/calc", "org.example.Calc", Some(entry)).unwrap();
//!
//! let path = ObjectPath::new("/calc").unwrap();
//! let call = Call::new(path, "org.example.Calc", "Double").arg(21i64);
//! let reply = server.dispatch(call);
//! assert_eq!(reply.results().and_then(|r| r[0].as_i64()), Some(42));
//! ```

mod peer;
#[cfg(feature = "serve")]
mod serve;

#[cfg(feature = "serve")]
pub use serve::{ReplyFn, ReplySink};

use crate::config::{ServerConfig, INTROSPECTABLE_INTERFACE, INTROSPECT_METHOD, PEER_INTERFACE};
use crate::error::{ErrorKind, MethodError, Result};
use crate::export::{resolve, ExportEntry, Exportable, MethodTable, Resolution};
use crate::introspect::introspect;
use crate::message::{Call, Reply};
use crate::method::invoke;
use crate::path::ObjectPath;
use crate::registry::Registry;
use crate::types::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Outcome = std::result::Result<Vec<Value>, MethodError>;

/// Snapshot of dispatch counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStats {
    pub calls_dispatched: u64,
    /// Calls answered with an error reply
    pub calls_failed: u64,
}

/// Routes calls to exported handlers.
pub struct ObjectServer {
    registry: Arc<Registry>,
    config: ServerConfig,

    /// Statistics
    calls_dispatched: AtomicU64,
    calls_failed: AtomicU64,
}

impl Default for ObjectServer {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectServer {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        Self::with_registry(Arc::new(Registry::new()), config)
    }

    /// Serve an existing registry (e.g. shared with another component).
    pub fn with_registry(registry: Arc<Registry>, config: ServerConfig) -> Self {
        Self {
            registry,
            config,
            calls_dispatched: AtomicU64::new(0),
            calls_failed: AtomicU64::new(0),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            calls_dispatched: self.calls_dispatched.load(Ordering::Relaxed),
            calls_failed: self.calls_failed.load(Ordering::Relaxed),
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Export the methods of `handler` at exactly `path`.
    pub fn export<T: Exportable>(
        &self,
        path: impl AsRef<str>,
        interface: &str,
        handler: Arc<T>,
    ) -> Result<()> {
        self.registry
            .register_exact(path, interface, Some(ExportEntry::bound(handler)))
    }

    /// Like [`export`](Self::export), reachable only under the mapped wire names.
    pub fn export_with_map<T, I, K, V>(
        &self,
        path: impl AsRef<str>,
        interface: &str,
        handler: Arc<T>,
        aliases: I,
    ) -> Result<()>
    where
        T: Exportable,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entry = ExportEntry::bound(handler).with_aliases(aliases);
        self.registry.register_exact(path, interface, Some(entry))
    }

    /// Export the methods of `handler` at `path` and every path below it.
    pub fn export_subtree<T: Exportable>(
        &self,
        path: impl AsRef<str>,
        interface: &str,
        handler: Arc<T>,
    ) -> Result<()> {
        self.registry
            .register_subtree(path, interface, Some(ExportEntry::bound(handler)))
    }

    pub fn export_subtree_with_map<T, I, K, V>(
        &self,
        path: impl AsRef<str>,
        interface: &str,
        handler: Arc<T>,
        aliases: I,
    ) -> Result<()>
    where
        T: Exportable,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entry = ExportEntry::bound(handler).with_aliases(aliases);
        self.registry.register_subtree(path, interface, Some(entry))
    }

    pub fn export_method_table(
        &self,
        path: impl AsRef<str>,
        interface: &str,
        table: MethodTable,
    ) -> Result<()> {
        self.registry
            .register_exact(path, interface, Some(ExportEntry::table(table)))
    }

    pub fn export_subtree_method_table(
        &self,
        path: impl AsRef<str>,
        interface: &str,
        table: MethodTable,
    ) -> Result<()> {
        self.registry
            .register_subtree(path, interface, Some(ExportEntry::table(table)))
    }

    /// Answer `Introspect` at `path` with a fixed document.
    pub fn export_introspection(
        &self,
        path: impl AsRef<str>,
        xml: impl Into<String>,
    ) -> Result<()> {
        self.registry.register_exact(
            path,
            INTROSPECTABLE_INTERFACE,
            Some(ExportEntry::document(xml)),
        )
    }

    /// Remove whatever is exported at `(path, interface)`.
    pub fn unexport(&self, path: impl AsRef<str>, interface: &str) -> Result<bool> {
        self.registry.unregister(path, interface)
    }

    /// Introspection document for `path`, as `Introspect` would return it.
    pub fn introspect(&self, path: &ObjectPath) -> String {
        introspect(&self.registry, path, &self.config)
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Route one call and build its reply.
    ///
    /// Always produces a reply, even for calls flagged `NO_REPLY_EXPECTED`;
    /// dropping it is up to the transport.
    pub fn dispatch(&self, call: Call) -> Reply {
        self.calls_dispatched.fetch_add(1, Ordering::Relaxed);
        let token = call.token.clone();

        match self.route(call) {
            Ok(results) => Reply::method_return(token, results),
            Err(err) => {
                self.calls_failed.fetch_add(1, Ordering::Relaxed);
                Reply::from_method_error(token, err)
            }
        }
    }

    fn route(&self, call: Call) -> Outcome {
        let outcome = match call.interface.as_deref() {
            Some(interface) => self.route_interface(&call, interface),
            None => self.route_any(&call),
        };
        outcome.and_then(|target| self.execute(target, call))
    }

    fn route_interface(
        &self,
        call: &Call,
        interface: &str,
    ) -> std::result::Result<Target, MethodError> {
        match self.registry.find(&call.path, interface) {
            Ok(found) => resolve(&found.entry, &call.member)
                .map(Target::Resolved)
                .ok_or_else(|| unknown_method(interface, &call.member)),
            Err(kind) => self
                .builtin(interface, &call.member)
                .ok_or_else(|| match kind {
                    ErrorKind::UnknownInterface => MethodError::from_kind(
                        kind,
                        format!(
                            "Object '{}' does not implement interface '{}'",
                            call.path, interface
                        ),
                    ),
                    _ => MethodError::from_kind(
                        kind,
                        format!("No object exported at '{}'", call.path),
                    ),
                }),
        }
    }

    /// Interface-less call: first interface (by name) resolving the member.
    fn route_any(&self, call: &Call) -> std::result::Result<Target, MethodError> {
        let interfaces = self.registry.object_interfaces(&call.path);
        for (_, entry) in &interfaces {
            if let Some(resolution) = resolve(entry, &call.member) {
                return Ok(Target::Resolved(resolution));
            }
        }

        for interface in [INTROSPECTABLE_INTERFACE, PEER_INTERFACE] {
            if let Some(target) = self.builtin(interface, &call.member) {
                if !matches!(target, Target::Unknown) {
                    return Ok(target);
                }
            }
        }

        if interfaces.is_empty() {
            Err(MethodError::from_kind(
                ErrorKind::UnknownObject,
                format!("No object exported at '{}'", call.path),
            ))
        } else {
            Err(MethodError::from_kind(
                ErrorKind::UnknownMethod,
                format!("Unknown method '{}' at '{}'", call.member, call.path),
            ))
        }
    }

    /// Interfaces the server answers itself.
    fn builtin(&self, interface: &str, member: &str) -> Option<Target> {
        match interface {
            INTROSPECTABLE_INTERFACE if self.config.introspection => {
                Some(if member == INTROSPECT_METHOD {
                    Target::Introspect
                } else {
                    Target::Unknown
                })
            }
            PEER_INTERFACE if self.config.peer => Some(if peer::is_member(member) {
                Target::Peer
            } else {
                Target::Unknown
            }),
            _ => None,
        }
    }

    fn execute(&self, target: Target, call: Call) -> Outcome {
        match target {
            Target::Resolved(Resolution::Method(method)) => {
                let ctx = call.context();
                invoke(&method, ctx, call.args)
            }
            Target::Resolved(Resolution::Invalid(reason)) => {
                log::debug!(
                    "[server] {}.{} at {}: {}",
                    interface_of(&call),
                    call.member,
                    call.path,
                    reason
                );
                Err(MethodError::from_kind(ErrorKind::InvalidMethod, reason))
            }
            Target::Resolved(Resolution::Document(xml)) => {
                expect_no_args(&call)?;
                Ok(vec![Value::String(xml.to_string())])
            }
            Target::Introspect => {
                expect_no_args(&call)?;
                Ok(vec![Value::String(self.introspect(&call.path))])
            }
            Target::Peer => {
                expect_no_args(&call)?;
                peer::call(&call.member, &self.config.machine_id_paths)
                    .unwrap_or_else(|| Err(unknown_method(PEER_INTERFACE, &call.member)))
            }
            Target::Unknown => Err(unknown_method(interface_of(&call), &call.member)),
        }
    }
}

impl std::fmt::Debug for ObjectServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectServer")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Where a call ends up after routing.
enum Target {
    Resolved(Resolution),
    Introspect,
    Peer,
    /// Builtin interface without that member
    Unknown,
}

fn interface_of(call: &Call) -> &str {
    call.interface.as_deref().unwrap_or("*")
}

fn unknown_method(interface: &str, member: &str) -> MethodError {
    log::debug!("[server] unknown method {}.{}", interface, member);
    MethodError::from_kind(
        ErrorKind::UnknownMethod,
        format!("Unknown method '{}' on interface '{}'", member, interface),
    )
}

fn expect_no_args(call: &Call) -> std::result::Result<(), MethodError> {
    if call.args.is_empty() {
        Ok(())
    } else {
        Err(MethodError::invalid_args(format!(
            "Expected 0 arguments, got {}",
            call.args.len()
        )))
    }
}
