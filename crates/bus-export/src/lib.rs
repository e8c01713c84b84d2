// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # bus-export - object export and method dispatch for a message-bus client
//!
//! The service side of a bus connection: applications export handlers at
//! object paths, and every incoming method call is routed to the right
//! handler, checked against its signature, run in isolation, and answered.
//!
//! ## Quick Start
//!
//! ```rust
//! use bus_export::{Call, Exportable, MethodSet, ObjectPath, ObjectServer, Result};
//! use std::sync::Arc;
//!
//! struct Calculator;
//!
//! impl Exportable for Calculator {
//!     fn export_methods(self: Arc<Self>, methods: &mut MethodSet) {
//!         methods.add("Double", |x: i64| x * 2);
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let server = ObjectServer::new();
//!     server.export("/org/example/Calc", "org.example.Calc", Arc::new(Calculator))?;
//!
//!     let path = ObjectPath::new("/org/example/Calc")?;
//!     let reply = server.dispatch(Call::new(path, "org.example.Calc", "Double").arg(21i64));
//!     assert_eq!(reply.results().and_then(|r| r[0].as_i64()), Some(42));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                    Transport (decode / encode)                      |
//! +---------------------------------------------------------------------+
//! |   Call  ->  ObjectServer (router)  ->  Reply                        |
//! +---------------------------------------------------------------------+
//! |   Registry (exact + subtree)  |  Resolver  |  Invoker  | Introspect |
//! +---------------------------------------------------------------------+
//! |   ExportEntry: bound methods | method table | static document       |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Features
//!
//! - `serve` (default): async dispatch loop on tokio, one blocking task per call
//! - `config-loaders` (default): YAML loading for [`ServerConfig`]

/// Well-known names and server configuration.
pub mod config;
/// Registration errors and dispatch error taxonomy.
pub mod error;
/// Export entries, handler builder trait and method resolution.
pub mod export;
/// Introspection document builder.
pub mod introspect;
/// Call and reply records.
pub mod message;
/// Type-erased handlers and the invoker.
pub mod method;
/// Interface and member name rules.
pub mod name;
/// Object path validation.
pub mod path;
/// Two-table object registry.
pub mod registry;
/// Call router and standard interfaces.
pub mod server;
/// Decoded values and type kinds.
pub mod types;

pub use config::ServerConfig;
pub use error::{Error, ErrorKind, MethodError, Result};
pub use export::{AliasMap, ExportEntry, Exportable, MethodSet, MethodTable};
pub use message::{Call, CallContext, Flags, Reply, ReplyToken};
pub use method::Method;
pub use path::ObjectPath;
pub use registry::Registry;
pub use server::{DispatchStats, ObjectServer};
pub use types::{Kind, Value};

#[cfg(feature = "serve")]
pub use server::{ReplyFn, ReplySink};
