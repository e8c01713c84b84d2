// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Export entries: what gets attached to a (path, interface) pair.
//!
//! Three variants:
//! - **Bound methods** ([`MethodSet`], usually built by an [`Exportable`]
//!   handler): every visible method name is exposed. Handlers may or may not
//!   use the error-kind return convention.
//! - **Method table** ([`MethodTable`]): explicit wire name to member map.
//!   Members must be callables returning `Result<_, MethodError>`.
//! - **Document**: a literal introspection XML fragment, answering only the
//!   introspection query.
//!
//! Any entry may carry an alias map (declared name to wire name). With an
//! alias map, only mapped names are reachable.
//!
//! # Example
//!
//! ```rust
//! use bus_export::export::{ExportEntry, Exportable, MethodSet};
//! use std::sync::Arc;
//!
//! struct Server;
//!
//! impl Server {
//!     fn double(&self, x: i64) -> i64 {
//!         x * 2
//!     }
//! }
//!
//! impl Exportable for Server {
//!     fn export_methods(self: Arc<Self>, methods: &mut MethodSet) {
//!         methods.add("Double", move |x: i64| self.double(x));
//!     }
//! }
//!
//! let entry = ExportEntry::bound(Arc::new(Server)).with_aliases([("Double", "double")]);
//! assert_eq!(entry.wire_names(), vec!["double".to_string()]);
//! ```

mod resolve;

pub use resolve::{resolve, Resolution};

use crate::error::Result;
use crate::method::{IntoMethod, Method};
use crate::name;
use crate::types::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Declared name to wire name.
pub type AliasMap = BTreeMap<String, String>;

/// Handler types exported as bound methods.
///
/// Called once at registration; the resulting table is cached with the
/// entry. Methods whose names do not start with an uppercase letter are not
/// reachable.
pub trait Exportable: Send + Sync + 'static {
    fn export_methods(self: Arc<Self>, methods: &mut MethodSet);
}

/// Named methods of a bound handler.
#[derive(Clone, Default)]
pub struct MethodSet {
    methods: BTreeMap<String, Method>,
}

impl MethodSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a method.
    pub fn add<M, F: IntoMethod<M>>(&mut self, name: impl Into<String>, handler: F) -> &mut Self {
        self.methods.insert(name.into(), Method::new(handler));
        self
    }

    /// Builder form of [`add`](Self::add).
    pub fn with<M, F: IntoMethod<M>>(mut self, name: impl Into<String>, handler: F) -> Self {
        self.add(name, handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Method)> {
        self.methods.iter().map(|(name, m)| (name.as_str(), m))
    }
}

impl fmt::Debug for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.methods.keys()).finish()
    }
}

/// Member of a method table.
#[derive(Debug, Clone)]
pub enum Member {
    Method(Method),
    /// A non-callable value; calling it yields INVALID_METHOD
    Value(Value),
}

/// Explicit name to member map.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    members: BTreeMap<String, Member>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a callable member.
    pub fn method<M, F: IntoMethod<M>>(mut self, name: impl Into<String>, handler: F) -> Self {
        self.members
            .insert(name.into(), Member::Method(Method::new(handler)));
        self
    }

    /// Insert a non-callable member.
    pub fn value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.insert(name.into(), Member::Value(value.into()));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, member: Member) {
        self.members.insert(name.into(), member);
    }

    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.members.iter().map(|(name, m)| (name.as_str(), m))
    }
}

/// Variant of an export entry.
#[derive(Debug, Clone)]
pub enum ExportKind {
    Methods(MethodSet),
    Table(MethodTable),
    Document(Arc<str>),
}

/// Something exported at a (path, interface) pair.
#[derive(Debug, Clone)]
pub struct ExportEntry {
    kind: ExportKind,
    aliases: Option<AliasMap>,
}

impl ExportEntry {
    /// Bound methods collected from an [`Exportable`] handler.
    pub fn bound<T: Exportable>(handler: Arc<T>) -> Self {
        let mut methods = MethodSet::new();
        handler.export_methods(&mut methods);
        Self::methods(methods)
    }

    /// Bound methods from an already-built set.
    pub fn methods(methods: MethodSet) -> Self {
        Self {
            kind: ExportKind::Methods(methods),
            aliases: None,
        }
    }

    pub fn table(table: MethodTable) -> Self {
        Self {
            kind: ExportKind::Table(table),
            aliases: None,
        }
    }

    /// Static introspection document.
    pub fn document(xml: impl Into<String>) -> Self {
        Self {
            kind: ExportKind::Document(Arc::from(xml.into())),
            aliases: None,
        }
    }

    /// Restrict reachable names to the targets of `aliases`.
    pub fn with_aliases<I, K, V>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.aliases = Some(
            aliases
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn kind(&self) -> &ExportKind {
        &self.kind
    }

    pub fn aliases(&self) -> Option<&AliasMap> {
        self.aliases.as_ref()
    }

    pub fn is_document(&self) -> bool {
        matches!(self.kind, ExportKind::Document(_))
    }

    /// Static document contents, if this is a document entry.
    pub fn document_xml(&self) -> Option<&str> {
        match &self.kind {
            ExportKind::Document(xml) => Some(xml),
            _ => None,
        }
    }

    /// Reject malformed wire names before the entry reaches the registry.
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(aliases) = &self.aliases {
            for wire in aliases.values() {
                name::check_member(wire)?;
            }
        }
        if let (ExportKind::Table(table), None) = (&self.kind, &self.aliases) {
            for (declared, _) in table.iter() {
                name::check_member(declared)?;
            }
        }
        Ok(())
    }

    /// Wire name under which a declared name is reachable, if any.
    pub(crate) fn wire_name<'a>(&'a self, declared: &'a str) -> Option<&'a str> {
        match &self.aliases {
            Some(aliases) => aliases.get(declared).map(String::as_str),
            None => Some(declared),
        }
    }

    /// Declared names answering a wire name, in declared-name order.
    ///
    /// Several declared names may share one wire name; resolution takes the
    /// first one the entry actually provides.
    pub(crate) fn declared_names<'a>(&'a self, wire: &'a str) -> Vec<&'a str> {
        match &self.aliases {
            Some(aliases) => aliases
                .iter()
                .filter(|(_, target)| target.as_str() == wire)
                .map(|(declared, _)| declared.as_str())
                .collect(),
            None => vec![wire],
        }
    }

    /// Reachable methods as (wire name, method), sorted by wire name.
    pub fn reachable_methods(&self) -> Vec<(String, &Method)> {
        let mut out: Vec<(String, &Method)> = match &self.kind {
            ExportKind::Methods(set) => set
                .iter()
                .filter(|(declared, _)| name::is_visible_member(declared))
                .filter_map(|(declared, m)| Some((self.wire_name(declared)?.to_string(), m)))
                .collect(),
            ExportKind::Table(table) => table
                .iter()
                .filter_map(|(declared, member)| match member {
                    Member::Method(m) if m.descriptor().returns_error => {
                        Some((self.wire_name(declared)?.to_string(), m))
                    }
                    _ => None,
                })
                .collect(),
            ExportKind::Document(_) => Vec::new(),
        };
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out.dedup_by(|a, b| a.0 == b.0);
        out
    }

    /// Wire names of reachable methods.
    pub fn wire_names(&self) -> Vec<String> {
        self.reachable_methods()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }
}
