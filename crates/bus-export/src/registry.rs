// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object registry: where exports live.
//!
//! Two path-indexed tables map (path, interface) to an [`ExportEntry`]:
//!
//! ```text
//! Registry
//! +-- tables: RwLock<Tables>
//!     +-- exact:   HashMap<ObjectPath, BTreeMap<interface, Arc<ExportEntry>>>
//!     +-- subtree: HashMap<ObjectPath, BTreeMap<interface, Arc<ExportEntry>>>
//! ```
//!
//! # Lookup
//!
//! 1. Exact table at `(path, interface)`: always wins, whatever the depth of
//!    any covering subtree export.
//! 2. Subtree table at `path` itself, then each ancestor up to `/`; the most
//!    specific (longest) covering registration wins.
//! 3. Otherwise UNKNOWN_INTERFACE if anything is exported for the object,
//!    UNKNOWN_OBJECT if not.
//!
//! # Thread Safety
//!
//! A single `RwLock` guards both tables. Lookups clone the entry `Arc` out
//! and release the lock before any handler runs, so an in-flight call keeps
//! the entry it resolved even if the registration is replaced meanwhile.

use crate::error::{ErrorKind, Result};
use crate::export::ExportEntry;
use crate::name;
use crate::path::ObjectPath;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

type InterfaceMap = BTreeMap<String, Arc<ExportEntry>>;

/// Which table a registration lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Matches the path only
    Exact,
    /// Matches the path and every descendant
    Subtree,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("exact"),
            Self::Subtree => f.write_str("subtree"),
        }
    }
}

#[derive(Default)]
struct Tables {
    exact: HashMap<ObjectPath, InterfaceMap>,
    subtree: HashMap<ObjectPath, InterfaceMap>,
}

impl Tables {
    fn table_mut(&mut self, scope: Scope) -> &mut HashMap<ObjectPath, InterfaceMap> {
        match scope {
            Scope::Exact => &mut self.exact,
            Scope::Subtree => &mut self.subtree,
        }
    }

    fn remove(&mut self, scope: Scope, path: &ObjectPath, interface: &str) -> bool {
        let table = self.table_mut(scope);
        let Some(interfaces) = table.get_mut(path) else {
            return false;
        };
        let removed = interfaces.remove(interface).is_some();
        if interfaces.is_empty() {
            table.remove(path);
        }
        removed
    }

    fn covering_subtree<'a>(
        &'a self,
        path: &ObjectPath,
    ) -> impl Iterator<Item = &'a InterfaceMap> + 'a {
        path.ancestors()
            .filter_map(move |ancestor| self.subtree.get(&ancestor))
    }
}

/// A successful lookup.
#[derive(Debug, Clone)]
pub struct Target {
    pub entry: Arc<ExportEntry>,
    pub scope: Scope,
    /// Path the entry was registered at (an ancestor for subtree hits)
    pub registered_at: ObjectPath,
}

/// Registry of exported objects, owned by a server instance.
#[derive(Default)]
pub struct Registry {
    tables: RwLock<Tables>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an exact export; `None` removes the pair.
    pub fn register_exact(
        &self,
        path: impl AsRef<str>,
        interface: &str,
        entry: Option<ExportEntry>,
    ) -> Result<()> {
        self.register(Scope::Exact, path.as_ref(), interface, entry)
    }

    /// Register (or replace) a subtree export; `None` removes the pair.
    pub fn register_subtree(
        &self,
        path: impl AsRef<str>,
        interface: &str,
        entry: Option<ExportEntry>,
    ) -> Result<()> {
        self.register(Scope::Subtree, path.as_ref(), interface, entry)
    }

    /// Remove `(path, interface)` from both tables.
    ///
    /// Returns whether anything was removed.
    pub fn unregister(&self, path: impl AsRef<str>, interface: &str) -> Result<bool> {
        let path = ObjectPath::new(path.as_ref())?;
        let mut tables = self.tables.write();
        let exact = tables.remove(Scope::Exact, &path, interface);
        let subtree = tables.remove(Scope::Subtree, &path, interface);
        drop(tables);

        if exact || subtree {
            log::debug!("[registry] unexported {} at {}", interface, path);
        }
        Ok(exact || subtree)
    }

    fn register(
        &self,
        scope: Scope,
        path: &str,
        interface: &str,
        entry: Option<ExportEntry>,
    ) -> Result<()> {
        let path = ObjectPath::new(path)?;

        let Some(entry) = entry else {
            self.unregister(&path, interface)?;
            return Ok(());
        };

        name::check_interface(interface)?;
        entry.validate()?;

        let other = match scope {
            Scope::Exact => Scope::Subtree,
            Scope::Subtree => Scope::Exact,
        };

        // One entry per (path, interface), whichever table it lands in.
        let entry = Arc::new(entry);
        let mut tables = self.tables.write();
        tables.remove(other, &path, interface);
        tables
            .table_mut(scope)
            .entry(path.clone())
            .or_default()
            .insert(interface.to_string(), entry);
        drop(tables);

        log::debug!("[registry] exported {} at {} ({})", interface, path, scope);
        Ok(())
    }

    /// Entry serving `(path, interface)`, if any.
    pub fn lookup(&self, path: &ObjectPath, interface: &str) -> Option<Arc<ExportEntry>> {
        self.find(path, interface).ok().map(|target| target.entry)
    }

    /// Like [`lookup`](Self::lookup), reporting where the entry came from or
    /// why nothing matched.
    pub fn find(
        &self,
        path: &ObjectPath,
        interface: &str,
    ) -> std::result::Result<Target, ErrorKind> {
        let tables = self.tables.read();

        if let Some(entry) = tables.exact.get(path).and_then(|m| m.get(interface)) {
            return Ok(Target {
                entry: Arc::clone(entry),
                scope: Scope::Exact,
                registered_at: path.clone(),
            });
        }

        for ancestor in path.ancestors() {
            if let Some(entry) = tables
                .subtree
                .get(&ancestor)
                .and_then(|m| m.get(interface))
            {
                return Ok(Target {
                    entry: Arc::clone(entry),
                    scope: Scope::Subtree,
                    registered_at: ancestor,
                });
            }
        }

        let object_exists =
            tables.exact.contains_key(path) || tables.covering_subtree(path).next().is_some();
        if object_exists {
            Err(ErrorKind::UnknownInterface)
        } else {
            Err(ErrorKind::UnknownObject)
        }
    }

    /// Every interface reachable at `path`, with the entry serving it.
    ///
    /// Exact registrations shadow subtree ones per interface; among subtree
    /// registrations the most specific wins. Sorted by interface name.
    pub fn object_interfaces(&self, path: &ObjectPath) -> Vec<(String, Arc<ExportEntry>)> {
        let tables = self.tables.read();
        let mut merged: BTreeMap<&str, &Arc<ExportEntry>> = BTreeMap::new();

        // Least specific first so that later inserts override.
        let covering: Vec<&InterfaceMap> = tables.covering_subtree(path).collect();
        for interfaces in covering.into_iter().rev() {
            for (iface, entry) in interfaces {
                merged.insert(iface, entry);
            }
        }
        if let Some(interfaces) = tables.exact.get(path) {
            for (iface, entry) in interfaces {
                merged.insert(iface, entry);
            }
        }

        merged
            .into_iter()
            .map(|(iface, entry)| (iface.to_string(), Arc::clone(entry)))
            .collect()
    }

    /// Exact registrations at `path`, sorted by interface name.
    pub fn exact_at(&self, path: &ObjectPath) -> Vec<(String, Arc<ExportEntry>)> {
        self.tables
            .read()
            .exact
            .get(path)
            .map(|interfaces| {
                interfaces
                    .iter()
                    .map(|(iface, entry)| (iface.clone(), Arc::clone(entry)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Distinct immediate child segments of `path` among exact registrations.
    pub fn exact_children(&self, path: &ObjectPath) -> Vec<String> {
        let tables = self.tables.read();
        let mut children: Vec<String> = tables
            .exact
            .keys()
            .filter_map(|registered| path.child_segment(registered))
            .map(str::to_string)
            .collect();
        drop(tables);

        children.sort();
        children.dedup();
        children
    }

    /// Paths with at least one exact registration, sorted.
    pub fn exact_paths(&self) -> Vec<ObjectPath> {
        let mut paths: Vec<ObjectPath> = self.tables.read().exact.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Interfaces registered at `path` in the given table, sorted.
    pub fn interfaces_at(&self, scope: Scope, path: &ObjectPath) -> Vec<String> {
        let tables = self.tables.read();
        let table = match scope {
            Scope::Exact => &tables.exact,
            Scope::Subtree => &tables.subtree,
        };
        table
            .get(path)
            .map(|interfaces| interfaces.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Total number of (path, interface) registrations across both tables.
    pub fn len(&self) -> usize {
        let tables = self.tables.read();
        let count = |t: &HashMap<ObjectPath, InterfaceMap>| {
            t.values().map(BTreeMap::len).sum::<usize>()
        };
        count(&tables.exact) + count(&tables.subtree)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("Registry")
            .field("exact_paths", &tables.exact.len())
            .field("subtree_paths", &tables.subtree.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
