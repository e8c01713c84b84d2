// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object paths.
//!
//! An object path is the hierarchical address of an exported object:
//!
//! ```text
//! /                       root
//! /org/example/Player     three segments
//! ```
//!
//! Rules:
//! - must start with `/`
//! - non-root paths must not end with `/`
//! - segments are non-empty and use only `[A-Za-z0-9_]`
//!
//! Paths are validated once, when an [`ObjectPath`] is built. Everything
//! downstream (registry, router, introspection) works on already-valid paths.

use crate::error::{Error, Result};
use std::fmt;

/// A validated, normalized object path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPath(String);

impl ObjectPath {
    /// Validate and wrap a path.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if let Err(reason) = validate(&path) {
            return Err(Error::invalid_path(path, reason));
        }
        Ok(Self(path))
    }

    /// The root path `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Check a path without allocating.
    pub fn is_valid(path: &str) -> bool {
        validate(path).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Iterate the path's segments (empty for the root).
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Parent path, or `None` for the root.
    pub fn parent(&self) -> Option<ObjectPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// This path followed by every ancestor up to the root, most specific first.
    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: Some(self.clone()),
        }
    }

    /// True if `self` is a strict ancestor of `other`.
    ///
    /// Works on segment boundaries: `/a/b` is an ancestor of `/a/b/c` but
    /// not of `/a/bc`.
    pub fn is_ancestor_of(&self, other: &ObjectPath) -> bool {
        if self == other {
            return false;
        }
        if self.is_root() {
            return true;
        }
        other
            .0
            .strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// First segment of `descendant` below `self`.
    ///
    /// Returns `None` unless `descendant` is a strict descendant.
    pub fn child_segment<'a>(&self, descendant: &'a ObjectPath) -> Option<&'a str> {
        if !self.is_ancestor_of(descendant) {
            return None;
        }
        let rest = if self.is_root() {
            &descendant.0[1..]
        } else {
            &descendant.0[self.0.len() + 1..]
        };
        rest.split('/').next()
    }
}

/// Iterator returned by [`ObjectPath::ancestors`].
pub struct Ancestors {
    next: Option<ObjectPath>,
}

impl Iterator for Ancestors {
    type Item = ObjectPath;

    fn next(&mut self) -> Option<ObjectPath> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ObjectPath {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<String> for ObjectPath {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

fn validate(path: &str) -> std::result::Result<(), &'static str> {
    if path.is_empty() {
        return Err("path is empty");
    }
    if !path.starts_with('/') {
        return Err("path must start with '/'");
    }
    if path == "/" {
        return Ok(());
    }
    if path.ends_with('/') {
        return Err("path must not end with '/'");
    }
    for segment in path[1..].split('/') {
        if segment.is_empty() {
            return Err("path contains an empty segment");
        }
        if !segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            return Err("segment contains characters outside [A-Za-z0-9_]");
        }
    }
    Ok(())
}
