// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decoded argument and result values.

use crate::path::ObjectPath;
use crate::types::Kind;

/// A decoded value as delivered by the wire layer.
///
/// Containers carry their element kinds so that empty arrays and
/// dictionaries still have a complete type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // Basic
    Bool(bool),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    String(String),
    ObjectPath(ObjectPath),
    Signature(String),

    // Containers
    Variant(Box<Value>),
    Array(Kind, Vec<Value>),         // (element kind, items)
    Dict(Kind, Kind, Vec<(Value, Value)>), // (key kind, value kind, entries)
    Struct(Vec<Value>),
}

impl Value {
    /// Kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool(_) => Kind::Bool,
            Self::Byte(_) => Kind::Byte,
            Self::Int16(_) => Kind::Int16,
            Self::UInt16(_) => Kind::UInt16,
            Self::Int32(_) => Kind::Int32,
            Self::UInt32(_) => Kind::UInt32,
            Self::Int64(_) => Kind::Int64,
            Self::UInt64(_) => Kind::UInt64,
            Self::Double(_) => Kind::Double,
            Self::String(_) => Kind::String,
            Self::ObjectPath(_) => Kind::ObjectPath,
            Self::Signature(_) => Kind::Signature,
            Self::Variant(_) => Kind::Variant,
            Self::Array(element, _) => Kind::array(element.clone()),
            Self::Dict(key, value, _) => Kind::dict(key.clone(), value.clone()),
            Self::Struct(fields) => Kind::Struct(fields.iter().map(Value::kind).collect()),
        }
    }

    /// Check that this value has exactly `kind`.
    pub fn is_kind(&self, kind: &Kind) -> bool {
        self.kind() == *kind
    }

    /// Build a variant wrapping `inner`.
    pub fn variant(inner: impl Into<Value>) -> Self {
        Self::Variant(Box::new(inner.into()))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string (also matches object paths and signatures).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) | Self::Signature(v) => Some(v),
            Self::ObjectPath(p) => Some(p.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(_, items) => Some(items),
            _ => None,
        }
    }

    /// Unwrap one level of variant.
    pub fn as_variant(&self) -> Option<&Value> {
        match self {
            Self::Variant(inner) => Some(inner),
            _ => None,
        }
    }
}

// Conversion traits
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::Byte(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Int16(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::UInt16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::UInt32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::UInt64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<ObjectPath> for Value {
    fn from(v: ObjectPath) -> Self {
        Self::ObjectPath(v)
    }
}
