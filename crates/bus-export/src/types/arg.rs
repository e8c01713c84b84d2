// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversion between Rust types and decoded values.
//!
//! Handler parameters and results are ordinary Rust types. [`Arg`] gives each
//! one a static [`Kind`] (recorded once, when the handler is registered) and
//! the conversions used at call time.

use crate::path::ObjectPath;
use crate::types::{Kind, Value};
use std::collections::HashMap;
use std::hash::Hash;

/// A Rust type usable as a handler parameter or result.
pub trait Arg: Sized {
    /// Kind of every value of this type.
    fn kind() -> Kind;

    fn into_value(self) -> Value;

    /// Convert back; `None` if `value` has another kind.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! basic_arg {
    ($ty:ty, $kind:ident, $variant:ident) => {
        impl Arg for $ty {
            fn kind() -> Kind {
                Kind::$kind
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

basic_arg!(bool, Bool, Bool);
basic_arg!(u8, Byte, Byte);
basic_arg!(i16, Int16, Int16);
basic_arg!(u16, UInt16, UInt16);
basic_arg!(i32, Int32, Int32);
basic_arg!(u32, UInt32, UInt32);
basic_arg!(i64, Int64, Int64);
basic_arg!(u64, UInt64, UInt64);
basic_arg!(f64, Double, Double);
basic_arg!(String, String, String);
basic_arg!(ObjectPath, ObjectPath, ObjectPath);

/// A type signature carried as a value (`g`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(pub String);

impl Arg for Signature {
    fn kind() -> Kind {
        Kind::Signature
    }

    fn into_value(self) -> Value {
        Value::Signature(self.0)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Signature(s) => Some(Self(s)),
            _ => None,
        }
    }
}

/// A value of any kind (`v`).
#[derive(Debug, Clone, PartialEq)]
pub struct Variant(pub Value);

impl Arg for Variant {
    fn kind() -> Kind {
        Kind::Variant
    }

    fn into_value(self) -> Value {
        Value::Variant(Box::new(self.0))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Variant(inner) => Some(Self(*inner)),
            _ => None,
        }
    }
}

impl<T: Arg> Arg for Vec<T> {
    fn kind() -> Kind {
        Kind::array(T::kind())
    }

    fn into_value(self) -> Value {
        Value::Array(T::kind(), self.into_iter().map(Arg::into_value).collect())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(element, items) if element == T::kind() => {
                items.into_iter().map(T::from_value).collect()
            }
            _ => None,
        }
    }
}

impl<K, V> Arg for HashMap<K, V>
where
    K: Arg + Eq + Hash,
    V: Arg,
{
    fn kind() -> Kind {
        Kind::dict(K::kind(), V::kind())
    }

    fn into_value(self) -> Value {
        Value::Dict(
            K::kind(),
            V::kind(),
            self.into_iter()
                .map(|(k, v)| (k.into_value(), v.into_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Dict(key, val, entries) if key == K::kind() && val == V::kind() => entries
                .into_iter()
                .map(|(k, v)| Some((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            _ => None,
        }
    }
}
