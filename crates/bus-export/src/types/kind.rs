// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type kinds and their wire signature codes.

use std::fmt;

/// Type of a decoded value.
///
/// Used for argument validation and for the `type` attribute of
/// introspection `<arg>` elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Double,
    String,
    ObjectPath,
    Signature,
    /// Self-describing container holding any single value.
    Variant,
    /// Homogeneous array.
    Array(Box<Kind>),
    /// Dictionary (key kind, value kind).
    Dict(Box<Kind>, Box<Kind>),
    /// Fixed sequence of fields.
    Struct(Vec<Kind>),
}

impl Kind {
    pub fn array(element: Kind) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn dict(key: Kind, value: Kind) -> Self {
        Self::Dict(Box::new(key), Box::new(value))
    }

    /// Check if this is a basic (non-container) kind.
    pub fn is_basic(&self) -> bool {
        !matches!(
            self,
            Self::Variant | Self::Array(_) | Self::Dict(..) | Self::Struct(_)
        )
    }

    /// Single-character code for basic kinds.
    pub fn code(&self) -> Option<char> {
        let code = match self {
            Self::Bool => 'b',
            Self::Byte => 'y',
            Self::Int16 => 'n',
            Self::UInt16 => 'q',
            Self::Int32 => 'i',
            Self::UInt32 => 'u',
            Self::Int64 => 'x',
            Self::UInt64 => 't',
            Self::Double => 'd',
            Self::String => 's',
            Self::ObjectPath => 'o',
            Self::Signature => 'g',
            Self::Variant => 'v',
            Self::Array(_) | Self::Dict(..) | Self::Struct(_) => return None,
        };
        Some(code)
    }

    /// Full signature string, e.g. `a{sv}`.
    pub fn signature(&self) -> String {
        let mut out = String::new();
        self.write_signature(&mut out);
        out
    }

    fn write_signature(&self, out: &mut String) {
        match self {
            Self::Array(element) => {
                out.push('a');
                element.write_signature(out);
            }
            Self::Dict(key, value) => {
                out.push_str("a{");
                key.write_signature(out);
                value.write_signature(out);
                out.push('}');
            }
            Self::Struct(fields) => {
                out.push('(');
                for field in fields {
                    field.write_signature(out);
                }
                out.push(')');
            }
            basic => {
                if let Some(code) = basic.code() {
                    out.push(code);
                }
            }
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

/// Concatenated signature of a kind list, e.g. `sx` for `(String, Int64)`.
pub fn signature_of(kinds: &[Kind]) -> String {
    kinds.iter().map(Kind::signature).collect()
}
