// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decoded values and their types.
//!
//! The wire layer hands the dispatcher already-decoded [`Value`]s and takes
//! typed [`Value`]s back. This module never touches bytes.
//!
//! - **Kind**: runtime type of a value, with its signature code
//! - **Value**: decoded argument/result container
//! - **Arg**: mapping from Rust handler types to kinds and values
//!
//! # Example
//!
//! ```rust
//! use bus_export::types::{Arg, Kind, Value};
//!
//! assert_eq!(Vec::<String>::kind().signature(), "as");
//! let v = 4i64.into_value();
//! assert_eq!(v.kind(), Kind::Int64);
//! assert_eq!(i64::from_value(v), Some(4));
//! ```

mod arg;
mod kind;
mod value;

pub use arg::{Arg, Signature, Variant};
pub use kind::{signature_of, Kind};
pub use value::Value;
