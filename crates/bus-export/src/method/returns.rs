// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handler return conventions.
//!
//! A handler returns either plain results (`T`, `()`, or a tuple), or plain
//! results wrapped in `Result<_, MethodError>`. The second form is the
//! error-kind convention: `Err` becomes an error reply.

use crate::error::MethodError;
use crate::path::ObjectPath;
use crate::types::{Arg, Kind, Signature, Value, Variant};
use std::collections::HashMap;
use std::hash::Hash;

/// Plain (non error-kind) results, marshaled in declared order.
pub trait ReturnValues {
    fn kinds() -> Vec<Kind>;
    fn into_values(self) -> Vec<Value>;
}

/// Anything a handler may return.
pub trait IntoReturn {
    /// Final declared result is error-kind.
    const ERROR_KIND: bool;

    /// Kinds of the results marshaled on success.
    fn result_kinds() -> Vec<Kind>;

    fn into_reply(self) -> Result<Vec<Value>, MethodError>;
}

impl<T: ReturnValues> IntoReturn for Result<T, MethodError> {
    const ERROR_KIND: bool = true;

    fn result_kinds() -> Vec<Kind> {
        T::kinds()
    }

    fn into_reply(self) -> Result<Vec<Value>, MethodError> {
        self.map(ReturnValues::into_values)
    }
}

macro_rules! plain_return {
    ([$($gen:tt)*] $ty:ty) => {
        impl<$($gen)*> IntoReturn for $ty {
            const ERROR_KIND: bool = false;

            fn result_kinds() -> Vec<Kind> {
                <Self as ReturnValues>::kinds()
            }

            fn into_reply(self) -> Result<Vec<Value>, MethodError> {
                Ok(ReturnValues::into_values(self))
            }
        }
    };
}

macro_rules! single_return {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ReturnValues for $ty {
                fn kinds() -> Vec<Kind> {
                    vec![<$ty as Arg>::kind()]
                }

                fn into_values(self) -> Vec<Value> {
                    vec![self.into_value()]
                }
            }

            plain_return!([] $ty);
        )*
    };
}

single_return!(bool, u8, i16, u16, i32, u32, i64, u64, f64, String, ObjectPath, Signature, Variant);

impl<T: Arg> ReturnValues for Vec<T> {
    fn kinds() -> Vec<Kind> {
        vec![<Self as Arg>::kind()]
    }

    fn into_values(self) -> Vec<Value> {
        vec![self.into_value()]
    }
}

plain_return!([T: Arg] Vec<T>);

impl<K: Arg + Eq + Hash, V: Arg> ReturnValues for HashMap<K, V> {
    fn kinds() -> Vec<Kind> {
        vec![<Self as Arg>::kind()]
    }

    fn into_values(self) -> Vec<Value> {
        vec![self.into_value()]
    }
}

plain_return!([K: Arg + Eq + Hash, V: Arg] HashMap<K, V>);

impl ReturnValues for () {
    fn kinds() -> Vec<Kind> {
        Vec::new()
    }

    fn into_values(self) -> Vec<Value> {
        Vec::new()
    }
}

plain_return!([] ());

macro_rules! tuple_return {
    ($(($($T:ident $v:ident),+))*) => {
        $(
            impl<$($T: Arg),+> ReturnValues for ($($T,)+) {
                fn kinds() -> Vec<Kind> {
                    vec![$($T::kind()),+]
                }

                fn into_values(self) -> Vec<Value> {
                    let ($($v,)+) = self;
                    vec![$($v.into_value()),+]
                }
            }

            plain_return!([$($T: Arg),+] ($($T,)+));
        )*
    };
}

tuple_return! {
    (A a, B b)
    (A a, B b, C c)
    (A a, B b, C c, D d)
}
