// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-erased handler callables.
//!
//! Any `Fn` whose parameters implement [`Arg`] and whose return type
//! implements [`IntoReturn`] becomes a [`Method`]. An optional leading
//! [`CallContext`] parameter receives the call metadata.
//!
//! The [`MethodDescriptor`] (argument kinds, result kinds, context flag,
//! error-kind flag) is computed once at construction and cached; dispatch
//! never inspects handler types again.
//!
//! # Example
//!
//! ```rust
//! use bus_export::method::Method;
//! use bus_export::message::CallContext;
//! use bus_export::MethodError;
//!
//! let double = Method::new(|x: i64| x * 2);
//! assert_eq!(double.descriptor().signature_in(), "x");
//! assert!(!double.descriptor().returns_error);
//!
//! let greet = Method::new(|ctx: CallContext, name: String| -> Result<String, MethodError> {
//!     Ok(format!("hello {} from {}", name, ctx.serial()))
//! });
//! assert!(greet.descriptor().wants_context);
//! assert!(greet.descriptor().returns_error);
//! ```

mod invoke;
mod returns;

pub use invoke::invoke;
pub use returns::{IntoReturn, ReturnValues};

use crate::error::MethodError;
use crate::message::CallContext;
use crate::types::{signature_of, Arg, Kind, Value};
use std::fmt;
use std::sync::Arc;

/// Cached calling convention of a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Expected argument kinds (context slot excluded)
    pub args: Vec<Kind>,
    /// Result kinds marshaled on success (error-kind slot excluded)
    pub results: Vec<Kind>,
    /// First parameter is a [`CallContext`]
    pub wants_context: bool,
    /// Final declared result is error-kind
    pub returns_error: bool,
}

impl MethodDescriptor {
    /// Input signature string.
    pub fn signature_in(&self) -> String {
        signature_of(&self.args)
    }

    /// Output signature string.
    pub fn signature_out(&self) -> String {
        signature_of(&self.results)
    }
}

type Callable = dyn Fn(CallContext, Vec<Value>) -> Result<Vec<Value>, MethodError> + Send + Sync;

/// A registered handler callable.
///
/// Cheap to clone; clones share the handler.
#[derive(Clone)]
pub struct Method {
    descriptor: Arc<MethodDescriptor>,
    call: Arc<Callable>,
}

impl Method {
    /// Wrap a typed handler.
    pub fn new<M, F: IntoMethod<M>>(handler: F) -> Self {
        handler.into_method()
    }

    /// Build from an explicit descriptor and an untyped callable.
    ///
    /// The callable receives arguments already checked against
    /// `descriptor.args`.
    pub fn from_parts<F>(descriptor: MethodDescriptor, call: F) -> Self
    where
        F: Fn(CallContext, Vec<Value>) -> Result<Vec<Value>, MethodError> + Send + Sync + 'static,
    {
        Self {
            descriptor: Arc::new(descriptor),
            call: Arc::new(call),
        }
    }

    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    pub(crate) fn call(
        &self,
        ctx: CallContext,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, MethodError> {
        (self.call)(ctx, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Conversion of a typed handler into a [`Method`].
///
/// `Marker` only disambiguates the blanket impls (with or without a leading
/// [`CallContext`], per arity); callers never name it.
pub trait IntoMethod<Marker> {
    fn into_method(self) -> Method;
}

#[doc(hidden)]
pub struct Plain;

#[doc(hidden)]
pub struct WithContext;

fn take_arg<T: Arg>(
    args: &mut std::vec::IntoIter<Value>,
    position: usize,
) -> Result<T, MethodError> {
    args.next().and_then(T::from_value).ok_or_else(|| {
        MethodError::invalid_args(format!("Argument {} has the wrong type", position))
    })
}

macro_rules! impl_into_method {
    ($(($($A:ident $a:ident),*))*) => {
        $(
            impl<F, R, $($A,)*> IntoMethod<(Plain, $($A,)*)> for F
            where
                F: Fn($($A),*) -> R + Send + Sync + 'static,
                R: IntoReturn,
                $($A: Arg,)*
            {
                fn into_method(self) -> Method {
                    let descriptor = MethodDescriptor {
                        args: vec![$($A::kind()),*],
                        results: R::result_kinds(),
                        wants_context: false,
                        returns_error: R::ERROR_KIND,
                    };
                    Method::from_parts(descriptor, move |_ctx, args| {
                        #[allow(unused_mut, unused_variables)]
                        let mut args = args.into_iter();
                        #[allow(unused_mut, unused_variables)]
                        let mut position = 0usize;
                        $(
                            let $a: $A = take_arg(&mut args, {
                                position += 1;
                                position - 1
                            })?;
                        )*
                        (self)($($a),*).into_reply()
                    })
                }
            }

            impl<F, R, $($A,)*> IntoMethod<(WithContext, $($A,)*)> for F
            where
                F: Fn(CallContext, $($A),*) -> R + Send + Sync + 'static,
                R: IntoReturn,
                $($A: Arg,)*
            {
                fn into_method(self) -> Method {
                    let descriptor = MethodDescriptor {
                        args: vec![$($A::kind()),*],
                        results: R::result_kinds(),
                        wants_context: true,
                        returns_error: R::ERROR_KIND,
                    };
                    Method::from_parts(descriptor, move |ctx, args| {
                        #[allow(unused_mut, unused_variables)]
                        let mut args = args.into_iter();
                        #[allow(unused_mut, unused_variables)]
                        let mut position = 0usize;
                        $(
                            let $a: $A = take_arg(&mut args, {
                                position += 1;
                                position - 1
                            })?;
                        )*
                        (self)(ctx, $($a),*).into_reply()
                    })
                }
            }
        )*
    };
}

impl_into_method! {
    ()
    (A1 a1)
    (A1 a1, A2 a2)
    (A1 a1, A2 a2, A3 a3)
    (A1 a1, A2 a2, A3 a3, A4 a4)
    (A1 a1, A2 a2, A3 a3, A4 a4, A5 a5)
    (A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6)
}
