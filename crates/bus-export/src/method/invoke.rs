// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Argument validation and isolated execution of handlers.

use crate::error::{ErrorKind, MethodError};
use crate::message::CallContext;
use crate::method::Method;
use crate::types::Value;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Validate `args` against the handler's descriptor and run it.
///
/// Never panics on behalf of the handler: a panic inside the handler
/// becomes a FAILED error carrying the panic message. Arity or type
/// mismatches become INVALID_ARGS without calling the handler.
pub fn invoke(
    method: &Method,
    ctx: CallContext,
    args: Vec<Value>,
) -> Result<Vec<Value>, MethodError> {
    check_args(method, &args)?;

    match catch_unwind(AssertUnwindSafe(|| method.call(ctx, args))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let detail = panic_message(payload.as_ref());
            log::warn!("[invoke] handler panicked: {}", detail);
            Err(MethodError::from_kind(
                ErrorKind::Failed,
                format!("handler panicked: {}", detail),
            ))
        }
    }
}

fn check_args(method: &Method, args: &[Value]) -> Result<(), MethodError> {
    let expected = &method.descriptor().args;
    if args.len() != expected.len() {
        return Err(MethodError::invalid_args(format!(
            "Expected {} arguments, got {}",
            expected.len(),
            args.len()
        )));
    }
    for (position, (arg, kind)) in args.iter().zip(expected).enumerate() {
        if !arg.is_kind(kind) {
            return Err(MethodError::invalid_args(format!(
                "Argument {}: expected type '{}', got '{}'",
                position,
                kind,
                arg.kind()
            )));
        }
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
