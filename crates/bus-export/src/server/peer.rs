// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `org.freedesktop.DBus.Peer`, answered at every path.

use crate::config::{GET_MACHINE_ID_METHOD, PING_METHOD};
use crate::error::{ErrorKind, MethodError};
use crate::types::Value;
use std::path::PathBuf;

/// Answer a Peer method, or `None` if `member` is not one.
pub(crate) fn call(
    member: &str,
    machine_id_paths: &[PathBuf],
) -> Option<Result<Vec<Value>, MethodError>> {
    match member {
        PING_METHOD => Some(Ok(Vec::new())),
        GET_MACHINE_ID_METHOD => {
            Some(machine_id(machine_id_paths).map(|id| vec![Value::String(id)]))
        }
        _ => None,
    }
}

pub(crate) fn is_member(member: &str) -> bool {
    matches!(member, PING_METHOD | GET_MACHINE_ID_METHOD)
}

/// First non-empty line of the first readable file.
pub(crate) fn machine_id(paths: &[PathBuf]) -> Result<String, MethodError> {
    for path in paths {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                if let Some(line) = content.lines().map(str::trim).find(|l| !l.is_empty()) {
                    return Ok(line.to_string());
                }
                log::debug!("[peer] machine id file {} is empty", path.display());
            }
            Err(e) => log::debug!("[peer] cannot read {}: {}", path.display(), e),
        }
    }
    Err(MethodError::from_kind(ErrorKind::Failed, "Unable to read machine id"))
}
