// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Interface and member name validation.

use crate::config::MAX_NAME_LEN;
use crate::error::{Error, Result};

fn is_element(s: &str) -> bool {
    let mut bytes = s.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Interface names: two or more dot-separated elements.
pub fn is_valid_interface(name: &str) -> bool {
    name.len() <= MAX_NAME_LEN && name.contains('.') && name.split('.').all(is_element)
}

/// Member (method) names: a single element.
pub fn is_valid_member(name: &str) -> bool {
    name.len() <= MAX_NAME_LEN && is_element(name)
}

/// Externally visible members start with an uppercase ASCII letter.
///
/// Bound-methods exports drop everything else at registration.
pub fn is_visible_member(name: &str) -> bool {
    is_valid_member(name) && name.as_bytes()[0].is_ascii_uppercase()
}

pub(crate) fn check_interface(name: &str) -> Result<()> {
    if is_valid_interface(name) {
        Ok(())
    } else {
        Err(Error::InvalidInterface(name.to_string()))
    }
}

pub(crate) fn check_member(name: &str) -> Result<()> {
    if is_valid_member(name) {
        Ok(())
    } else {
        Err(Error::InvalidMember(name.to_string()))
    }
}
