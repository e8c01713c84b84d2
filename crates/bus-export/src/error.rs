// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for registration and dispatch.
//!
//! Two families live here:
//! - [`Error`]: returned synchronously to the registrant (bad path, bad name,
//!   bad configuration). Never delivered over the bus.
//! - [`ErrorKind`] / [`MethodError`]: dispatch failures. These always become
//!   an error [`Reply`](crate::message::Reply) sent back to the caller.

use crate::config;
use std::fmt;

/// Result type for registration and configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned to the registrant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Object path is malformed
    InvalidPath { path: String, reason: &'static str },

    /// Interface name is malformed
    InvalidInterface(String),

    /// Wire-visible method name is malformed
    InvalidMember(String),

    /// Server configuration could not be loaded
    Config(String),
}

impl Error {
    pub(crate) fn invalid_path(path: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPath { path, reason } => {
                write!(f, "Invalid object path '{}': {}", path, reason)
            }
            Self::InvalidInterface(name) => write!(f, "Invalid interface name '{}'", name),
            Self::InvalidMember(name) => write!(f, "Invalid method name '{}'", name),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Dispatch failure taxonomy.
///
/// Each kind maps to a wire error name. Handler-defined errors use
/// arbitrary names through [`MethodError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No export covers the requested path
    UnknownObject,
    /// The object exists but not with this interface
    UnknownInterface,
    /// No reachable method with this name
    UnknownMethod,
    /// Argument count or types do not match the handler
    InvalidArgs,
    /// The resolved member is not a valid callable for its entry kind
    InvalidMethod,
    /// Handler returned an error without a specific name, or panicked
    Failed,
}

impl ErrorKind {
    /// Wire error name for this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::UnknownObject => config::ERR_UNKNOWN_OBJECT,
            Self::UnknownInterface => config::ERR_UNKNOWN_INTERFACE,
            Self::UnknownMethod => config::ERR_UNKNOWN_METHOD,
            Self::InvalidArgs => config::ERR_INVALID_ARGS,
            Self::InvalidMethod => config::ERR_INVALID_METHOD,
            Self::Failed => config::ERR_FAILED,
        }
    }

    /// Reverse lookup from a wire error name.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::UnknownObject,
            Self::UnknownInterface,
            Self::UnknownMethod,
            Self::InvalidArgs,
            Self::InvalidMethod,
            Self::Failed,
        ]
        .into_iter()
        .find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error-kind value returned by handlers.
///
/// A handler whose last result is `Result<_, MethodError>` signals a
/// recoverable failure by returning `Err`; the dispatcher turns it into an
/// error reply carrying `name` and `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodError {
    /// Symbolic error name (dot-separated)
    pub name: String,
    /// Human-readable message
    pub message: String,
}

impl MethodError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Build from one of the standard kinds.
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(kind.name(), message)
    }

    /// Generic failure, the usual choice for application errors.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::from_kind(ErrorKind::Failed, message)
    }

    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::from_kind(ErrorKind::InvalidArgs, message)
    }

    /// Standard kind of this error, if its name is one of ours.
    pub fn kind(&self) -> Option<ErrorKind> {
        ErrorKind::from_name(&self.name)
    }
}

impl fmt::Display for MethodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for MethodError {}
