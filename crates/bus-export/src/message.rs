// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Call and reply records exchanged with the wire layer.
//!
//! # Correlation
//!
//! Each incoming [`Call`] carries a [`ReplyToken`] (serial + sender). The
//! [`Reply`] produced for it carries the same token so the transport can route
//! it back to the caller.

use crate::error::{ErrorKind, MethodError};
use crate::path::ObjectPath;
use crate::types::Value;

/// Header flags of an incoming call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u8);

impl Flags {
    /// Caller does not want a reply.
    pub const NO_REPLY_EXPECTED: Flags = Flags(0x1);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

/// Identifies the call a reply belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ReplyToken {
    /// Serial assigned by the caller
    pub serial: u32,
    /// Unique name of the caller, if known
    pub sender: Option<String>,
}

impl ReplyToken {
    pub fn new(serial: u32, sender: Option<String>) -> Self {
        Self { serial, sender }
    }
}

/// Decoded incoming method call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub path: ObjectPath,
    /// Interface name; `None` lets the router search every interface at the object
    pub interface: Option<String>,
    pub member: String,
    pub args: Vec<Value>,
    pub token: ReplyToken,
    pub flags: Flags,
}

impl Call {
    /// Build a call with serial 0 and no sender.
    pub fn new(path: ObjectPath, interface: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            path,
            interface: Some(interface.into()),
            member: member.into(),
            args: Vec::new(),
            token: ReplyToken::default(),
            flags: Flags::empty(),
        }
    }

    /// Drop the interface name.
    pub fn without_interface(mut self) -> Self {
        self.interface = None;
        self
    }

    /// Append one argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn serial(mut self, serial: u32) -> Self {
        self.token.serial = serial;
        self
    }

    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.token.sender = Some(sender.into());
        self
    }

    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn expects_reply(&self) -> bool {
        !self.flags.contains(Flags::NO_REPLY_EXPECTED)
    }

    /// Context handed to handlers that ask for it.
    pub fn context(&self) -> CallContext {
        CallContext {
            path: self.path.clone(),
            interface: self.interface.clone(),
            member: self.member.clone(),
            token: self.token.clone(),
        }
    }
}

/// Metadata of the call being served, passed to handlers whose first
/// parameter is a `CallContext`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub path: ObjectPath,
    pub interface: Option<String>,
    pub member: String,
    pub token: ReplyToken,
}

impl CallContext {
    pub fn serial(&self) -> u32 {
        self.token.serial
    }

    pub fn sender(&self) -> Option<&str> {
        self.token.sender.as_deref()
    }
}

/// Outgoing reply record.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Method return carrying results in declared order
    Return { token: ReplyToken, results: Vec<Value> },
    /// Error reply
    Error {
        token: ReplyToken,
        name: String,
        message: String,
    },
}

impl Reply {
    pub fn method_return(token: ReplyToken, results: Vec<Value>) -> Self {
        Self::Return { token, results }
    }

    pub fn error(token: ReplyToken, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            token,
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn from_kind(token: ReplyToken, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::error(token, kind.name(), message)
    }

    pub fn from_method_error(token: ReplyToken, err: MethodError) -> Self {
        Self::Error {
            token,
            name: err.name,
            message: err.message,
        }
    }

    pub fn token(&self) -> &ReplyToken {
        match self {
            Self::Return { token, .. } | Self::Error { token, .. } => token,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn results(&self) -> Option<&[Value]> {
        match self {
            Self::Return { results, .. } => Some(results),
            Self::Error { .. } => None,
        }
    }

    /// Error name, if this is an error reply.
    pub fn error_name(&self) -> Option<&str> {
        match self {
            Self::Error { name, .. } => Some(name),
            Self::Return { .. } => None,
        }
    }

    /// Standard kind of an error reply.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_name().and_then(ErrorKind::from_name)
    }
}
