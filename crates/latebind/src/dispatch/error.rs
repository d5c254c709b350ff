// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for late-bound dispatch.

use crate::dispatch::MemberId;
use std::fmt;

/// Result type for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;

/// DOM `INVALID_STATE_ERR` exception code.
pub const INVALID_STATE_ERR: u16 = 11;

/// Code reported for handler failures without a domain code.
pub const UNHANDLED_EXCEPTION: u16 = 574;

const SEVERITY_ERROR: u32 = 1 << 31;
const FACILITY_ITF: u32 = 4 << 16;

/// Errors that can occur while resolving or invoking a member
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// No handler (and no attribute) is registered under this id
    UnknownMember(MemberId),

    /// Name does not resolve to a handler or an attribute
    UnknownName(String),

    /// A dynamic value could not be coerced to the parameter type
    InvalidArgument(String),

    /// Protocol violation (e.g. `send` before `open`)
    InvalidState(String),

    /// A required out-parameter slot was not supplied
    PointerRequired,

    /// A handler failed; the failure was recorded at the dispatch boundary
    Exception(ExceptionInfo),
}

impl DispatchError {
    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an invalid-state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Domain code carried into an [`ExceptionInfo`].
    pub fn code(&self) -> u16 {
        match self {
            Self::InvalidState(_) => INVALID_STATE_ERR,
            Self::Exception(info) => info.code,
            _ => UNHANDLED_EXCEPTION,
        }
    }

    /// True when the host should see "member not found" rather than an exception.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownMember(_) | Self::UnknownName(_))
    }

    /// Convert a handler failure into the structured record seen by the host.
    ///
    /// Lookup failures and already-recorded exceptions pass through unchanged.
    pub fn into_exception(self, source: &str) -> Self {
        match self {
            Self::UnknownMember(_) | Self::UnknownName(_) | Self::Exception(_) => self,
            other => Self::Exception(ExceptionInfo {
                source: source.to_string(),
                description: other.description(),
                code: other.code(),
            }),
        }
    }

    fn description(&self) -> String {
        match self {
            Self::InvalidArgument(msg) | Self::InvalidState(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMember(id) => write!(f, "member not found (ID:{})", id),
            Self::UnknownName(name) => write!(f, "unknown name: {}", name),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Self::InvalidState(msg) => write!(f, "invalid state: {}", msg),
            Self::PointerRequired => write!(f, "required output parameter not supplied"),
            Self::Exception(info) => write!(f, "{}", info),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Structured error record produced at the dispatch boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    /// Class that raised the error
    pub source: String,
    /// Human-readable description
    pub description: String,
    /// Domain code (`INVALID_STATE_ERR`, `UNHANDLED_EXCEPTION`, ...)
    pub code: u16,
}

impl ExceptionInfo {
    /// COM-style failure code: severity error, interface facility, domain code.
    pub fn scode(&self) -> u32 {
        SEVERITY_ERROR | FACILITY_ITF | u32::from(self.code)
    }
}

impl fmt::Display for ExceptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} raised 0x{:08X}: {}",
            self.source,
            self.scode(),
            self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_becomes_coded_exception() {
        let err = DispatchError::invalid_state("send before open").into_exception("XMLHttpRequest");
        match err {
            DispatchError::Exception(info) => {
                assert_eq!(info.source, "XMLHttpRequest");
                assert_eq!(info.description, "send before open");
                assert_eq!(info.code, INVALID_STATE_ERR);
                assert_eq!(info.scode(), 0x8004_000B);
            }
            other => panic!("expected exception, got {:?}", other),
        }
    }

    #[test]
    fn lookup_failures_pass_through() {
        let err = DispatchError::UnknownMember(MemberId(7)).into_exception("X");
        assert_eq!(err, DispatchError::UnknownMember(MemberId(7)));
        assert!(err.is_not_found());
    }

    #[test]
    fn argument_errors_keep_offending_text() {
        let err = DispatchError::invalid_argument("cannot convert 'abc' to int").into_exception("X");
        assert!(err.to_string().contains("'abc'"));
        assert_eq!(err.code(), UNHANDLED_EXCEPTION);
    }
}
