// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Request ready states.

use std::fmt;

/// Observable state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum ReadyState {
    #[default]
    Unsent = 0,
    Opened = 1,
    HeadersReceived = 2,
    Loading = 3,
    Done = 4,
}

impl ReadyState {
    /// Numeric value reported through `readyState`.
    pub const fn code(self) -> i64 {
        self as i64
    }

    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unsent),
            1 => Some(Self::Opened),
            2 => Some(Self::HeadersReceived),
            3 => Some(Self::Loading),
            4 => Some(Self::Done),
            _ => None,
        }
    }

    /// Opened and not yet finished.
    pub const fn is_in_flight(self) -> bool {
        matches!(self, Self::Opened | Self::HeadersReceived | Self::Loading)
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unsent => "UNSENT",
            Self::Opened => "OPENED",
            Self::HeadersReceived => "HEADERS_RECEIVED",
            Self::Loading => "LOADING",
            Self::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// One step of the request state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StateChange {
    /// Persist the state and notify
    Notify(ReadyState),
    /// Persist the state without notifying
    Silent(ReadyState),
    /// Notify for the send step; nothing is persisted
    SendStarted,
}

impl StateChange {
    pub(crate) fn target(self) -> Option<ReadyState> {
        match self {
            Self::Notify(s) | Self::Silent(s) => Some(s),
            Self::SendStarted => None,
        }
    }

    pub(crate) fn notifies(self) -> bool {
        !matches!(self, Self::Silent(_))
    }
}
