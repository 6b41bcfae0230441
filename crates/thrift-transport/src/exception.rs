use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a transport failure, carrying the Thrift wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportExceptionType {
    /// Failure with no more specific category.
    Unknown = 0,
    /// Transport used before it was opened.
    NotOpen = 1,
    /// Transport opened twice.
    AlreadyOpen = 2,
    /// Operation exceeded its deadline.
    TimedOut = 3,
    /// Stream has no more data to read.
    EndOfFile = 4,
    /// Operation interrupted before completion.
    Interrupted = 5,
    /// Caller passed invalid arguments to the transport.
    BadArgs = 6,
    /// Bytes read from the transport could not be decoded.
    CorruptedData = 7,
    /// Transport does not implement the requested operation.
    NotSupported = 9,
}

impl TransportExceptionType {
    /// Returns the code sent on the wire for this category.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Maps a wire code back to a category; unrecognized codes become `Unknown`.
    pub const fn from_code(code: i32) -> Self {
        match code {
            1 => Self::NotOpen,
            2 => Self::AlreadyOpen,
            3 => Self::TimedOut,
            4 => Self::EndOfFile,
            5 => Self::Interrupted,
            6 => Self::BadArgs,
            7 => Self::CorruptedData,
            9 => Self::NotSupported,
            _ => Self::Unknown,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::NotOpen => "NOT_OPEN",
            Self::AlreadyOpen => "ALREADY_OPEN",
            Self::TimedOut => "TIMED_OUT",
            Self::EndOfFile => "END_OF_FILE",
            Self::Interrupted => "INTERRUPTED",
            Self::BadArgs => "BAD_ARGS",
            Self::CorruptedData => "CORRUPTED_DATA",
            Self::NotSupported => "NOT_SUPPORTED",
        }
    }
}

impl fmt::Display for TransportExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport failure surfaced to the RPC layer.
///
/// The message is the text of the failure it was built from, unchanged. The
/// exception keeps no reference to that failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct TransportException {
    /// Failure category.
    type_id: TransportExceptionType,
    /// Original failure text.
    message: String,
}

impl TransportException {
    /// Builds an exception for a transport that already knows the category.
    pub fn new(type_id: TransportExceptionType, message: impl Into<String>) -> Self {
        Self {
            type_id,
            message: message.into(),
        }
    }

    /// Failure category.
    pub fn kind(&self) -> TransportExceptionType {
        self.type_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
