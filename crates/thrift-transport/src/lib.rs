//! Typed transport exceptions for the Thrift RPC stack.
//!
//! Transports raise whatever error their I/O layer produces; [`classify`] folds
//! those into a [`TransportException`] whose category callers can branch on.

mod classify;
mod exception;

pub use classify::{Eof, TransportFailure, category, classify};
pub use exception::{TransportException, TransportExceptionType};
