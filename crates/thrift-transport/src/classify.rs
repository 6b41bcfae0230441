use std::{error::Error as StdError, fmt, io, iter};

use thiserror::Error;
use tokio::time::error::Elapsed;

use crate::{TransportException, TransportExceptionType};

/// Capabilities a failure can expose to the classifier.
///
/// Every probe defaults to "not present", so implementing the trait for a
/// plain error only needs `Display`.
pub trait TransportFailure: fmt::Display {
    /// Whether the failure was caused by an elapsed deadline.
    fn timed_out(&self) -> bool {
        false
    }

    /// Whether the failure is the end-of-stream signal.
    fn is_end_of_file(&self) -> bool {
        false
    }

    /// Category already assigned to this failure, if any.
    fn exception_type(&self) -> Option<TransportExceptionType> {
        None
    }
}

/// Canonical end-of-stream marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Error)]
#[error("EOF")]
pub struct Eof;

impl TransportFailure for Eof {
    fn is_end_of_file(&self) -> bool {
        true
    }
}

impl TransportFailure for TransportException {
    fn timed_out(&self) -> bool {
        self.kind() == TransportExceptionType::TimedOut
    }

    fn is_end_of_file(&self) -> bool {
        self.kind() == TransportExceptionType::EndOfFile
    }

    fn exception_type(&self) -> Option<TransportExceptionType> {
        Some(self.kind())
    }
}

impl TransportFailure for io::Error {
    fn timed_out(&self) -> bool {
        // Blocking sockets with a read timeout report WouldBlock on unix. A
        // non-blocking socket with no data ready reports it too and is counted
        // as a timeout here.
        matches!(self.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
            || io_payload(self).is_some_and(|inner| inner.timed_out())
    }

    fn is_end_of_file(&self) -> bool {
        self.kind() == io::ErrorKind::UnexpectedEof
            || io_payload(self).is_some_and(|inner| inner.is_end_of_file())
    }
}

/// Recognized error wrapped by `io::Error::new`; `source()` skips it.
fn io_payload(err: &io::Error) -> Option<&dyn TransportFailure> {
    let inner: &(dyn StdError + 'static) = err.get_ref()?;
    recognize(inner)
}

impl TransportFailure for Elapsed {
    fn timed_out(&self) -> bool {
        true
    }
}

impl<T: TransportFailure + ?Sized> TransportFailure for Box<T> {
    fn timed_out(&self) -> bool {
        (**self).timed_out()
    }

    fn is_end_of_file(&self) -> bool {
        (**self).is_end_of_file()
    }

    fn exception_type(&self) -> Option<TransportExceptionType> {
        (**self).exception_type()
    }
}

/// Recognizes the failure types this crate knows how to probe.
fn recognize<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a dyn TransportFailure> {
    if let Some(err) = err.downcast_ref::<TransportException>() {
        return Some(err);
    }
    if let Some(err) = err.downcast_ref::<io::Error>() {
        return Some(err);
    }
    if let Some(err) = err.downcast_ref::<Elapsed>() {
        return Some(err);
    }
    if let Some(err) = err.downcast_ref::<Eof>() {
        return Some(err);
    }
    None
}

/// Recognized failures along the `source()` chain, outermost first.
fn recognized_chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a dyn TransportFailure> {
    iter::successors(Some(err), |&err| err.source()).filter_map(recognize)
}

impl TransportFailure for dyn StdError + 'static {
    fn timed_out(&self) -> bool {
        recognized_chain(self).any(|err| err.timed_out())
    }

    fn is_end_of_file(&self) -> bool {
        recognized_chain(self).any(|err| err.is_end_of_file())
    }

    fn exception_type(&self) -> Option<TransportExceptionType> {
        recognize(self).and_then(|err| err.exception_type())
    }
}

impl TransportFailure for dyn StdError + Send + Sync + 'static {
    fn timed_out(&self) -> bool {
        (self as &(dyn StdError + 'static)).timed_out()
    }

    fn is_end_of_file(&self) -> bool {
        (self as &(dyn StdError + 'static)).is_end_of_file()
    }

    fn exception_type(&self) -> Option<TransportExceptionType> {
        (self as &(dyn StdError + 'static)).exception_type()
    }
}

/// Returns the category a failure classifies as.
///
/// A timeout wins, then end-of-stream, then a category the failure already
/// carries; anything else is `Unknown`.
pub fn category<E: TransportFailure + ?Sized>(err: &E) -> TransportExceptionType {
    if err.timed_out() {
        TransportExceptionType::TimedOut
    } else if err.is_end_of_file() {
        TransportExceptionType::EndOfFile
    } else {
        err.exception_type().unwrap_or(TransportExceptionType::Unknown)
    }
}

/// Wraps a failure into a [`TransportException`], keeping its text verbatim.
pub fn classify<E: TransportFailure + ?Sized>(err: &E) -> TransportException {
    let type_id = category(err);
    let message = err.to_string();
    tracing::trace!(%type_id, %message, "classified transport failure");
    TransportException::new(type_id, message)
}

impl TransportException {
    /// Same as [`classify`].
    pub fn from_error<E: TransportFailure + ?Sized>(err: &E) -> Self {
        classify(err)
    }
}

impl From<io::Error> for TransportException {
    fn from(err: io::Error) -> Self {
        classify(&err)
    }
}

impl From<Elapsed> for TransportException {
    fn from(err: Elapsed) -> Self {
        classify(&err)
    }
}

impl From<Eof> for TransportException {
    fn from(err: Eof) -> Self {
        classify(&err)
    }
}
