//! Error types for txscope.

use std::fmt;

use crate::memory::TxId;

/// Errors raised by the in-memory connection.
///
/// The scope wrapper never produces these itself; it only forwards whatever
/// the connection returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A connection operation failed
    Connection(String),

    /// Commit or rollback for an identifier that was never begun
    UnknownTransaction(TxId),

    /// Commit or rollback for an identifier that was already finalized
    AlreadyFinalized(TxId),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(msg) => write!(f, "Connection error: {}", msg),
            Error::UnknownTransaction(id) => write!(f, "Unknown transaction: {}", id),
            Error::AlreadyFinalized(id) => write!(f, "Transaction {} already finalized", id),
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` type for txscope operations.
pub type Result<T> = std::result::Result<T, Error>;
