//! The collaborator contract consumed by transactions.

use std::fmt::Debug;

/// A connection that can run units of work.
///
/// Once [`begin_transaction`](Connection::begin_transaction) hands out an
/// identifier, exactly one of [`commit_transaction`](Connection::commit_transaction)
/// or [`rollback_transaction`](Connection::rollback_transaction) must later be
/// called with it. [`Transaction`](crate::Transaction) upholds this for callers.
pub trait Connection {
    /// Opaque token identifying one unit of work
    type TxId: Clone + Debug;

    /// Failure raised by any of the three operations
    type Error: Debug;

    /// Start a unit of work. Each call yields a fresh identifier.
    fn begin_transaction(&mut self) -> Result<Self::TxId, Self::Error>;

    /// Finalize the unit of work, keeping its effects.
    fn commit_transaction(&mut self, id: &Self::TxId) -> Result<(), Self::Error>;

    /// Finalize the unit of work, discarding its effects.
    fn rollback_transaction(&mut self, id: &Self::TxId) -> Result<(), Self::Error>;
}
