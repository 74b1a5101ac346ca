//! Transaction handle with single finalization.
//!
//! A [`Transaction`] is created by beginning a unit of work on a
//! [`Connection`] and is finalized exactly once: by [`Transaction::commit`],
//! by [`Transaction::rollback`], or, if neither ran, by rolling back when the
//! handle is dropped.

use tracing::{debug, error, warn};

use crate::connection::Connection;

/// Lifecycle state of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    /// Begun and not yet finalized
    Active,
    /// Finalized by commit
    Committed,
    /// Finalized by rollback
    RolledBack,
}

impl TxState {
    /// Whether the transaction has reached a terminal state
    pub fn is_finalized(self) -> bool {
        !matches!(self, TxState::Active)
    }
}

/// An active unit of work on a borrowed connection.
///
/// The connection stays mutably borrowed until the transaction is finalized,
/// so two transactions can never overlap on the same connection.
pub struct Transaction<'c, C: Connection> {
    conn: &'c mut C,
    id: C::TxId,
    state: TxState,
}

impl<'c, C: Connection> Transaction<'c, C> {
    /// Begin a new transaction.
    ///
    /// Errors from the connection are returned unchanged and no transaction
    /// exists afterwards.
    pub fn begin(conn: &'c mut C) -> Result<Self, C::Error> {
        let id = conn.begin_transaction()?;
        debug!(tx = ?id, "transaction started");
        Ok(Transaction {
            conn,
            id,
            state: TxState::Active,
        })
    }

    /// Identifier handed out by the connection
    pub fn id(&self) -> &C::TxId {
        &self.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> TxState {
        self.state
    }

    /// Whether the transaction is still awaiting finalization
    pub fn is_active(&self) -> bool {
        self.state == TxState::Active
    }

    /// Read-only access to the underlying connection
    pub fn connection(&self) -> &C {
        &*self.conn
    }

    /// Commit the transaction.
    ///
    /// A failing commit is returned as-is; no rollback is attempted since the
    /// finalization decision has already been made.
    pub fn commit(mut self) -> Result<(), C::Error> {
        self.state = TxState::Committed;
        debug!(tx = ?self.id, "committing transaction");
        self.conn.commit_transaction(&self.id)
    }

    /// Roll back the transaction.
    pub fn rollback(mut self) -> Result<(), C::Error> {
        self.state = TxState::RolledBack;
        debug!(tx = ?self.id, "rolling back transaction");
        self.conn.rollback_transaction(&self.id)
    }
}

impl<C: Connection> std::fmt::Debug for Transaction<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("state", &self.state)
            .finish()
    }
}

/// A transaction dropped while still active is rolled back.
impl<C: Connection> Drop for Transaction<'_, C> {
    fn drop(&mut self) {
        if self.state.is_finalized() {
            return;
        }
        self.state = TxState::RolledBack;
        warn!(tx = ?self.id, "transaction dropped while active, rolling back");
        if let Err(error) = self.conn.rollback_transaction(&self.id) {
            error!(tx = ?self.id, ?error, "implicit transaction rollback failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryConnection, Op, TxId};
    use crate::Error;

    #[test]
    fn test_begin_and_commit() {
        let mut conn = InMemoryConnection::new();
        let txn = Transaction::begin(&mut conn).unwrap();
        assert_eq!(txn.id(), &TxId(1));
        assert!(txn.is_active());
        assert_eq!(txn.connection().open_transactions(), 1);
        txn.commit().unwrap();

        assert_eq!(conn.count(Op::Begin), 1);
        assert_eq!(conn.count(Op::Commit), 1);
        assert_eq!(conn.count(Op::Rollback), 0);
        assert_eq!(conn.open_transactions(), 0);
    }

    #[test]
    fn test_explicit_rollback() {
        let mut conn = InMemoryConnection::new();
        let txn = Transaction::begin(&mut conn).unwrap();
        txn.rollback().unwrap();

        assert_eq!(conn.count(Op::Commit), 0);
        assert_eq!(conn.count(Op::Rollback), 1);
    }

    #[test]
    fn test_drop_rolls_back_active_transaction() {
        let mut conn = InMemoryConnection::new();
        {
            let _txn = Transaction::begin(&mut conn).unwrap();
        }
        assert_eq!(conn.count(Op::Rollback), 1);
        assert_eq!(conn.count(Op::Commit), 0);
        assert_eq!(conn.open_transactions(), 0);
    }

    #[test]
    fn test_drop_after_commit_does_nothing() {
        let mut conn = InMemoryConnection::new();
        Transaction::begin(&mut conn).unwrap().commit().unwrap();
        Transaction::begin(&mut conn).unwrap().rollback().unwrap();

        // Every identifier finalized exactly once
        assert_eq!(conn.count(Op::Commit), 1);
        assert_eq!(conn.count(Op::Rollback), 1);
        assert_eq!(conn.finalized_transactions(), 2);
    }

    #[test]
    fn test_begin_failure_creates_nothing() {
        let mut conn = InMemoryConnection::new();
        conn.fail_next_begin("server gone");

        let err = Transaction::begin(&mut conn).unwrap_err();
        assert_eq!(err, Error::Connection("server gone".into()));
        assert_eq!(conn.count(Op::Begin), 1);
        assert_eq!(conn.count(Op::Commit), 0);
        assert_eq!(conn.count(Op::Rollback), 0);
    }

    #[test]
    fn test_commit_failure_is_not_followed_by_rollback() {
        let mut conn = InMemoryConnection::new();
        conn.fail_next_commit("disk full");

        let txn = Transaction::begin(&mut conn).unwrap();
        let err = txn.commit().unwrap_err();
        assert_eq!(err, Error::Connection("disk full".into()));
        assert_eq!(conn.count(Op::Commit), 1);
        assert_eq!(conn.count(Op::Rollback), 0);
    }

    #[test]
    fn test_failed_drop_rollback_is_swallowed() {
        let mut conn = InMemoryConnection::new();
        conn.fail_next_rollback("broken pipe");
        {
            let _txn = Transaction::begin(&mut conn).unwrap();
        }
        assert_eq!(conn.count(Op::Rollback), 1);
        assert_eq!(conn.failed_calls(), 1);
    }

    #[test]
    fn test_state_is_finalized() {
        assert!(!TxState::Active.is_finalized());
        assert!(TxState::Committed.is_finalized());
        assert!(TxState::RolledBack.is_finalized());
    }
}
