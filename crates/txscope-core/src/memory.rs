//! In-memory connection.
//!
//! Hands out sequential identifiers, keeps a journal of every call, and
//! enforces the begin/finalize contract. Failures can be injected one call
//! at a time, which makes it the connection of choice for tests and demos.

use std::collections::BTreeSet;
use std::fmt;

use tracing::trace;

use crate::connection::Connection;
use crate::error::{Error, Result};

/// Transaction identifier issued by [`InMemoryConnection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxId(pub u64);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx-{}", self.0)
    }
}

/// Connection operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// begin-transaction
    Begin,
    /// commit-transaction
    Commit,
    /// rollback-transaction
    Rollback,
}

/// One journaled call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Operation invoked
    pub op: Op,
    /// Identifier involved, if any (a failed begin has none)
    pub id: Option<TxId>,
    /// Whether the call succeeded
    pub succeeded: bool,
}

#[derive(Debug, Default)]
struct InjectedFailures {
    begin: Option<String>,
    commit: Option<String>,
    rollback: Option<String>,
}

/// A [`Connection`] that lives entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryConnection {
    last_id: u64,
    open: BTreeSet<TxId>,
    finalized: BTreeSet<TxId>,
    journal: Vec<Call>,
    failures: InjectedFailures,
}

impl InMemoryConnection {
    /// Creates a connection with no transactions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next begin fail with `msg`.
    pub fn fail_next_begin<S: Into<String>>(&mut self, msg: S) {
        self.failures.begin = Some(msg.into());
    }

    /// Make the next commit fail with `msg`.
    pub fn fail_next_commit<S: Into<String>>(&mut self, msg: S) {
        self.failures.commit = Some(msg.into());
    }

    /// Make the next rollback fail with `msg`.
    pub fn fail_next_rollback<S: Into<String>>(&mut self, msg: S) {
        self.failures.rollback = Some(msg.into());
    }

    /// Every call made so far, in order
    pub fn journal(&self) -> &[Call] {
        &self.journal
    }

    /// Number of calls (successful or not) of the given kind
    pub fn count(&self, op: Op) -> usize {
        self.journal.iter().filter(|call| call.op == op).count()
    }

    /// Number of calls that returned an error
    pub fn failed_calls(&self) -> usize {
        self.journal.iter().filter(|call| !call.succeeded).count()
    }

    /// Transactions begun but not yet finalized
    pub fn open_transactions(&self) -> usize {
        self.open.len()
    }

    /// Transactions committed or rolled back
    pub fn finalized_transactions(&self) -> usize {
        self.finalized.len()
    }

    fn record(&mut self, op: Op, id: Option<TxId>, succeeded: bool) {
        trace!(?op, ?id, succeeded, "connection call");
        self.journal.push(Call { op, id, succeeded });
    }

    fn take_failure(&mut self, op: Op) -> Option<String> {
        match op {
            Op::Begin => self.failures.begin.take(),
            Op::Commit => self.failures.commit.take(),
            Op::Rollback => self.failures.rollback.take(),
        }
    }

    fn finalize(&mut self, op: Op, id: TxId) -> Result<()> {
        let outcome = if self.finalized.contains(&id) {
            Err(Error::AlreadyFinalized(id))
        } else if !self.open.contains(&id) {
            Err(Error::UnknownTransaction(id))
        } else if let Some(msg) = self.take_failure(op) {
            Err(Error::Connection(msg))
        } else {
            self.open.remove(&id);
            self.finalized.insert(id);
            Ok(())
        };

        self.record(op, Some(id), outcome.is_ok());
        outcome
    }
}

impl Connection for InMemoryConnection {
    type TxId = TxId;
    type Error = Error;

    fn begin_transaction(&mut self) -> Result<TxId> {
        if let Some(msg) = self.take_failure(Op::Begin) {
            self.record(Op::Begin, None, false);
            return Err(Error::Connection(msg));
        }
        self.last_id += 1;
        let id = TxId(self.last_id);
        self.open.insert(id);
        self.record(Op::Begin, Some(id), true);
        Ok(id)
    }

    fn commit_transaction(&mut self, id: &TxId) -> Result<()> {
        self.finalize(Op::Commit, *id)
    }

    fn rollback_transaction(&mut self, id: &TxId) -> Result<()> {
        self.finalize(Op::Rollback, *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_identifiers() {
        let mut conn = InMemoryConnection::new();
        let a = conn.begin_transaction().unwrap();
        let b = conn.begin_transaction().unwrap();
        assert_ne!(a, b);
        assert_eq!(conn.open_transactions(), 2);
    }

    #[test]
    fn test_double_finalize_rejected() {
        let mut conn = InMemoryConnection::new();
        let id = conn.begin_transaction().unwrap();
        conn.commit_transaction(&id).unwrap();

        assert_eq!(
            conn.commit_transaction(&id),
            Err(Error::AlreadyFinalized(id))
        );
        assert_eq!(
            conn.rollback_transaction(&id),
            Err(Error::AlreadyFinalized(id))
        );
        assert_eq!(conn.failed_calls(), 2);
    }

    #[test]
    fn test_unknown_transaction_rejected() {
        let mut conn = InMemoryConnection::new();
        assert_eq!(
            conn.rollback_transaction(&TxId(42)),
            Err(Error::UnknownTransaction(TxId(42)))
        );
    }

    #[test]
    fn test_injected_failure_is_one_shot() {
        let mut conn = InMemoryConnection::new();
        conn.fail_next_begin("refused");
        assert!(conn.begin_transaction().is_err());
        assert!(conn.begin_transaction().is_ok());

        let journal = conn.journal();
        assert_eq!(journal.len(), 2);
        assert_eq!(
            journal[0],
            Call {
                op: Op::Begin,
                id: None,
                succeeded: false
            }
        );
        assert_eq!(journal[1].id, Some(TxId(1)));
    }

    #[test]
    fn test_failed_commit_leaves_transaction_open() {
        let mut conn = InMemoryConnection::new();
        let id = conn.begin_transaction().unwrap();
        conn.fail_next_commit("timeout");

        assert!(conn.commit_transaction(&id).is_err());
        assert_eq!(conn.open_transactions(), 1);
        assert_eq!(conn.finalized_transactions(), 0);
    }
}
