//! Scoped transaction wrapper.
//!
//! [`TransactionScope`] begins a transaction on entry and finalizes it on
//! exit: commit when the scope body succeeded, rollback when it failed. The
//! body's failure is always handed back to the caller, never suppressed.
//!
//! [`with_transaction`] runs a closure inside such a scope:
//!
//! ```rust
//! use txscope_core::{with_transaction, InMemoryConnection, Op};
//!
//! let mut conn = InMemoryConnection::new();
//! let (x, y) = with_transaction(&mut conn, |_txn| {
//!     let x = 1 + 2;
//!     let y = x + 2;
//!     Ok::<_, txscope_core::Error>((x, y))
//! })?;
//! assert_eq!((x, y), (3, 5));
//! assert_eq!(conn.count(Op::Commit), 1);
//! # Ok::<(), txscope_core::Error>(())
//! ```

use tracing::{debug_span, error, Span};

use crate::connection::Connection;
use crate::transaction::Transaction;

/// Scope configuration
#[derive(Debug, Clone)]
pub struct ScopeConfig {
    /// Label recorded on the scope's tracing span
    pub label: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            label: "transaction".to_string(),
        }
    }
}

impl ScopeConfig {
    /// Set the span label
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }
}

/// A transaction bound to a scope.
///
/// Call [`exit`](TransactionScope::exit) with the body's outcome to finalize.
/// A scope left without calling `exit` (early return, panic) rolls back when
/// dropped.
pub struct TransactionScope<'c, C: Connection> {
    txn: Transaction<'c, C>,
    span: Span,
}

impl<'c, C: Connection> TransactionScope<'c, C> {
    /// Enter a scope, beginning a transaction on `conn`.
    pub fn enter(conn: &'c mut C) -> Result<Self, C::Error> {
        Self::enter_with(conn, ScopeConfig::default())
    }

    /// Enter a scope with the given configuration.
    ///
    /// A begin failure is returned unchanged; there is nothing to clean up.
    pub fn enter_with(conn: &'c mut C, config: ScopeConfig) -> Result<Self, C::Error> {
        let span = debug_span!("txn_scope", label = %config.label);
        let txn = span.in_scope(|| Transaction::begin(conn))?;
        Ok(TransactionScope { txn, span })
    }

    /// The active transaction
    pub fn transaction(&self) -> &Transaction<'c, C> {
        &self.txn
    }

    /// The active transaction, mutably
    pub fn transaction_mut(&mut self) -> &mut Transaction<'c, C> {
        &mut self.txn
    }

    /// Leave the scope.
    ///
    /// `Ok` commits and returns the value, or the commit error. `Err` rolls
    /// back and returns the original error. If that rollback fails too, the
    /// original error still wins and the rollback error is logged.
    pub fn exit<T, E>(self, outcome: Result<T, E>) -> Result<T, E>
    where
        E: From<C::Error>,
    {
        let TransactionScope { txn, span } = self;
        let _entered = span.enter();
        match outcome {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(err) => {
                let id = txn.id().clone();
                if let Err(rollback_err) = txn.rollback() {
                    error!(
                        tx = ?id,
                        error = ?rollback_err,
                        "rollback failed after scope failure"
                    );
                }
                Err(err)
            }
        }
    }
}

impl<C: Connection> std::fmt::Debug for TransactionScope<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionScope")
            .field("txn", &self.txn)
            .finish()
    }
}

/// Run `body` inside a transaction scope on `conn`.
///
/// Commits when `body` returns `Ok`, rolls back and returns the error when it
/// returns `Err`. A panic in `body` rolls back while unwinding.
pub fn with_transaction<'c, C, T, E, F>(conn: &'c mut C, body: F) -> Result<T, E>
where
    C: Connection,
    E: From<C::Error>,
    F: FnOnce(&mut Transaction<'c, C>) -> Result<T, E>,
{
    with_transaction_config(conn, ScopeConfig::default(), body)
}

/// [`with_transaction`] with an explicit [`ScopeConfig`].
pub fn with_transaction_config<'c, C, T, E, F>(
    conn: &'c mut C,
    config: ScopeConfig,
    body: F,
) -> Result<T, E>
where
    C: Connection,
    E: From<C::Error>,
    F: FnOnce(&mut Transaction<'c, C>) -> Result<T, E>,
{
    let mut scope = TransactionScope::enter_with(conn, config)?;
    let outcome = {
        let span = scope.span.clone();
        let _entered = span.enter();
        body(scope.transaction_mut())
    };
    scope.exit(outcome)
}
