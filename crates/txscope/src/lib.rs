//! # txscope
//!
//! Scoped transactions that are finalized exactly once: committed when the
//! scope body succeeds, rolled back when it fails or is abandoned.
//!
//! ## Quick Start
//!
//! ```rust
//! use txscope::{with_transaction, InMemoryConnection, Op};
//!
//! #[derive(Debug)]
//! enum AppError {
//!     Value(String),
//!     Db(txscope::Error),
//! }
//!
//! impl From<txscope::Error> for AppError {
//!     fn from(err: txscope::Error) -> Self {
//!         AppError::Db(err)
//!     }
//! }
//!
//! let mut conn = InMemoryConnection::new();
//!
//! // Success commits
//! let sum = with_transaction(&mut conn, |_txn| Ok::<_, AppError>(1 + 2))?;
//! assert_eq!(sum, 3);
//!
//! // Failure rolls back and hands the error back
//! let result: Result<(), AppError> = with_transaction(&mut conn, |_txn| {
//!     Err(AppError::Value("negative balance".into()))
//! });
//! assert!(matches!(result, Err(AppError::Value(_))));
//!
//! assert_eq!(conn.count(Op::Commit), 1);
//! assert_eq!(conn.count(Op::Rollback), 1);
//! # Ok::<(), AppError>(())
//! ```
//!
//! ## Explicit scopes
//!
//! [`TransactionScope`] splits entry and exit for callers that cannot wrap
//! their work in a closure:
//!
//! ```rust
//! use txscope::{InMemoryConnection, TransactionScope};
//!
//! let mut conn = InMemoryConnection::new();
//! let scope = TransactionScope::enter(&mut conn)?;
//! let outcome: txscope::Result<u32> = Ok(5);
//! assert_eq!(scope.exit(outcome)?, 5);
//! # Ok::<(), txscope::Error>(())
//! ```
//!
//! Any [`Connection`] implementation can be used in place of
//! [`InMemoryConnection`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod logging;

// Re-export core types
pub use txscope_core::{
    with_transaction, with_transaction_config, Call, Connection, Error, InMemoryConnection, Op,
    Result, ScopeConfig, Transaction, TransactionScope, TxId, TxState,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
