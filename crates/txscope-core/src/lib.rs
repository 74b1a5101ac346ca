//! # txscope Core
//!
//! Core types for txscope: the [`Connection`] contract, the single-finalization
//! [`Transaction`] handle, the [`TransactionScope`] wrapper, and an
//! [`InMemoryConnection`] for tests and demos.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! Users should depend on the main `txscope` crate instead, which re-exports
//! everything here alongside logging setup.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod connection;
pub mod error;
pub mod memory;
pub mod scope;
pub mod transaction;

pub use connection::Connection;
pub use error::{Error, Result};
pub use memory::{Call, InMemoryConnection, Op, TxId};
pub use scope::{with_transaction, with_transaction_config, ScopeConfig, TransactionScope};
pub use transaction::{Transaction, TxState};
