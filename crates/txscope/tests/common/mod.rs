// Common test utilities for scope integration tests

use std::fmt;

use txscope::{InMemoryConnection, Op};

/// Application error used as the scope body's failure type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    Value(String),
    Db(txscope::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Value(msg) => write!(f, "value error: {}", msg),
            AppError::Db(err) => write!(f, "database error: {}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl From<txscope::Error> for AppError {
    fn from(err: txscope::Error) -> Self {
        AppError::Db(err)
    }
}

/// (begin, commit, rollback) call counts
pub fn counts(conn: &InMemoryConnection) -> (usize, usize, usize) {
    (
        conn.count(Op::Begin),
        conn.count(Op::Commit),
        conn.count(Op::Rollback),
    )
}

#[allow(dead_code)]
pub fn parse_amount(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::Value(format!("invalid amount: {}", raw)))
}
