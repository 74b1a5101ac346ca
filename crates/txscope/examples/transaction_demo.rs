//! Transaction Demo
//!
//! Shows the scope wrapper committing on success, rolling back on failure,
//! and rolling back an abandoned explicit scope. Run with
//! `RUST_LOG=debug` to see every begin/commit/rollback.

use tracing::{info, warn};
use txscope::logging::{LogConfig, LogFormat};
use txscope::{with_transaction, InMemoryConnection, Op, TransactionScope};

#[derive(Debug)]
enum DemoError {
    Value(String),
    Db(txscope::Error),
}

impl From<txscope::Error> for DemoError {
    fn from(err: txscope::Error) -> Self {
        DemoError::Db(err)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = LogConfig::debug().with_format(LogFormat::Compact).init();

    println!("=== txscope Transaction Demo ===\n");

    let mut conn = InMemoryConnection::new();

    println!("1. Normal completion:");
    let (x, y) = with_transaction(&mut conn, |txn| {
        let x = 1 + 2;
        let y = x + 2;
        println!("   transaction {} = {} {}", txn.id(), x, y);
        Ok::<_, DemoError>((x, y))
    })
    .map_err(|e| format!("{:?}", e))?;
    info!(x, y, "scope committed");
    println!("   ✓ Committed with x={}, y={}", x, y);

    println!("\n2. Failure inside the scope:");
    let result: Result<(), DemoError> = with_transaction(&mut conn, |_txn| {
        Err(DemoError::Value("Something has gone wrong".into()))
    });
    match result {
        Err(DemoError::Value(msg)) => {
            info!(error = %msg, "scope rolled back, failure propagated");
            println!("   ✓ Rolled back, caller still sees: {}", msg);
        }
        Err(DemoError::Db(err)) => warn!(error = %err, "connection failed"),
        Ok(()) => println!("   ✗ Unexpected commit"),
    }

    println!("\n3. Abandoned explicit scope:");
    {
        let scope = TransactionScope::enter(&mut conn)?;
        println!("   entered {:?}", scope.transaction());
        // Dropped without exit
    }
    println!("   ✓ Rolled back on drop");

    println!(
        "\nTotals: {} begins, {} commits, {} rollbacks",
        conn.count(Op::Begin),
        conn.count(Op::Commit),
        conn.count(Op::Rollback)
    );

    Ok(())
}
