//! Transaction helper shared by every caller that writes.

use crate::error::DbResult;
use crate::traits::{Database, Transaction};

/// Execute `body` within a transaction, committing if it succeeds and rolling
/// back if it fails.
///
/// A rollback failure is logged; the body's error is what gets returned.
pub fn with_transaction<T, F>(db: &mut dyn Database, body: F) -> DbResult<T>
where
    F: FnOnce(&mut dyn Transaction) -> DbResult<T>,
{
    let mut tx = db.begin()?;

    match body(tx.as_mut()) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                log::warn!("Rollback failed after error ({err}): {rollback_err}");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
#[path = "transaction_test.rs"]
mod tests;
