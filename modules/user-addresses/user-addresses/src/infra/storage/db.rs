use sea_orm::{DatabaseTransaction, DbErr, SqlErr, TransactionTrait};
use tracing::warn;

use crate::domain::error::DomainError;

/// Wrap an unclassified storage error.
pub(crate) fn db_err(e: DbErr) -> DomainError {
    DomainError::persistence(e.to_string())
}

/// Constraint a failed write ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintViolation {
    Unique,
    ForeignKey,
}

/// Classify a write error by the constraint it violated, if any.
///
/// Drivers that do not report a structured SQL error are matched by message.
pub(crate) fn constraint_violation(e: &DbErr) -> Option<ConstraintViolation> {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => return Some(ConstraintViolation::Unique),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            return Some(ConstraintViolation::ForeignKey);
        }
        _ => {}
    }

    let message = e.to_string();
    if message.contains("UNIQUE constraint")
        || message.contains("duplicate key")
        || message.contains("Duplicate entry")
    {
        Some(ConstraintViolation::Unique)
    } else if message.contains("FOREIGN KEY") || message.contains("foreign key") {
        Some(ConstraintViolation::ForeignKey)
    } else {
        None
    }
}

/// Begin a transaction on any connection that supports one.
///
/// # Errors
/// `DomainError::Persistence` if the transaction cannot be started.
pub async fn begin<C: TransactionTrait>(db: &C) -> Result<DatabaseTransaction, DomainError> {
    db.begin().await.map_err(db_err)
}

/// Commit on `Ok`, roll back on `Err`.
///
/// A failed rollback is logged; the original error is still returned.
///
/// # Errors
/// The error from `result`, or `DomainError::Persistence` if the commit fails.
pub async fn settle<T>(
    txn: DatabaseTransaction,
    result: Result<T, DomainError>,
) -> Result<T, DomainError> {
    match result {
        Ok(value) => {
            txn.commit().await.map_err(db_err)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(e)
        }
    }
}
