//! Translation of pool and Diesel failures into repository port errors.
//!
//! Every Diesel repository funnels its failures through these helpers so the
//! split between connection failures (retryable, surfaced as 503) and query
//! failures (surfaced as 500) stays identical across tables.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through a repository's connection constructor.
pub(crate) fn map_pool_failure<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    debug!(%error, "connection checkout failed");
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure through a repository's query and connection
/// constructors.
///
/// Driver messages are logged at debug level and replaced with a generic
/// message, so SQL fragments never reach API responses.
pub(crate) fn map_diesel_failure<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::NotFound => query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("referenced record does not exist")
        }
        _ => query("database error"),
    }
}

/// Whether `error` violates the unique constraint named `constraint`.
pub(crate) fn violates_unique(error: &DieselError, constraint: &str) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info.constraint_name() == Some(constraint)
    )
}
