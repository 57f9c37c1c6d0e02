//! Store error mapping.

use openhouse_core::ServiceError;

/// Wraps a store failure as an internal error with `context`.
pub fn internal(err: sqlx::Error, context: &'static str) -> ServiceError {
    ServiceError::internal(anyhow::Error::new(err).context(context))
}

/// Maps unique violations on the users table to `DuplicateUser`, naming the
/// offending constraint. Every other failure is internal.
pub fn user_write_error(err: sqlx::Error, context: &'static str) -> ServiceError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some(c) if c.contains("phone") => "phone",
                Some(c) if c.contains("uid") => "uid",
                _ => "id",
            };
            return ServiceError::DuplicateUser(field.to_string());
        }
    }
    internal(err, context)
}
