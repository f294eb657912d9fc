//! Shared database error helpers (SQLSTATE categorization, etc.)

use sea_orm::{DbErr, RuntimeErr, SqlErr};

/// Returns true if the given SQLSTATE code represents a unique constraint violation
/// across popular backends (Postgres 23505, SQLite 2067, MySQL 1062).
pub fn is_unique_violation_code(code: &str) -> bool {
    matches!(code, "23505" | "2067" | "1062")
}

pub fn is_sqlx_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|c| is_unique_violation_code(c.as_ref()))
        .unwrap_or(false)
}

/// Classify a SeaORM error as a unique-constraint violation.
pub fn is_unique_violation(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(e)) | DbErr::Query(RuntimeErr::SqlxError(e)) => {
            is_sqlx_unique_violation(e)
        }
        _ => false,
    }
}
