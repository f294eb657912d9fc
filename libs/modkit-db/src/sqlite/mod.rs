//! SQLite-specific helpers: DSN paths and connection pragmas.

pub(crate) mod path;
pub(crate) mod pragmas;

pub use path::{absolutize_sqlite_dsn, is_memory_dsn};
