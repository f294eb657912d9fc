//! SQLite DSN path handling.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use super::pragmas::PRAGMA_KEYS;

/// True for every spelling of a private in-memory database.
pub fn is_memory_dsn(dsn: &str) -> bool {
    let lower = dsn.to_ascii_lowercase();
    lower == "sqlite::memory:"
        || lower == "sqlite://:memory:"
        || lower == "sqlite://memory:"
        || lower.contains("mode=memory")
}

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - In-memory DSNs collapse to `sqlite::memory:`.
/// - Relative paths are joined onto `base_dir`.
/// - Backslashes are normalized into forward slashes (important on Windows).
pub fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> io::Result<String> {
    if is_memory_dsn(dsn) {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn.strip_prefix("sqlite://").ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("DSN must start with sqlite:// (got: {dsn})"),
        )
    })?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Empty SQLite path in DSN",
        ));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if create_dirs {
        if let Some(dir) = p.parent() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

/// Ensure the parent directory of a file-backed DSN exists.
pub(crate) fn prepare_sqlite_path(dsn: &str, create_dirs: bool) -> io::Result<()> {
    if !create_dirs || is_memory_dsn(dsn) {
        return Ok(());
    }
    let raw = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
        .unwrap_or(dsn);
    let path = raw.split('?').next().unwrap_or(raw);
    if path.is_empty() || path.starts_with("file:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Split a DSN into the part sqlx understands and the pragma parameters it does not.
pub(crate) fn split_pragmas(dsn: &str) -> (String, HashMap<String, String>) {
    let Some((base, query)) = dsn.split_once('?') else {
        return (dsn.to_string(), HashMap::new());
    };

    let mut pragmas = HashMap::new();
    let mut kept = Vec::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        let key = k.to_ascii_lowercase();
        if PRAGMA_KEYS.contains(&key.as_str()) {
            pragmas.insert(key, v.to_string());
        } else {
            kept.push(pair);
        }
    }

    let clean = if kept.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", kept.join("&"))
    };
    (clean, pragmas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_spellings_are_recognized() {
        assert!(is_memory_dsn("sqlite::memory:"));
        assert!(is_memory_dsn("sqlite://:memory:"));
        assert!(is_memory_dsn("sqlite://file:x?mode=memory&cache=shared"));
        assert!(!is_memory_dsn("sqlite://database/user_data.db"));
    }

    #[test]
    fn relative_dsn_is_resolved_under_base_dir() {
        let tmp = TempDir::new().unwrap();
        let out = absolutize_sqlite_dsn("sqlite://database/user_data.db?wal=true", tmp.path(), true)
            .unwrap();

        let expected = tmp
            .path()
            .join("database")
            .join("user_data.db")
            .to_string_lossy()
            .replace('\\', "/");
        assert_eq!(out, format!("sqlite://{expected}?wal=true"));
        assert!(tmp.path().join("database").is_dir());
    }

    #[test]
    fn memory_dsn_is_normalized() {
        let out = absolutize_sqlite_dsn("sqlite://:memory:", Path::new("/x"), true).unwrap();
        assert_eq!(out, "sqlite::memory:");
    }

    #[test]
    fn non_sqlite_or_empty_paths_are_rejected() {
        assert!(absolutize_sqlite_dsn("postgres://h/db", Path::new("/x"), false).is_err());
        assert!(absolutize_sqlite_dsn("sqlite://", Path::new("/x"), false).is_err());
    }

    #[test]
    fn pragmas_are_split_from_the_dsn() {
        let (clean, pragmas) =
            split_pragmas("sqlite:///tmp/a.db?mode=rwc&WAL=true&busy_timeout=100");
        assert_eq!(clean, "sqlite:///tmp/a.db?mode=rwc");
        assert_eq!(pragmas["wal"], "true");
        assert_eq!(pragmas["busy_timeout"], "100");

        let (clean, pragmas) = split_pragmas("sqlite::memory:");
        assert_eq!(clean, "sqlite::memory:");
        assert!(pragmas.is_empty());
    }

    #[test]
    fn prepare_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let db = tmp.path().join("nested").join("app.db");
        let dsn = format!("sqlite://{}", db.to_string_lossy().replace('\\', "/"));
        prepare_sqlite_path(&dsn, true).unwrap();
        assert!(tmp.path().join("nested").is_dir());
    }
}
