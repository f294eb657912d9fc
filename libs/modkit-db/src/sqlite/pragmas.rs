//! SQLite PRAGMA parameters accepted in the DSN query string.
//!
//! Only a fixed set of keys is recognized; values are parsed into typed enums so nothing
//! user-provided is ever interpolated into SQL verbatim.

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum JournalMode {
    Delete,
    Wal,
    Memory,
    Truncate,
    Persist,
    Off,
}

impl JournalMode {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Wal => "WAL",
            JournalMode::Memory => "MEMORY",
            JournalMode::Truncate => "TRUNCATE",
            JournalMode::Persist => "PERSIST",
            JournalMode::Off => "OFF",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DELETE" => Some(JournalMode::Delete),
            "WAL" => Some(JournalMode::Wal),
            "MEMORY" => Some(JournalMode::Memory),
            "TRUNCATE" => Some(JournalMode::Truncate),
            "PERSIST" => Some(JournalMode::Persist),
            "OFF" => Some(JournalMode::Off),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SyncMode {
    Off,
    Normal,
    Full,
    Extra,
}

impl SyncMode {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            SyncMode::Off => "OFF",
            SyncMode::Normal => "NORMAL",
            SyncMode::Full => "FULL",
            SyncMode::Extra => "EXTRA",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "OFF" => Some(SyncMode::Off),
            "NORMAL" => Some(SyncMode::Normal),
            "FULL" => Some(SyncMode::Full),
            "EXTRA" => Some(SyncMode::Extra),
            _ => None,
        }
    }
}

/// Keys stripped from the DSN before it is handed to sqlx.
pub(crate) const PRAGMA_KEYS: &[&str] = &["wal", "synchronous", "busy_timeout", "journal_mode"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Pragmas {
    pub journal_mode: Option<JournalMode>,
    pub synchronous: Option<SyncMode>,
    pub busy_timeout_ms: Option<u32>,
}

impl Pragmas {
    /// Unknown values are ignored with a warning; defaults then apply.
    pub(crate) fn from_query(params: &HashMap<String, String>) -> Self {
        let mut out = Pragmas::default();

        if let Some(v) = params.get("journal_mode") {
            out.journal_mode = JournalMode::parse(v);
            if out.journal_mode.is_none() {
                tracing::warn!(value = %v, "ignoring unknown sqlite journal_mode");
            }
        } else if let Some(v) = params.get("wal") {
            out.journal_mode = match v.to_ascii_lowercase().as_str() {
                "true" | "1" | "on" => Some(JournalMode::Wal),
                "false" | "0" | "off" => Some(JournalMode::Delete),
                _ => None,
            };
        }

        if let Some(v) = params.get("synchronous") {
            out.synchronous = SyncMode::parse(v);
            if out.synchronous.is_none() {
                tracing::warn!(value = %v, "ignoring unknown sqlite synchronous mode");
            }
        }

        if let Some(v) = params.get("busy_timeout") {
            out.busy_timeout_ms = v.parse().ok();
        }

        out
    }

    /// Statements to run on every new connection.
    pub(crate) fn statements(&self, in_memory: bool, default_busy_ms: u32) -> Vec<String> {
        // WAL is meaningless for in-memory databases.
        let journal = self.journal_mode.unwrap_or(if in_memory {
            JournalMode::Delete
        } else {
            JournalMode::Wal
        });
        let sync = self.synchronous.unwrap_or(SyncMode::Normal);

        let mut stmts = vec![
            format!("PRAGMA journal_mode = {}", journal.as_sql()),
            format!("PRAGMA synchronous = {}", sync.as_sql()),
        ];
        if !in_memory {
            let busy = self.busy_timeout_ms.unwrap_or(default_busy_ms);
            stmts.push(format!("PRAGMA busy_timeout = {busy}"));
        }
        stmts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_known_values_case_insensitively() {
        let p = Pragmas::from_query(&params(&[
            ("journal_mode", "truncate"),
            ("synchronous", "Full"),
            ("busy_timeout", "1500"),
        ]));
        assert_eq!(p.journal_mode, Some(JournalMode::Truncate));
        assert_eq!(p.synchronous, Some(SyncMode::Full));
        assert_eq!(p.busy_timeout_ms, Some(1500));
    }

    #[test]
    fn wal_flag_maps_to_journal_mode() {
        let on = Pragmas::from_query(&params(&[("wal", "true")]));
        assert_eq!(on.journal_mode, Some(JournalMode::Wal));
        let off = Pragmas::from_query(&params(&[("wal", "0")]));
        assert_eq!(off.journal_mode, Some(JournalMode::Delete));
    }

    #[test]
    fn rejects_unknown_values() {
        let p = Pragmas::from_query(&params(&[
            ("journal_mode", "DROP TABLE users"),
            ("busy_timeout", "soon"),
        ]));
        assert_eq!(p, Pragmas::default());
    }

    #[test]
    fn in_memory_defaults_skip_wal_and_busy_timeout() {
        let stmts = Pragmas::default().statements(true, 5000);
        assert_eq!(
            stmts,
            vec![
                "PRAGMA journal_mode = DELETE".to_string(),
                "PRAGMA synchronous = NORMAL".to_string(),
            ]
        );

        let file = Pragmas::default().statements(false, 5000);
        assert!(file.contains(&"PRAGMA journal_mode = WAL".to_string()));
        assert!(file.contains(&"PRAGMA busy_timeout = 5000".to_string()));
    }
}
