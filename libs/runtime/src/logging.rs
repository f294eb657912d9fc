//! Logging setup driven by the `logging` config section.
//!
//! Each key other than `default` names a crate (target prefix) with its own console
//! level and, optionally, its own rotating JSON log file. The `default` section covers
//! every target not claimed by a named section.

use crate::config::{LoggingConfig, Section};
use std::{
    collections::HashMap,
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::{level_filters::LevelFilter, Level, Metadata, Subscriber};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_MAX_SIZE_MB: u64 = 100;

/// `None` disables the sink; unknown names fall back to INFO.
fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// `target` is `crate_name` itself or one of its modules.
fn matches_crate_prefix(target: &str, crate_name: &str) -> bool {
    target
        .strip_prefix(crate_name)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

type UnclaimedFilter = FilterFn<Box<dyn Fn(&Metadata<'_>) -> bool + Send + Sync + 'static>>;

/// Passes events at or above `max_level` whose target no named section claims.
fn unclaimed_targets(claimed: &[String], max_level: Level) -> UnclaimedFilter {
    let claimed = claimed.to_vec();
    FilterFn::new(Box::new(move |meta: &Metadata<'_>| {
        meta.level() <= &max_level && !claimed.iter().any(|c| matches_crate_prefix(meta.target(), c))
    }))
}

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl RotWriter {
    fn lock(&self) -> std::io::Result<MutexGuard<'_, FileRotate<AppendTimestamp>>> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file writer lock poisoned"))
    }
}

/// Per-event writer; `None` swallows the bytes.
struct RoutedWriterHandle(Option<RotWriter>);

impl Write for RoutedWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &self.0 {
            Some(w) => w.lock()?.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &self.0 {
            Some(w) => w.lock()?.flush(),
            None => Ok(()),
        }
    }
}

/// Picks the log file for an event by target prefix, falling back to the default file.
#[derive(Clone)]
struct MultiFileRouter {
    default: Option<RotWriter>,
    by_prefix: HashMap<String, RotWriter>,
}

impl MultiFileRouter {
    fn resolve_for(&self, target: &str) -> Option<RotWriter> {
        self.by_prefix
            .iter()
            .find(|(crate_name, _)| matches_crate_prefix(target, crate_name))
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }
}

impl<'a> fmt::MakeWriter<'a> for MultiFileRouter {
    type Writer = RoutedWriterHandle;

    fn make_writer(&'a self) -> Self::Writer {
        RoutedWriterHandle(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        RoutedWriterHandle(self.resolve_for(meta.target()))
    }
}

struct ConfigData<'a> {
    default_section: Option<&'a Section>,
    crate_sections: Vec<(String, &'a Section)>,
    crate_names: Vec<String>,
}

fn extract_config_data(cfg: &LoggingConfig) -> ConfigData<'_> {
    let crate_sections: Vec<_> = cfg
        .iter()
        .filter(|(k, _)| k.as_str() != "default")
        .map(|(k, v)| (k.clone(), v))
        .collect();
    let crate_names = crate_sections.iter().map(|(n, _)| n.clone()).collect();

    ConfigData {
        default_section: cfg.get("default"),
        crate_sections,
        crate_names,
    }
}

/// Relative log paths live under `base_dir` (server.home_dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn create_rotating_writer_at_path(
    log_path: &Path,
    max_bytes: usize,
    max_backups: Option<usize>,
) -> std::io::Result<RotWriter> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // No explicit backup count: rotated files expire after a day.
    let limit = match max_backups {
        Some(n) if n > 0 => FileLimit::MaxFiles(n),
        _ => FileLimit::Age(chrono::Duration::days(1)),
    };

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(limit),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

fn create_section_file_writer(name: &str, section: &Section, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }

    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let log_path = resolve_log_path(&section.file, base_dir);

    match create_rotating_writer_at_path(&log_path, max_bytes as usize, section.max_backups) {
        Ok(writer) => Some(writer),
        Err(e) => {
            // The subscriber is not installed yet, so stderr is the only channel.
            eprintln!(
                "Failed to open log file for '{}' at {}: {}",
                name,
                log_path.display(),
                e
            );
            None
        }
    }
}

fn build_file_router(config: &ConfigData, base_dir: &Path) -> MultiFileRouter {
    let default = config
        .default_section
        .and_then(|s| create_section_file_writer("default", s, base_dir));

    let by_prefix = config
        .crate_sections
        .iter()
        .filter_map(|(name, section)| {
            create_section_file_writer(name, section, base_dir).map(|w| (name.clone(), w))
        })
        .collect();

    MultiFileRouter { default, by_prefix }
}

fn build_console_targets(config: &ConfigData) -> Targets {
    config
        .crate_sections
        .iter()
        .filter_map(|(name, s)| parse_tracing_level(&s.console_level).map(|l| (name.clone(), l)))
        .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, level)| {
            t.with_target(name, level)
        })
}

fn build_file_targets(config: &ConfigData) -> Targets {
    config
        .crate_sections
        .iter()
        .filter(|(_, s)| !s.file.trim().is_empty())
        .filter_map(|(name, s)| parse_tracing_level(&s.file_level).map(|l| (name.clone(), l)))
        .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, level)| {
            t.with_target(name, level)
        })
}

/// Assemble the subscriber: named-section console + files, then the `default`
/// section's console and file for everything unclaimed. Each sink is independent,
/// so e.g. `console_level: off` still leaves the default file active.
fn build_subscriber(cfg: &LoggingConfig, base_dir: &Path) -> impl Subscriber + Send + Sync + 'static {
    let config = extract_config_data(cfg);
    let files = build_file_router(&config, base_dir);
    let ansi = std::io::stdout().is_terminal();

    let console = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_timer(UtcTime::rfc_3339())
        .with_filter(build_console_targets(&config));

    let default_console = config
        .default_section
        .and_then(|s| parse_tracing_level(&s.console_level))
        .map(|level| {
            fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_timer(UtcTime::rfc_3339())
                .with_filter(unclaimed_targets(&config.crate_names, level))
        });

    let crate_files = (!files.by_prefix.is_empty()).then(|| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(UtcTime::rfc_3339())
            .with_writer(files.clone())
            .with_filter(build_file_targets(&config))
    });

    let default_file = files
        .default
        .as_ref()
        .and(config.default_section)
        .and_then(|s| parse_tracing_level(&s.file_level))
        .map(|level| {
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(UtcTime::rfc_3339())
                .with_writer(files.clone())
                .with_filter(unclaimed_targets(&config.crate_names, level))
        });

    Registry::default()
        .with(console)
        .with(default_console)
        .with(crate_files)
        .with(default_file)
}

/// Install the global subscriber. Relative log files resolve against `base_dir`
/// (usually server.home_dir). Safe to call more than once; later calls are no-ops.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // `log` records go through tracing from here on.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_timer(UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let _ = build_subscriber(cfg, base_dir).try_init();
}
