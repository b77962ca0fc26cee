//! Logging initialization.
//!
//! Console lines are `[PLATFORM] [LEVEL] message key=value ...`, where PLATFORM comes from the
//! event's `platform` field (`SYSTEM` when absent). Error and warn events are also appended to
//! `<log_dir>/<platform>/<YYYY-MM-DD>.log`, one line per event. File writes are best-effort:
//! failures are reported on stderr and otherwise ignored.

use std::fmt::{self, Write as _};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    fmt::format::Writer,
    fmt::{FmtContext, FormatEvent, FormatFields},
    layer::{Context as LayerContext, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Label used for events that carry no `platform` field.
pub const SYSTEM_LABEL: &str = "SYSTEM";

/// Logging options, usually taken from the loaded configuration.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Default filter (`error`, `warn`, `info`, `debug`); `RUST_LOG` overrides it.
    pub level: String,
    /// Root directory for the per-platform error/warn files.
    pub log_dir: PathBuf,
    /// Whether error/warn events are appended to files at all.
    pub file_sink: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            file_sink: true,
        }
    }
}

/// Initializes the global tracing subscriber.
///
/// Load `.env` before calling so `RUST_LOG` is visible.
pub fn init_tracing(settings: &LogSettings) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .event_format(PlatformFormat)
        .with_ansi(false);

    let file_layer = settings
        .file_sink
        .then(|| PlatformFileLayer::new(settings.log_dir.clone()));

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}

/// Fields pulled out of one event.
#[derive(Debug, Clone, Default)]
struct EventFields {
    platform: Option<String>,
    message: String,
    extra: Vec<(String, String)>,
}

impl EventFields {
    fn from_event(event: &Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }

    fn put(&mut self, name: &str, value: String) {
        match name {
            "platform" => self.platform = Some(value),
            "message" => self.message = value,
            other => self.extra.push((other.to_string(), value)),
        }
    }

    fn label(&self) -> String {
        self.platform
            .as_deref()
            .map(str::to_ascii_uppercase)
            .unwrap_or_else(|| SYSTEM_LABEL.to_string())
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field.name(), format!("{:?}", value));
    }
}

/// `[PLATFORM] [LEVEL] message key=value ...`
fn format_line(level: &Level, fields: &EventFields) -> String {
    let mut line = format!("[{}] [{}] {}", fields.label(), level, fields.message);
    for (key, value) in &fields.extra {
        line.push_str(&format!(" {}={}", key, value));
    }
    line
}

/// Console formatter producing platform-tagged lines.
pub struct PlatformFormat;

impl<S, N> FormatEvent<S, N> for PlatformFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let fields = EventFields::from_event(event);
        writeln!(writer, "{}", format_line(event.metadata().level(), &fields))
    }
}

/// Appends error and warn events to per-platform, per-date files.
pub struct PlatformFileLayer {
    log_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl PlatformFileLayer {
    pub fn new(log_dir: PathBuf) -> Self {
        Self {
            log_dir,
            write_lock: Mutex::new(()),
        }
    }
}

impl<S: Subscriber> Layer<S> for PlatformFileLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        let level = *event.metadata().level();
        if level != Level::ERROR && level != Level::WARN {
            return;
        }
        let fields = EventFields::from_event(event);
        let line = format!(
            "{} {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            format_line(&level, &fields)
        );
        let path = log_file_path(&self.log_dir, &fields.label(), Local::now().date_naive());

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = append_line(&path, &line) {
            eprintln!("Failed to write log file {}: {}", path.display(), e);
        }
    }
}

/// An event recorded before the global subscriber was installed.
#[derive(Debug, Clone)]
pub struct DeferredEvent {
    level: Level,
    fields: EventFields,
}

impl DeferredEvent {
    pub fn level(&self) -> Level {
        self.level
    }

    /// The event as the console would print it.
    pub fn line(&self) -> String {
        format_line(&self.level, &self.fields)
    }

    /// Re-emits the event through the current subscriber, keeping its platform label.
    pub fn replay(&self) {
        let platform = self.fields.label().to_ascii_lowercase();
        let mut message = self.fields.message.clone();
        for (key, value) in &self.fields.extra {
            message.push_str(&format!(" {}={}", key, value));
        }
        if self.level == Level::ERROR {
            tracing::error!(platform = %platform, "{}", message);
        } else if self.level == Level::WARN {
            tracing::warn!(platform = %platform, "{}", message);
        } else if self.level == Level::INFO {
            tracing::info!(platform = %platform, "{}", message);
        } else if self.level == Level::DEBUG {
            tracing::debug!(platform = %platform, "{}", message);
        } else {
            tracing::trace!(platform = %platform, "{}", message);
        }
    }
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<DeferredEvent>>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        let deferred = DeferredEvent {
            level: *event.metadata().level(),
            fields: EventFields::from_event(event),
        };
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(deferred);
    }
}

/// Runs `f` with a thread-local subscriber that records every event, for work that has to happen
/// before [`init_tracing`] (loading the config that configures logging). Replay the returned
/// events once the global subscriber is up.
pub fn capture_events<R>(f: impl FnOnce() -> R) -> (R, Vec<DeferredEvent>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = Registry::default().with(CaptureLayer {
        events: events.clone(),
    });
    let result = tracing::subscriber::with_default(subscriber, f);
    let captured = std::mem::take(&mut *events.lock().unwrap_or_else(|poisoned| poisoned.into_inner()));
    (result, captured)
}

/// `<log_dir>/<platform>/<YYYY-MM-DD>.log`, platform directory in lowercase.
pub fn log_file_path(log_dir: &Path, platform_label: &str, date: NaiveDate) -> PathBuf {
    log_dir
        .join(platform_label.to_ascii_lowercase())
        .join(format!("{}.log", date.format("%Y-%m-%d")))
}

/// Appends one line, creating parent directories as needed.
pub fn append_line(path: &Path, line: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}
