//! Tracing subscriber setup.
//!
//! Both sinks classify each event into an [`EventKind`] first, then render
//! it: the console with colour, the log file with a timestamp and a plain
//! tag.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Tracing target for stage headers.
pub(super) const STAGE_TARGET: &str = "dotlink::stage";
/// Tracing target for dry-run intentions.
pub(super) const DRY_RUN_TARGET: &str = "dotlink::dry_run";
/// Tracing target for destinations that hold something unexpected.
pub(super) const CONFLICT_TARGET: &str = "dotlink::conflict";

/// What a tracing event means to a dotlink reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Stage,
    DryRun,
    Conflict,
    Error,
    Warn,
    Info,
    Debug,
}

impl EventKind {
    fn of(metadata: &tracing::Metadata<'_>) -> Self {
        match (*metadata.level(), metadata.target()) {
            (tracing::Level::ERROR, _) => Self::Error,
            (tracing::Level::WARN, CONFLICT_TARGET) => Self::Conflict,
            (tracing::Level::WARN, _) => Self::Warn,
            (tracing::Level::INFO, STAGE_TARGET) => Self::Stage,
            (tracing::Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (tracing::Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Console line for `msg`, without the trailing newline.
    fn console_line(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::DryRun => format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            Self::Conflict => format!("\x1b[35mCONFLICT\x1b[0m {msg}"),
            Self::Error => format!("\x1b[31mERROR\x1b[0m    {msg}"),
            Self::Warn => format!("\x1b[33mWARN\x1b[0m     {msg}"),
            Self::Info => format!("  {msg}"),
            Self::Debug => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }

    /// Tag written between the timestamp and the message in the log file.
    const fn file_tag(self) -> &'static str {
        match self {
            Self::Stage => "==> ",
            Self::DryRun => "    [dry run] ",
            Self::Conflict => "    [conflict] ",
            Self::Error => "    [error] ",
            Self::Warn => "    [warn] ",
            Self::Info => "    ",
            Self::Debug => "    [debug] ",
        }
    }
}

/// Pulls the `message` field out of a [`tracing::Event`].
fn message_of(event: &tracing::Event<'_>) -> String {
    #[derive(Default)]
    struct Message(String);

    impl tracing::field::Visit for Message {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }

        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            if field.name() == "message" {
                self.0 = value.to_string();
            }
        }
    }

    let mut message = Message::default();
    event.record(&mut message);
    message.0
}

/// Appends every event it sees to one log file, ANSI codes stripped.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate `path`, write a run header for `command`, and keep the file
    /// open for appending.
    ///
    /// Returns `None` if the file cannot be written.
    pub(super) fn open(path: &Path, command: &str) -> Option<Self> {
        let rule = "=".repeat(42);
        let header = format!(
            "{rule}\ndotlink {} {command} {}\n{rule}\n",
            crate::VERSION,
            format_utc_datetime(),
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let kind = EventKind::of(event.metadata());
        let msg = strip_ansi(&message_of(event));
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "[{}] {}{msg}", format_utc_time(), kind.file_tag()).ok();
        }
    }
}

/// Console formatter; one line per event, coloured by [`EventKind`].
struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let kind = EventKind::of(event.metadata());
        writeln!(writer, "{}", kind.console_line(&message_of(event)))
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Warnings, conflicts and errors go to stderr, everything else to stdout.
/// `DEBUG` reaches the console only when `verbose` is set, but every event
/// is appended to `$XDG_CACHE_HOME/dotlink/<command>.log`.  Must be called
/// once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = log_file_path(command)
        .and_then(|path| FileLayer::open(&path, command))
        .map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
