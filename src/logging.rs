use std::io::{self, Write};

use anstyle::{AnsiColor, Style};
use chrono::Local;
use log::{Level, LevelFilter, Log};
#[cfg(all(unix, feature = "journald"))]
use systemd_journal_logger::{JournalLog, connected_to_journal, current_exe_identifier};

/// Timestamp format for log output, e.g. `Jul 08 2001 14:46:23`.
const TIMESTAMP_FMT: &str = "%b %d %Y %H:%M:%S";

/// Writes log records from this package (the library and the command line) to `stderr`, or to the systemd journal
/// when the process is connected to one.
///
/// Colour and `NO_COLOR` support come from [`anstream`]. Records from other crates (reqwest, hyper, …) are dropped.
pub struct Logger {
    filter: LevelFilter,
    timestamps: bool,
    #[cfg(all(unix, feature = "journald"))]
    journald: Option<JournalLog>,
}

impl Logger {
    pub fn new(filter: LevelFilter) -> Self {
        let timestamps = std::env::var("PORKBUN_LOG_NO_TIMESTAMPS").map_or(true, |v| v.is_empty());

        // The journal records its own timestamps.
        #[cfg(all(unix, feature = "journald"))]
        let (journald, timestamps) = match init_journald() {
            Some(journal) => (Some(journal), false),
            None => (None, timestamps),
        };

        Self {
            filter,
            timestamps,
            #[cfg(all(unix, feature = "journald"))]
            journald,
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.filter;
        log::set_boxed_logger(Box::new(self)).map(|()| log::set_max_level(level))
    }

    fn try_log(&self, record: &log::Record) -> io::Result<()> {
        if !self.enabled(record.metadata()) {
            return Ok(());
        }

        #[cfg(all(unix, feature = "journald"))]
        if let Some(journald) = self.journald.as_ref() {
            return journald.journal_send(record);
        }

        let style = level_style(record.level());
        let mut output = anstream::stderr().lock();

        if self.timestamps {
            write!(output, "{} ", Local::now().format(TIMESTAMP_FMT))?;
        }

        writeln!(
            output,
            "{style}[{}]{style:#} {}",
            record.level().as_str().to_ascii_lowercase(),
            record.args()
        )?;
        output.flush()
    }
}

/// Level colours, loosely following `journalctl`'s: grey trace, plain debug, bold info, yellow warnings, red errors.
fn level_style(level: Level) -> Style {
    match level {
        Level::Trace => Style::new().fg_color(Some(AnsiColor::BrightBlack.into())),
        Level::Debug => Style::new(),
        Level::Info => Style::new().bold(),
        Level::Warn => Style::new().fg_color(Some(AnsiColor::Yellow.into())).bold(),
        Level::Error => Style::new().fg_color(Some(AnsiColor::Red.into())).bold(),
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.target().starts_with(env!("CARGO_CRATE_NAME")) && metadata.level() <= self.filter
    }

    fn log(&self, record: &log::Record) {
        let _ = self.try_log(record);
    }

    fn flush(&self) {
        let _ = anstream::stderr().flush();

        #[cfg(all(unix, feature = "journald"))]
        if let Some(journald) = self.journald.as_ref() {
            <JournalLog as Log>::flush(journald);
        }
    }
}

#[cfg(all(unix, feature = "journald"))]
fn init_journald() -> Option<JournalLog> {
    if !connected_to_journal() {
        return None;
    }

    let identifier = current_exe_identifier().unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    let journal = JournalLog::empty()
        .ok()?
        .with_syslog_identifier(identifier)
        .add_extra_field("version", env!("CARGO_PKG_VERSION"));
    Some(journal)
}
