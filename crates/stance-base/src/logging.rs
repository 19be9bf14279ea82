use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;
use std::str::FromStr;
use std::time::Instant;

/// Environment variable holding the log level filter (`error`, `warn`, `info`, `debug`, `trace`, `off`).
pub const LOG_ENV: &str = "STANCE_LOG";

/// A logger that writes one line per record to stdout.
///
/// Lines look like `   12.345s [INFO] stance_pose::acquisition - message`, where the
/// leading number is the time since the logger was created.
pub struct StdoutLogger {
    level: LevelFilter,
    start: Instant,
}

impl StdoutLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            start: Instant::now(),
        }
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Format a record the way `log` writes it, without the trailing newline.
    pub fn format(&self, record: &Record) -> String {
        let elapsed = self.start.elapsed().as_secs_f64();
        format!(
            "{:>9.3}s [{}] {} - {}",
            elapsed,
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        println!("{}", self.format(record));
    }

    fn flush(&self) {
        std::io::stdout().flush().ok();
    }
}

/// Default level for the current build mode: Debug in debug builds, Info in release.
fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Parse a level filter, falling back to the build-mode default for missing or bad values.
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or_else(default_level)
}

/// Level filter from `STANCE_LOG`.
pub fn level_from_env() -> LevelFilter {
    parse_level(std::env::var(LOG_ENV).ok().as_deref())
}

/// Initialize the global logger with a `StdoutLogger` at the `STANCE_LOG` level.
///
/// This can only be called once per process. Subsequent calls are silently ignored.
pub fn init_stdout_logger() {
    let level = level_from_env();
    let logger: &'static StdoutLogger = Box::leak(Box::new(StdoutLogger::new(level)));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

/// Log a fatal error and exit the process
///
/// Logs at Error level (the log crate has no Fatal level), flushes the logger and
/// stdout, and calls std::process::exit(1).
#[macro_export]
macro_rules! log_fatal {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
        $crate::log::Log::flush($crate::log::logger());
        {
            use std::io::Write;
            let _ = std::io::stdout().flush();
        }
        std::process::exit(1);
    }};
}
