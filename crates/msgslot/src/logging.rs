use clap::ValueEnum;
use tracing::level_filters::LevelFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Install the global stderr subscriber.
///
/// `timestamps` is on for the long-running `serve` loop, where log
/// lines need ordering across sessions, and off for the one-shot
/// send/recv commands, whose few lines would only gain noise.
pub fn init_logging(format: LogFormat, level: LogLevel, timestamps: bool) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(LevelFilter::from(level))
        .with_ansi(false)
        .with_target(false);

    match (format, timestamps) {
        (LogFormat::Text, true) => {
            let _ = builder.try_init();
        }
        (LogFormat::Text, false) => {
            let _ = builder.without_time().try_init();
        }
        (LogFormat::Json, true) => {
            let _ = builder.json().try_init();
        }
        (LogFormat::Json, false) => {
            let _ = builder.json().without_time().try_init();
        }
    }
}
