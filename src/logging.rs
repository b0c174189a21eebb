/// Structured logging for the weather bot
///
/// Provides context-rich logging with a data-source tag and an optional
/// identifier (feed key, URL, webhook event). Events go through `tracing`;
/// `init_logger` installs the subscriber for both console and file output.

use std::fmt;
use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// HKO RSS feeds.
    Feed,
    /// Rain nowcast renderer.
    Nowcast,
    /// IFTTT relay.
    Webhook,
    Server,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Feed => write!(f, "FEED"),
            DataSource::Nowcast => write!(f, "NOWCAST"),
            DataSource::Webhook => write!(f, "WEBHOOK"),
            DataSource::Server => write!(f, "HTTP"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - upstream published nothing usable this cycle
    Expected,
    /// Unexpected failure - indicates service degradation or configuration issue
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Subscriber setup
// ---------------------------------------------------------------------------

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides `min_level` when set. With `log_file`, output is
/// appended to that file instead of stderr. Calling this twice is harmless:
/// the second install is ignored.
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, json: bool) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(min_level.as_filter()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let result = match (log_file, json) {
        (Some(path), json) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            if json {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
        (None, true) => builder.json().with_writer(std::io::stderr).try_init(),
        (None, false) => builder.with_writer(std::io::stderr).try_init(),
    };

    if result.is_err() {
        debug(DataSource::System, None, "logger already initialized");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Log a general informational message
pub fn info(source: DataSource, id: Option<&str>, message: &str) {
    tracing::info!(source = %source, id = id.unwrap_or("-"), "{}", message);
}

/// Log a warning message
pub fn warn(source: DataSource, id: Option<&str>, message: &str) {
    tracing::warn!(source = %source, id = id.unwrap_or("-"), "{}", message);
}

/// Log an error message
pub fn error(source: DataSource, id: Option<&str>, message: &str) {
    tracing::error!(source = %source, id = id.unwrap_or("-"), "{}", message);
}

/// Log a debug message
pub fn debug(source: DataSource, id: Option<&str>, message: &str) {
    tracing::debug!(source = %source, id = id.unwrap_or("-"), "{}", message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a feed failure based on the error text.
pub fn classify_feed_failure(error_message: &str) -> FailureType {
    if error_message.contains("No embedded payload") {
        // HKO occasionally serves an empty item between bulletin updates
        FailureType::Expected
    } else if error_message.contains("HTTP") || error_message.contains("XML error") {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

/// Classify a nowcast renderer failure.
pub fn classify_nowcast_failure(error_message: &str) -> FailureType {
    if error_message.contains("failed to spawn") {
        // Renderer not installed: configuration problem
        FailureType::Unexpected
    } else if error_message.contains("malformed") {
        // Page did not finish loading within the retry budget
        FailureType::Expected
    } else {
        // Includes a non-zero exit: missing script, browser crash
        FailureType::Unknown
    }
}

/// Classify a webhook failure.
pub fn classify_webhook_failure(error_message: &str) -> FailureType {
    if error_message.contains("timed out") || error_message.contains("connect") {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

fn log_failure(
    source: DataSource,
    id: &str,
    operation: &str,
    error_msg: &str,
    failure_type: FailureType,
) {
    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Expected => debug(source, Some(id), &message),
        FailureType::Unexpected => error(source, Some(id), &message),
        FailureType::Unknown => warn(source, Some(id), &message),
    }
}

/// Log a feed failure with automatic classification
pub fn log_feed_failure(feed: &str, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_feed_failure(&error_msg);
    log_failure(DataSource::Feed, feed, operation, &error_msg, failure_type);
}

/// Log a nowcast renderer failure with classification
pub fn log_nowcast_failure(url: &str, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_nowcast_failure(&error_msg);
    log_failure(DataSource::Nowcast, url, operation, &error_msg, failure_type);
}

/// Log a webhook failure with classification
pub fn log_webhook_failure(event: &str, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_webhook_failure(&error_msg);
    log_failure(DataSource::Webhook, event, operation, &error_msg, failure_type);
}
