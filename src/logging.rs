use chrono::Local;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum number of log entries to keep in memory
const MAX_LOG_ENTRIES: usize = 1000;

/// A log entry with timestamp and message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, target: &str, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S.%3f").to_string(),
            level: level.to_string().to_uppercase(),
            target: target.to_string(),
            message,
        }
    }

    /// Format for the `logs` command
    pub fn format_for_display(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

/// Thread-safe ring buffer for log entries
#[derive(Clone, Default)]
pub struct LogRingBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogRingBuffer {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES))),
        }
    }

    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        let entries = self.entries.lock().unwrap();
        entries.iter().rev().take(count).rev().cloned().collect()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

/// Writer that parses compact fmt lines into ring buffer entries
#[derive(Clone)]
pub struct RingBufferWriter {
    buffer: LogRingBuffer,
}

impl RingBufferWriter {
    pub fn new(buffer: LogRingBuffer) -> Self {
        Self { buffer }
    }

    fn record(&self, line: &str) {
        // Compact format without time: "LEVEL target: message"
        let levels = [
            ("TRACE ", Level::TRACE),
            ("DEBUG ", Level::DEBUG),
            ("INFO ", Level::INFO),
            ("WARN ", Level::WARN),
            ("ERROR ", Level::ERROR),
        ];

        let parsed = levels
            .iter()
            .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|rest| (*level, rest)));

        let (level, rest) = match parsed {
            Some(parsed) => parsed,
            None => {
                self.buffer
                    .push(LogEntry::new(Level::INFO, "general", line.to_string()));
                return;
            }
        };

        let (target, msg) = match rest.find(':') {
            Some(colon) if !rest[..colon].contains(' ') => {
                (&rest[..colon], rest[colon + 1..].trim())
            }
            _ => ("general", rest.trim()),
        };

        self.buffer
            .push(LogEntry::new(level, target, msg.to_string()));
    }
}

impl std::io::Write for RingBufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(message) = std::str::from_utf8(buf) {
            for line in message.lines() {
                let line = line.trim();
                if !line.is_empty() {
                    self.record(line);
                }
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RingBufferWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Global log buffer accessible throughout the application
static LOG_BUFFER: OnceLock<LogRingBuffer> = OnceLock::new();

/// Get the global log buffer
pub fn get_log_buffer() -> Option<LogRingBuffer> {
    LOG_BUFFER.get().cloned()
}

/// Initialize tracing with the ring buffer writer.
///
/// `default_level` is an `EnvFilter` directive used when `RUST_LOG` is unset.
/// Calling this twice returns the first buffer.
pub fn init_tracing(default_level: &str) -> LogRingBuffer {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    if let Some(buffer) = get_log_buffer() {
        return buffer;
    }

    let buffer = LOG_BUFFER.get_or_init(LogRingBuffer::new).clone();
    let writer = RingBufferWriter::new(buffer.clone());

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time()
        .compact();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        buffer.push(LogEntry::new(
            Level::WARN,
            "system",
            "A global tracing subscriber was already installed".to_string(),
        ));
    }

    tracing::info!(target: "system", "Tracing initialized (default level '{}')", default_level);

    buffer
}

/// Trace a drag gesture with the column it names
#[macro_export]
macro_rules! trace_gesture {
    ($gesture:expr, $key:expr) => {
        tracing::trace!(target: "drag", "{} '{}'", $gesture, $key);
    };
}
