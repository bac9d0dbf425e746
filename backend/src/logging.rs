//! Pipeline log broadcasting.
//!
//! Every entry is echoed to stderr (stdout stays clean for JSON output) and
//! fanned out to subscribers, which the HTTP layer streams as Server-Sent
//! Events.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Capacity of the subscriber channel; slow subscribers skip older entries.
const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    fn marker(self) -> &'static str {
        match self {
            LogLevel::Info => " ",
            LogLevel::Success => "✓",
            LogLevel::Warning => "!",
            LogLevel::Error => "✗",
        }
    }
}

/// A single log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth for sub-steps
    #[serde(default)]
    pub indent: u8,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            indent: 0,
            timestamp: Utc::now(),
        }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Single-line text form used for the console.
    pub fn render(&self) -> String {
        format!(
            "{}{} {}",
            "  ".repeat(self.indent as usize),
            self.level.marker(),
            self.message
        )
    }
}

/// Process-wide broadcaster.
pub static BROADCASTER: Lazy<LogBroadcaster> = Lazy::new(LogBroadcaster::new);

pub struct LogBroadcaster {
    sender: broadcast::Sender<LogEntry>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, entry: LogEntry) {
        eprintln!("{}", entry.render());
        // No subscribers is fine.
        let _ = self.sender.send(entry);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

pub fn info(msg: impl Into<String>) {
    BROADCASTER.publish(LogEntry::new(LogLevel::Info, msg));
}

pub fn success(msg: impl Into<String>) {
    BROADCASTER.publish(LogEntry::new(LogLevel::Success, msg));
}

pub fn warning(msg: impl Into<String>) {
    BROADCASTER.publish(LogEntry::new(LogLevel::Warning, msg));
}

pub fn error(msg: impl Into<String>) {
    BROADCASTER.publish(LogEntry::new(LogLevel::Error, msg));
}

pub fn info_indent(msg: impl Into<String>, indent: u8) {
    BROADCASTER.publish(LogEntry::new(LogLevel::Info, msg).with_indent(indent));
}

pub fn warning_indent(msg: impl Into<String>, indent: u8) {
    BROADCASTER.publish(LogEntry::new(LogLevel::Warning, msg).with_indent(indent));
}
