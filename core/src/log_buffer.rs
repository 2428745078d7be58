//! `log` backend that keeps recent records in memory so a frontend can show
//! them in a panel instead of a terminal.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

const DEFAULT_CAPACITY: usize = 512;

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub level: log::Level,
    pub target: String,
    pub message: String,
}

pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    dropped: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    /// Appends an entry, evicting the oldest one when full.
    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
            self.dropped += 1;
        }
        self.entries.push_back(entry);
    }

    pub fn drain(&mut self) -> Vec<LogEntry> {
        self.entries.drain(..).collect()
    }

    /// Number of entries evicted before anyone drained them.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

static LOG_BUFFER: OnceLock<Mutex<LogBuffer>> = OnceLock::new();

fn global_buffer() -> &'static Mutex<LogBuffer> {
    LOG_BUFFER.get_or_init(|| Mutex::new(LogBuffer::new(DEFAULT_CAPACITY)))
}

struct BufferLogger;

impl log::Log for BufferLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };
        if let Ok(mut buf) = global_buffer().lock() {
            buf.push(entry);
        }
    }

    fn flush(&self) {}
}

static LOGGER: BufferLogger = BufferLogger;

pub fn init_logger(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// Total records the global buffer has evicted unread since start-up.
pub fn dropped_logs() -> usize {
    global_buffer().lock().map(|buf| buf.dropped()).unwrap_or(0)
}

pub fn drain_logs() -> Vec<LogEntry> {
    global_buffer()
        .lock()
        .map(|mut buf| buf.drain())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            level: log::Level::Debug,
            target: "cga::mode".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn full_buffer_evicts_oldest() {
        let mut buf = LogBuffer::new(2);
        buf.push(entry("a"));
        buf.push(entry("b"));
        buf.push(entry("c"));
        assert_eq!(buf.dropped(), 1);
        let messages: Vec<_> = buf.drain().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, ["b", "c"]);
        assert!(buf.drain().is_empty());
    }

    #[test]
    fn zero_capacity_still_keeps_latest() {
        let mut buf = LogBuffer::new(0);
        buf.push(entry("a"));
        buf.push(entry("b"));
        assert_eq!(buf.drain().len(), 1);
    }

    #[test]
    fn drop_count_survives_drain() {
        let mut buf = LogBuffer::new(1);
        buf.push(entry("a"));
        buf.push(entry("b"));
        buf.drain();
        buf.push(entry("c"));
        assert_eq!(buf.dropped(), 1);
    }
}
