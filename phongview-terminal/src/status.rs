/// Logger that keeps the latest record for the status line
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::sync::Mutex;

pub struct StatusLog {
    level: Level,
    last: Mutex<Option<String>>,
}

impl StatusLog {
    pub const fn new(level: Level) -> Self {
        Self {
            level,
            last: Mutex::new(None),
        }
    }

    /// Most recent message, if any was logged
    pub fn last_message(&self) -> Option<String> {
        self.last.lock().ok().and_then(|last| last.clone())
    }
}

impl Log for StatusLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut last) = self.last.lock() {
            *last = Some(format!("{}: {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

static STATUS: StatusLog = StatusLog::new(Level::Info);

/// Install the status logger as the global logger
pub fn init() -> Result<(), SetLoggerError> {
    log::set_logger(&STATUS).map(|()| log::set_max_level(LevelFilter::Info))
}

pub fn last_message() -> Option<String> {
    STATUS.last_message()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_latest_enabled_record() {
        let log = StatusLog::new(Level::Info);
        log.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("loaded"))
                .build(),
        );
        log.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("ignored"))
                .build(),
        );
        assert_eq!(log.last_message().as_deref(), Some("INFO: loaded"));
    }
}
