use crate::error::GSError;
use chrono::Local;
use log::{Level, Log, Metadata, Record};

struct LpLogger {
    level: Level,
}

impl Log for LpLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    #[allow(clippy::print_stdout)]
    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.6f");
        // Module paths only add noise at the default levels.
        if self.level >= Level::Debug {
            println!(
                "{} {:<5} [{}] {}",
                timestamp,
                record.level().to_string(),
                record.target(),
                record.args()
            );
        } else {
            println!("{} {:<5} {}", timestamp, record.level().to_string(), record.args());
        }
    }

    fn flush(&self) {}
}

pub fn init_logger_with_level(level: Level) -> Result<(), GSError> {
    let logger = LpLogger { level };
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| GSError::Generic(format!("Could not set logger: {}", e)))?;
    log::set_max_level(level.to_level_filter());
    Ok(())
}
