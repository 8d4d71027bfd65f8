use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};

/// Logger writing timestamped lines to stderr
pub struct CliLogger {
    level: LevelFilter,
}

impl CliLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Level for the given count of `-v` flags, or `Error` when quiet
    pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::Error;
        }
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl log::Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Local::now().format("%H:%M:%S%.3f");
        match record.level() {
            Level::Error | Level::Warn => {
                eprintln!("{} {:<5} {}", timestamp, record.level(), record.args())
            }
            _ => eprintln!(
                "{} {:<5} [{}] {}",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            ),
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(CliLogger::level_for(0, false), LevelFilter::Warn);
        assert_eq!(CliLogger::level_for(1, false), LevelFilter::Info);
        assert_eq!(CliLogger::level_for(2, false), LevelFilter::Debug);
        assert_eq!(CliLogger::level_for(5, false), LevelFilter::Trace);
        assert_eq!(CliLogger::level_for(3, true), LevelFilter::Error);
    }
}
