use crate::log::log_level::LogLevel;

/// Destination for log lines produced through the `sink_*!` macros.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, msg: &str, target: &'static str);
}
