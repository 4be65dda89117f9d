use crate::log::log_level::LogLevel;

/// A single log event as queued by [`ChannelLogSink`](crate::log::ChannelLogSink).
#[derive(Debug, Clone)]
pub struct LogMsg {
    pub level: LogLevel,
    /// Milliseconds since the UNIX epoch.
    pub ts_ms: u128,
    pub text: String,
    /// Origin of the log, typically the static module path.
    pub target: &'static str,
}

impl LogMsg {
    pub fn new(
        level: LogLevel,
        text: impl Into<String>,
        target: &'static str,
        ts_ms: u128,
    ) -> Self {
        Self {
            level,
            ts_ms,
            text: text.into(),
            target,
        }
    }
}
