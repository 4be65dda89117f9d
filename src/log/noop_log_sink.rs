use crate::log::{log_level::LogLevel, log_sink::LogSink};

/// Discards everything. Default sink of [`RtcpCodec::with_defaults`](crate::rtcp::codec::RtcpCodec::with_defaults).
#[derive(Debug, Clone, Default)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    #[inline]
    fn log(&self, _level: LogLevel, _msg: &str, _target: &'static str) {}
}
