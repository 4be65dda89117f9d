use std::{
    sync::mpsc,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::log::{log_level::LogLevel, log_msg::LogMsg, log_sink::LogSink};

/// Cloneable sink that forwards codec logs to whoever owns the receiver.
///
/// Enqueues `LogMsg` into a bounded `SyncSender` without blocking: when the
/// queue is full the message is dropped and [`try_log`](Self::try_log) reports it.
#[derive(Clone)]
pub struct ChannelLogSink {
    tx: mpsc::SyncSender<LogMsg>,
}

impl ChannelLogSink {
    /// Creates a sink with a queue of `cap` messages and its receiving end.
    pub fn bounded(cap: usize) -> (Self, mpsc::Receiver<LogMsg>) {
        let (tx, rx) = mpsc::sync_channel(cap);
        (Self { tx }, rx)
    }

    pub fn from_sender(tx: mpsc::SyncSender<LogMsg>) -> Self {
        Self { tx }
    }

    /// Attempts to enqueue a log message without blocking.
    ///
    /// # Errors
    /// - `TrySendError::Full` when the bounded queue is at capacity.
    /// - `TrySendError::Disconnected` when the receiver has been dropped.
    pub fn try_log<S: Into<String>>(
        &self,
        level: LogLevel,
        text: S,
        target: &'static str,
    ) -> Result<(), mpsc::TrySendError<LogMsg>> {
        self.tx
            .try_send(LogMsg::new(level, text, target, now_millis()))
    }
}

impl LogSink for ChannelLogSink {
    #[inline]
    fn log(&self, level: LogLevel, msg: &str, target: &'static str) {
        let _ = self.try_log(level, msg, target);
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
