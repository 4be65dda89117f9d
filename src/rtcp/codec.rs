use std::sync::Arc;

use bytes::Bytes;

use crate::{
    log::{NoopLogSink, log_sink::LogSink},
    rtcp::{
        compound::CompoundPacket, rtcp::RtcpPacket, rtcp_config::RtcpConfig,
        rtcp_error::RtcpError,
    },
    sink_trace, sink_warn,
};

/// Datagram-level RTCP codec for the transport layer.
///
/// Wraps [`RtcpPacket::parse`] with the configured size limits and reports
/// what it accepts or rejects to the injected sink.
pub struct RtcpCodec {
    config: RtcpConfig,
    logger: Arc<dyn LogSink>,
}

impl RtcpCodec {
    pub fn new(config: RtcpConfig, logger: Arc<dyn LogSink>) -> Self {
        Self { config, logger }
    }

    /// Codec with default limits and no logging.
    pub fn with_defaults() -> Self {
        Self::new(RtcpConfig::default(), Arc::new(NoopLogSink))
    }

    pub fn config(&self) -> &RtcpConfig {
        &self.config
    }

    /// Decodes one received datagram.
    ///
    /// # Errors
    /// [`RtcpError::LimitExceeded`] when the datagram or its packet count is over
    /// the configured limit, otherwise whatever [`RtcpPacket::parse`] reports.
    pub fn decode<'a>(&self, buf: &'a [u8]) -> Result<CompoundPacket<'a>, RtcpError> {
        if buf.len() > self.config.max_datagram_len {
            let err = RtcpError::LimitExceeded {
                what: "datagram length",
                limit: self.config.max_datagram_len,
            };
            sink_warn!(&self.logger, "[RTCP] Dropping {} byte datagram: {}", buf.len(), err);
            return Err(err);
        }

        let chain = match RtcpPacket::parse(buf) {
            Ok(chain) => chain,
            Err(e) => {
                sink_warn!(&self.logger, "[RTCP] Dropping {} byte datagram: {}", buf.len(), e);
                return Err(e);
            }
        };

        let count = chain.len();
        if count > self.config.max_compound_packets {
            let err = RtcpError::LimitExceeded {
                what: "compound packet count",
                limit: self.config.max_compound_packets,
            };
            sink_warn!(&self.logger, "[RTCP] Dropping datagram of {} packets: {}", count, err);
            return Err(err);
        }

        sink_trace!(
            &self.logger,
            "[RTCP] Decoded {} packet(s) from {} bytes: {:?}",
            count,
            buf.len(),
            chain.iter().map(RtcpPacket::packet_type).collect::<Vec<_>>()
        );
        Ok(chain)
    }

    /// Encodes a whole chain into one datagram.
    pub fn encode(&self, chain: &CompoundPacket<'_>) -> Result<Bytes, RtcpError> {
        let bytes = chain.to_bytes()?;
        sink_trace!(
            &self.logger,
            "[RTCP] Encoded {} packet(s) into {} bytes",
            chain.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Encodes `packets` back to back into one datagram.
    pub fn encode_packets(&self, packets: &[RtcpPacket<'_>]) -> Result<Bytes, RtcpError> {
        let out = RtcpPacket::encode_compound(packets)?;
        sink_trace!(
            &self.logger,
            "[RTCP] Encoded {} packet(s) into {} bytes",
            packets.len(),
            out.len()
        );
        Ok(Bytes::from(out))
    }
}
