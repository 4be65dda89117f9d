use crate::config::Config;

const SECTION: &str = "Rtcp";

pub const DEFAULT_MAX_COMPOUND_PACKETS: usize = 256;
pub const DEFAULT_MAX_DATAGRAM_LEN: usize = 65_535;

/// Decode limits applied by [`RtcpCodec`](super::codec::RtcpCodec).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcpConfig {
    /// Upper bound on packets in one compound datagram.
    pub max_compound_packets: usize,
    /// Upper bound on datagram size in bytes.
    pub max_datagram_len: usize,
}

impl Default for RtcpConfig {
    fn default() -> Self {
        Self {
            max_compound_packets: DEFAULT_MAX_COMPOUND_PACKETS,
            max_datagram_len: DEFAULT_MAX_DATAGRAM_LEN,
        }
    }
}

impl RtcpConfig {
    /// Reads the `[Rtcp]` section; absent keys keep their defaults.
    pub fn from_config(config: &Config) -> Result<Self, String> {
        let defaults = Self::default();
        let cfg = Self {
            max_compound_packets: config.get_parsed_or(
                SECTION,
                "max_compound_packets",
                defaults.max_compound_packets,
            )?,
            max_datagram_len: config.get_parsed_or(
                SECTION,
                "max_datagram_len",
                defaults.max_datagram_len,
            )?,
        };
        if cfg.max_compound_packets == 0 {
            return Err("[Rtcp] max_compound_packets must be at least 1".into());
        }
        Ok(cfg)
    }
}
