use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RtcpError {
    /// Fewer bytes than a header or a declared length requires.
    TruncatedBuffer { needed: usize, available: usize },
    InvalidVersion(u8),
    UnknownPacketType(u8),
    /// The 5-bit FMT of a feedback packet is not in the registry.
    UnknownFeedbackSubtype { packet_type: u8, fmt: u8 },
    /// Item-local length or field inconsistency.
    MalformedItem(&'static str),
    /// Destination buffer smaller than the serialized size.
    BufferTooSmall { needed: usize, available: usize },
    /// A 5-bit count field cannot represent this many entries.
    TooManyEntries { what: &'static str, count: usize },
    /// Serialized size does not fit the 16-bit length field.
    PacketTooLarge(usize),
    /// A configured decode limit was hit.
    LimitExceeded { what: &'static str, limit: usize },
}

impl fmt::Display for RtcpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RtcpError::*;
        match self {
            TruncatedBuffer { needed, available } => write!(
                f,
                "truncated RTCP buffer: need {needed} bytes, only {available} available"
            ),
            InvalidVersion(v) => write!(f, "bad RTCP version: {v}"),
            UnknownPacketType(pt) => write!(f, "unknown RTCP packet type: {pt}"),
            UnknownFeedbackSubtype { packet_type, fmt } => {
                write!(f, "unknown feedback FMT {fmt} for packet type {packet_type}")
            }
            MalformedItem(what) => write!(f, "malformed RTCP item: {what}"),
            BufferTooSmall { needed, available } => write!(
                f,
                "destination too small: need {needed} bytes, got {available}"
            ),
            TooManyEntries { what, count } => {
                write!(f, "{count} {what} exceed the 5-bit count field (max 31)")
            }
            PacketTooLarge(size) => {
                write!(f, "packet of {size} bytes does not fit the RTCP length field")
            }
            LimitExceeded { what, limit } => write!(f, "{what} exceeds configured limit {limit}"),
        }
    }
}

impl std::error::Error for RtcpError {}
