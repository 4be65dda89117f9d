use byteorder::{BigEndian, ByteOrder};

use super::rtcp_error::RtcpError;

pub const RTCP_VERSION: u8 = 2;
/// Size of the common header in bytes.
pub const HEADER_LEN: usize = 4;
/// Largest packet the 16-bit length field can describe.
pub const MAX_PACKET_LEN: usize = (u16::MAX as usize + 1) * 4;
/// Largest value of the 5-bit count / FMT field.
pub const MAX_COUNT: usize = 0x1F;

/// RTCP common header (RFC 3550 §6.4.1).
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |V=2|P|  RC/FMT |      PT       |             length            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Byte 0 carries version in bits 7..6, padding in bit 5 and the
/// count-or-FMT field in bits 4..0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonHeader {
    version: u8,       // 2
    padding: bool,     // P
    rc_or_fmt: u8,     // 5 bits (report count or FMT)
    pt: u8,            // packet type
    length_words: u16, // number of 32-bit words minus one
}

impl CommonHeader {
    pub fn new(rc_or_fmt: u8, pt: u8, padding: bool) -> Self {
        Self {
            version: RTCP_VERSION,
            padding,
            rc_or_fmt: rc_or_fmt & 0x1F,
            pt,
            length_words: 0,
        }
    }

    pub fn with_length(rc_or_fmt: u8, pt: u8, padding: bool, length_words: u16) -> Self {
        Self {
            length_words,
            ..Self::new(rc_or_fmt, pt, padding)
        }
    }

    /// Decodes the header at the front of `buf` and validates it against the
    /// buffer. Returns the header and the full packet size in bytes.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), RtcpError> {
        if buf.len() < HEADER_LEN {
            return Err(RtcpError::TruncatedBuffer {
                needed: HEADER_LEN,
                available: buf.len(),
            });
        }
        let vprc = buf[0];
        let version = vprc >> 6;
        if version != RTCP_VERSION {
            return Err(RtcpError::InvalidVersion(version));
        }
        let padding = ((vprc >> 5) & 1) != 0;
        let rc_or_fmt = vprc & 0x1F;
        let pt = buf[1];
        let length_words = BigEndian::read_u16(&buf[2..4]);

        let total_bytes = (usize::from(length_words) + 1) * 4;
        if buf.len() < total_bytes {
            return Err(RtcpError::TruncatedBuffer {
                needed: total_bytes,
                available: buf.len(),
            });
        }

        Ok((
            Self {
                version,
                padding,
                rc_or_fmt,
                pt,
                length_words,
            },
            total_bytes,
        ))
    }

    /// Writes the 4 header bytes. `dst` must hold at least [`HEADER_LEN`] bytes.
    pub fn write_to(&self, dst: &mut [u8]) {
        dst[0] = (self.version & 0b11) << 6 | u8::from(self.padding) << 5 | (self.rc_or_fmt & 0x1F);
        dst[1] = self.pt;
        BigEndian::write_u16(&mut dst[2..4], self.length_words);
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        let mut raw = [0u8; HEADER_LEN];
        self.write_to(&mut raw);
        out.extend_from_slice(&raw);
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn padding(&self) -> bool {
        self.padding
    }

    pub fn rc_or_fmt(&self) -> u8 {
        self.rc_or_fmt
    }

    pub fn pt(&self) -> u8 {
        self.pt
    }

    pub fn length_words(&self) -> u16 {
        self.length_words
    }

    /// Packet size in bytes as declared by the length field.
    pub fn packet_len(&self) -> usize {
        (usize::from(self.length_words) + 1) * 4
    }
}
