use crate::rtcp::{
    feedback::{FeedbackItem, ensure_item},
    rtcp_error::RtcpError,
    utils::{read_u32, write_u32},
};

const MANTISSA_BITS: u32 = 17;
const MAX_MANTISSA: u64 = (1 << MANTISSA_BITS) - 1;
const MAX_EXPONENT: u32 = 0x3F;
const MAX_OVERHEAD: u16 = 0x1FF;

/// TMMBR / TMMBN item (RTPFB, FMT=3 / FMT=4), RFC 5104 §4.2.1.
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                              SSRC                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | MxTBR Exp |  MxTBR Mantissa                 |Measured Overhead|
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Second word: exponent in bits 31..26, mantissa in bits 25..9, overhead in
/// bits 8..0. Bitrate is `mantissa << exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TmmbItem {
    ssrc: u32,
    bitrate: u64,
    overhead: u16,
}

impl TmmbItem {
    pub const SIZE: usize = 8;

    pub fn new(ssrc: u32, bitrate: u64, overhead: u16) -> Self {
        let mut item = Self {
            ssrc,
            ..Self::default()
        };
        item.set_bitrate(bitrate);
        item.set_overhead(overhead);
        item
    }

    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    pub fn bitrate(&self) -> u64 {
        self.bitrate
    }

    pub fn overhead(&self) -> u16 {
        self.overhead
    }

    pub fn set_ssrc(&mut self, ssrc: u32) {
        self.ssrc = ssrc;
    }

    /// Stores the value the wire can carry: low bits that do not survive
    /// the 17-bit mantissa are dropped.
    pub fn set_bitrate(&mut self, bitrate: u64) {
        let (exp, mantissa) = encode_bitrate(bitrate);
        self.bitrate = mantissa << exp;
    }

    /// Masked to 9 bits.
    pub fn set_overhead(&mut self, overhead: u16) {
        self.overhead = overhead & MAX_OVERHEAD;
    }
}

/// Smallest exponent whose mantissa fits 17 bits.
pub fn encode_bitrate(bitrate: u64) -> (u32, u64) {
    let mut exp = 0u32;
    let mut mantissa = bitrate;
    while mantissa > MAX_MANTISSA {
        mantissa >>= 1;
        exp += 1;
    }
    (exp, mantissa)
}

/// `mantissa << exp`, or `None` when the result does not fit 64 bits.
pub fn decode_bitrate(exp: u32, mantissa: u64) -> Option<u64> {
    if mantissa == 0 {
        return Some(0);
    }
    if exp > mantissa.leading_zeros() {
        return None;
    }
    Some(mantissa << exp)
}

impl<'a> FeedbackItem<'a> for TmmbItem {
    fn parse(buf: &'a [u8]) -> Result<(Self, usize), RtcpError> {
        ensure_item(buf, Self::SIZE, "TMMB item truncated")?;
        let word = read_u32(buf, 4);
        let exp = word >> 26;
        let mantissa = u64::from((word >> 9) & MAX_MANTISSA as u32);
        let overhead = (word & u32::from(MAX_OVERHEAD)) as u16;
        let bitrate =
            decode_bitrate(exp, mantissa).ok_or(RtcpError::MalformedItem("TMMB bitrate overflow"))?;
        Ok((
            Self {
                ssrc: read_u32(buf, 0),
                bitrate,
                overhead,
            },
            Self::SIZE,
        ))
    }

    fn size(&self) -> usize {
        Self::SIZE
    }

    fn write_to(&self, dst: &mut [u8]) {
        let (exp, mantissa) = encode_bitrate(self.bitrate);
        let word = (exp.min(MAX_EXPONENT) << 26)
            | ((mantissa as u32) << 9)
            | u32::from(self.overhead & MAX_OVERHEAD);
        write_u32(dst, 0, self.ssrc);
        write_u32(dst, 4, word);
    }
}
