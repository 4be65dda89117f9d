use std::borrow::Cow;

use crate::rtcp::{
    feedback::{FeedbackItem, ensure_item},
    rtcp_error::RtcpError,
    utils::{own_cow, pad_len, padded_len},
};

const PAYLOAD_TYPE_MASK: u8 = 0x7F;

/// Reference Picture Selection Indication item (PSFB, FMT=3), RFC 4585 §6.3.3.
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |      PB       |0| Payload Type|    Native RPSI bit string     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   defined per codec          ...                | Padding (0) |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// PB counts the padding bits after the bit string. The item has no length
/// of its own and takes the rest of the feedback packet. Whole padding bytes
/// are dropped on parse and regenerated on output; the remaining
/// `PB % 8` unused bits stay in the last byte of the bit string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpsiItem<'a> {
    payload_type: u8,
    unused_bits: u8,
    bit_string: Cow<'a, [u8]>,
}

impl<'a> RpsiItem<'a> {
    pub fn new(payload_type: u8, bit_string: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            payload_type: payload_type & PAYLOAD_TYPE_MASK,
            unused_bits: 0,
            bit_string: bit_string.into(),
        }
    }

    pub fn payload_type(&self) -> u8 {
        self.payload_type
    }

    pub fn bit_string(&self) -> &[u8] {
        &self.bit_string
    }

    /// Bit string length in bytes.
    pub fn length(&self) -> usize {
        self.bit_string.len()
    }

    /// Unused trailing bits inside the last byte of the bit string.
    pub fn unused_bits(&self) -> u8 {
        self.unused_bits
    }

    /// Masked to 0..=7.
    pub fn set_unused_bits(&mut self, bits: u8) {
        self.unused_bits = bits & 0x07;
    }

    /// Value of the PB field as written on output.
    pub fn padding_bits(&self) -> u8 {
        (pad_len(2 + self.bit_string.len()) * 8) as u8 + self.unused_bits
    }

    pub fn into_owned(self) -> RpsiItem<'static> {
        RpsiItem {
            payload_type: self.payload_type,
            unused_bits: self.unused_bits,
            bit_string: own_cow(self.bit_string),
        }
    }
}

impl<'a> FeedbackItem<'a> for RpsiItem<'a> {
    fn parse(buf: &'a [u8]) -> Result<(Self, usize), RtcpError> {
        ensure_item(buf, 2, "RPSI item truncated")?;
        let pb = buf[0];
        let pad_bytes = usize::from(pb / 8);
        let end = buf
            .len()
            .checked_sub(pad_bytes)
            .filter(|end| *end >= 2)
            .ok_or(RtcpError::MalformedItem("RPSI padding exceeds item"))?;
        Ok((
            Self {
                payload_type: buf[1] & PAYLOAD_TYPE_MASK,
                unused_bits: pb % 8,
                bit_string: Cow::Borrowed(&buf[2..end]),
            },
            buf.len(),
        ))
    }

    fn size(&self) -> usize {
        padded_len(2 + self.bit_string.len())
    }

    fn write_to(&self, dst: &mut [u8]) {
        let len = self.bit_string.len();
        dst[0] = self.padding_bits();
        dst[1] = self.payload_type & PAYLOAD_TYPE_MASK;
        dst[2..2 + len].copy_from_slice(&self.bit_string);
        dst[2 + len..].fill(0);
    }
}
