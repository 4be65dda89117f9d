use std::borrow::Cow;

use crate::rtcp::{
    feedback::{FeedbackItem, ensure_item},
    rtcp_error::RtcpError,
    utils::{own_cow, padded_len, read_u16, read_u32, truncate_cow, write_u16, write_u32},
};

const HEADER_LEN: usize = 8;
const PAYLOAD_TYPE_MASK: u8 = 0x7F;

/// Video Back Channel Message item (PSFB, FMT=7), RFC 5104 §4.3.4.
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                              SSRC                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | Seq nr.       |0| Payload Type| Length                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                    VBCM Octet String....    |    Padding    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VbcmItem<'a> {
    ssrc: u32,
    seq_nr: u8,
    payload_type: u8,
    value: Cow<'a, [u8]>,
}

impl<'a> VbcmItem<'a> {
    /// Values longer than the 16-bit length field are cut.
    pub fn new(ssrc: u32, seq_nr: u8, payload_type: u8, value: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            ssrc,
            seq_nr,
            payload_type: payload_type & PAYLOAD_TYPE_MASK,
            value: truncate_cow(value.into(), usize::from(u16::MAX)),
        }
    }

    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    pub fn seq_nr(&self) -> u8 {
        self.seq_nr
    }

    pub fn payload_type(&self) -> u8 {
        self.payload_type
    }

    pub fn length(&self) -> u16 {
        self.value.len() as u16
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn into_owned(self) -> VbcmItem<'static> {
        VbcmItem {
            ssrc: self.ssrc,
            seq_nr: self.seq_nr,
            payload_type: self.payload_type,
            value: own_cow(self.value),
        }
    }
}

impl<'a> FeedbackItem<'a> for VbcmItem<'a> {
    fn parse(buf: &'a [u8]) -> Result<(Self, usize), RtcpError> {
        ensure_item(buf, HEADER_LEN, "VBCM item truncated")?;
        let len = usize::from(read_u16(buf, 6));
        let size = padded_len(HEADER_LEN + len);
        ensure_item(buf, size, "VBCM value truncated")?;
        Ok((
            Self {
                ssrc: read_u32(buf, 0),
                seq_nr: buf[4],
                payload_type: buf[5] & PAYLOAD_TYPE_MASK,
                value: Cow::Borrowed(&buf[HEADER_LEN..HEADER_LEN + len]),
            },
            size,
        ))
    }

    fn size(&self) -> usize {
        padded_len(HEADER_LEN + self.value.len())
    }

    fn write_to(&self, dst: &mut [u8]) {
        let len = self.value.len();
        write_u32(dst, 0, self.ssrc);
        dst[4] = self.seq_nr;
        dst[5] = self.payload_type & PAYLOAD_TYPE_MASK;
        write_u16(dst, 6, len as u16);
        dst[HEADER_LEN..HEADER_LEN + len].copy_from_slice(&self.value);
        dst[HEADER_LEN + len..].fill(0);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn parse_vbcm_item() {
        let buf = [
            0x00, 0x00, 0x00, 0x00, // ssrc
            0x08, // seq nr
            0x02, // zero | payload type
            0x00, 0x01, // length
            0x01, // octet string
            0x00, 0x00, 0x00, // padding
        ];
        let (item, used) = VbcmItem::parse(&buf).unwrap();
        assert_eq!(used, 12);
        assert_eq!(item.ssrc(), 0);
        assert_eq!(item.seq_nr(), 8);
        assert_eq!(item.payload_type(), 2);
        assert_eq!(item.length(), 1);
        assert_eq!(item.value()[usize::from(item.length()) - 1] & 1, 1);

        let mut out = [0u8; 12];
        item.serialize(&mut out).unwrap();
        assert_eq!(out, buf);
    }

    #[test]
    fn missing_padding_is_malformed() {
        let buf = [0, 0, 0, 0, 8, 2, 0, 1, 1];
        assert_eq!(
            VbcmItem::parse(&buf),
            Err(RtcpError::MalformedItem("VBCM value truncated"))
        );
    }

    #[test]
    fn items_follow_each_other() {
        let first = VbcmItem::new(1, 1, 96, &b"abcd"[..]);
        let second = VbcmItem::new(2, 2, 97, &b"xy"[..]);
        let mut out = vec![0u8; first.size() + second.size()];
        let n = first.serialize(&mut out).unwrap();
        second.serialize(&mut out[n..]).unwrap();

        let (a, used) = VbcmItem::parse(&out).unwrap();
        assert_eq!(used, 12);
        let (b, _) = VbcmItem::parse(&out[used..]).unwrap();
        assert_eq!(a, first);
        assert_eq!(b, second);
    }

    #[test]
    fn oversized_value_is_cut_to_length_field() {
        let big = vec![7u8; usize::from(u16::MAX) + 10];
        let borrowed = VbcmItem::new(1, 0, 96, &big[..]);
        assert_eq!(borrowed.length(), u16::MAX);
        assert_eq!(borrowed.value().len(), usize::from(u16::MAX));

        let owned = VbcmItem::new(1, 0, 96, big.clone());
        assert_eq!(owned, borrowed);
    }
}
