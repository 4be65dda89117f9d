use byteorder::{ByteOrder, LittleEndian};

use crate::rtcp::{
    feedback::{FeedbackItem, ensure_item},
    rtcp_error::RtcpError,
    utils::{read_u16, write_u16},
};

/// Transport-Layer Third-Party Loss Early Indication item (RTPFB, FMT=7),
/// RFC 6642 §5.1. Same shape as a NACK item, including the bitmask byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TlleiItem {
    pub packet_id: u16,
    pub lost_packet_bitmask: u16,
}

impl TlleiItem {
    pub const SIZE: usize = 4;

    pub fn new(packet_id: u16, lost_packet_bitmask: u16) -> Self {
        Self {
            packet_id,
            lost_packet_bitmask,
        }
    }
}

impl<'a> FeedbackItem<'a> for TlleiItem {
    fn parse(buf: &'a [u8]) -> Result<(Self, usize), RtcpError> {
        ensure_item(buf, Self::SIZE, "TLLEI item truncated")?;
        Ok((
            Self {
                packet_id: read_u16(buf, 0),
                lost_packet_bitmask: LittleEndian::read_u16(&buf[2..4]),
            },
            Self::SIZE,
        ))
    }

    fn size(&self) -> usize {
        Self::SIZE
    }

    fn write_to(&self, dst: &mut [u8]) {
        write_u16(dst, 0, self.packet_id);
        LittleEndian::write_u16(&mut dst[2..4], self.lost_packet_bitmask);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn parse_tllei_item() {
        let buf = [0x00, 0x01, 0x02, 0x00];
        let (item, _) = TlleiItem::parse(&buf).unwrap();
        assert_eq!(item.packet_id, 1);
        assert_eq!(item.lost_packet_bitmask, 2);

        let mut out = [0u8; 4];
        item.serialize(&mut out).unwrap();
        assert_eq!(out, buf);
    }
}
