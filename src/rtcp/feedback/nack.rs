use byteorder::{ByteOrder, LittleEndian};

use crate::rtcp::{
    feedback::{FeedbackItem, ensure_item},
    rtcp_error::RtcpError,
    utils::{read_u16, write_u16},
};

/// Generic NACK item (RTPFB, FMT=1), RFC 4585 §6.2.1.
///
/// The packet id is big-endian. The lost packet bitmask is carried in the
/// byte order the peer engine emits: `{0x02, 0x00}` reads as bitmask `2`,
/// and built items write it back the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NackItem {
    pub packet_id: u16,
    pub lost_packet_bitmask: u16,
}

impl NackItem {
    pub const SIZE: usize = 4;

    pub fn new(packet_id: u16, lost_packet_bitmask: u16) -> Self {
        Self {
            packet_id,
            lost_packet_bitmask,
        }
    }

    /// Sequence numbers reported lost: the packet id, then `packet_id + i + 1`
    /// for every set bit `i` of the bitmask.
    pub fn lost_packets(&self) -> impl Iterator<Item = u16> + use<> {
        let (pid, blp) = (self.packet_id, self.lost_packet_bitmask);
        std::iter::once(pid).chain(
            (0..16u16)
                .filter(move |&i| blp & (1u16 << i) != 0)
                .map(move |i| pid.wrapping_add(i + 1)),
        )
    }
}

impl<'a> FeedbackItem<'a> for NackItem {
    fn parse(buf: &'a [u8]) -> Result<(Self, usize), RtcpError> {
        ensure_item(buf, Self::SIZE, "NACK item truncated")?;
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
