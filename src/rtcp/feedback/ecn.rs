use crate::rtcp::{
    feedback::{FeedbackItem, ensure_item},
    rtcp_error::RtcpError,
    utils::{read_u16, read_u32, write_u16, write_u32},
};

/// RTCP ECN feedback item (RTPFB, FMT=8), RFC 6679 §5.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EcnItem {
    /// Extended highest sequence number received.
    pub sequence_number: u32,
    pub ect0_counter: u32,
    pub ect1_counter: u32,
    pub ecn_ce_counter: u16,
    pub not_ect_counter: u16,
    pub lost_packets: u16,
    pub duplicated_packets: u16,
}

impl EcnItem {
    pub const SIZE: usize = 20;
}

impl<'a> FeedbackItem<'a> for EcnItem {
    fn parse(buf: &'a [u8]) -> Result<(Self, usize), RtcpError> {
        ensure_item(buf, Self::SIZE, "ECN item truncated")?;
        Ok((
            Self {
                sequence_number: read_u32(buf, 0),
                ect0_counter: read_u32(buf, 4),
                ect1_counter: read_u32(buf, 8),
                ecn_ce_counter: read_u16(buf, 12),
                not_ect_counter: read_u16(buf, 14),
                lost_packets: read_u16(buf, 16),
                duplicated_packets: read_u16(buf, 18),
            },
            Self::SIZE,
        ))
    }

    fn size(&self) -> usize {
        Self::SIZE
    }

    fn write_to(&self, dst: &mut [u8]) {
        write_u32(dst, 0, self.sequence_number);
        write_u32(dst, 4, self.ect0_counter);
        write_u32(dst, 8, self.ect1_counter);
        write_u16(dst, 12, self.ecn_ce_counter);
        write_u16(dst, 14, self.not_ect_counter);
        write_u16(dst, 16, self.lost_packets);
        write_u16(dst, 18, self.duplicated_packets);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn parse_ecn_item() {
        let buf = [
            0x00, 0x00, 0x00, 0x01, // extended highest seq
            0x00, 0x00, 0x00, 0x01, // ECT(0)
            0x00, 0x00, 0x00, 0x01, // ECT(1)
            0x00, 0x01, // ECN-CE
            0x00, 0x01, // not-ECT
            0x00, 0x01, // lost
            0x00, 0x01, // duplicated
        ];
        let (item, used) = EcnItem::parse(&buf).unwrap();
        assert_eq!(used, 20);
        assert_eq!(item.sequence_number, 1);
        assert_eq!(item.ect0_counter, 1);
        assert_eq!(item.ect1_counter, 1);
        assert_eq!(item.ecn_ce_counter, 1);
        assert_eq!(item.not_ect_counter, 1);
        assert_eq!(item.lost_packets, 1);
        assert_eq!(item.duplicated_packets, 1);

        let mut out = [0u8; EcnItem::SIZE];
        item.serialize(&mut out).unwrap();
        assert_eq!(out, buf);
    }

    #[test]
    fn short_item_is_malformed() {
        assert!(EcnItem::parse(&[0u8; 19]).is_err());
    }
}
