use super::{
    rtcp_error::RtcpError,
    utils::{ensure_len, read_u32, write_u32},
};

const CUMULATIVE_LOST_MIN: i32 = -8_388_608;
const CUMULATIVE_LOST_MAX: i32 = 8_388_607;

/// ReportBlock per RFC3550 §6.4.2 (24 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportBlock {
    ssrc: u32,
    fraction_lost: u8,
    /// 24-bit signed cumulative number of packets lost.
    cumulative_lost: i32,
    highest_seq_no_received: u32, // extended highest seq no. received
    interarrival_jitter: u32,
    lsr: u32,
    dlsr: u32,
}

impl ReportBlock {
    pub const SIZE: usize = 24;

    pub fn new(ssrc: u32) -> Self {
        Self {
            ssrc,
            ..Self::default()
        }
    }

    /// Decodes a block from the first 24 bytes of `buf`.
    pub fn parse(buf: &[u8]) -> Result<Self, RtcpError> {
        ensure_len(buf, Self::SIZE)?;
        // 24-bit signed, sign-extended through the top byte.
        let cl_raw = (u32::from(buf[5]) << 16) | (u32::from(buf[6]) << 8) | u32::from(buf[7]);
        let cumulative_lost = ((cl_raw << 8) as i32) >> 8;

        Ok(Self {
            ssrc: read_u32(buf, 0),
            fraction_lost: buf[4],
            cumulative_lost,
            highest_seq_no_received: read_u32(buf, 8),
            interarrival_jitter: read_u32(buf, 12),
            lsr: read_u32(buf, 16),
            dlsr: read_u32(buf, 20),
        })
    }

    /// Writes the block in wire order. Returns the bytes written.
    pub fn serialize(&self, dst: &mut [u8]) -> Result<usize, RtcpError> {
        if dst.len() < Self::SIZE {
            return Err(RtcpError::BufferTooSmall {
                needed: Self::SIZE,
                available: dst.len(),
            });
        }
        self.write_to(dst);
        Ok(Self::SIZE)
    }

    pub(crate) fn write_to(&self, dst: &mut [u8]) {
        write_u32(dst, 0, self.ssrc);
        let cl_u = (self.cumulative_lost as u32) & 0x00FF_FFFF;
        write_u32(dst, 4, u32::from(self.fraction_lost) << 24 | cl_u);
        write_u32(dst, 8, self.highest_seq_no_received);
        write_u32(dst, 12, self.interarrival_jitter);
        write_u32(dst, 16, self.lsr);
        write_u32(dst, 20, self.dlsr);
    }

    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    pub fn fraction_lost(&self) -> u8 {
        self.fraction_lost
    }

    pub fn cumulative_lost(&self) -> i32 {
        self.cumulative_lost
    }

    pub fn highest_seq_no_received(&self) -> u32 {
        self.highest_seq_no_received
    }

    pub fn interarrival_jitter(&self) -> u32 {
        self.interarrival_jitter
    }

    /// Middle 32 bits of the NTP timestamp of the last SR received.
    pub fn lsr(&self) -> u32 {
        self.lsr
    }

    /// Delay since the last SR, in units of 1/65536 seconds.
    pub fn dlsr(&self) -> u32 {
        self.dlsr
    }

    pub fn set_ssrc(&mut self, ssrc: u32) {
        self.ssrc = ssrc;
    }

    pub fn set_fraction_lost(&mut self, fraction_lost: u8) {
        self.fraction_lost = fraction_lost;
    }

    /// Clamped to the 24-bit signed range.
    pub fn set_cumulative_lost(&mut self, cumulative_lost: i32) {
        self.cumulative_lost = cumulative_lost.clamp(CUMULATIVE_LOST_MIN, CUMULATIVE_LOST_MAX);
    }

    pub fn set_highest_seq_no_received(&mut self, seq: u32) {
        self.highest_seq_no_received = seq;
    }

    pub fn set_interarrival_jitter(&mut self, jitter: u32) {
        self.interarrival_jitter = jitter;
    }

    pub fn set_lsr(&mut self, lsr: u32) {
        self.lsr = lsr;
    }

    pub fn set_dlsr(&mut self, dlsr: u32) {
        self.dlsr = dlsr;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    const BLOCK: [u8; 24] = [
        0x00, 0x00, 0x04, 0xD2, // ssrc
        0x01, // fraction_lost
        0x00, 0x00, 0x04, // total_lost
        0x00, 0x00, 0x04, 0xD2, // last_seq
        0x00, 0x00, 0x04, 0xD2, // jitter
        0x00, 0x00, 0x04, 0xD2, // lsr
        0x00, 0x00, 0x04, 0xD2, // dlsr
    ];

    #[test]
    fn parse_block_fields() {
        let rb = ReportBlock::parse(&BLOCK).unwrap();
        assert_eq!(rb.ssrc(), 1234);
        assert_eq!(rb.fraction_lost(), 1);
        assert_eq!(rb.cumulative_lost(), 4);
        assert_eq!(rb.highest_seq_no_received(), 1234);
        assert_eq!(rb.interarrival_jitter(), 1234);
        assert_eq!(rb.lsr(), 1234);
        assert_eq!(rb.dlsr(), 1234);
    }

    #[test]
    fn cumulative_lost_is_sign_extended() {
        let mut raw = BLOCK;
        raw[5..8].copy_from_slice(&[0xFF, 0xFF, 0xFE]);
        assert_eq!(ReportBlock::parse(&raw).unwrap().cumulative_lost(), -2);
    }

    #[test]
    fn setters_then_serialize_then_parse() {
        let mut rb = ReportBlock::new(1234);
        rb.set_fraction_lost(1);
        rb.set_cumulative_lost(-77);
        rb.set_highest_seq_no_received(1234);
        rb.set_interarrival_jitter(1234);
        rb.set_lsr(1234);
        rb.set_dlsr(1234);

        let copy = rb;
        let mut buf = [0u8; ReportBlock::SIZE];
        assert_eq!(copy.serialize(&mut buf).unwrap(), 24);
        assert_eq!(ReportBlock::parse(&buf).unwrap(), rb);
    }

    #[test]
    fn cumulative_lost_clamps() {
        let mut rb = ReportBlock::default();
        rb.set_cumulative_lost(i32::MAX);
        assert_eq!(rb.cumulative_lost(), 8_388_607);
        rb.set_cumulative_lost(i32::MIN);
        assert_eq!(rb.cumulative_lost(), -8_388_608);
    }

    #[test]
    fn short_input_and_output_are_errors() {
        assert!(matches!(
            ReportBlock::parse(&BLOCK[..23]),
            Err(RtcpError::TruncatedBuffer { needed: 24, .. })
        ));
        let mut small = [0u8; 10];
        assert_eq!(
            ReportBlock::default().serialize(&mut small),
            Err(RtcpError::BufferTooSmall {
                needed: 24,
                available: 10
            })
        );
    }
}
