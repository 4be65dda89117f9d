use crate::rtcp::{
    feedback::{FeedbackItem, ensure_item},
    rtcp_error::RtcpError,
    utils::{read_u32, write_u32},
};

/// Full Intra Request item (PSFB, FMT=4), RFC 5104 §4.3.1.
///
/// The three bytes after the sequence number are reserved and written as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FirItem {
    pub ssrc: u32,
    pub seq_nr: u8,
}

impl FirItem {
    pub const SIZE: usize = 8;

    pub fn new(ssrc: u32, seq_nr: u8) -> Self {
        Self { ssrc, seq_nr }
    }
}

impl<'a> FeedbackItem<'a> for FirItem {
    fn parse(buf: &'a [u8]) -> Result<(Self, usize), RtcpError> {
        ensure_item(buf, Self::SIZE, "FIR item truncated")?;
        Ok((
            Self {
                ssrc: read_u32(buf, 0),
                seq_nr: buf[4],
            },
            Self::SIZE,
        ))
    }

    fn size(&self) -> usize {
        Self::SIZE
    }

    fn write_to(&self, dst: &mut [u8]) {
        write_u32(dst, 0, self.ssrc);
        dst[4] = self.seq_nr;
        dst[5..8].fill(0);
    }
}
