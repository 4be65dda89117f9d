use crate::rtcp::{
    feedback::{FeedbackItem, ensure_item},
    rtcp_error::RtcpError,
    utils::{read_u32, write_u32},
};

const INDEX_MASK: u8 = 0x3F;

/// Temporal-Spatial Trade-off item, shared by TSTR (PSFB, FMT=5) and TSTN
/// (PSFB, FMT=6), RFC 5104 §4.3.2 / §4.3.3.
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                              SSRC                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Seq nr.      |  Reserved                         | Index     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TstItem {
    ssrc: u32,
    seq_nr: u8,
    index: u8,
}

impl TstItem {
    pub const SIZE: usize = 8;

    pub fn new(ssrc: u32, seq_nr: u8, index: u8) -> Self {
        Self {
            ssrc,
            seq_nr,
            index: index & INDEX_MASK,
        }
    }

    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    pub fn seq_nr(&self) -> u8 {
        self.seq_nr
    }

    /// Trade-off index, 0 (highest spatial quality) to 63.
    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn set_index(&mut self, index: u8) {
        self.index = index & INDEX_MASK;
    }
}

impl<'a> FeedbackItem<'a> for TstItem {
    fn parse(buf: &'a [u8]) -> Result<(Self, usize), RtcpError> {
        ensure_item(buf, Self::SIZE, "TST item truncated")?;
        Ok((
            Self {
                ssrc: read_u32(buf, 0),
                seq_nr: buf[4],
                index: buf[7] & INDEX_MASK,
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
        dst[5] = 0;
        dst[6] = 0;
        dst[7] = self.index & INDEX_MASK;
    }
}
