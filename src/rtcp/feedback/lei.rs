use crate::rtcp::{
    feedback::{FeedbackItem, ensure_item},
    rtcp_error::RtcpError,
    utils::{read_u32, write_u32},
};

/// Payload-Specific Third-Party Loss Early Indication item (PSFB, FMT=8),
/// RFC 6642 §5.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeiItem {
    pub ssrc: u32,
}

impl LeiItem {
    pub const SIZE: usize = 4;

    pub fn new(ssrc: u32) -> Self {
        Self { ssrc }
    }
}

impl<'a> FeedbackItem<'a> for LeiItem {
    fn parse(buf: &'a [u8]) -> Result<(Self, usize), RtcpError> {
        ensure_item(buf, Self::SIZE, "LEI item truncated")?;
        Ok((Self { ssrc: read_u32(buf, 0) }, Self::SIZE))
    }

    fn size(&self) -> usize {
        Self::SIZE
    }

    fn write_to(&self, dst: &mut [u8]) {
        write_u32(dst, 0, self.ssrc);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn parse_ps_lei_item() {
        let (item, used) = LeiItem::parse(&[0x00, 0x00, 0x00, 0x01]).unwrap();
        assert_eq!(used, 4);
        assert_eq!(item.ssrc, 1);
    }
}
