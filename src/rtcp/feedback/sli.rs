use crate::rtcp::{
    feedback::{FeedbackItem, ensure_item},
    rtcp_error::RtcpError,
    utils::{read_u32, write_u32},
};

const FIRST_MASK: u16 = 0x1FFF;
const NUMBER_MASK: u16 = 0x1FFF;
const PICTURE_ID_MASK: u8 = 0x3F;

/// Slice Loss Indication item (PSFB, FMT=2), RFC 4585 §6.3.2.
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |            First        |        Number           | PictureID |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliItem {
    first: u16,
    number: u16,
    picture_id: u8,
}

impl SliItem {
    pub const SIZE: usize = 4;

    /// Values wider than their fields are masked.
    pub fn new(first: u16, number: u16, picture_id: u8) -> Self {
        Self {
            first: first & FIRST_MASK,
            number: number & NUMBER_MASK,
            picture_id: picture_id & PICTURE_ID_MASK,
        }
    }

    pub fn first(&self) -> u16 {
        self.first
    }

    pub fn number(&self) -> u16 {
        self.number
    }

    pub fn picture_id(&self) -> u8 {
        self.picture_id
    }

    pub fn set_first(&mut self, first: u16) {
        self.first = first & FIRST_MASK;
    }

    pub fn set_number(&mut self, number: u16) {
        self.number = number & NUMBER_MASK;
    }

    pub fn set_picture_id(&mut self, picture_id: u8) {
        self.picture_id = picture_id & PICTURE_ID_MASK;
    }
}

impl<'a> FeedbackItem<'a> for SliItem {
    fn parse(buf: &'a [u8]) -> Result<(Self, usize), RtcpError> {
        ensure_item(buf, Self::SIZE, "SLI item truncated")?;
        let word = read_u32(buf, 0);
        Ok((
            Self {
                first: (word >> 19) as u16 & FIRST_MASK,
                number: (word >> 6) as u16 & NUMBER_MASK,
                picture_id: word as u8 & PICTURE_ID_MASK,
            },
            Self::SIZE,
        ))
    }

    fn size(&self) -> usize {
        Self::SIZE
    }

    fn write_to(&self, dst: &mut [u8]) {
        let word = (u32::from(self.first) << 19)
            | (u32::from(self.number) << 6)
            | u32::from(self.picture_id);
        write_u32(dst, 0, word);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn parse_sli_item() {
        let buf = [0x00, 0x08, 0x01, 0x01];
        let (item, _) = SliItem::parse(&buf).unwrap();
        assert_eq!(item.first(), 1);
        assert_eq!(item.number(), 4);
        assert_eq!(item.picture_id(), 1);

        let mut out = [0u8; 4];
        SliItem::new(1, 4, 1).serialize(&mut out).unwrap();
        assert_eq!(out, buf);
    }

    #[test]
    fn fields_are_masked() {
        let item = SliItem::new(0xFFFF, 0xFFFF, 0xFF);
        assert_eq!(item.first(), 0x1FFF);
        assert_eq!(item.number(), 0x1FFF);
        assert_eq!(item.picture_id(), 0x3F);

        let mut out = [0u8; 4];
        item.serialize(&mut out).unwrap();
        assert_eq!(out, [0xFF; 4]);
    }
}
