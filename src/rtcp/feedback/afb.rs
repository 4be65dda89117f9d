use std::borrow::Cow;

use crate::rtcp::{feedback::FeedbackItem, rtcp_error::RtcpError, utils::own_cow};

/// Application Layer Feedback (PSFB, FMT=15), RFC 4585 §6.4.
///
/// The FCI is opaque to RTCP; the item takes every byte that follows the
/// feedback header. Payloads that are not a multiple of four bytes are
/// padded by the enclosing packet with the P bit set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AfbItem<'a> {
    data: Cow<'a, [u8]>,
}

impl<'a> AfbItem<'a> {
    pub fn new(data: impl Into<Cow<'a, [u8]>>) -> Self {
        Self { data: data.into() }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_owned(self) -> AfbItem<'static> {
        AfbItem {
            data: own_cow(self.data),
        }
    }
}

impl<'a> FeedbackItem<'a> for AfbItem<'a> {
    fn parse(buf: &'a [u8]) -> Result<(Self, usize), RtcpError> {
        Ok((
            Self {
                data: Cow::Borrowed(buf),
            },
            buf.len(),
        ))
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    fn write_to(&self, dst: &mut [u8]) {
        dst.copy_from_slice(&self.data);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn takes_whole_remainder() {
        let buf = [0x00, 0x00, 0x00, 0x01];
        let (item, used) = AfbItem::parse(&buf).unwrap();
        assert_eq!(used, 4);
        assert_eq!(item.len(), 4);
        assert_eq!(item.data()[3] & 1, 1);
    }
}
