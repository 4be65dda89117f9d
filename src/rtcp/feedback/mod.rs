//! RTCP feedback messages (RFC 4585, RFC 5104, RFC 6642, RFC 6679).
//!
//! Both feedback packet types share the same layout: the common header with
//! the FMT in the count field, the sender SSRC, the media SSRC and a run of
//! feedback control information (FCI) items. The container never records item
//! boundaries; each item type knows its own size, so items are read one after
//! another until the packet payload is exhausted.

pub mod afb;
pub mod ecn;
pub mod fir;
pub mod lei;
pub mod nack;
pub mod payload_feedback;
pub mod rpsi;
pub mod sli;
pub mod tllei;
pub mod tmmb;
pub mod transport_feedback;
pub mod tst;
pub mod vbcm;

use super::{
    rtcp_error::RtcpError,
    utils::{ensure_len, read_u32, write_u32},
};

/// Sender SSRC + media SSRC.
pub const FEEDBACK_HEADER_LEN: usize = 8;

/// A feedback control information item.
pub trait FeedbackItem<'a>: Sized {
    /// Parses one item from the front of `buf`, returning it together with
    /// the number of bytes it occupied.
    fn parse(buf: &'a [u8]) -> Result<(Self, usize), RtcpError>;

    /// Serialized size in bytes, including any item-local padding.
    fn size(&self) -> usize;

    /// Writes the item into `dst`, which holds exactly `size()` bytes.
    fn write_to(&self, dst: &mut [u8]);

    fn serialize(&self, dst: &mut [u8]) -> Result<usize, RtcpError> {
        let size = self.size();
        if dst.len() < size {
            return Err(RtcpError::BufferTooSmall {
                needed: size,
                available: dst.len(),
            });
        }
        self.write_to(&mut dst[..size]);
        Ok(size)
    }
}

/// Sender and media SSRC that open every feedback packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedbackHeader {
    pub sender_ssrc: u32,
    pub media_ssrc: u32,
}

impl FeedbackHeader {
    pub fn new(sender_ssrc: u32, media_ssrc: u32) -> Self {
        Self {
            sender_ssrc,
            media_ssrc,
        }
    }

    pub(crate) fn parse(payload: &[u8]) -> Result<Self, RtcpError> {
        ensure_len(payload, FEEDBACK_HEADER_LEN)?;
        Ok(Self {
            sender_ssrc: read_u32(payload, 0),
            media_ssrc: read_u32(payload, 4),
        })
    }

    pub(crate) fn write_to(&self, dst: &mut [u8]) {
        write_u32(dst, 0, self.sender_ssrc);
        write_u32(dst, 4, self.media_ssrc);
    }
}

/// Walks `fci` front to back, one item at a time.
pub(crate) fn parse_items<'a, T: FeedbackItem<'a>>(mut fci: &'a [u8]) -> Result<Vec<T>, RtcpError> {
    let mut items = Vec::new();
    while !fci.is_empty() {
        let (item, used) = T::parse(fci)?;
        if used == 0 || used > fci.len() {
            return Err(RtcpError::MalformedItem("feedback item size"));
        }
        items.push(item);
        fci = &fci[used..];
    }
    Ok(items)
}

/// Formats that carry no FCI must not have any.
pub(crate) fn expect_no_items(fci: &[u8]) -> Result<(), RtcpError> {
    if fci.is_empty() {
        Ok(())
    } else {
        Err(RtcpError::MalformedItem("unexpected FCI"))
    }
}

pub(crate) fn items_len<'a, T: FeedbackItem<'a>>(items: &[T]) -> usize {
    items.iter().map(FeedbackItem::size).sum()
}

pub(crate) fn write_items<'a, T: FeedbackItem<'a>>(items: &[T], dst: &mut [u8]) {
    let mut idx = 0;
    for item in items {
        let size = item.size();
        item.write_to(&mut dst[idx..idx + size]);
        idx += size;
    }
}

/// Fails with `MalformedItem` unless `buf` holds a full fixed-size item.
pub(crate) fn ensure_item(buf: &[u8], size: usize, what: &'static str) -> Result<(), RtcpError> {
    if buf.len() < size {
        return Err(RtcpError::MalformedItem(what));
    }
    Ok(())
}
