use std::borrow::Cow;

use byteorder::{BigEndian, ByteOrder};

use super::rtcp_error::RtcpError;

/// Rounds `len` up to the next multiple of 4.
#[inline]
pub fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// Zero bytes needed after `len` bytes to reach a 32-bit boundary.
#[inline]
pub fn pad_len(len: usize) -> usize {
    padded_len(len) - len
}

/// Fails with `TruncatedBuffer` unless `buf` holds at least `needed` bytes.
#[inline]
pub(crate) fn ensure_len(buf: &[u8], needed: usize) -> Result<(), RtcpError> {
    if buf.len() < needed {
        return Err(RtcpError::TruncatedBuffer {
            needed,
            available: buf.len(),
        });
    }
    Ok(())
}

#[inline]
pub(crate) fn read_u32(buf: &[u8], at: usize) -> u32 {
    BigEndian::read_u32(&buf[at..at + 4])
}

#[inline]
pub(crate) fn read_u16(buf: &[u8], at: usize) -> u16 {
    BigEndian::read_u16(&buf[at..at + 2])
}

#[inline]
pub(crate) fn write_u32(dst: &mut [u8], at: usize, value: u32) {
    BigEndian::write_u32(&mut dst[at..at + 4], value);
}

#[inline]
pub(crate) fn write_u16(dst: &mut [u8], at: usize, value: u16) {
    BigEndian::write_u16(&mut dst[at..at + 2], value);
}

/// Keeps at most `max` bytes of a borrowed or owned byte string.
pub(crate) fn truncate_cow(bytes: Cow<'_, [u8]>, max: usize) -> Cow<'_, [u8]> {
    match bytes {
        Cow::Borrowed(b) if b.len() > max => Cow::Borrowed(&b[..max]),
        Cow::Owned(mut v) if v.len() > max => {
            v.truncate(max);
            Cow::Owned(v)
        }
        other => other,
    }
}

/// Detaches a byte string from the buffer it may borrow.
pub(crate) fn own_cow(bytes: Cow<'_, [u8]>) -> Cow<'static, [u8]> {
    Cow::Owned(bytes.into_owned())
}

/// Strips RTCP padding from a packet payload when the P bit is set.
///
/// The last octet carries the padding length, itself included.
pub(crate) fn strip_padding(payload: &[u8], padding: bool) -> Result<&[u8], RtcpError> {
    if !padding {
        return Ok(payload);
    }
    let Some(&count) = payload.last() else {
        return Err(RtcpError::MalformedItem("padding bit set on empty payload"));
    };
    let count = usize::from(count);
    if count == 0 || count > payload.len() {
        return Err(RtcpError::MalformedItem("invalid padding length"));
    }
    Ok(&payload[..payload.len() - count])
}
