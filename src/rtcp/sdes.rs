use std::{borrow::Cow, num::NonZeroU8};

use crate::rtcp::{
    common_header::{CommonHeader, MAX_COUNT},
    packet_type::{PacketType, RtcpPacketType},
    rtcp_error::RtcpError,
    utils::{ensure_len, own_cow, padded_len, read_u32, truncate_cow, write_u32},
};

/// SDES item types (RFC 3550 §6.5). Type 0 is the END marker and never
/// appears as an item, so no variant can carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdesItemType {
    Cname, // type=1
    Name,  // 2
    Email, // 3
    Phone, // 4
    Loc,   // 5
    Tool,  // 6
    Note,  // 7
    Priv,  // 8 (opaque)
    Unknown(NonZeroU8),
}

impl SdesItemType {
    pub fn as_u8(self) -> u8 {
        match self {
            SdesItemType::Cname => 1,
            SdesItemType::Name => 2,
            SdesItemType::Email => 3,
            SdesItemType::Phone => 4,
            SdesItemType::Loc => 5,
            SdesItemType::Tool => 6,
            SdesItemType::Note => 7,
            SdesItemType::Priv => 8,
            SdesItemType::Unknown(t) => t.get(),
        }
    }
}

impl TryFrom<u8> for SdesItemType {
    type Error = RtcpError;

    fn try_from(t: u8) -> Result<Self, Self::Error> {
        Ok(match t {
            1 => SdesItemType::Cname,
            2 => SdesItemType::Name,
            3 => SdesItemType::Email,
            4 => SdesItemType::Phone,
            5 => SdesItemType::Loc,
            6 => SdesItemType::Tool,
            7 => SdesItemType::Note,
            8 => SdesItemType::Priv,
            other => SdesItemType::Unknown(
                NonZeroU8::new(other)
                    .ok_or(RtcpError::MalformedItem("SDES END is not an item type"))?,
            ),
        })
    }
}

/// One `{type, length, value}` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdesItem<'a> {
    item_type: SdesItemType,
    value: Cow<'a, [u8]>,
}

impl<'a> SdesItem<'a> {
    /// Values longer than 255 bytes are cut to fit the 8-bit length.
    pub fn new(item_type: SdesItemType, value: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            item_type,
            value: truncate_cow(value.into(), usize::from(u8::MAX)),
        }
    }

    pub fn cname(value: &'a str) -> Self {
        Self::new(SdesItemType::Cname, value.as_bytes())
    }

    /// Parses one item (not END) from the front of `buf`; returns it and
    /// the bytes consumed.
    pub fn parse(buf: &'a [u8]) -> Result<(Self, usize), RtcpError> {
        if buf.len() < 2 {
            return Err(RtcpError::MalformedItem("SDES item header truncated"));
        }
        let item_type = SdesItemType::try_from(buf[0])?;
        let len = usize::from(buf[1]);
        if buf.len() < 2 + len {
            return Err(RtcpError::MalformedItem("SDES item value truncated"));
        }
        Ok((
            Self {
                item_type,
                value: Cow::Borrowed(&buf[2..2 + len]),
            },
            2 + len,
        ))
    }

    pub fn item_type(&self) -> SdesItemType {
        self.item_type
    }

    pub fn length(&self) -> u8 {
        self.value.len() as u8
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Value as text, replacing invalid UTF-8.
    pub fn value_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }

    pub fn size(&self) -> usize {
        2 + self.value.len()
    }

    pub fn serialize(&self, dst: &mut [u8]) -> Result<usize, RtcpError> {
        let size = self.size();
        if dst.len() < size {
            return Err(RtcpError::BufferTooSmall {
                needed: size,
                available: dst.len(),
            });
        }
        self.write_to(dst);
        Ok(size)
    }

    fn write_to(&self, dst: &mut [u8]) {
        dst[0] = self.item_type.as_u8();
        dst[1] = self.length();
        dst[2..self.size()].copy_from_slice(&self.value);
    }

    pub fn into_owned(self) -> SdesItem<'static> {
        SdesItem {
            item_type: self.item_type,
            value: own_cow(self.value),
        }
    }
}

/// An SSRC with its items, closed by END and NUL padding to 32 bits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SdesChunk<'a> {
    ssrc: u32,
    items: Vec<SdesItem<'a>>,
}

impl<'a> SdesChunk<'a> {
    pub fn new(ssrc: u32) -> Self {
        Self {
            ssrc,
            items: Vec::new(),
        }
    }

    /// Parses one chunk from the front of `buf`; returns it and the bytes
    /// consumed. A chunk running to the end of `buf` without an END octet
    /// is accepted.
    pub fn parse(buf: &'a [u8]) -> Result<(Self, usize), RtcpError> {
        ensure_len(buf, 4)?;
        let ssrc = read_u32(buf, 0);
        let mut idx = 4usize;
        let mut items = Vec::new();

        // Items until END(0). After END, pad to 4-byte boundary.
        while idx < buf.len() {
            if buf[idx] == 0 {
                // move to 4-byte boundary relative to chunk start
                let end = padded_len(idx + 1);
                if buf.len() < end {
                    return Err(RtcpError::MalformedItem("SDES chunk padding truncated"));
                }
                idx = end;
                break;
            }
            let (item, used) = SdesItem::parse(&buf[idx..])?;
            idx += used;
            items.push(item);
        }

        Ok((Self { ssrc, items }, idx))
    }

    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    pub fn set_ssrc(&mut self, ssrc: u32) {
        self.ssrc = ssrc;
    }

    /// Takes ownership of `item`.
    pub fn add_item(&mut self, item: SdesItem<'a>) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[SdesItem<'a>] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SdesItem<'a>> {
        self.items.iter()
    }

    /// First CNAME of the chunk, if any.
    pub fn cname(&self) -> Option<&SdesItem<'a>> {
        self.items
            .iter()
            .find(|i| i.item_type() == SdesItemType::Cname)
    }

    /// Chunk size including END and padding.
    pub fn size(&self) -> usize {
        let items: usize = self.items.iter().map(SdesItem::size).sum();
        padded_len(4 + items + 1)
    }

    pub fn serialize(&self, dst: &mut [u8]) -> Result<usize, RtcpError> {
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

    fn write_to(&self, dst: &mut [u8]) {
        write_u32(dst, 0, self.ssrc);
        let mut idx = 4;
        for item in &self.items {
            item.write_to(&mut dst[idx..]);
            idx += item.size();
        }
        // END plus NUL padding
        dst[idx..].fill(0);
    }

    pub fn into_owned(self) -> SdesChunk<'static> {
        SdesChunk {
            ssrc: self.ssrc,
            items: self.items.into_iter().map(SdesItem::into_owned).collect(),
        }
    }
}

impl<'s, 'a> IntoIterator for &'s SdesChunk<'a> {
    type Item = &'s SdesItem<'a>;
    type IntoIter = std::slice::Iter<'s, SdesItem<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// SDES packet (PT=202).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SdesPacket<'a> {
    chunks: Vec<SdesChunk<'a>>,
}

impl<'a> SdesPacket<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cname(ssrc: u32, cname: &'a str) -> Self {
        let mut chunk = SdesChunk::new(ssrc);
        chunk.add_item(SdesItem::cname(cname));
        Self {
            chunks: vec![chunk],
        }
    }

    pub fn chunks(&self) -> &[SdesChunk<'a>] {
        &self.chunks
    }

    /// At most 31 chunks fit the SC field.
    pub fn add_chunk(&mut self, chunk: SdesChunk<'a>) -> Result<(), RtcpError> {
        if self.chunks.len() >= MAX_COUNT {
            return Err(RtcpError::TooManyEntries {
                what: "SDES chunks",
                count: self.chunks.len() + 1,
            });
        }
        self.chunks.push(chunk);
        Ok(())
    }

    pub fn into_owned(self) -> SdesPacket<'static> {
        SdesPacket {
            chunks: self.chunks.into_iter().map(SdesChunk::into_owned).collect(),
        }
    }
}

impl<'a> RtcpPacketType<'a> for SdesPacket<'a> {
    const PACKET_TYPE: PacketType = PacketType::Sdes;

    fn decode(_hdr: &CommonHeader, payload: &'a [u8]) -> Result<Self, RtcpError> {
        // SDES is a sequence of chunks occupying the whole payload.
        let mut chunks = Vec::new();
        let mut idx = 0usize;
        while idx + 4 <= payload.len() {
            let (chunk, used) = SdesChunk::parse(&payload[idx..])?;
            chunks.push(chunk);
            idx += used;
        }
        if idx != payload.len() {
            // trailing non-aligned data indicates malformed SDES
            return Err(RtcpError::MalformedItem("SDES trailing bytes"));
        }
        Ok(Self { chunks })
    }

    fn count_or_fmt(&self) -> u8 {
        self.chunks.len() as u8
    }

    fn body_len(&self) -> usize {
        self.chunks.iter().map(SdesChunk::size).sum()
    }

    fn write_body(&self, dst: &mut [u8]) {
        let mut idx = 0;
        for chunk in &self.chunks {
            let size = chunk.size();
            chunk.write_to(&mut dst[idx..idx + size]);
            idx += size;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn parse_chunk_without_end_marker() {
        let buf = [
            0x00, 0x00, 0x00, 0x00, // SDES SSRC
            0x01, 0x0a, 0x6f, 0x75, // SDES Item
            0x74, 0x43, 0x68, 0x61, //
            0x6e, 0x6e, 0x65, 0x6c,
        ];
        let (chunk, used) = SdesChunk::parse(&buf).unwrap();
        assert_eq!(used, 16);
        assert_eq!(chunk.ssrc(), 0);

        let item = chunk.iter().next().unwrap();
        assert_eq!(item.item_type(), SdesItemType::Cname);
        assert_eq!(item.length(), 10);
        assert_eq!(item.value(), b"outChannel");
    }

    #[test]
    fn create_chunk() {
        let item = SdesItem::new(SdesItemType::Cname, "outChannel".as_bytes());
        let mut chunk = SdesChunk::new(0);
        chunk.add_item(item);

        assert_eq!(chunk.ssrc(), 0);
        let item = chunk.cname().unwrap();
        assert_eq!(item.length(), 10);
        assert_eq!(item.value_str(), "outChannel");
        // 4 ssrc + 12 item + END -> 20
        assert_eq!(chunk.size(), 20);
    }

    #[test]
    fn chunk_serializes_end_and_padding() {
        let mut chunk = SdesChunk::new(0x0102_0304);
        chunk.add_item(SdesItem::new(SdesItemType::Tool, &b"ab"[..]));
        // 8 bytes of content still need a full word for END.
        assert_eq!(chunk.size(), 12);
        let mut out = vec![0xFFu8; chunk.size()];
        assert_eq!(chunk.serialize(&mut out).unwrap(), 12);
        assert_eq!(out, vec![1, 2, 3, 4, 6, 2, b'a', b'b', 0, 0, 0, 0]);
    }

    #[test]
    fn packet_round_trip() {
        let mut sdes = SdesPacket::cname(0x1111, "alice@example");
        let mut chunk = SdesChunk::new(0x2222);
        chunk.add_item(SdesItem::new(SdesItemType::Name, &b"Bob"[..]));
        chunk.add_item(SdesItem::new(SdesItemType::try_from(42).unwrap(), vec![9u8; 3]));
        sdes.add_chunk(chunk).unwrap();

        let mut out = Vec::new();
        sdes.encode_into(&mut out).unwrap();
        assert_eq!(out.len() % 4, 0);
        assert_eq!(out[0] & 0x1F, 2);

        let (hdr, total) = CommonHeader::decode(&out).unwrap();
        assert_eq!(total, out.len());
        let back = SdesPacket::decode(&hdr, &out[4..]).unwrap();
        assert_eq!(back, sdes);
        assert_eq!(back.chunks()[1].items()[1].item_type().as_u8(), 42);
    }

    #[test]
    fn end_marker_is_not_an_item_type() {
        assert_eq!(
            SdesItemType::try_from(0),
            Err(RtcpError::MalformedItem("SDES END is not an item type"))
        );
        assert!(SdesItem::parse(&[0, 1, b'x']).is_err());
        for t in 1..=u8::MAX {
            assert_eq!(SdesItemType::try_from(t).unwrap().as_u8(), t);
        }
    }

    #[test]
    fn unregistered_type_round_trips_in_its_chunk() {
        let mut chunk = SdesChunk::new(5);
        chunk.add_item(SdesItem::new(SdesItemType::try_from(200).unwrap(), &b"abcdef"[..]));
        let mut sdes = SdesPacket::new();
        sdes.add_chunk(chunk).unwrap();

        let mut out = Vec::new();
        sdes.encode_into(&mut out).unwrap();
        assert_eq!(&out[8..10], &[200, 6]);

        let (hdr, total) = CommonHeader::decode(&out).unwrap();
        let back = SdesPacket::decode(&hdr, &out[4..total]).unwrap();
        assert_eq!(back.chunks().len(), 1);
        assert_eq!(back, sdes);
    }

    #[test]
    fn item_length_past_buffer_is_malformed() {
        let buf = [0, 0, 0, 1, 1, 9, b'x'];
        assert_eq!(
            SdesChunk::parse(&buf),
            Err(RtcpError::MalformedItem("SDES item value truncated"))
        );
    }

    #[test]
    fn long_values_are_capped() {
        let long = vec![b'x'; 300];
        let item = SdesItem::new(SdesItemType::Note, long);
        assert_eq!(item.length(), 255);
        assert_eq!(item.value().len(), 255);
    }

    #[test]
    fn into_owned_detaches_from_buffer() {
        let owned = {
            let buf = vec![0, 0, 0, 5, 1, 1, b'z', 0];
            let (chunk, _) = SdesChunk::parse(&buf).unwrap();
            chunk.into_owned()
        };
        assert_eq!(owned.ssrc(), 5);
        assert_eq!(owned.items()[0].value(), b"z");
    }
}
