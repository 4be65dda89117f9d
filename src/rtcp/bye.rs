use std::borrow::Cow;

use crate::rtcp::{
    common_header::{CommonHeader, MAX_COUNT},
    packet_type::{PacketType, RtcpPacketType},
    rtcp_error::RtcpError,
    utils::{ensure_len, own_cow, read_u32, truncate_cow, write_u32},
};

/// BYE packet (PT=203): the leaving sources and an optional reason.
///
/// The SC header field limits the list to 31 sources; [`add_ssrc`](Self::add_ssrc)
/// refuses the 32nd instead of dropping it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ByePacket<'a> {
    sources: Vec<u32>,
    reason: Option<Cow<'a, [u8]>>,
}

impl<'a> ByePacket<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(ssrc: u32) -> Self {
        Self {
            sources: vec![ssrc],
            reason: None,
        }
    }

    pub fn add_ssrc(&mut self, ssrc: u32) -> Result<(), RtcpError> {
        if self.sources.len() >= MAX_COUNT {
            return Err(RtcpError::TooManyEntries {
                what: "BYE sources",
                count: self.sources.len() + 1,
            });
        }
        self.sources.push(ssrc);
        Ok(())
    }

    /// Sources in insertion / wire order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.sources.iter().copied()
    }

    pub fn sources(&self) -> &[u32] {
        &self.sources
    }

    pub fn reason(&self) -> Option<&[u8]> {
        self.reason.as_deref()
    }

    /// Reason as text, replacing invalid UTF-8.
    pub fn reason_str(&self) -> Option<Cow<'_, str>> {
        self.reason.as_deref().map(String::from_utf8_lossy)
    }

    /// Reasons longer than 255 bytes are cut to fit the length octet.
    pub fn set_reason(&mut self, reason: impl Into<Cow<'a, [u8]>>) {
        self.reason = Some(truncate_cow(reason.into(), usize::from(u8::MAX)));
    }

    pub fn clear_reason(&mut self) {
        self.reason = None;
    }

    pub fn into_owned(self) -> ByePacket<'static> {
        ByePacket {
            sources: self.sources,
            reason: self.reason.map(own_cow),
        }
    }
}

impl<'a> RtcpPacketType<'a> for ByePacket<'a> {
    const PACKET_TYPE: PacketType = PacketType::Bye;

    fn decode(hdr: &CommonHeader, payload: &'a [u8]) -> Result<Self, RtcpError> {
        // First rc_or_fmt 5 bits indicate SSRC/CSRC count
        let sc = usize::from(hdr.rc_or_fmt());
        ensure_len(payload, sc * 4)?;
        let sources: Vec<u32> = (0..sc).map(|i| read_u32(payload, i * 4)).collect();

        let idx = sc * 4;
        let reason = if payload.len() > idx {
            let len = usize::from(payload[idx]);
            let start = idx + 1;
            if payload.len() < start + len {
                return Err(RtcpError::MalformedItem("BYE reason truncated"));
            }
            Some(Cow::Borrowed(&payload[start..start + len]))
        } else {
            None
        };
        Ok(Self { sources, reason })
    }

    fn count_or_fmt(&self) -> u8 {
        self.sources.len() as u8
    }

    fn body_len(&self) -> usize {
        self.sources.len() * 4 + self.reason.as_ref().map_or(0, |r| 1 + r.len())
    }

    fn write_body(&self, dst: &mut [u8]) {
        for (i, ssrc) in self.sources.iter().enumerate() {
            write_u32(dst, i * 4, *ssrc);
        }
        if let Some(reason) = &self.reason {
            let idx = self.sources.len() * 4;
            dst[idx] = reason.len() as u8;
            dst[idx + 1..idx + 1 + reason.len()].copy_from_slice(reason);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn create_serialize_and_parse() {
        let reason = "hasta la vista";
        let mut bye1 = ByePacket::new();
        bye1.add_ssrc(1111).unwrap();
        bye1.add_ssrc(2222).unwrap();
        bye1.set_reason(reason.as_bytes());

        let mut it = bye1.iter();
        assert_eq!(it.next(), Some(1111));
        assert_eq!(it.next(), Some(2222));
        assert_eq!(bye1.reason(), Some(reason.as_bytes()));

        let mut buffer = vec![0u8; bye1.size()];
        bye1.serialize(&mut buffer).unwrap();
        // header + 2 ssrc + 1 len + 14 reason + 1 pad
        assert_eq!(buffer.len(), 4 + 8 + 16);

        let (hdr, _) = CommonHeader::decode(&buffer).unwrap();
        let bye2 = ByePacket::decode(&hdr, &buffer[4..]).unwrap();
        assert_eq!(bye2.sources(), &[1111, 2222]);
        assert_eq!(bye2.reason_str().as_deref(), Some(reason));
    }

    #[test]
    fn without_reason() {
        let bye = ByePacket::single(5);
        let mut out = Vec::new();
        bye.encode_into(&mut out).unwrap();
        assert_eq!(out, vec![0x81, 203, 0x00, 0x01, 0, 0, 0, 5]);
    }

    #[test]
    fn source_limit_is_explicit() {
        let mut bye = ByePacket::new();
        for ssrc in 0..31 {
            bye.add_ssrc(ssrc).unwrap();
        }
        assert!(matches!(
            bye.add_ssrc(31),
            Err(RtcpError::TooManyEntries { count: 32, .. })
        ));
        assert_eq!(bye.count_or_fmt(), 31);
    }

    #[test]
    fn reason_length_past_payload_is_malformed() {
        let hdr = CommonHeader::new(1, 203, false);
        let payload = [0, 0, 0, 1, 9, b'a', b'b', b'c'];
        assert_eq!(
            ByePacket::decode(&hdr, &payload),
            Err(RtcpError::MalformedItem("BYE reason truncated"))
        );
    }

    #[test]
    fn source_count_past_payload_is_truncated() {
        let hdr = CommonHeader::new(3, 203, false);
        assert!(matches!(
            ByePacket::decode(&hdr, &[0u8; 8]),
            Err(RtcpError::TruncatedBuffer { needed: 12, .. })
        ));
    }
}
