use std::borrow::Cow;

use crate::rtcp::{
    common_header::CommonHeader,
    packet_type::{PacketType, RtcpPacketType},
    rtcp_error::RtcpError,
    utils::{ensure_len, own_cow, read_u32, write_u32},
};

/// APP packet (PT=204).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPacket<'a> {
    pub subtype: u8, // from rc_or_fmt
    pub name: [u8; 4],
    pub ssrc: u32,
    data: Cow<'a, [u8]>,
}

impl<'a> AppPacket<'a> {
    pub fn new(subtype: u8, ssrc: u32, name: [u8; 4]) -> Self {
        Self {
            subtype: subtype & 0x1F,
            name,
            ssrc,
            data: Cow::Borrowed(&[]),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Unaligned data is padded to 32 bits with the P bit set on output.
    pub fn set_data(&mut self, data: impl Into<Cow<'a, [u8]>>) {
        self.data = data.into();
    }

    pub fn into_owned(self) -> AppPacket<'static> {
        AppPacket {
            subtype: self.subtype,
            name: self.name,
            ssrc: self.ssrc,
            data: own_cow(self.data),
        }
    }
}

impl<'a> RtcpPacketType<'a> for AppPacket<'a> {
    const PACKET_TYPE: PacketType = PacketType::App;

    fn decode(hdr: &CommonHeader, payload: &'a [u8]) -> Result<Self, RtcpError> {
        ensure_len(payload, 8)?;
        let mut name = [0u8; 4];
        name.copy_from_slice(&payload[4..8]);
        Ok(Self {
            subtype: hdr.rc_or_fmt(),
            name,
            ssrc: read_u32(payload, 0),
            data: Cow::Borrowed(&payload[8..]),
        })
    }

    fn count_or_fmt(&self) -> u8 {
        self.subtype & 0x1F
    }

    fn body_len(&self) -> usize {
        8 + self.data.len()
    }

    fn write_body(&self, dst: &mut [u8]) {
        write_u32(dst, 0, self.ssrc);
        dst[4..8].copy_from_slice(&self.name);
        dst[8..].copy_from_slice(&self.data);
    }

    fn has_opaque_tail(&self) -> bool {
        true
    }
}
