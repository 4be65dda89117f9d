use super::{
    common_header::{CommonHeader, HEADER_LEN, MAX_PACKET_LEN},
    rtcp_error::RtcpError,
    utils::padded_len,
};

// RTCP packet types (per RFC3550; feedback per RFC4585/5104)
pub const PT_SR: u8 = 200;
pub const PT_RR: u8 = 201;
pub const PT_SDES: u8 = 202;
pub const PT_BYE: u8 = 203;
pub const PT_APP: u8 = 204;
pub const PT_RTPFB: u8 = 205; // Transport layer FB (e.g., Generic NACK)
pub const PT_PSFB: u8 = 206; // Payload-specific FB (e.g., PLI, FIR)

/// Registry of packet types this codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    SenderReport,
    ReceiverReport,
    Sdes,
    Bye,
    App,
    TransportFeedback,
    PayloadFeedback,
}

impl PacketType {
    pub fn as_u8(self) -> u8 {
        match self {
            PacketType::SenderReport => PT_SR,
            PacketType::ReceiverReport => PT_RR,
            PacketType::Sdes => PT_SDES,
            PacketType::Bye => PT_BYE,
            PacketType::App => PT_APP,
            PacketType::TransportFeedback => PT_RTPFB,
            PacketType::PayloadFeedback => PT_PSFB,
        }
    }
}

impl TryFrom<u8> for PacketType {
    type Error = RtcpError;

    fn try_from(pt: u8) -> Result<Self, Self::Error> {
        match pt {
            PT_SR => Ok(PacketType::SenderReport),
            PT_RR => Ok(PacketType::ReceiverReport),
            PT_SDES => Ok(PacketType::Sdes),
            PT_BYE => Ok(PacketType::Bye),
            PT_APP => Ok(PacketType::App),
            PT_RTPFB => Ok(PacketType::TransportFeedback),
            PT_PSFB => Ok(PacketType::PayloadFeedback),
            other => Err(RtcpError::UnknownPacketType(other)),
        }
    }
}

/// Shared codec surface of every RTCP packet variant.
///
/// Implementors describe their body (everything after the common header).
/// The provided methods emit the header and the length field, and pad the
/// body to a 32-bit boundary.
pub trait RtcpPacketType<'a>: Sized {
    const PACKET_TYPE: PacketType;

    /// Decodes the packet from the common header and the payload that
    /// follows it (padding already stripped).
    fn decode(hdr: &CommonHeader, payload: &'a [u8]) -> Result<Self, RtcpError>;

    /// Value for the 5-bit RC/FMT header field.
    fn count_or_fmt(&self) -> u8;

    /// Unpadded body length in bytes.
    fn body_len(&self) -> usize;

    /// Writes the body into `dst`, which is exactly `body_len()` bytes long.
    fn write_body(&self, dst: &mut [u8]);

    /// True when the body ends in bytes that only the packet length delimits.
    /// An unaligned body of that kind is padded with the P bit set and the
    /// pad count in the last octet, so the pad is not read back as data.
    fn has_opaque_tail(&self) -> bool {
        false
    }

    /// Serialized size in bytes, header and padding included.
    fn size(&self) -> usize {
        HEADER_LEN + padded_len(self.body_len())
    }

    /// Serializes into `dst`, returning the number of bytes written.
    ///
    /// # Errors
    /// [`RtcpError::BufferTooSmall`] when `dst` is shorter than [`size`](Self::size),
    /// [`RtcpError::PacketTooLarge`] when the packet overflows the length field.
    fn serialize(&self, dst: &mut [u8]) -> Result<usize, RtcpError> {
        let size = self.size();
        if size > MAX_PACKET_LEN {
            return Err(RtcpError::PacketTooLarge(size));
        }
        if dst.len() < size {
            return Err(RtcpError::BufferTooSmall {
                needed: size,
                available: dst.len(),
            });
        }
        let body_len = self.body_len();
        let pad = size - HEADER_LEN - body_len;
        let padding = pad > 0 && self.has_opaque_tail();
        let len_words = u16::try_from(size / 4 - 1).map_err(|_| RtcpError::PacketTooLarge(size))?;
        CommonHeader::with_length(
            self.count_or_fmt(),
            Self::PACKET_TYPE.as_u8(),
            padding,
            len_words,
        )
        .write_to(&mut dst[..HEADER_LEN]);
        self.write_body(&mut dst[HEADER_LEN..HEADER_LEN + body_len]);
        dst[HEADER_LEN + body_len..size].fill(0);
        if padding {
            // pad < 4
            dst[size - 1] = pad as u8;
        }
        Ok(size)
    }

    /// Appends the serialized packet to `out`.
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), RtcpError> {
        let start = out.len();
        out.resize(start + self.size(), 0);
        match self.serialize(&mut out[start..]) {
            Ok(_) => Ok(()),
            Err(e) => {
                out.truncate(start);
                Err(e)
            }
        }
    }
}
