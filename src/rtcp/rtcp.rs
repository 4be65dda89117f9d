use super::{
    app::AppPacket,
    bye::ByePacket,
    common_header::{CommonHeader, HEADER_LEN},
    compound::CompoundPacket,
    feedback::{payload_feedback::PayloadFeedbackPacket, transport_feedback::TransportFeedbackPacket},
    packet_type::{PacketType, RtcpPacketType},
    receiver_report::ReceiverReportPacket,
    rtcp_error::RtcpError,
    sdes::SdesPacket,
    sender_report::SenderReportPacket,
    utils::strip_padding,
};

/// The union of supported RTCP packets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RtcpPacket<'a> {
    Sr(SenderReportPacket<'a>),
    Rr(ReceiverReportPacket<'a>),
    Sdes(SdesPacket<'a>),
    Bye(ByePacket<'a>),
    App(AppPacket<'a>),
    TransportFeedback(TransportFeedbackPacket), // 205
    PayloadFeedback(PayloadFeedbackPacket<'a>), // 206
}

impl<'a> RtcpPacket<'a> {
    /// Parses a compound RTCP datagram into a chain of packets.
    ///
    /// All or nothing: if any packet in the buffer fails to decode, no
    /// part of the chain is returned.
    pub fn parse(buf: &'a [u8]) -> Result<CompoundPacket<'a>, RtcpError> {
        CompoundPacket::from_packets(Self::decode_compound(buf)?)
            .ok_or(RtcpError::TruncatedBuffer {
                needed: HEADER_LEN,
                available: buf.len(),
            })
    }

    /// Decodes the single packet at the front of `buf`, returning it with the
    /// number of bytes it occupied.
    pub fn parse_one(buf: &'a [u8]) -> Result<(Self, usize), RtcpError> {
        let (hdr, total) = CommonHeader::decode(buf)?;
        let packet_type = PacketType::try_from(hdr.pt())?;
        let payload = strip_padding(&buf[HEADER_LEN..total], hdr.padding())?;

        let pkt = match packet_type {
            PacketType::SenderReport => RtcpPacket::Sr(SenderReportPacket::decode(&hdr, payload)?),
            PacketType::ReceiverReport => {
                RtcpPacket::Rr(ReceiverReportPacket::decode(&hdr, payload)?)
            }
            PacketType::Sdes => RtcpPacket::Sdes(SdesPacket::decode(&hdr, payload)?),
            PacketType::Bye => RtcpPacket::Bye(ByePacket::decode(&hdr, payload)?),
            PacketType::App => RtcpPacket::App(AppPacket::decode(&hdr, payload)?),
            PacketType::TransportFeedback => {
                RtcpPacket::TransportFeedback(TransportFeedbackPacket::decode(&hdr, payload)?)
            }
            PacketType::PayloadFeedback => {
                RtcpPacket::PayloadFeedback(PayloadFeedbackPacket::decode(&hdr, payload)?)
            }
        };
        Ok((pkt, total))
    }

    /// Decode a *compound* RTCP buffer into individual packets, in wire order.
    pub fn decode_compound(buf: &'a [u8]) -> Result<Vec<RtcpPacket<'a>>, RtcpError> {
        let mut out = Vec::new();
        let mut idx = 0usize;
        loop {
            let (pkt, total) = Self::parse_one(&buf[idx..])?;
            out.push(pkt);
            idx += total;
            if idx == buf.len() {
                return Ok(out);
            }
        }
    }

    /// Encode a compound RTCP packet (concatenation of packets).
    pub fn encode_compound(pkts: &[RtcpPacket<'_>]) -> Result<Vec<u8>, RtcpError> {
        let mut out = Vec::with_capacity(pkts.iter().map(RtcpPacket::size).sum());
        for pkt in pkts {
            pkt.encode_into(&mut out)?;
        }
        Ok(out)
    }

    pub fn packet_type(&self) -> PacketType {
        match self {
            RtcpPacket::Sr(_) => PacketType::SenderReport,
            RtcpPacket::Rr(_) => PacketType::ReceiverReport,
            RtcpPacket::Sdes(_) => PacketType::Sdes,
            RtcpPacket::Bye(_) => PacketType::Bye,
            RtcpPacket::App(_) => PacketType::App,
            RtcpPacket::TransportFeedback(_) => PacketType::TransportFeedback,
            RtcpPacket::PayloadFeedback(_) => PacketType::PayloadFeedback,
        }
    }

    /// Serialized size in bytes.
    pub fn size(&self) -> usize {
        match self {
            RtcpPacket::Sr(p) => p.size(),
            RtcpPacket::Rr(p) => p.size(),
            RtcpPacket::Sdes(p) => p.size(),
            RtcpPacket::Bye(p) => p.size(),
            RtcpPacket::App(p) => p.size(),
            RtcpPacket::TransportFeedback(p) => p.size(),
            RtcpPacket::PayloadFeedback(p) => p.size(),
        }
    }

    pub fn serialize(&self, dst: &mut [u8]) -> Result<usize, RtcpError> {
        match self {
            RtcpPacket::Sr(p) => p.serialize(dst),
            RtcpPacket::Rr(p) => p.serialize(dst),
            RtcpPacket::Sdes(p) => p.serialize(dst),
            RtcpPacket::Bye(p) => p.serialize(dst),
            RtcpPacket::App(p) => p.serialize(dst),
            RtcpPacket::TransportFeedback(p) => p.serialize(dst),
            RtcpPacket::PayloadFeedback(p) => p.serialize(dst),
        }
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), RtcpError> {
        match self {
            RtcpPacket::Sr(p) => p.encode_into(out),
            RtcpPacket::Rr(p) => p.encode_into(out),
            RtcpPacket::Sdes(p) => p.encode_into(out),
            RtcpPacket::Bye(p) => p.encode_into(out),
            RtcpPacket::App(p) => p.encode_into(out),
            RtcpPacket::TransportFeedback(p) => p.encode_into(out),
            RtcpPacket::PayloadFeedback(p) => p.encode_into(out),
        }
    }

    /// Detaches the packet from the buffer it was parsed from.
    pub fn into_owned(self) -> RtcpPacket<'static> {
        match self {
            RtcpPacket::Sr(p) => RtcpPacket::Sr(p.into_owned()),
            RtcpPacket::Rr(p) => RtcpPacket::Rr(p.into_owned()),
            RtcpPacket::Sdes(p) => RtcpPacket::Sdes(p.into_owned()),
            RtcpPacket::Bye(p) => RtcpPacket::Bye(p.into_owned()),
            RtcpPacket::App(p) => RtcpPacket::App(p.into_owned()),
            RtcpPacket::TransportFeedback(p) => RtcpPacket::TransportFeedback(p),
            RtcpPacket::PayloadFeedback(p) => RtcpPacket::PayloadFeedback(p.into_owned()),
        }
    }
}

impl<'a> From<SenderReportPacket<'a>> for RtcpPacket<'a> {
    fn from(p: SenderReportPacket<'a>) -> Self {
        RtcpPacket::Sr(p)
    }
}

impl<'a> From<ReceiverReportPacket<'a>> for RtcpPacket<'a> {
    fn from(p: ReceiverReportPacket<'a>) -> Self {
        RtcpPacket::Rr(p)
    }
}

impl<'a> From<SdesPacket<'a>> for RtcpPacket<'a> {
    fn from(p: SdesPacket<'a>) -> Self {
        RtcpPacket::Sdes(p)
    }
}

impl<'a> From<ByePacket<'a>> for RtcpPacket<'a> {
    fn from(p: ByePacket<'a>) -> Self {
        RtcpPacket::Bye(p)
    }
}

impl<'a> From<AppPacket<'a>> for RtcpPacket<'a> {
    fn from(p: AppPacket<'a>) -> Self {
        RtcpPacket::App(p)
    }
}

impl From<TransportFeedbackPacket> for RtcpPacket<'_> {
    fn from(p: TransportFeedbackPacket) -> Self {
        RtcpPacket::TransportFeedback(p)
    }
}

impl<'a> From<PayloadFeedbackPacket<'a>> for RtcpPacket<'a> {
    fn from(p: PayloadFeedbackPacket<'a>) -> Self {
        RtcpPacket::PayloadFeedback(p)
    }
}
