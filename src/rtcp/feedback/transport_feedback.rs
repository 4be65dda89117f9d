use crate::rtcp::{
    common_header::CommonHeader,
    feedback::{
        FEEDBACK_HEADER_LEN, FeedbackHeader, ecn::EcnItem, expect_no_items, items_len,
        nack::NackItem, parse_items, tllei::TlleiItem, tmmb::TmmbItem, write_items,
    },
    packet_type::{PT_RTPFB, PacketType, RtcpPacketType},
    rtcp_error::RtcpError,
};

pub const FMT_NACK: u8 = 1;
pub const FMT_TMMBR: u8 = 3;
pub const FMT_TMMBN: u8 = 4;
pub const FMT_SR_REQ: u8 = 5;
pub const FMT_TLLEI: u8 = 7;
pub const FMT_ECN: u8 = 8;

/// Transport-layer feedback message, keyed by FMT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFeedback {
    Nack(Vec<NackItem>),
    Tmmbr(Vec<TmmbItem>),
    Tmmbn(Vec<TmmbItem>),
    /// RTCP rapid resynchronisation request (RFC 6051); no FCI.
    SrReq,
    Tllei(Vec<TlleiItem>),
    Ecn(Vec<EcnItem>),
}

impl TransportFeedback {
    pub fn fmt(&self) -> u8 {
        match self {
            TransportFeedback::Nack(_) => FMT_NACK,
            TransportFeedback::Tmmbr(_) => FMT_TMMBR,
            TransportFeedback::Tmmbn(_) => FMT_TMMBN,
            TransportFeedback::SrReq => FMT_SR_REQ,
            TransportFeedback::Tllei(_) => FMT_TLLEI,
            TransportFeedback::Ecn(_) => FMT_ECN,
        }
    }

    fn parse(fmt: u8, fci: &[u8]) -> Result<Self, RtcpError> {
        Ok(match fmt {
            FMT_NACK => TransportFeedback::Nack(parse_items(fci)?),
            FMT_TMMBR => TransportFeedback::Tmmbr(parse_items(fci)?),
            FMT_TMMBN => TransportFeedback::Tmmbn(parse_items(fci)?),
            FMT_SR_REQ => {
                expect_no_items(fci)?;
                TransportFeedback::SrReq
            }
            FMT_TLLEI => TransportFeedback::Tllei(parse_items(fci)?),
            FMT_ECN => TransportFeedback::Ecn(parse_items(fci)?),
            other => {
                return Err(RtcpError::UnknownFeedbackSubtype {
                    packet_type: PT_RTPFB,
                    fmt: other,
                });
            }
        })
    }

    fn items_len(&self) -> usize {
        match self {
            TransportFeedback::Nack(items) => items_len(items),
            TransportFeedback::Tmmbr(items) | TransportFeedback::Tmmbn(items) => items_len(items),
            TransportFeedback::SrReq => 0,
            TransportFeedback::Tllei(items) => items_len(items),
            TransportFeedback::Ecn(items) => items_len(items),
        }
    }

    fn write_items(&self, dst: &mut [u8]) {
        match self {
            TransportFeedback::Nack(items) => write_items(items, dst),
            TransportFeedback::Tmmbr(items) | TransportFeedback::Tmmbn(items) => {
                write_items(items, dst)
            }
            TransportFeedback::SrReq => {}
            TransportFeedback::Tllei(items) => write_items(items, dst),
            TransportFeedback::Ecn(items) => write_items(items, dst),
        }
    }
}

/// Transport-layer feedback packet (PT=205).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFeedbackPacket {
    pub header: FeedbackHeader,
    pub feedback: TransportFeedback,
}

impl TransportFeedbackPacket {
    pub fn new(sender_ssrc: u32, media_ssrc: u32, feedback: TransportFeedback) -> Self {
        Self {
            header: FeedbackHeader::new(sender_ssrc, media_ssrc),
            feedback,
        }
    }

    pub fn nack(sender_ssrc: u32, media_ssrc: u32, items: Vec<NackItem>) -> Self {
        Self::new(sender_ssrc, media_ssrc, TransportFeedback::Nack(items))
    }

    pub fn sender_ssrc(&self) -> u32 {
        self.header.sender_ssrc
    }

    pub fn media_ssrc(&self) -> u32 {
        self.header.media_ssrc
    }

    /// Every sequence number reported lost by the NACK items, in wire order.
    /// Empty for other formats.
    pub fn lost_packets(&self) -> Vec<u16> {
        match &self.feedback {
            TransportFeedback::Nack(items) => items.iter().flat_map(NackItem::lost_packets).collect(),
            _ => Vec::new(),
        }
    }
}

impl<'a> RtcpPacketType<'a> for TransportFeedbackPacket {
    const PACKET_TYPE: PacketType = PacketType::TransportFeedback;

    fn decode(hdr: &CommonHeader, payload: &'a [u8]) -> Result<Self, RtcpError> {
        let header = FeedbackHeader::parse(payload)?;
        let feedback = TransportFeedback::parse(hdr.rc_or_fmt(), &payload[FEEDBACK_HEADER_LEN..])?;
        Ok(Self { header, feedback })
    }

    fn count_or_fmt(&self) -> u8 {
        self.feedback.fmt()
    }

    fn body_len(&self) -> usize {
        FEEDBACK_HEADER_LEN + self.feedback.items_len()
    }

    fn write_body(&self, dst: &mut [u8]) {
        self.header.write_to(&mut dst[..FEEDBACK_HEADER_LEN]);
        self.feedback.write_items(&mut dst[FEEDBACK_HEADER_LEN..]);
    }
}
