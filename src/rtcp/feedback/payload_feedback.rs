use crate::rtcp::{
    common_header::CommonHeader,
    feedback::{
        FEEDBACK_HEADER_LEN, FeedbackHeader, FeedbackItem, afb::AfbItem, expect_no_items,
        fir::FirItem, items_len, lei::LeiItem, parse_items, rpsi::RpsiItem, sli::SliItem,
        tst::TstItem, vbcm::VbcmItem, write_items,
    },
    packet_type::{PT_PSFB, PacketType, RtcpPacketType},
    rtcp_error::RtcpError,
};

pub const FMT_PLI: u8 = 1;
pub const FMT_SLI: u8 = 2;
pub const FMT_RPSI: u8 = 3;
pub const FMT_FIR: u8 = 4;
pub const FMT_TSTR: u8 = 5;
pub const FMT_TSTN: u8 = 6;
pub const FMT_VBCM: u8 = 7;
pub const FMT_PSLEI: u8 = 8;
pub const FMT_AFB: u8 = 15;

/// Payload-specific feedback message, keyed by FMT.
///
/// RPSI and AFB have no length of their own and take the whole FCI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadFeedback<'a> {
    Pli,
    Sli(Vec<SliItem>),
    Rpsi(RpsiItem<'a>),
    Fir(Vec<FirItem>),
    Tstr(Vec<TstItem>),
    Tstn(Vec<TstItem>),
    Vbcm(Vec<VbcmItem<'a>>),
    Lei(Vec<LeiItem>),
    Afb(AfbItem<'a>),
}

impl<'a> PayloadFeedback<'a> {
    pub fn fmt(&self) -> u8 {
        match self {
            PayloadFeedback::Pli => FMT_PLI,
            PayloadFeedback::Sli(_) => FMT_SLI,
            PayloadFeedback::Rpsi(_) => FMT_RPSI,
            PayloadFeedback::Fir(_) => FMT_FIR,
            PayloadFeedback::Tstr(_) => FMT_TSTR,
            PayloadFeedback::Tstn(_) => FMT_TSTN,
            PayloadFeedback::Vbcm(_) => FMT_VBCM,
            PayloadFeedback::Lei(_) => FMT_PSLEI,
            PayloadFeedback::Afb(_) => FMT_AFB,
        }
    }

    fn parse(fmt: u8, fci: &'a [u8]) -> Result<Self, RtcpError> {
        Ok(match fmt {
            FMT_PLI => {
                expect_no_items(fci)?;
                PayloadFeedback::Pli
            }
            FMT_SLI => PayloadFeedback::Sli(parse_items(fci)?),
            FMT_RPSI => PayloadFeedback::Rpsi(RpsiItem::parse(fci)?.0),
            FMT_FIR => PayloadFeedback::Fir(parse_items(fci)?),
            FMT_TSTR => PayloadFeedback::Tstr(parse_items(fci)?),
            FMT_TSTN => PayloadFeedback::Tstn(parse_items(fci)?),
            FMT_VBCM => PayloadFeedback::Vbcm(parse_items(fci)?),
            FMT_PSLEI => PayloadFeedback::Lei(parse_items(fci)?),
            FMT_AFB => PayloadFeedback::Afb(AfbItem::parse(fci)?.0),
            other => {
                return Err(RtcpError::UnknownFeedbackSubtype {
                    packet_type: PT_PSFB,
                    fmt: other,
                });
            }
        })
    }

    fn items_len(&self) -> usize {
        match self {
            PayloadFeedback::Pli => 0,
            PayloadFeedback::Sli(items) => items_len(items),
            PayloadFeedback::Rpsi(item) => item.size(),
            PayloadFeedback::Fir(items) => items_len(items),
            PayloadFeedback::Tstr(items) | PayloadFeedback::Tstn(items) => items_len(items),
            PayloadFeedback::Vbcm(items) => items_len(items),
            PayloadFeedback::Lei(items) => items_len(items),
            PayloadFeedback::Afb(item) => item.size(),
        }
    }

    fn write_items(&self, dst: &mut [u8]) {
        match self {
            PayloadFeedback::Pli => {}
            PayloadFeedback::Sli(items) => write_items(items, dst),
            PayloadFeedback::Rpsi(item) => item.write_to(dst),
            PayloadFeedback::Fir(items) => write_items(items, dst),
            PayloadFeedback::Tstr(items) | PayloadFeedback::Tstn(items) => write_items(items, dst),
            PayloadFeedback::Vbcm(items) => write_items(items, dst),
            PayloadFeedback::Lei(items) => write_items(items, dst),
            PayloadFeedback::Afb(item) => item.write_to(dst),
        }
    }

    pub fn into_owned(self) -> PayloadFeedback<'static> {
        match self {
            PayloadFeedback::Pli => PayloadFeedback::Pli,
            PayloadFeedback::Sli(items) => PayloadFeedback::Sli(items),
            PayloadFeedback::Rpsi(item) => PayloadFeedback::Rpsi(item.into_owned()),
            PayloadFeedback::Fir(items) => PayloadFeedback::Fir(items),
            PayloadFeedback::Tstr(items) => PayloadFeedback::Tstr(items),
            PayloadFeedback::Tstn(items) => PayloadFeedback::Tstn(items),
            PayloadFeedback::Vbcm(items) => {
                PayloadFeedback::Vbcm(items.into_iter().map(VbcmItem::into_owned).collect())
            }
            PayloadFeedback::Lei(items) => PayloadFeedback::Lei(items),
            PayloadFeedback::Afb(item) => PayloadFeedback::Afb(item.into_owned()),
        }
    }
}

/// Payload-specific feedback packet (PT=206).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadFeedbackPacket<'a> {
    pub header: FeedbackHeader,
    pub feedback: PayloadFeedback<'a>,
}

impl<'a> PayloadFeedbackPacket<'a> {
    pub fn new(sender_ssrc: u32, media_ssrc: u32, feedback: PayloadFeedback<'a>) -> Self {
        Self {
            header: FeedbackHeader::new(sender_ssrc, media_ssrc),
            feedback,
        }
    }

    /// Picture Loss Indication for `media_ssrc`.
    pub fn pli(sender_ssrc: u32, media_ssrc: u32) -> Self {
        Self::new(sender_ssrc, media_ssrc, PayloadFeedback::Pli)
    }

    pub fn sender_ssrc(&self) -> u32 {
        self.header.sender_ssrc
    }

    pub fn media_ssrc(&self) -> u32 {
        self.header.media_ssrc
    }

    pub fn into_owned(self) -> PayloadFeedbackPacket<'static> {
        PayloadFeedbackPacket {
            header: self.header,
            feedback: self.feedback.into_owned(),
        }
    }
}

impl<'a> RtcpPacketType<'a> for PayloadFeedbackPacket<'a> {
    const PACKET_TYPE: PacketType = PacketType::PayloadFeedback;

    fn decode(hdr: &CommonHeader, payload: &'a [u8]) -> Result<Self, RtcpError> {
        let header = FeedbackHeader::parse(payload)?;
        let feedback = PayloadFeedback::parse(hdr.rc_or_fmt(), &payload[FEEDBACK_HEADER_LEN..])?;
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

    fn has_opaque_tail(&self) -> bool {
        matches!(self.feedback, PayloadFeedback::Afb(_))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::rtcp::utils::strip_padding;

    fn decode(buf: &[u8]) -> Result<PayloadFeedbackPacket<'_>, RtcpError> {
        let (hdr, total) = CommonHeader::decode(buf)?;
        let payload = strip_padding(&buf[4..total], hdr.padding())?;
        PayloadFeedbackPacket::decode(&hdr, payload)
    }

    #[test]
    fn parse_afb_packet() {
        let buf = [
            0x8F, 0xce, 0x00, 0x03, // common header
            0x00, 0x00, 0x00, 0x00, // sender ssrc
            0x00, 0x00, 0x00, 0x00, // media ssrc
            0x00, 0x00, 0x00, 0x01, // data
        ];
        let packet = decode(&buf).unwrap();
        let PayloadFeedback::Afb(afb) = &packet.feedback else {
            panic!("expected AFB, got {:?}", packet.feedback);
        };
        assert_eq!(afb.len(), 4);
        assert_eq!(afb.data(), &buf[12..]);
        assert_eq!(afb.data()[3] & 1, 1);
    }

    #[test]
    fn pli_round_trip() {
        let pli = PayloadFeedbackPacket::pli(0x1111_1111, 0x2222_2222);
        let mut out = Vec::new();
        pli.encode_into(&mut out).unwrap();
        assert_eq!(
            out,
            vec![0x81, 206, 0, 2, 0x11, 0x11, 0x11, 0x11, 0x22, 0x22, 0x22, 0x22]
        );
        assert_eq!(decode(&out).unwrap(), pli);
    }

    #[test]
    fn fir_carries_several_items() {
        let packet = PayloadFeedbackPacket::new(
            1,
            0,
            PayloadFeedback::Fir(vec![FirItem::new(5, 1), FirItem::new(6, 2)]),
        );
        let mut out = Vec::new();
        packet.encode_into(&mut out).unwrap();
        assert_eq!(out.len(), 12 + 16);
        assert_eq!(decode(&out).unwrap(), packet);
    }

    #[test]
    fn unaligned_afb_data_round_trips_through_padding() {
        let packet =
            PayloadFeedbackPacket::new(1, 2, PayloadFeedback::Afb(AfbItem::new(&b"REMB!"[..])));
        let mut out = Vec::new();
        packet.encode_into(&mut out).unwrap();
        assert_eq!(out.len(), 12 + 8);
        assert_eq!(out[0], 0xAF);
        assert_eq!(&out[12..], b"REMB!\0\0\x03");

        let back = decode(&out).unwrap();
        let PayloadFeedback::Afb(afb) = &back.feedback else {
            panic!("expected AFB");
        };
        assert_eq!(afb.data(), b"REMB!");
        assert_eq!(back, packet);
    }

    #[test]
    fn rpsi_and_vbcm_survive_into_owned() {
        let raw = [
            0x87, 0xce, 0x00, 0x05, // fmt=7
            0, 0, 0, 1, 0, 0, 0, 2, // sender / media
            0, 0, 0, 9, 3, 0x60, 0x00, 0x02, // ssrc, seq, pt, length
            0xAA, 0xBB, 0x00, 0x00, // value + padding
        ];
        let owned = {
            let copy = raw.to_vec();
            decode(&copy).unwrap().into_owned()
        };
        let PayloadFeedback::Vbcm(items) = &owned.feedback else {
            panic!("expected VBCM");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].ssrc(), 9);
        assert_eq!(items[0].payload_type(), 0x60);
        assert_eq!(items[0].value(), &[0xAA, 0xBB]);

        let rpsi = PayloadFeedbackPacket::new(
            1,
            2,
            PayloadFeedback::Rpsi(RpsiItem::new(96, vec![1, 2, 3, 4, 5, 6])),
        );
        let mut out = Vec::new();
        rpsi.encode_into(&mut out).unwrap();
        assert_eq!(out.len(), 12 + 8);
        assert_eq!(decode(&out).unwrap().into_owned(), rpsi);
    }

    #[test]
    fn unknown_fmt_is_rejected() {
        let buf = [0x89, 0xce, 0x00, 0x02, 0, 0, 0, 1, 0, 0, 0, 2];
        assert_eq!(
            decode(&buf),
            Err(RtcpError::UnknownFeedbackSubtype {
                packet_type: 206,
                fmt: 9
            })
        );
    }
}
