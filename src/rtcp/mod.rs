pub mod app;
pub mod bye;
pub mod codec;
pub mod common_header;
pub mod compound;
pub mod feedback;
pub mod packet_type;
pub mod receiver_report;
pub mod report_block;
#[allow(clippy::module_inception)]
pub mod rtcp;
pub mod rtcp_config;
pub mod rtcp_error;
pub mod sdes;
pub mod sender_report;
pub mod utils;

pub use codec::RtcpCodec;
pub use compound::CompoundPacket;
pub use rtcp::RtcpPacket;
pub use rtcp_config::RtcpConfig;
pub use rtcp_error::RtcpError;

/// Packet and item types, for `use rustyrtc_rtcp::rtcp::packet::*`.
pub mod packet {
    pub use super::{
        app::AppPacket,
        bye::ByePacket,
        common_header::CommonHeader,
        feedback::{
            FeedbackHeader, FeedbackItem,
            afb::AfbItem,
            ecn::EcnItem,
            fir::FirItem,
            lei::LeiItem,
            nack::NackItem,
            payload_feedback::{PayloadFeedback, PayloadFeedbackPacket},
            rpsi::RpsiItem,
            sli::SliItem,
            tllei::TlleiItem,
            tmmb::TmmbItem,
            transport_feedback::{TransportFeedback, TransportFeedbackPacket},
            tst::TstItem,
            vbcm::VbcmItem,
        },
        packet_type::{PacketType, RtcpPacketType},
        receiver_report::ReceiverReportPacket,
        report_block::ReportBlock,
        sdes::{SdesChunk, SdesItem, SdesItemType, SdesPacket},
        sender_report::{SenderReport, SenderReportPacket},
    };
}
