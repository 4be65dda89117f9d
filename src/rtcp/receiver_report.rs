use std::borrow::Cow;

use super::{
    common_header::{CommonHeader, MAX_COUNT},
    packet_type::{PacketType, RtcpPacketType},
    report_block::ReportBlock,
    rtcp_error::RtcpError,
    utils::{ensure_len, own_cow, read_u32, write_u32},
};

/// RR packet (PT=201): reporter SSRC followed by report blocks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReceiverReportPacket<'a> {
    ssrc: u32,
    reports: Vec<ReportBlock>,
    profile_ext: Cow<'a, [u8]>,
}

impl<'a> ReceiverReportPacket<'a> {
    pub fn new(ssrc: u32) -> Self {
        Self {
            ssrc,
            reports: Vec::new(),
            profile_ext: Cow::Borrowed(&[]),
        }
    }

    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    pub fn set_ssrc(&mut self, ssrc: u32) {
        self.ssrc = ssrc;
    }

    pub fn reports(&self) -> &[ReportBlock] {
        &self.reports
    }

    pub fn add_report(&mut self, block: ReportBlock) -> Result<(), RtcpError> {
        if self.reports.len() >= MAX_COUNT {
            return Err(RtcpError::TooManyEntries {
                what: "report blocks",
                count: self.reports.len() + 1,
            });
        }
        self.reports.push(block);
        Ok(())
    }

    pub fn profile_ext(&self) -> &[u8] {
        &self.profile_ext
    }

    /// Unaligned extension bytes are padded with the P bit set on output.
    pub fn set_profile_ext(&mut self, ext: impl Into<Cow<'a, [u8]>>) {
        self.profile_ext = ext.into();
    }

    pub fn into_owned(self) -> ReceiverReportPacket<'static> {
        ReceiverReportPacket {
            ssrc: self.ssrc,
            reports: self.reports,
            profile_ext: own_cow(self.profile_ext),
        }
    }
}

impl<'a> RtcpPacketType<'a> for ReceiverReportPacket<'a> {
    const PACKET_TYPE: PacketType = PacketType::ReceiverReport;

    fn decode(hdr: &CommonHeader, payload: &'a [u8]) -> Result<Self, RtcpError> {
        ensure_len(payload, 4)?;
        let ssrc = read_u32(payload, 0);
        let mut idx = 4usize;

        let rc = usize::from(hdr.rc_or_fmt());
        ensure_len(payload, idx + rc * ReportBlock::SIZE)?;
        let mut reports = Vec::with_capacity(rc);
        for _ in 0..rc {
            reports.push(ReportBlock::parse(&payload[idx..])?);
            idx += ReportBlock::SIZE;
        }
        Ok(Self {
            ssrc,
            reports,
            profile_ext: Cow::Borrowed(&payload[idx..]),
        })
    }

    fn count_or_fmt(&self) -> u8 {
        self.reports.len() as u8
    }

    fn body_len(&self) -> usize {
        4 + self.reports.len() * ReportBlock::SIZE + self.profile_ext.len()
    }

    fn write_body(&self, dst: &mut [u8]) {
        write_u32(dst, 0, self.ssrc);
        let mut idx = 4;
        for rb in &self.reports {
            rb.write_to(&mut dst[idx..]);
            idx += ReportBlock::SIZE;
        }
        dst[idx..].copy_from_slice(&self.profile_ext);
    }

    fn has_opaque_tail(&self) -> bool {
        !self.profile_ext.is_empty()
    }
}
