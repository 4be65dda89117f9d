use std::borrow::Cow;

use crate::rtcp::{
    common_header::{CommonHeader, MAX_COUNT},
    packet_type::{PacketType, RtcpPacketType},
    report_block::ReportBlock,
    rtcp_error::RtcpError,
    utils::{ensure_len, own_cow, read_u32, write_u32},
};

/// Sender information of an SR: the sender SSRC followed by the 20-byte
/// sender info block (RFC 3550 §6.4.1). 24 bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SenderReport {
    pub ssrc: u32,
    pub ntp_sec: u32,
    pub ntp_frac: u32,
    pub rtp_ts: u32,
    pub packet_count: u32,
    pub octet_count: u32,
}

impl SenderReport {
    pub const SIZE: usize = 24;

    pub fn parse(buf: &[u8]) -> Result<Self, RtcpError> {
        ensure_len(buf, Self::SIZE)?;
        Ok(Self {
            ssrc: read_u32(buf, 0),
            ntp_sec: read_u32(buf, 4),
            ntp_frac: read_u32(buf, 8),
            rtp_ts: read_u32(buf, 12),
            packet_count: read_u32(buf, 16),
            octet_count: read_u32(buf, 20),
        })
    }

    pub fn serialize(&self, dst: &mut [u8]) -> Result<usize, RtcpError> {
        if dst.len() < Self::SIZE {
            return Err(RtcpError::BufferTooSmall {
                needed: Self::SIZE,
                available: dst.len(),
            });
        }
        self.write_to(dst);
        Ok(Self::SIZE)
    }

    pub(crate) fn write_to(&self, dst: &mut [u8]) {
        write_u32(dst, 0, self.ssrc);
        write_u32(dst, 4, self.ntp_sec);
        write_u32(dst, 8, self.ntp_frac);
        write_u32(dst, 12, self.rtp_ts);
        write_u32(dst, 16, self.packet_count);
        write_u32(dst, 20, self.octet_count);
    }

    /// Full 64-bit NTP timestamp.
    pub fn ntp_timestamp(&self) -> u64 {
        (u64::from(self.ntp_sec) << 32) | u64::from(self.ntp_frac)
    }
}

/// SR packet (PT=200): sender report, report blocks and optional
/// profile-specific extension bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SenderReportPacket<'a> {
    report: SenderReport,
    reports: Vec<ReportBlock>,
    profile_ext: Cow<'a, [u8]>,
}

impl<'a> SenderReportPacket<'a> {
    pub fn new(report: SenderReport) -> Self {
        Self {
            report,
            reports: Vec::new(),
            profile_ext: Cow::Borrowed(&[]),
        }
    }

    pub fn report(&self) -> &SenderReport {
        &self.report
    }

    pub fn report_mut(&mut self) -> &mut SenderReport {
        &mut self.report
    }

    pub fn reports(&self) -> &[ReportBlock] {
        &self.reports
    }

    /// Appends a report block; at most 31 fit the RC field.
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

    pub fn into_owned(self) -> SenderReportPacket<'static> {
        SenderReportPacket {
            report: self.report,
            reports: self.reports,
            profile_ext: own_cow(self.profile_ext),
        }
    }
}

impl<'a> RtcpPacketType<'a> for SenderReportPacket<'a> {
    const PACKET_TYPE: PacketType = PacketType::SenderReport;

    fn decode(hdr: &CommonHeader, payload: &'a [u8]) -> Result<Self, RtcpError> {
        let report = SenderReport::parse(payload)?;
        let mut idx = SenderReport::SIZE;

        // Report blocks
        let rc = usize::from(hdr.rc_or_fmt());
        ensure_len(payload, idx + rc * ReportBlock::SIZE)?;
        let mut reports = Vec::with_capacity(rc);
        for _ in 0..rc {
            reports.push(ReportBlock::parse(&payload[idx..])?);
            idx += ReportBlock::SIZE;
        }

        // Remaining is profile-specific extension
        Ok(Self {
            report,
            reports,
            profile_ext: Cow::Borrowed(&payload[idx..]),
        })
    }

    fn count_or_fmt(&self) -> u8 {
        self.reports.len() as u8
    }

    fn body_len(&self) -> usize {
        SenderReport::SIZE + self.reports.len() * ReportBlock::SIZE + self.profile_ext.len()
    }

    fn write_body(&self, dst: &mut [u8]) {
        self.report.write_to(dst);
        let mut idx = SenderReport::SIZE;
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
