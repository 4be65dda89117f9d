//! RTCP (RTP Control Protocol) packet codec extracted from the RustyRTC media
//! engine.
//!
//! Decodes untrusted compound datagrams into typed packets that borrow from
//! the receive buffer, and encodes built packets back to wire bytes.
//!
//! ```rust,ignore
//! use rustyrtc_rtcp::rtcp::{RtcpPacket, packet::ByePacket};
//!
//! let wire = RtcpPacket::encode_compound(&[ByePacket::single(0x1234).into()])?;
//! let chain = RtcpPacket::parse(&wire)?;
//! assert_eq!(chain.len(), 1);
//! ```

/// Handles configuration loading and management.
pub mod config;
/// Logging utilities for the codec.
pub mod log;
/// RTCP (RTP Control Protocol) packet parsing and building.
pub mod rtcp;
