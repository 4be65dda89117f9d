use std::fmt;

use bytes::Bytes;

use super::{rtcp::RtcpPacket, rtcp_error::RtcpError};

/// One compound RTCP datagram: a packet and the packets that followed it on
/// the wire. The head owns the whole tail.
///
/// Clone, comparison, formatting and drop walk the chain in a loop, so chain
/// length is bounded by memory rather than stack depth.
pub struct CompoundPacket<'a> {
    packet: RtcpPacket<'a>,
    next: Option<Box<CompoundPacket<'a>>>,
}

impl<'a> CompoundPacket<'a> {
    pub fn new(packet: impl Into<RtcpPacket<'a>>) -> Self {
        Self {
            packet: packet.into(),
            next: None,
        }
    }

    /// Links `packets` in order. `None` for an empty list.
    pub fn from_packets(packets: Vec<RtcpPacket<'a>>) -> Option<Self> {
        let mut packets = packets.into_iter();
        let first = packets.next()?;
        Some(Self::link(first, packets))
    }

    fn link(first: RtcpPacket<'a>, rest: impl Iterator<Item = RtcpPacket<'a>>) -> Self {
        let mut head = CompoundPacket::new(first);
        let mut tail = &mut head.next;
        for packet in rest {
            let node = tail.insert(Box::new(CompoundPacket::new(packet)));
            tail = &mut node.next;
        }
        head
    }

    pub fn packet(&self) -> &RtcpPacket<'a> {
        &self.packet
    }

    pub fn packet_mut(&mut self) -> &mut RtcpPacket<'a> {
        &mut self.packet
    }

    pub fn next(&self) -> Option<&CompoundPacket<'a>> {
        self.next.as_deref()
    }

    pub fn next_mut(&mut self) -> Option<&mut CompoundPacket<'a>> {
        self.next.as_deref_mut()
    }

    /// Replaces the tail, returning the previous one.
    pub fn set_next(&mut self, next: CompoundPacket<'a>) -> Option<CompoundPacket<'a>> {
        self.next.replace(Box::new(next)).map(|old| *old)
    }

    pub fn take_next(&mut self) -> Option<CompoundPacket<'a>> {
        self.next.take().map(|old| *old)
    }

    /// Appends a packet after the last one in the chain.
    pub fn push_back(&mut self, packet: impl Into<RtcpPacket<'a>>) {
        let mut cur = &mut self.next;
        while let Some(node) = cur {
            cur = &mut node.next;
        }
        *cur = Some(Box::new(CompoundPacket::new(packet)));
    }

    /// Packets in wire order.
    pub fn iter(&self) -> Iter<'_, 'a> {
        Iter { cur: Some(self) }
    }

    /// Number of packets in the chain, never zero.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Serialized size of the whole chain in bytes.
    pub fn size(&self) -> usize {
        self.iter().map(RtcpPacket::size).sum()
    }

    /// Serializes every packet back to back into `dst`.
    pub fn serialize(&self, dst: &mut [u8]) -> Result<usize, RtcpError> {
        let size = self.size();
        if dst.len() < size {
            return Err(RtcpError::BufferTooSmall {
                needed: size,
                available: dst.len(),
            });
        }
        let mut idx = 0;
        for packet in self.iter() {
            idx += packet.serialize(&mut dst[idx..])?;
        }
        Ok(idx)
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), RtcpError> {
        let start = out.len();
        out.reserve(self.size());
        for packet in self.iter() {
            if let Err(e) = packet.encode_into(out) {
                out.truncate(start);
                return Err(e);
            }
        }
        Ok(())
    }

    /// The datagram as it goes on the wire.
    pub fn to_bytes(&self) -> Result<Bytes, RtcpError> {
        let mut out = Vec::new();
        self.encode_into(&mut out)?;
        Ok(Bytes::from(out))
    }

    /// The packets of the chain, in wire order.
    pub fn to_packets(&self) -> Vec<RtcpPacket<'a>> {
        self.iter().cloned().collect()
    }

    /// Copies every borrowed field so the chain outlives its source buffer.
    pub fn into_owned(self) -> CompoundPacket<'static> {
        CompoundPacket::link(
            self.packet.clone().into_owned(),
            self.iter().skip(1).map(|p| p.clone().into_owned()),
        )
    }
}

impl Clone for CompoundPacket<'_> {
    fn clone(&self) -> Self {
        Self::link(self.packet.clone(), self.iter().skip(1).cloned())
    }
}

impl PartialEq for CompoundPacket<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for CompoundPacket<'_> {}

impl fmt::Debug for CompoundPacket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Drop for CompoundPacket<'_> {
    // Unlink iteratively; recursive drops of a long chain would overflow the stack.
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}

pub struct Iter<'c, 'a> {
    cur: Option<&'c CompoundPacket<'a>>,
}

impl<'c, 'a> Iterator for Iter<'c, 'a> {
    type Item = &'c RtcpPacket<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cur?;
        self.cur = node.next.as_deref();
        Some(&node.packet)
    }
}

impl<'c, 'a> IntoIterator for &'c CompoundPacket<'a> {
    type Item = &'c RtcpPacket<'a>;
    type IntoIter = Iter<'c, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::rtcp::{
        bye::ByePacket, feedback::payload_feedback::PayloadFeedbackPacket,
        packet_type::PacketType, sdes::SdesPacket,
    };

    #[test]
    fn two_packets_chain_in_order() {
        let mut buf = Vec::new();
        RtcpPacket::from(SdesPacket::cname(1, "alice"))
            .encode_into(&mut buf)
            .unwrap();
        RtcpPacket::from(ByePacket::single(1))
            .encode_into(&mut buf)
            .unwrap();

        let chain = RtcpPacket::parse(&buf).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.packet().packet_type(), PacketType::Sdes);
        let next = chain.next().unwrap();
        assert_eq!(next.packet().packet_type(), PacketType::Bye);
        assert!(next.next().is_none());

        assert_eq!(chain.to_bytes().unwrap(), Bytes::from(buf.clone()));
    }

    #[test]
    fn push_back_and_take_next() {
        let mut chain = CompoundPacket::new(ByePacket::single(1));
        chain.push_back(ByePacket::single(2));
        chain.push_back(PayloadFeedbackPacket::pli(1, 2));
        assert_eq!(chain.len(), 3);

        let types: Vec<_> = chain.iter().map(RtcpPacket::packet_type).collect();
        assert_eq!(
            types,
            vec![PacketType::Bye, PacketType::Bye, PacketType::PayloadFeedback]
        );

        let tail = chain.take_next().unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(tail.len(), 2);

        let old = chain.set_next(CompoundPacket::new(ByePacket::single(9)));
        assert!(old.is_none());
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn serialize_checks_capacity() {
        let chain = CompoundPacket::new(ByePacket::single(1));
        let mut small = [0u8; 4];
        assert_eq!(
            chain.serialize(&mut small),
            Err(RtcpError::BufferTooSmall {
                needed: 8,
                available: 4
            })
        );
        let mut exact = [0u8; 8];
        assert_eq!(chain.serialize(&mut exact).unwrap(), 8);
    }

    #[test]
    fn owned_chain_outlives_buffer() {
        let owned = {
            let buf = RtcpPacket::encode_compound(&[
                RtcpPacket::from(SdesPacket::cname(7, "host")),
                RtcpPacket::from(ByePacket::single(7)),
            ])
            .unwrap();
            RtcpPacket::parse(&buf).unwrap().into_owned()
        };
        assert_eq!(owned.len(), 2);
        let RtcpPacket::Sdes(sdes) = owned.packet() else {
            panic!("expected SDES");
        };
        assert_eq!(sdes.chunks()[0].cname().unwrap().value(), b"host");
    }

    #[test]
    fn long_chain_drops_without_recursion() {
        let packets = (0..100_000).map(|i| ByePacket::single(i).into()).collect();
        let chain = CompoundPacket::from_packets(packets).unwrap();
        assert_eq!(chain.len(), 100_000);
        drop(chain);
    }

    #[test]
    fn long_chain_clones_compares_and_formats_without_recursion() {
        let packets: Vec<RtcpPacket<'_>> =
            (0..100_000).map(|i| ByePacket::single(i).into()).collect();
        let chain = CompoundPacket::from_packets(packets).unwrap();

        let copy = chain.clone();
        assert_eq!(copy.len(), 100_000);
        assert!(copy == chain);

        let mut other = chain.clone();
        other.push_back(ByePacket::single(0));
        assert!(other != chain);

        let text = format!("{chain:?}");
        assert!(text.starts_with('['));
    }

    #[test]
    fn from_packets_keeps_order_and_rejects_empty() {
        assert!(CompoundPacket::from_packets(Vec::new()).is_none());
        let chain = CompoundPacket::from_packets(vec![
            ByePacket::single(1).into(),
            ByePacket::single(2).into(),
        ])
        .unwrap();
        assert_eq!(
            chain.to_packets(),
            vec![
                RtcpPacket::from(ByePacket::single(1)),
                RtcpPacket::from(ByePacket::single(2))
            ]
        );
    }
}
