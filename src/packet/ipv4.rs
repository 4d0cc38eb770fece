// FlowProbe: Active Validation of OpenFlow Topologies
// Copyright (C) 2026  The flowprobe developers
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! IPv4 header, without options.

use super::transport::{IcmpMessage, TcpSegment, UdpDatagram};
use super::{check_len, internet_checksum, PacketError};
use std::net::Ipv4Addr;

/// IP protocol number of ICMP
pub const IPPROTO_ICMP: u8 = 1;
/// IP protocol number of TCP
pub const IPPROTO_TCP: u8 = 6;
/// IP protocol number of UDP
pub const IPPROTO_UDP: u8 = 17;

/// Payload of an IPv4 packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ipv4Payload {
    /// A TCP segment
    Tcp(TcpSegment),
    /// A UDP datagram
    Udp(UdpDatagram),
    /// An ICMP message
    Icmp(IcmpMessage),
    /// Any other payload, kept as raw bytes
    Raw {
        /// the protocol number announcing this payload
        protocol: u8,
        /// the payload bytes
        data: Vec<u8>,
    },
}

/// An IPv4 packet. The header is always 20 bytes (no options), which is all a probe ever needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Packet {
    /// type of service
    pub tos: u8,
    /// time to live
    pub ttl: u8,
    /// source address
    pub src: Ipv4Addr,
    /// destination address
    pub dst: Ipv4Addr,
    /// packet payload
    pub payload: Ipv4Payload,
}

impl Ipv4Packet {
    /// Returns the protocol number of the payload.
    pub fn protocol(&self) -> u8 {
        match &self.payload {
            Ipv4Payload::Tcp(_) => IPPROTO_TCP,
            Ipv4Payload::Udp(_) => IPPROTO_UDP,
            Ipv4Payload::Icmp(_) => IPPROTO_ICMP,
            Ipv4Payload::Raw { protocol, .. } => *protocol,
        }
    }

    /// Serialize the packet to wire bytes, computing the header checksum.
    pub fn serialize(&self) -> Vec<u8> {
        let payload = match &self.payload {
            Ipv4Payload::Tcp(tcp) => tcp.serialize(),
            Ipv4Payload::Udp(udp) => udp.serialize(),
            Ipv4Payload::Icmp(icmp) => icmp.serialize(),
            Ipv4Payload::Raw { data, .. } => data.clone(),
        };
        let total_len = (20 + payload.len()) as u16;
        let mut buf = Vec::with_capacity(20 + payload.len());
        buf.push(0x45); // version 4, ihl 5
        buf.push(self.tos);
        buf.extend_from_slice(&total_len.to_be_bytes());
        buf.extend_from_slice(&[0, 0, 0, 0]); // identification, flags, fragment offset
        buf.push(self.ttl);
        buf.push(self.protocol());
        buf.extend_from_slice(&[0, 0]); // checksum placeholder
        buf.extend_from_slice(&self.src.octets());
        buf.extend_from_slice(&self.dst.octets());
        let checksum = internet_checksum(&buf);
        buf[10..12].copy_from_slice(&checksum.to_be_bytes());
        buf.extend_from_slice(&payload);
        buf
    }

    /// Deserialize a packet from wire bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, PacketError> {
        check_len(bytes, 20)?;
        let version = bytes[0] >> 4;
        if version != 4 {
            return Err(PacketError::UnsupportedVersion(version));
        }
        let ihl = bytes[0] & 0x0f;
        if ihl != 5 {
            return Err(PacketError::UnsupportedHeaderLength(ihl));
        }
        let tos = bytes[1];
        let total_len = usize::from(u16::from_be_bytes([bytes[2], bytes[3]]));
        let ttl = bytes[8];
        let protocol = bytes[9];
        let src = Ipv4Addr::new(bytes[12], bytes[13], bytes[14], bytes[15]);
        let dst = Ipv4Addr::new(bytes[16], bytes[17], bytes[18], bytes[19]);
        let end = total_len.max(20).min(bytes.len());
        let rest = &bytes[20..end];
        let payload = match protocol {
            IPPROTO_TCP => Ipv4Payload::Tcp(TcpSegment::deserialize(rest)?),
            IPPROTO_UDP => Ipv4Payload::Udp(UdpDatagram::deserialize(rest)?),
            IPPROTO_ICMP => Ipv4Payload::Icmp(IcmpMessage::deserialize(rest)?),
            _ => Ipv4Payload::Raw { protocol, data: rest.to_vec() },
        };
        Ok(Self { tos, ttl, src, dst, payload })
    }
}
