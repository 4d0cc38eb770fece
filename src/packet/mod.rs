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

//! # Packet Model
//!
//! Minimal packet model used for probe synthesis and correlation: Ethernet (optionally
//! 802.1Q-tagged), IPv4, and the TCP / UDP / ICMP payloads a probe can carry. Every type can be
//! serialized to wire bytes and deserialized back, so that a probe predicted to arrive at the far
//! end of a link can be compared structurally against the packet that actually arrived.

mod ethernet;
mod ipv4;
mod transport;

pub use ethernet::{EtherPayload, EthernetFrame, VlanTag, ETHERTYPE_IPV4, ETHERTYPE_VLAN};
pub use ipv4::{Ipv4Packet, Ipv4Payload, IPPROTO_ICMP, IPPROTO_TCP, IPPROTO_UDP};
pub use transport::{IcmpMessage, TcpSegment, UdpDatagram};

use thiserror::Error;

/// Packet deserialization error
#[derive(Debug, Error, PartialEq)]
pub enum PacketError {
    /// The byte buffer is too short for the header being parsed
    #[error("packet truncated: expected at least {expected} bytes, got {got}")]
    Truncated {
        /// minimum number of bytes required
        expected: usize,
        /// number of bytes available
        got: usize,
    },
    /// The IP version field is not 4
    #[error("unsupported IP version: {0}")]
    UnsupportedVersion(u8),
    /// The IP header carries options, which the probe model never generates
    #[error("unsupported IP header length: {0} words")]
    UnsupportedHeaderLength(u8),
}

/// Computes the 16-bit one's complement internet checksum over `data`. An odd trailing byte is
/// treated as the high byte of a final word.
pub(crate) fn internet_checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    let mut chunks = data.chunks_exact(2);
    for word in &mut chunks {
        sum += u32::from(u16::from_be_bytes([word[0], word[1]]));
    }
    if let Some(&last) = chunks.remainder().first() {
        sum += u32::from(u16::from_be_bytes([last, 0]));
    }
    while sum > 0xffff {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    !(sum as u16)
}

pub(crate) fn check_len(bytes: &[u8], expected: usize) -> Result<(), PacketError> {
    if bytes.len() < expected {
        Err(PacketError::Truncated { expected, got: bytes.len() })
    } else {
        Ok(())
    }
}
