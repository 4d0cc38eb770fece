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

//! Transport-layer payloads carried by probe packets. Probes only ever pin down the fields a
//! flow space can constrain, so sequence numbers, windows and transport checksums stay zero.

use super::{check_len, internet_checksum, PacketError};

/// A minimal TCP segment (header only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpSegment {
    /// source port
    pub src_port: u16,
    /// destination port
    pub dst_port: u16,
}

impl TcpSegment {
    /// Serialize the segment to its 20-byte header.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = vec![0u8; 20];
        buf[0..2].copy_from_slice(&self.src_port.to_be_bytes());
        buf[2..4].copy_from_slice(&self.dst_port.to_be_bytes());
        buf[12] = 0x50; // data offset 5 words
        buf
    }

    /// Deserialize a segment from wire bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, PacketError> {
        check_len(bytes, 20)?;
        Ok(Self {
            src_port: u16::from_be_bytes([bytes[0], bytes[1]]),
            dst_port: u16::from_be_bytes([bytes[2], bytes[3]]),
        })
    }
}

/// A minimal UDP datagram (header only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpDatagram {
    /// source port
    pub src_port: u16,
    /// destination port
    pub dst_port: u16,
}

impl UdpDatagram {
    /// Serialize the datagram to its 8-byte header.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = vec![0u8; 8];
        buf[0..2].copy_from_slice(&self.src_port.to_be_bytes());
        buf[2..4].copy_from_slice(&self.dst_port.to_be_bytes());
        buf[4..6].copy_from_slice(&8u16.to_be_bytes());
        buf
    }

    /// Deserialize a datagram from wire bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, PacketError> {
        check_len(bytes, 8)?;
        Ok(Self {
            src_port: u16::from_be_bytes([bytes[0], bytes[1]]),
            dst_port: u16::from_be_bytes([bytes[2], bytes[3]]),
        })
    }
}

/// A minimal ICMP message (header only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcmpMessage {
    /// ICMP type
    pub icmp_type: u8,
    /// ICMP code
    pub code: u8,
}

impl IcmpMessage {
    /// An echo request (type 8, code 0), the message probes carry.
    pub fn echo_request() -> Self {
        Self { icmp_type: 8, code: 0 }
    }

    /// Serialize the message to its 4-byte header, computing the checksum.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = vec![self.icmp_type, self.code, 0, 0];
        let checksum = internet_checksum(&buf);
        buf[2..4].copy_from_slice(&checksum.to_be_bytes());
        buf
    }

    /// Deserialize a message from wire bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, PacketError> {
        check_len(bytes, 4)?;
        Ok(Self { icmp_type: bytes[0], code: bytes[1] })
    }
}
