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

//! Ethernet framing, with optional 802.1Q tagging.

use super::ipv4::Ipv4Packet;
use super::{check_len, PacketError};
use crate::types::MacAddress;

/// Ethertype of IPv4
pub const ETHERTYPE_IPV4: u16 = 0x0800;
/// Ethertype of an 802.1Q VLAN tag
pub const ETHERTYPE_VLAN: u16 = 0x8100;

/// An 802.1Q VLAN tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanTag {
    /// VLAN identifier (12 bits)
    pub vid: u16,
    /// priority code point (3 bits)
    pub pcp: u8,
}

/// Payload of an Ethernet frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EtherPayload {
    /// An IPv4 packet
    Ipv4(Ipv4Packet),
    /// Any other payload, kept as raw bytes
    Raw {
        /// the ethertype announcing this payload
        ethertype: u16,
        /// the payload bytes
        data: Vec<u8>,
    },
}

/// An Ethernet frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame {
    /// destination MAC address
    pub dst: MacAddress,
    /// source MAC address
    pub src: MacAddress,
    /// optional 802.1Q tag
    pub vlan: Option<VlanTag>,
    /// frame payload
    pub payload: EtherPayload,
}

impl EthernetFrame {
    /// Returns the ethertype of the payload (the inner ethertype when the frame is tagged).
    pub fn ethertype(&self) -> u16 {
        match &self.payload {
            EtherPayload::Ipv4(_) => ETHERTYPE_IPV4,
            EtherPayload::Raw { ethertype, .. } => *ethertype,
        }
    }

    /// Serialize the frame to wire bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(&self.dst.octets());
        buf.extend_from_slice(&self.src.octets());
        if let Some(tag) = &self.vlan {
            buf.extend_from_slice(&ETHERTYPE_VLAN.to_be_bytes());
            let tci = (u16::from(tag.pcp) << 13) | (tag.vid & 0x0fff);
            buf.extend_from_slice(&tci.to_be_bytes());
        }
        buf.extend_from_slice(&self.ethertype().to_be_bytes());
        match &self.payload {
            EtherPayload::Ipv4(ip) => buf.extend_from_slice(&ip.serialize()),
            EtherPayload::Raw { data, .. } => buf.extend_from_slice(data),
        }
        buf
    }

    /// Deserialize a frame from wire bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, PacketError> {
        check_len(bytes, 14)?;
        let dst = MacAddress::new([bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]]);
        let src = MacAddress::new([bytes[6], bytes[7], bytes[8], bytes[9], bytes[10], bytes[11]]);
        let mut ethertype = u16::from_be_bytes([bytes[12], bytes[13]]);
        let mut offset = 14;
        let mut vlan = None;
        if ethertype == ETHERTYPE_VLAN {
            check_len(bytes, 18)?;
            let tci = u16::from_be_bytes([bytes[14], bytes[15]]);
            vlan = Some(VlanTag { vid: tci & 0x0fff, pcp: (tci >> 13) as u8 });
            ethertype = u16::from_be_bytes([bytes[16], bytes[17]]);
            offset = 18;
        }
        let payload = if ethertype == ETHERTYPE_IPV4 {
            EtherPayload::Ipv4(Ipv4Packet::deserialize(&bytes[offset..])?)
        } else {
            EtherPayload::Raw { ethertype, data: bytes[offset..].to_vec() }
        };
        Ok(Self { dst, src, vlan, payload })
    }
}
