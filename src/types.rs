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

//! Module containing all basic type definitions

use std::fmt;

/// Switch identification (OpenFlow datapath id)
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct SwitchId(pub u64);

/// Port number on a switch
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct PortId(pub u16);

/// The administratively local port of a switch. Packets never physically leave through it, so it
/// is never eligible for probing.
pub const PORT_LOCAL: PortId = PortId(0xfffe);

impl PortId {
    /// Returns true if and only if this is the administratively local port.
    pub fn is_local(&self) -> bool {
        *self == PORT_LOCAL
    }
}

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A (switch, port) pair, identifying one attachment point in the topology.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub struct SwitchPort {
    /// the switch
    pub switch: SwitchId,
    /// the port on that switch
    pub port: PortId,
}

impl SwitchPort {
    /// Create a new switch-port pair
    pub fn new(switch: SwitchId, port: PortId) -> Self {
        Self { switch, port }
    }
}

impl fmt::Display for SwitchPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.switch, self.port)
    }
}

/// A unidirectional link between two switch ports, as supplied by the topology layer.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub struct Link {
    /// egress end of the link
    pub src: SwitchPort,
    /// ingress end of the link
    pub dst: SwitchPort,
}

impl Link {
    /// Create a new link from its four coordinates
    pub fn new(src_switch: SwitchId, src_port: PortId, dst_switch: SwitchId, dst_port: PortId) -> Self {
        Self {
            src: SwitchPort::new(src_switch, src_port),
            dst: SwitchPort::new(dst_switch, dst_port),
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {}", self.src, self.dst)
    }
}

/// A 48-bit MAC address.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Default)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Create a MAC address from its six octets
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Create a MAC address from the lower 48 bits of an integer
    pub fn from_u64(value: u64) -> Self {
        let b = value.to_be_bytes();
        Self([b[2], b[3], b[4], b[5], b[6], b[7]])
    }

    /// Return the address as an integer in the lower 48 bits
    pub fn to_u64(self) -> u64 {
        let o = self.0;
        u64::from_be_bytes([0, 0, o[0], o[1], o[2], o[3], o[4], o[5]])
    }

    /// Return the six octets of the address
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}", o[0], o[1], o[2], o[3], o[4], o[5])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mac_u64_round_trip() {
        let mac = MacAddress::new([0x01, 0x80, 0xc2, 0x12, 0x34, 0x56]);
        assert_eq!(MacAddress::from_u64(mac.to_u64()), mac);
        assert_eq!(mac.to_u64(), 0x0180_c212_3456);
        assert_eq!(format!("{}", mac), "01:80:c2:12:34:56");
    }

    #[test]
    fn local_port() {
        assert!(PORT_LOCAL.is_local());
        assert!(!PortId(1).is_local());
    }
}
