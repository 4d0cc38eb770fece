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

//! Interface boundary to the surrounding controller: the switch connection layer, the rule
//! translation tables supplied per link, and the packet-in event verdict. Everything behind
//! [`SwitchProvider`] is someone else's problem; this crate only relies on the contract spelled
//! out here.

use crate::flowspace::FlowSpace;
use crate::types::{PortId, SwitchId, SwitchPort};
use std::sync::Arc;
use thiserror::Error;

/// OpenFlow 1.0 wildcard bits. A cleared bit means the corresponding field is matched exactly.
pub mod wildcards {
    /// match the ingress port
    pub const IN_PORT: u32 = 1 << 0;
    /// match the VLAN id
    pub const DL_VLAN: u32 = 1 << 1;
    /// match the source MAC
    pub const DL_SRC: u32 = 1 << 2;
    /// match the destination MAC
    pub const DL_DST: u32 = 1 << 3;
    /// match the ethertype
    pub const DL_TYPE: u32 = 1 << 4;
    /// match the IP protocol
    pub const NW_PROTO: u32 = 1 << 5;
    /// match the transport source port
    pub const TP_SRC: u32 = 1 << 6;
    /// match the transport destination port
    pub const TP_DST: u32 = 1 << 7;
    /// source address wildcard bit count field
    pub const NW_SRC_MASK: u32 = 0x3f << 8;
    /// destination address wildcard bit count field
    pub const NW_DST_MASK: u32 = 0x3f << 14;
    /// match the VLAN priority
    pub const DL_VLAN_PCP: u32 = 1 << 20;
    /// match the TOS bits
    pub const NW_TOS: u32 = 1 << 21;
    /// everything wildcarded
    pub const ALL: u32 = (1 << 22) - 1;
}

/// Error raised by switch operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SwitchError {
    /// The switch is not connected to the controller
    #[error("switch {0} is not connected")]
    SwitchNotFound(SwitchId),
    /// The port does not exist on the switch
    #[error("port {0} does not exist")]
    PortNotFound(SwitchPort),
    /// Writing a message to the switch connection failed
    #[error("write to switch {0} failed: {1}")]
    WriteFailed(SwitchId, String),
}

/// What the controller knows about one switch port.
#[derive(Debug, Clone)]
pub struct PortInfo {
    /// whether the port may participate in link probing
    pub discovery_enabled: bool,
    /// the flow space governing traffic leaving through this port, if one was ingested
    pub egress_flowspace: Option<Arc<FlowSpace>>,
}

/// A transient send-to-controller flow rule, matching one concrete packet on one ingress port.
#[derive(Debug, Clone)]
pub struct TransientRule {
    /// ingress port the match is bound to
    pub in_port: PortId,
    /// the packet whose headers the rule must match
    pub match_packet: Vec<u8>,
    /// OpenFlow wildcard mask; cleared bits are matched exactly (see [`wildcards`])
    pub wildcards: u32,
    /// idle timeout in seconds
    pub idle_timeout: u16,
    /// hard timeout in seconds, 0 for none
    pub hard_timeout: u16,
}

/// Access to the connected switches.
///
/// # Contract
///
/// Implementations must guarantee that packet-in events of a single switch are delivered to the
/// registered handler without overlap (one at a time). The OpenFlow transport serializes reads
/// per connection, so adapters over a real controller get this for free; an adapter that fans
/// events out to a thread pool must add per-switch serialization itself.
pub trait SwitchProvider {
    /// Look up a port. `None` if the switch is not connected or the port does not exist.
    fn port(&self, switch: SwitchId, port: PortId) -> Option<PortInfo>;

    /// The wildcard bits the switch is capable of, out of [`wildcards::ALL`].
    fn wildcard_capabilities(&self, switch: SwitchId) -> u32;

    /// Emit a raw packet out of the given port.
    fn send_packet_out(&self, switch: SwitchId, out_port: PortId, packet: &[u8])
        -> Result<(), SwitchError>;

    /// Install a transient send-to-controller rule on the switch.
    fn install_transient_rule(&self, switch: SwitchId, rule: TransientRule)
        -> Result<(), SwitchError>;
}

/// A pure byte-rewrite function modeling the header translation a packet undergoes when it
/// crosses a link between domains (tunnel encapsulation or decapsulation).
pub trait RuleTranslation {
    /// Predict the packet's bytes after traversing the link.
    fn rewrite(&self, packet: &[u8]) -> Vec<u8>;
}

impl<F> RuleTranslation for F
where
    F: Fn(&[u8]) -> Vec<u8>,
{
    fn rewrite(&self, packet: &[u8]) -> Vec<u8> {
        self(packet)
    }
}

/// Verdict a packet-in handler returns to the event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketInAction {
    /// Consume the event; later listeners never see it
    Stop,
    /// Pass the event on to the next listener
    Continue,
}
