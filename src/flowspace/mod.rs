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

//! # Flow Space
//!
//! A [`FlowSpace`] describes, per matchable header field, which values are permitted to cross one
//! switch port in one direction. Each field holds explicit Allowed/Blocked entries; when no
//! explicit entry matches, the flow space's global default policy applies (sparse flow spaces
//! deny by default, dense ones allow by default). Besides verification, every field supports
//! random sampling of a permitted value, which is what probe synthesis builds on. Sampling is
//! deliberately bounded: a `None` means "no permitted value was discovered within the attempt
//! budget", never "no permitted value exists".
//!
//! Field representations:
//! - MAC source/destination, ethertype, network protocol, transport ports: explicit value maps
//!   ([`PolicyMap`]).
//! - Network source/destination: (network, prefix length) entries with longest-prefix-match
//!   verification ([`PrefixPolicy`]).
//! - VLAN id: a sorted set of disjoint tagged intervals ([`VlanPolicy`]).
//! - VLAN priority and TOS: bitmasks ([`BitPolicy`]); these two have no default policy, the bit
//!   is the whole truth. TOS value 0 is allowed from the start.

mod bits;
mod parser;
mod policy;
mod prefix;
mod vlan;

pub use bits::BitPolicy;
pub use parser::{parse_flowspace, DescriptorError};
pub use policy::{Policy, PolicyMap, MAX_SAMPLE_ATTEMPTS};
pub use prefix::{IpPrefix, PrefixPolicy};
pub use vlan::{VlanPolicy, VlanRange};

use crate::types::MacAddress;
use rand::thread_rng;
use std::net::Ipv4Addr;

/// Per-port, per-direction policy over every matchable header field. See the
/// [module documentation](self) for the representation of each field.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSpace {
    default_policy: Policy,
    dl_src: PolicyMap<MacAddress>,
    dl_dst: PolicyMap<MacAddress>,
    dl_type: PolicyMap<u16>,
    dl_vlan: VlanPolicy,
    vlan_pcp: BitPolicy,
    nw_proto: PolicyMap<u8>,
    nw_src: PrefixPolicy,
    nw_dst: PrefixPolicy,
    nw_tos: BitPolicy,
    tp_src: PolicyMap<u16>,
    tp_dst: PolicyMap<u16>,
}

impl Default for FlowSpace {
    fn default() -> Self {
        Self::sparse()
    }
}

impl FlowSpace {
    fn with_default(default_policy: Policy) -> Self {
        Self {
            default_policy,
            dl_src: PolicyMap::new(),
            dl_dst: PolicyMap::new(),
            dl_type: PolicyMap::new(),
            dl_vlan: VlanPolicy::new(),
            vlan_pcp: BitPolicy::new(8),
            nw_proto: PolicyMap::new(),
            nw_src: PrefixPolicy::new(),
            nw_dst: PrefixPolicy::new(),
            nw_tos: BitPolicy::zero_allowed(64),
            tp_src: PolicyMap::new(),
            tp_dst: PolicyMap::new(),
        }
    }

    /// Create a sparse flow space: values without an explicit entry are denied.
    pub fn sparse() -> Self {
        Self::with_default(Policy::Blocked)
    }

    /// Create a dense flow space: values without an explicit entry are allowed.
    pub fn dense() -> Self {
        Self::with_default(Policy::Allowed)
    }

    /// The policy applied when no explicit entry matches.
    pub fn default_policy(&self) -> Policy {
        self.default_policy
    }

    /// Change the default policy.
    pub fn set_default_policy(&mut self, policy: Policy) {
        self.default_policy = policy;
    }

    fn apply_default(&self, explicit: Option<Policy>) -> bool {
        explicit.unwrap_or(self.default_policy).allows()
    }

    // ---------------- data-layer source MAC ----------------

    /// Allow a source MAC address.
    pub fn add_dl_src(&mut self, mac: MacAddress) {
        self.dl_src.add(mac);
    }

    /// Block a source MAC address.
    pub fn block_dl_src(&mut self, mac: MacAddress) {
        self.dl_src.block(mac);
    }

    /// Remove the explicit entry for a source MAC address.
    pub fn remove_dl_src(&mut self, mac: MacAddress) {
        self.dl_src.remove(&mac);
    }

    /// Is this source MAC address permitted?
    pub fn verify_dl_src(&self, mac: MacAddress) -> bool {
        self.apply_default(self.dl_src.verify(&mac))
    }

    /// Sample a permitted source MAC address.
    pub fn random_dl_src(&self) -> Option<MacAddress> {
        self.dl_src.sample_allowed(&mut thread_rng())
    }

    // ---------------- data-layer destination MAC ----------------

    /// Allow a destination MAC address.
    pub fn add_dl_dst(&mut self, mac: MacAddress) {
        self.dl_dst.add(mac);
    }

    /// Block a destination MAC address.
    pub fn block_dl_dst(&mut self, mac: MacAddress) {
        self.dl_dst.block(mac);
    }

    /// Remove the explicit entry for a destination MAC address.
    pub fn remove_dl_dst(&mut self, mac: MacAddress) {
        self.dl_dst.remove(&mac);
    }

    /// Is this destination MAC address permitted?
    pub fn verify_dl_dst(&self, mac: MacAddress) -> bool {
        self.apply_default(self.dl_dst.verify(&mac))
    }

    /// Sample a permitted destination MAC address.
    pub fn random_dl_dst(&self) -> Option<MacAddress> {
        self.dl_dst.sample_allowed(&mut thread_rng())
    }

    // ---------------- ethertype ----------------

    /// Allow an ethertype.
    pub fn add_dl_type(&mut self, ethertype: u16) {
        self.dl_type.add(ethertype);
    }

    /// Block an ethertype.
    pub fn block_dl_type(&mut self, ethertype: u16) {
        self.dl_type.block(ethertype);
    }

    /// Remove the explicit entry for an ethertype.
    pub fn remove_dl_type(&mut self, ethertype: u16) {
        self.dl_type.remove(&ethertype);
    }

    /// Is this ethertype permitted?
    pub fn verify_dl_type(&self, ethertype: u16) -> bool {
        self.apply_default(self.dl_type.verify(&ethertype))
    }

    /// Sample a permitted ethertype.
    pub fn random_dl_type(&self) -> Option<u16> {
        self.dl_type.sample_allowed(&mut thread_rng())
    }

    // ---------------- VLAN id ----------------

    /// Allow `range_len` VLAN ids starting at `vid`. Overlapping stored intervals are split; the
    /// interval set stays disjoint.
    pub fn add_dl_vlan(&mut self, vid: u16, range_len: u16) {
        self.dl_vlan.insert(VlanRange::with_len(vid, range_len), Policy::Allowed);
    }

    /// Block `range_len` VLAN ids starting at `vid`.
    pub fn block_dl_vlan(&mut self, vid: u16, range_len: u16) {
        self.dl_vlan.insert(VlanRange::with_len(vid, range_len), Policy::Blocked);
    }

    /// Remove the entry for exactly the interval of `range_len` ids starting at `vid`.
    pub fn remove_dl_vlan(&mut self, vid: u16, range_len: u16) {
        self.dl_vlan.remove(&VlanRange::with_len(vid, range_len));
    }

    /// Is this VLAN id permitted?
    pub fn verify_dl_vlan(&self, vid: u16) -> bool {
        self.apply_default(self.dl_vlan.verify(vid))
    }

    /// Sample a permitted VLAN id.
    pub fn random_dl_vlan(&self) -> Option<u16> {
        self.dl_vlan.sample(&mut thread_rng())
    }

    /// The stored VLAN intervals, for inspection.
    pub fn dl_vlan_intervals(&self) -> impl Iterator<Item = &(VlanRange, Policy)> {
        self.dl_vlan.intervals()
    }

    // ---------------- VLAN priority code point ----------------

    /// Allow a VLAN priority code point (0..8).
    pub fn add_vlan_pcp(&mut self, pcp: u8) {
        self.vlan_pcp.add(pcp);
    }

    /// Disallow a VLAN priority code point.
    pub fn remove_vlan_pcp(&mut self, pcp: u8) {
        self.vlan_pcp.remove(pcp);
    }

    /// Is this VLAN priority code point permitted? Pure bit test, the default policy does not
    /// apply to bitmask fields.
    pub fn verify_vlan_pcp(&self, pcp: u8) -> bool {
        self.vlan_pcp.verify(pcp)
    }

    /// Sample a permitted VLAN priority code point.
    pub fn random_vlan_pcp(&self) -> Option<u8> {
        self.vlan_pcp.sample(&mut thread_rng())
    }

    // ---------------- network protocol ----------------

    /// Allow an IP protocol number.
    pub fn add_nw_proto(&mut self, protocol: u8) {
        self.nw_proto.add(protocol);
    }

    /// Block an IP protocol number.
    pub fn block_nw_proto(&mut self, protocol: u8) {
        self.nw_proto.block(protocol);
    }

    /// Remove the explicit entry for an IP protocol number.
    pub fn remove_nw_proto(&mut self, protocol: u8) {
        self.nw_proto.remove(&protocol);
    }

    /// Is this IP protocol number permitted?
    pub fn verify_nw_proto(&self, protocol: u8) -> bool {
        self.apply_default(self.nw_proto.verify(&protocol))
    }

    /// Sample a permitted IP protocol number.
    pub fn random_nw_proto(&self) -> Option<u8> {
        self.nw_proto.sample_allowed(&mut thread_rng())
    }

    // ---------------- network source address ----------------

    /// Allow a source prefix.
    pub fn add_nw_src(&mut self, prefix: IpPrefix) {
        self.nw_src.add(prefix);
    }

    /// Block a source prefix.
    pub fn block_nw_src(&mut self, prefix: IpPrefix) {
        self.nw_src.block(prefix);
    }

    /// Remove the entry for exactly this source (network, length) pair.
    pub fn remove_nw_src(&mut self, prefix: IpPrefix) {
        self.nw_src.remove(&prefix);
    }

    /// Is this source address permitted? Longest inserted prefix wins.
    pub fn verify_nw_src(&self, addr: Ipv4Addr) -> bool {
        self.apply_default(self.nw_src.verify(addr))
    }

    /// Sample a permitted source address, with random host bits within the sampled prefix.
    pub fn random_nw_src(&self) -> Option<Ipv4Addr> {
        self.nw_src.sample(&mut thread_rng())
    }

    // ---------------- network destination address ----------------

    /// Allow a destination prefix.
    pub fn add_nw_dst(&mut self, prefix: IpPrefix) {
        self.nw_dst.add(prefix);
    }

    /// Block a destination prefix.
    pub fn block_nw_dst(&mut self, prefix: IpPrefix) {
        self.nw_dst.block(prefix);
    }

    /// Remove the entry for exactly this destination (network, length) pair.
    pub fn remove_nw_dst(&mut self, prefix: IpPrefix) {
        self.nw_dst.remove(&prefix);
    }

    /// Is this destination address permitted? Longest inserted prefix wins.
    pub fn verify_nw_dst(&self, addr: Ipv4Addr) -> bool {
        self.apply_default(self.nw_dst.verify(addr))
    }

    /// Sample a permitted destination address, with random host bits within the sampled prefix.
    pub fn random_nw_dst(&self) -> Option<Ipv4Addr> {
        self.nw_dst.sample(&mut thread_rng())
    }

    // ---------------- TOS ----------------

    /// Allow a TOS value (0..64).
    pub fn add_nw_tos(&mut self, tos: u8) {
        self.nw_tos.add(tos);
    }

    /// Disallow a TOS value.
    pub fn remove_nw_tos(&mut self, tos: u8) {
        self.nw_tos.remove(tos);
    }

    /// Is this TOS value permitted? Pure bit test.
    pub fn verify_nw_tos(&self, tos: u8) -> bool {
        self.nw_tos.verify(tos)
    }

    /// Sample a permitted TOS value.
    pub fn random_nw_tos(&self) -> Option<u8> {
        self.nw_tos.sample(&mut thread_rng())
    }

    // ---------------- transport source port ----------------

    /// Allow a transport source port.
    pub fn add_tp_src(&mut self, port: u16) {
        self.tp_src.add(port);
    }

    /// Block a transport source port.
    pub fn block_tp_src(&mut self, port: u16) {
        self.tp_src.block(port);
    }

    /// Remove the explicit entry for a transport source port.
    pub fn remove_tp_src(&mut self, port: u16) {
        self.tp_src.remove(&port);
    }

    /// Is this transport source port permitted?
    pub fn verify_tp_src(&self, port: u16) -> bool {
        self.apply_default(self.tp_src.verify(&port))
    }

    /// Sample a permitted transport source port.
    pub fn random_tp_src(&self) -> Option<u16> {
        self.tp_src.sample_allowed(&mut thread_rng())
    }

    // ---------------- transport destination port ----------------

    /// Allow a transport destination port.
    pub fn add_tp_dst(&mut self, port: u16) {
        self.tp_dst.add(port);
    }

    /// Block a transport destination port.
    pub fn block_tp_dst(&mut self, port: u16) {
        self.tp_dst.block(port);
    }

    /// Remove the explicit entry for a transport destination port.
    pub fn remove_tp_dst(&mut self, port: u16) {
        self.tp_dst.remove(&port);
    }

    /// Is this transport destination port permitted?
    pub fn verify_tp_dst(&self, port: u16) -> bool {
        self.apply_default(self.tp_dst.verify(&port))
    }

    /// Sample a permitted transport destination port.
    pub fn random_tp_dst(&self) -> Option<u16> {
        self.tp_dst.sample_allowed(&mut thread_rng())
    }
}
