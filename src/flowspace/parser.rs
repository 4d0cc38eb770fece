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

//! Parser for the textual flow-space descriptor format.
//!
//! A descriptor is a sequence of `value/bitStart-bitEnd` components separated by `^`. The bit
//! range identifies the header field by its position in the canonical 232-bit match vector:
//!
//! | field                      | bits    |
//! |----------------------------|---------|
//! | source MAC                 | 0-47    |
//! | destination MAC            | 48-95   |
//! | VLAN id                    | 96-111  |
//! | ethertype                  | 112-127 |
//! | network protocol           | 128-135 |
//! | network source             | 136-167 |
//! | network destination        | 168-199 |
//! | transport source port      | 200-215 |
//! | transport destination port | 216-231 |
//!
//! For the address fields the number of bits covered by the range is the prefix length. The VLAN
//! value may itself be a range (`100-199`); for every other field a range marker in the value is
//! an error. A parse failure names the offending component so the caller can skip just that
//! descriptor and keep ingesting its siblings.

use super::{FlowSpace, IpPrefix};
use crate::types::MacAddress;
use std::net::Ipv4Addr;
use thiserror::Error;

/// Error raised when a flow-space descriptor cannot be parsed. Every variant carries the
/// offending component verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    /// A component is not of the form `value/bitStart-bitEnd`
    #[error("component `{0}` is not of the form value/bitStart-bitEnd")]
    InvalidComponent(String),
    /// The bit range of a component could not be parsed
    #[error("component `{0}` has an invalid bit range")]
    InvalidBitRange(String),
    /// The bit range does not fall within any canonical field
    #[error("component `{0}` addresses an unrecognized bit range {1}-{2}")]
    UnrecognizedField(String, u32, u32),
    /// A range marker was used in the value of a scalar (non-VLAN) field
    #[error("component `{0}` uses a value range on a scalar field")]
    IllegalValueRange(String),
    /// The value could not be parsed, or is out of range for its field
    #[error("component `{0}` has an invalid value")]
    InvalidValue(String),
}

const SRC_MAC_BITS: (u32, u32) = (0, 47);
const DST_MAC_BITS: (u32, u32) = (48, 95);
const VLAN_BITS: (u32, u32) = (96, 111);
const ETHERTYPE_BITS: (u32, u32) = (112, 127);
const NW_PROTO_BITS: (u32, u32) = (128, 135);
const NW_SRC_BITS: (u32, u32) = (136, 167);
const NW_DST_BITS: (u32, u32) = (168, 199);
const TP_SRC_BITS: (u32, u32) = (200, 215);
const TP_DST_BITS: (u32, u32) = (216, 231);

fn encloses(outer: (u32, u32), start: u32, end: u32) -> bool {
    outer.0 <= start && end <= outer.1
}

/// Parse a flow-space descriptor into a sparse [`FlowSpace`] whose explicit entries are the
/// descriptor's components, all Allowed.
pub fn parse_flowspace(descriptor: &str) -> Result<FlowSpace, DescriptorError> {
    let mut flowspace = FlowSpace::sparse();
    for component in descriptor.split('^') {
        parse_component(component.trim(), &mut flowspace)?;
    }
    Ok(flowspace)
}

fn parse_component(component: &str, flowspace: &mut FlowSpace) -> Result<(), DescriptorError> {
    let bad_component = || DescriptorError::InvalidComponent(component.to_string());
    let bad_bits = || DescriptorError::InvalidBitRange(component.to_string());
    let bad_value = || DescriptorError::InvalidValue(component.to_string());

    let mut tokens = component.split('/');
    let value = tokens.next().ok_or_else(bad_component)?.trim();
    let bits = tokens.next().ok_or_else(bad_component)?.trim();
    if tokens.next().is_some() {
        return Err(bad_component());
    }

    let bounds: Vec<&str> = bits.split('-').collect();
    if bounds.len() != 2 {
        return Err(bad_bits());
    }
    let start: u32 = bounds[0].trim().parse().map_err(|_| bad_bits())?;
    let end: u32 = bounds[1].trim().parse().map_err(|_| bad_bits())?;
    if start > end {
        return Err(bad_bits());
    }

    if encloses(VLAN_BITS, start, end) {
        let parts: Vec<&str> = value.split('-').collect();
        let (vlan_start, vlan_end): (u16, u16) = match parts.as_slice() {
            [single] => {
                let v = single.trim().parse().map_err(|_| bad_value())?;
                (v, v)
            }
            [first, last] => (
                first.trim().parse().map_err(|_| bad_value())?,
                last.trim().parse().map_err(|_| bad_value())?,
            ),
            _ => return Err(bad_value()),
        };
        if vlan_end < vlan_start {
            return Err(bad_value());
        }
        flowspace.add_dl_vlan(vlan_start, vlan_end - vlan_start + 1);
        return Ok(());
    }

    // every remaining field is scalar
    if value.contains('-') {
        return Err(DescriptorError::IllegalValueRange(component.to_string()));
    }

    if encloses(SRC_MAC_BITS, start, end) {
        flowspace.add_dl_src(parse_mac(value).ok_or_else(bad_value)?);
    } else if encloses(DST_MAC_BITS, start, end) {
        flowspace.add_dl_dst(parse_mac(value).ok_or_else(bad_value)?);
    } else if encloses(ETHERTYPE_BITS, start, end) {
        flowspace.add_dl_type(value.parse().map_err(|_| bad_value())?);
    } else if encloses(NW_PROTO_BITS, start, end) {
        flowspace.add_nw_proto(value.parse().map_err(|_| bad_value())?);
    } else if encloses(NW_SRC_BITS, start, end) {
        let addr: u32 = value.parse().map_err(|_| bad_value())?;
        flowspace.add_nw_src(IpPrefix::new(Ipv4Addr::from(addr), (end - start + 1) as u8));
    } else if encloses(NW_DST_BITS, start, end) {
        let addr: u32 = value.parse().map_err(|_| bad_value())?;
        flowspace.add_nw_dst(IpPrefix::new(Ipv4Addr::from(addr), (end - start + 1) as u8));
    } else if encloses(TP_SRC_BITS, start, end) {
        flowspace.add_tp_src(value.parse().map_err(|_| bad_value())?);
    } else if encloses(TP_DST_BITS, start, end) {
        flowspace.add_tp_dst(value.parse().map_err(|_| bad_value())?);
    } else {
        return Err(DescriptorError::UnrecognizedField(component.to_string(), start, end));
    }
    Ok(())
}

fn parse_mac(value: &str) -> Option<MacAddress> {
    let raw: u64 = value.parse().ok()?;
    if raw >= 1u64 << 48 {
        None
    } else {
        Some(MacAddress::from_u64(raw))
    }
}
