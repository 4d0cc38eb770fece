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

use crate::flowspace::{parse_flowspace, DescriptorError};
use crate::types::MacAddress;
use std::net::Ipv4Addr;

#[test]
fn single_vlan() {
    let fs = parse_flowspace("100/96-111").unwrap();
    assert!(fs.verify_dl_vlan(100));
    assert!(!fs.verify_dl_vlan(101));
}

#[test]
fn vlan_range() {
    let fs = parse_flowspace("100-199/96-111").unwrap();
    assert!(fs.verify_dl_vlan(100));
    assert!(fs.verify_dl_vlan(199));
    assert!(!fs.verify_dl_vlan(99));
    assert!(!fs.verify_dl_vlan(200));
}

#[test]
fn multi_component_descriptor() {
    // 10.0.0.0/24 source, tcp, destination port 80
    let fs = parse_flowspace("167772160/136-159 ^ 6/128-135 ^ 80/216-231").unwrap();
    assert!(fs.verify_nw_src(Ipv4Addr::new(10, 0, 0, 42)));
    assert!(!fs.verify_nw_src(Ipv4Addr::new(10, 0, 1, 42)));
    assert!(fs.verify_nw_proto(6));
    assert!(fs.verify_tp_dst(80));
    assert!(!fs.verify_tp_dst(81));
}

#[test]
fn mac_components() {
    // 00:00:00:00:00:2a as source, 00:00:00:00:01:00 as destination
    let fs = parse_flowspace("42/0-47 ^ 256/48-95").unwrap();
    assert!(fs.verify_dl_src(MacAddress::from_u64(42)));
    assert!(!fs.verify_dl_src(MacAddress::from_u64(43)));
    assert!(fs.verify_dl_dst(MacAddress::from_u64(256)));
}

#[test]
fn destination_prefix_length_from_bit_range() {
    // 192.168.0.0 over 16 bits
    let addr = u32::from(Ipv4Addr::new(192, 168, 0, 0));
    let fs = parse_flowspace(&format!("{}/168-183", addr)).unwrap();
    assert!(fs.verify_nw_dst(Ipv4Addr::new(192, 168, 77, 1)));
    assert!(!fs.verify_nw_dst(Ipv4Addr::new(192, 169, 0, 1)));
}

#[test]
fn whitespace_is_tolerated() {
    let fs = parse_flowspace(" 6/128-135 ^ 100 - 199 / 96 - 111 ").unwrap();
    assert!(fs.verify_nw_proto(6));
    assert!(fs.verify_dl_vlan(150));
}

#[test]
fn missing_bit_range() {
    assert_eq!(
        parse_flowspace("100"),
        Err(DescriptorError::InvalidComponent("100".to_string()))
    );
}

#[test]
fn too_many_slashes() {
    assert_eq!(
        parse_flowspace("1/2/3"),
        Err(DescriptorError::InvalidComponent("1/2/3".to_string()))
    );
}

#[test]
fn malformed_bit_range() {
    assert_eq!(
        parse_flowspace("100/96"),
        Err(DescriptorError::InvalidBitRange("100/96".to_string()))
    );
    assert_eq!(
        parse_flowspace("100/111-96"),
        Err(DescriptorError::InvalidBitRange("100/111-96".to_string()))
    );
    assert_eq!(
        parse_flowspace("100/a-b"),
        Err(DescriptorError::InvalidBitRange("100/a-b".to_string()))
    );
}

#[test]
fn unrecognized_bit_range() {
    // straddles the vlan/ethertype boundary
    assert_eq!(
        parse_flowspace("1/100-120"),
        Err(DescriptorError::UnrecognizedField("1/100-120".to_string(), 100, 120))
    );
    // beyond the match vector
    assert_eq!(
        parse_flowspace("1/232-240"),
        Err(DescriptorError::UnrecognizedField("1/232-240".to_string(), 232, 240))
    );
}

#[test]
fn value_range_on_scalar_field() {
    assert_eq!(
        parse_flowspace("6-17/128-135"),
        Err(DescriptorError::IllegalValueRange("6-17/128-135".to_string()))
    );
}

#[test]
fn invalid_values() {
    assert_eq!(
        parse_flowspace("abc/96-111"),
        Err(DescriptorError::InvalidValue("abc/96-111".to_string()))
    );
    // descending vlan range
    assert_eq!(
        parse_flowspace("199-100/96-111"),
        Err(DescriptorError::InvalidValue("199-100/96-111".to_string()))
    );
    // mac value exceeding 48 bits
    assert_eq!(
        parse_flowspace("281474976710656/0-47"),
        Err(DescriptorError::InvalidValue("281474976710656/0-47".to_string()))
    );
}

#[test]
fn first_bad_component_aborts_the_descriptor() {
    let result = parse_flowspace("6/128-135 ^ bogus ^ 80/216-231");
    assert_eq!(result, Err(DescriptorError::InvalidComponent("bogus".to_string())));
}
