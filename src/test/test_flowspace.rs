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

use crate::flowspace::{FlowSpace, IpPrefix, Policy};
use crate::types::MacAddress;
use std::net::Ipv4Addr;

#[test]
fn sparse_denies_by_default() {
    let fs = FlowSpace::sparse();
    assert!(!fs.verify_dl_type(0x0800));
    assert!(!fs.verify_nw_proto(6));
    assert!(!fs.verify_tp_src(80));
    assert!(!fs.verify_nw_src(Ipv4Addr::new(10, 0, 0, 1)));
    assert!(!fs.verify_dl_vlan(100));
}

#[test]
fn dense_allows_by_default() {
    let fs = FlowSpace::dense();
    assert!(fs.verify_dl_type(0x0800));
    assert!(fs.verify_nw_proto(6));
    assert!(fs.verify_tp_src(80));
    assert!(fs.verify_nw_src(Ipv4Addr::new(10, 0, 0, 1)));
    assert!(fs.verify_dl_vlan(100));
}

#[test]
fn explicit_block_overrides_dense_default() {
    let mut fs = FlowSpace::dense();
    fs.block_nw_proto(17);
    assert!(!fs.verify_nw_proto(17));
    assert!(fs.verify_nw_proto(6));

    // removing the explicit entry falls back to the default again
    fs.remove_nw_proto(17);
    assert!(fs.verify_nw_proto(17));
}

#[test]
fn explicit_allow_overrides_sparse_default() {
    let mut fs = FlowSpace::sparse();
    fs.add_tp_dst(443);
    assert!(fs.verify_tp_dst(443));
    assert!(!fs.verify_tp_dst(80));

    fs.remove_tp_dst(443);
    assert!(!fs.verify_tp_dst(443));
}

#[test]
fn flipping_the_default_policy() {
    let mut fs = FlowSpace::sparse();
    fs.add_dl_type(0x0800);
    fs.block_dl_type(0x86dd);

    fs.set_default_policy(Policy::Allowed);
    // explicit entries are unaffected, only the fallback changes
    assert!(fs.verify_dl_type(0x0800));
    assert!(!fs.verify_dl_type(0x86dd));
    assert!(fs.verify_dl_type(0x0806));
}

#[test]
fn mac_entries() {
    let mut fs = FlowSpace::sparse();
    let a = MacAddress::new([0, 0, 0, 0, 0, 1]);
    let b = MacAddress::new([0, 0, 0, 0, 0, 2]);
    fs.add_dl_src(a);
    // the only entry is allowed, so sampling is deterministic
    assert_eq!(fs.random_dl_src(), Some(a));
    fs.block_dl_src(b);
    assert!(fs.verify_dl_src(a));
    assert!(!fs.verify_dl_src(b));
}

#[test]
fn vlan_interval_splitting() {
    let mut fs = FlowSpace::sparse();
    fs.add_dl_vlan(100, 100); // 100..=199 allowed
    fs.block_dl_vlan(150, 10); // 150..=159 blocked, splits the allowed interval

    assert!(fs.verify_dl_vlan(100));
    assert!(fs.verify_dl_vlan(149));
    assert!(!fs.verify_dl_vlan(150));
    assert!(!fs.verify_dl_vlan(159));
    assert!(fs.verify_dl_vlan(160));
    assert!(fs.verify_dl_vlan(199));
    assert!(!fs.verify_dl_vlan(200));

    // three disjoint intervals remain
    assert_eq!(fs.dl_vlan_intervals().count(), 3);

    // sampling only ever yields permitted ids
    for _ in 0..50 {
        if let Some(vid) = fs.random_dl_vlan() {
            assert!(fs.verify_dl_vlan(vid), "sampled blocked vlan {}", vid);
        }
    }
}

#[test]
fn longest_prefix_wins() {
    let mut fs = FlowSpace::sparse();
    fs.add_nw_src(IpPrefix::new(Ipv4Addr::new(10, 0, 0, 0), 8));
    fs.block_nw_src(IpPrefix::new(Ipv4Addr::new(10, 1, 0, 0), 16));
    fs.add_nw_src(IpPrefix::new(Ipv4Addr::new(10, 1, 2, 3), 32));

    assert!(fs.verify_nw_src(Ipv4Addr::new(10, 0, 0, 1)));
    assert!(!fs.verify_nw_src(Ipv4Addr::new(10, 1, 0, 1)));
    assert!(fs.verify_nw_src(Ipv4Addr::new(10, 1, 2, 3)));
    assert!(!fs.verify_nw_src(Ipv4Addr::new(11, 0, 0, 1)));
}

#[test]
fn sampled_address_lies_in_a_permitted_prefix() {
    let mut fs = FlowSpace::sparse();
    fs.add_nw_dst(IpPrefix::new(Ipv4Addr::new(192, 168, 4, 0), 24));
    for _ in 0..50 {
        let addr = fs.random_nw_dst().expect("a permitted prefix exists");
        assert_eq!(u32::from(addr) >> 8, u32::from(Ipv4Addr::new(192, 168, 4, 0)) >> 8);
    }
}

#[test]
fn bitmask_fields_ignore_the_default_policy() {
    let fs = FlowSpace::dense();
    // pcp has no bits set, so nothing is permitted even with an allow-all default
    assert!(!fs.verify_vlan_pcp(0));
    assert_eq!(fs.random_vlan_pcp(), None);
    // tos 0 is allowed from the start
    assert!(fs.verify_nw_tos(0));
    assert!(!fs.verify_nw_tos(1));
    assert_eq!(fs.random_nw_tos(), Some(0));
}

#[test]
fn tos_bits() {
    let mut fs = FlowSpace::sparse();
    fs.add_nw_tos(46);
    assert!(fs.verify_nw_tos(46));
    fs.remove_nw_tos(0);
    assert!(!fs.verify_nw_tos(0));
    assert_eq!(fs.random_nw_tos(), Some(46));
}

#[test]
fn sampling_an_empty_field_yields_none() {
    let fs = FlowSpace::sparse();
    assert_eq!(fs.random_dl_type(), None);
    assert_eq!(fs.random_nw_proto(), None);
    assert_eq!(fs.random_dl_vlan(), None);
    assert_eq!(fs.random_nw_src(), None);
}

#[test]
fn sampling_skips_blocked_entries() {
    let mut fs = FlowSpace::sparse();
    fs.block_tp_src(1);
    fs.block_tp_src(2);
    fs.add_tp_src(3);
    for _ in 0..50 {
        if let Some(port) = fs.random_tp_src() {
            assert_eq!(port, 3);
        }
    }
}
