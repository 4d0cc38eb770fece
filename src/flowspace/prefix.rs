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

//! IPv4 address policy with longest-prefix-match semantics, realized as a flat map of
//! (network, prefix length) entries plus the running union of all prefix lengths ever inserted.
//! Lookups probe the inserted lengths from longest to shortest, so no trie is needed.

use super::policy::{sample_allowed, Policy};
use rand::Rng;
use std::collections::HashMap;
use std::fmt;
use std::net::Ipv4Addr;

/// An IPv4 network prefix. The address is normalized: host bits beyond the prefix length are
/// zeroed on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpPrefix {
    network: u32,
    len: u8,
}

impl IpPrefix {
    /// Create a prefix of `len` bits covering `addr`. `len` is capped at 32.
    pub fn new(addr: Ipv4Addr, len: u8) -> Self {
        let len = len.min(32);
        Self { network: u32::from(addr) & Self::netmask(len), len }
    }

    /// Create a host prefix (/32).
    pub fn host(addr: Ipv4Addr) -> Self {
        Self::new(addr, 32)
    }

    /// The network address of the prefix.
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.network)
    }

    /// The prefix length in bits.
    pub fn len(&self) -> u8 {
        self.len
    }

    fn netmask(len: u8) -> u32 {
        if len == 0 {
            0
        } else {
            u32::MAX << (32 - u32::from(len))
        }
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.len)
    }
}

/// Address-field policy. Entries are prefixes; verification checks an exact host entry first and
/// then walks the prefix lengths that were ever inserted, longest first, returning the first hit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrefixPolicy {
    entries: HashMap<IpPrefix, Policy>,
    // bit `l` is set if a prefix of length `l` was ever inserted; never cleared on remove
    inserted_lengths: u64,
}

impl PrefixPolicy {
    /// Create an empty policy.
    pub fn new() -> Self {
        Self { entries: HashMap::new(), inserted_lengths: 0 }
    }

    /// Insert an Allowed entry for a prefix.
    pub fn add(&mut self, prefix: IpPrefix) {
        self.insert(prefix, Policy::Allowed)
    }

    /// Insert a Blocked entry for a prefix.
    pub fn block(&mut self, prefix: IpPrefix) {
        self.insert(prefix, Policy::Blocked)
    }

    fn insert(&mut self, prefix: IpPrefix, policy: Policy) {
        self.inserted_lengths |= 1u64 << prefix.len();
        self.entries.insert(prefix, policy);
    }

    /// Remove the entry for exactly this (network, length) pair.
    pub fn remove(&mut self, prefix: &IpPrefix) {
        self.entries.remove(prefix);
    }

    /// Look up the policy covering an address: the exact /32 entry wins; otherwise the longest
    /// inserted prefix covering the address.
    pub fn verify(&self, addr: Ipv4Addr) -> Option<Policy> {
        if let Some(policy) = self.entries.get(&IpPrefix::host(addr)) {
            return Some(*policy);
        }
        for len in (0..32u8).rev() {
            if self.inserted_lengths & (1u64 << len) == 0 {
                continue;
            }
            if let Some(policy) = self.entries.get(&IpPrefix::new(addr, len)) {
                return Some(*policy);
            }
        }
        None
    }

    /// Sample an address out of an Allowed prefix: a bounded uniform draw over the entries, then
    /// uniformly random host bits within the chosen prefix.
    pub fn sample(&self, rng: &mut impl Rng) -> Option<Ipv4Addr> {
        let prefix = sample_allowed(&self.entries, rng)?;
        let host_bits = 32 - u32::from(prefix.len);
        let addr = if host_bits == 0 {
            prefix.network
        } else if host_bits == 32 {
            rng.gen::<u32>()
        } else {
            prefix.network | (rng.gen::<u32>() & ((1u32 << host_bits) - 1))
        };
        Some(Ipv4Addr::from(addr))
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the policy has no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ip(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    #[test]
    fn prefix_normalizes_host_bits() {
        let p = IpPrefix::new(ip("10.1.2.3"), 24);
        assert_eq!(p.network(), ip("10.1.2.0"));
        assert_eq!(p, IpPrefix::new(ip("10.1.2.200"), 24));
    }

    #[test]
    fn longest_prefix_wins() {
        let mut policy = PrefixPolicy::new();
        policy.add(IpPrefix::new(ip("10.1.2.0"), 24));
        policy.block(IpPrefix::host(ip("10.1.2.3")));
        // the /32 entry overrides the /24 covering the same address
        assert_eq!(policy.verify(ip("10.1.2.3")), Some(Policy::Blocked));
        assert_eq!(policy.verify(ip("10.1.2.4")), Some(Policy::Allowed));
        assert_eq!(policy.verify(ip("10.2.0.1")), None);
    }

    #[test]
    fn intermediate_lengths() {
        let mut policy = PrefixPolicy::new();
        policy.block(IpPrefix::new(ip("10.0.0.0"), 8));
        policy.add(IpPrefix::new(ip("10.1.0.0"), 16));
        assert_eq!(policy.verify(ip("10.1.5.5")), Some(Policy::Allowed));
        assert_eq!(policy.verify(ip("10.2.5.5")), Some(Policy::Blocked));
    }

    #[test]
    fn sample_stays_within_prefix() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut policy = PrefixPolicy::new();
        policy.add(IpPrefix::new(ip("192.168.7.0"), 24));
        for _ in 0..100 {
            let addr = policy.sample(&mut rng).expect("an allowed prefix exists");
            assert_eq!(IpPrefix::new(addr, 24), IpPrefix::new(ip("192.168.7.0"), 24));
            assert_eq!(policy.verify(addr), Some(Policy::Allowed));
        }
    }

    #[test]
    fn sample_host_prefix_is_exact() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut policy = PrefixPolicy::new();
        policy.add(IpPrefix::host(ip("10.1.1.1")));
        assert_eq!(policy.sample(&mut rng), Some(ip("10.1.1.1")));
    }

    #[test]
    fn sample_none_when_all_blocked() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut policy = PrefixPolicy::new();
        policy.block(IpPrefix::new(ip("10.0.0.0"), 8));
        for _ in 0..20 {
            assert_eq!(policy.sample(&mut rng), None);
        }
    }
}
