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

//! Bitmask policies for small-domain fields (VLAN priority: 8 values, TOS: 64 values). Bit
//! position `v` set means value `v` is allowed.

use rand::Rng;

/// Policy over a field with at most 64 possible values, stored as one bit per value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitPolicy {
    bits: u64,
    width: u8,
}

impl BitPolicy {
    /// Create a policy over `width` values (at most 64) with no value allowed.
    pub fn new(width: u8) -> Self {
        debug_assert!(width >= 1 && width <= 64);
        Self { bits: 0, width }
    }

    /// Create a policy over `width` values with only value 0 allowed.
    pub fn zero_allowed(width: u8) -> Self {
        let mut p = Self::new(width);
        p.add(0);
        p
    }

    /// Allow a value (set its bit). Out-of-range values are ignored.
    pub fn add(&mut self, value: u8) {
        if value < self.width {
            self.bits |= 1u64 << value;
        }
    }

    /// Disallow a value (clear its bit).
    pub fn remove(&mut self, value: u8) {
        if value < self.width {
            self.bits &= !(1u64 << value);
        }
    }

    /// Returns true if the value's bit is set.
    pub fn verify(&self, value: u8) -> bool {
        value < self.width && self.bits & (1u64 << value) != 0
    }

    /// Sample a uniformly random allowed value, `None` if no bit is set.
    pub fn sample(&self, rng: &mut impl Rng) -> Option<u8> {
        let set: Vec<u8> = (0..self.width).filter(|v| self.bits & (1u64 << v) != 0).collect();
        if set.is_empty() {
            None
        } else {
            Some(set[rng.gen_range(0, set.len())])
        }
    }
}
