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

//! Per-field policy maps and the shared bounded random sampler.

use rand::Rng;
use std::collections::HashMap;
use std::hash::Hash;

/// Maximum number of uniform draws the random samplers make before giving up. A `None` from a
/// sampler therefore means "no permitted value was discovered", not "no permitted value exists".
pub const MAX_SAMPLE_ATTEMPTS: usize = 5;

/// Verdict stored for an explicit flow-space entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Traffic matching the entry may cross the port
    Allowed,
    /// Traffic matching the entry must not cross the port
    Blocked,
}

impl Policy {
    /// Returns true if the policy permits traffic.
    pub fn allows(self) -> bool {
        matches!(self, Policy::Allowed)
    }
}

/// Explicit per-value policy entries for one header field, keyed by the field's value type.
/// Queries return `None` when no explicit entry exists, letting the owning flow space apply its
/// default policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyMap<K: Eq + Hash + Copy> {
    entries: HashMap<K, Policy>,
}

impl<K: Eq + Hash + Copy> PolicyMap<K> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Look up the explicit policy for a value.
    pub fn verify(&self, key: &K) -> Option<Policy> {
        self.entries.get(key).copied()
    }

    /// Insert an explicit Allowed entry for a value.
    pub fn add(&mut self, key: K) {
        self.entries.insert(key, Policy::Allowed);
    }

    /// Insert an explicit Blocked entry for a value.
    pub fn block(&mut self, key: K) {
        self.entries.insert(key, Policy::Blocked);
    }

    /// Remove the explicit entry for a value, if any.
    pub fn remove(&mut self, key: &K) {
        self.entries.remove(key);
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sample an Allowed value, drawing uniformly over the explicit entries at most
    /// [`MAX_SAMPLE_ATTEMPTS`] times.
    pub fn sample_allowed(&self, rng: &mut impl Rng) -> Option<K> {
        sample_allowed(&self.entries, rng)
    }
}

/// The one bounded sampler behind every `random*` operation: draw a uniformly random entry up to
/// [`MAX_SAMPLE_ATTEMPTS`] times and return the first one whose policy is Allowed.
pub(crate) fn sample_allowed<K: Copy, R: Rng>(entries: &HashMap<K, Policy>, rng: &mut R) -> Option<K> {
    if entries.is_empty() {
        return None;
    }
    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        let idx = rng.gen_range(0, entries.len());
        if let Some((key, policy)) = entries.iter().nth(idx) {
            if policy.allows() {
                return Some(*key);
            }
        }
    }
    None
}
