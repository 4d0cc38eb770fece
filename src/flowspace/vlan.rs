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

//! VLAN-id policy as a sorted set of disjoint, tagged intervals.

use super::policy::{Policy, MAX_SAMPLE_ATTEMPTS};
use itertools::Itertools;
use rand::Rng;

/// An inclusive range of VLAN identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VlanRange {
    /// first VLAN id of the range
    pub start: u16,
    /// last VLAN id of the range (inclusive)
    pub end: u16,
}

impl VlanRange {
    /// Create a range covering `[start, end]`. The bounds are reordered if given backwards.
    pub fn new(start: u16, end: u16) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// Create a range containing a single VLAN id.
    pub fn single(vid: u16) -> Self {
        Self { start: vid, end: vid }
    }

    /// Create a range of `len` ids starting at `start`. A `len` of 0 is treated as 1.
    pub fn with_len(start: u16, len: u16) -> Self {
        Self { start, end: start.saturating_add(len.saturating_sub(1)) }
    }

    /// Returns true if `vid` lies within the range.
    pub fn contains(&self, vid: u16) -> bool {
        self.start <= vid && vid <= self.end
    }

    /// Returns true if the two ranges share at least one id.
    pub fn overlaps(&self, other: &VlanRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// VLAN-id policy: a set of disjoint intervals, each tagged Allowed or Blocked, kept sorted by
/// their start. Inserting an interval that overlaps existing ones splits those into their
/// non-overlapping remainders first (which keep their original policy), so the set is disjoint
/// after every operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VlanPolicy {
    intervals: Vec<(VlanRange, Policy)>,
}

impl VlanPolicy {
    /// Create an empty policy.
    pub fn new() -> Self {
        Self { intervals: Vec::new() }
    }

    /// Insert an interval with the given policy. Overlapping intervals are split iteratively:
    /// every stored interval touching `range` is removed and its parts outside `range` are
    /// re-inserted with their old policy before `range` itself is stored.
    pub fn insert(&mut self, range: VlanRange, policy: Policy) {
        let mut remainders: Vec<(VlanRange, Policy)> = Vec::new();
        self.intervals.retain(|(stored, stored_policy)| {
            if !stored.overlaps(&range) {
                return true;
            }
            if stored.start < range.start {
                remainders.push((VlanRange::new(stored.start, range.start - 1), *stored_policy));
            }
            if stored.end > range.end {
                remainders.push((VlanRange::new(range.end + 1, stored.end), *stored_policy));
            }
            false
        });
        self.intervals.extend(remainders);
        self.intervals.push((range, policy));
        self.intervals.sort_by_key(|(r, _)| r.start);
        debug_assert!(self.is_disjoint());
    }

    /// Remove the entry for exactly this interval. Partially matching intervals are untouched.
    pub fn remove(&mut self, range: &VlanRange) {
        self.intervals.retain(|(stored, _)| stored != range);
    }

    /// Look up the explicit policy covering a VLAN id.
    pub fn verify(&self, vid: u16) -> Option<Policy> {
        self.intervals.iter().find(|(r, _)| r.contains(vid)).map(|(_, p)| *p)
    }

    /// Sample a VLAN id out of an Allowed interval, drawing uniformly over the stored intervals
    /// at most [`MAX_SAMPLE_ATTEMPTS`] times, then uniformly within the chosen interval.
    pub fn sample(&self, rng: &mut impl Rng) -> Option<u16> {
        if self.intervals.is_empty() {
            return None;
        }
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let (range, policy) = self.intervals[rng.gen_range(0, self.intervals.len())];
            if policy.allows() {
                return Some(rng.gen_range(u32::from(range.start), u32::from(range.end) + 1) as u16);
            }
        }
        None
    }

    /// Iterate over the stored intervals in ascending order.
    pub fn intervals(&self) -> impl Iterator<Item = &(VlanRange, Policy)> {
        self.intervals.iter()
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns true if no interval is stored.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns true if all stored intervals are pairwise disjoint. This holds after every
    /// mutation; it is checked in tests and debug builds.
    pub fn is_disjoint(&self) -> bool {
        self.intervals.iter().tuple_windows().all(|((a, _), (b, _))| a.end < b.start)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn insert_disjoint() {
        let mut p = VlanPolicy::new();
        p.insert(VlanRange::new(10, 20), Policy::Allowed);
        p.insert(VlanRange::new(30, 40), Policy::Blocked);
        assert_eq!(p.len(), 2);
        assert!(p.is_disjoint());
        assert_eq!(p.verify(15), Some(Policy::Allowed));
        assert_eq!(p.verify(35), Some(Policy::Blocked));
        assert_eq!(p.verify(25), None);
    }

    #[test]
    fn overlap_splits_previous_interval() {
        let mut p = VlanPolicy::new();
        p.insert(VlanRange::new(10, 30), Policy::Allowed);
        p.insert(VlanRange::new(15, 20), Policy::Blocked);
        assert!(p.is_disjoint());
        // remainders keep the original policy
        assert_eq!(p.verify(10), Some(Policy::Allowed));
        assert_eq!(p.verify(14), Some(Policy::Allowed));
        assert_eq!(p.verify(15), Some(Policy::Blocked));
        assert_eq!(p.verify(20), Some(Policy::Blocked));
        assert_eq!(p.verify(21), Some(Policy::Allowed));
        assert_eq!(p.verify(30), Some(Policy::Allowed));
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn overlap_covering_multiple_intervals() {
        let mut p = VlanPolicy::new();
        p.insert(VlanRange::new(1, 5), Policy::Allowed);
        p.insert(VlanRange::new(8, 12), Policy::Blocked);
        p.insert(VlanRange::new(20, 25), Policy::Allowed);
        p.insert(VlanRange::new(4, 22), Policy::Allowed);
        assert!(p.is_disjoint());
        assert_eq!(p.verify(3), Some(Policy::Allowed));
        assert_eq!(p.verify(10), Some(Policy::Allowed));
        assert_eq!(p.verify(23), Some(Policy::Allowed));
    }

    #[test]
    fn adversarial_overlap_sequence_stays_disjoint() {
        let mut p = VlanPolicy::new();
        for i in 0..200u16 {
            let start = (i * 7) % 500;
            let range = VlanRange::with_len(start, (i % 13) + 1);
            let policy = if i % 2 == 0 { Policy::Allowed } else { Policy::Blocked };
            p.insert(range, policy);
            assert!(p.is_disjoint());
        }
    }

    #[test]
    fn remove_exact_interval_only() {
        let mut p = VlanPolicy::new();
        p.insert(VlanRange::new(10, 20), Policy::Allowed);
        p.remove(&VlanRange::new(10, 15));
        assert_eq!(p.len(), 1);
        p.remove(&VlanRange::new(10, 20));
        assert!(p.is_empty());
    }

    #[test]
    fn sample_within_allowed_interval() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = VlanPolicy::new();
        p.insert(VlanRange::new(100, 199), Policy::Allowed);
        for _ in 0..100 {
            let vid = p.sample(&mut rng).expect("an allowed interval exists");
            assert!((100..=199).contains(&vid));
        }
    }

    #[test]
    fn sample_none_when_all_blocked() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = VlanPolicy::new();
        p.insert(VlanRange::new(100, 199), Policy::Blocked);
        for _ in 0..20 {
            assert_eq!(p.sample(&mut rng), None);
        }
    }
}
