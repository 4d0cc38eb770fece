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

//! The concurrent mapping from expected probe arrivals to their owning jobs. The registry is an
//! injected collaborator of the validation service (never process-wide state), so isolated
//! services can run side by side in tests.

use super::job::ValidationJob;
use crate::types::{PortId, SwitchId, SwitchPort};
use dashmap::DashMap;
use std::sync::Arc;

/// Identity of one outstanding probe: where the probe is expected to arrive and the exact bytes
/// it is expected to carry (after any cross-link rewrite). Equality is structural over all three
/// coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProbeKey {
    /// the attachment point the probe should arrive at
    pub port: SwitchPort,
    /// the packet bytes the probe should arrive with
    pub packet: Vec<u8>,
}

impl ProbeKey {
    /// Create a probe key.
    pub fn new(switch: SwitchId, port: PortId, packet: Vec<u8>) -> Self {
        Self { port: SwitchPort::new(switch, port), packet }
    }
}

/// Thread-safe registry of outstanding probes. Insertion happens on dispatch, removal on
/// acknowledgment or when a job is torn down; all three can race.
#[derive(Debug, Default)]
pub struct ProbeRegistry {
    probes: DashMap<ProbeKey, Arc<ValidationJob>>,
}

impl ProbeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an outstanding probe for a job.
    pub fn register(&self, key: ProbeKey, job: Arc<ValidationJob>) {
        self.probes.insert(key, job);
    }

    /// Remove a probe and return its owning job, if the probe was outstanding.
    pub fn acknowledge(&self, key: &ProbeKey) -> Option<Arc<ValidationJob>> {
        self.probes.remove(key).map(|(_, job)| job)
    }

    /// Remove every probe registered for the given job.
    pub fn unregister_job(&self, job: &Arc<ValidationJob>) {
        self.probes.retain(|_, registered| !Arc::ptr_eq(registered, job));
    }

    /// Number of outstanding probes.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Returns true if no probe is outstanding.
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}
