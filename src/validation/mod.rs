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

//! Active topology validation: send policy-compliant probe packets over the links to confirm,
//! and correlate the probes coming back.
//!
//! A validation request (one link, a path, or a whole topology) becomes a [`ValidationJob`]. For
//! every link the [`ValidationService`] draws a random permitted packet from the source port's
//! flow space, installs a transient send-to-controller rule at the far end, fires the packet, and
//! registers the expected arrival in the [`ProbeRegistry`]. Packet-in events are matched against
//! the registry; each hit confirms one probe and is consumed. A [`RetryDriver`] (or a manual
//! [`retry_tick`](ValidationService::retry_tick)) redispatches probes still outstanding, up to
//! [`MAX_RETRIES`] rounds, after which the job is abandoned and its waiters woken.

mod job;
mod registry;
mod service;

pub use job::{JobStatus, ValidationJob};
pub use registry::{ProbeKey, ProbeRegistry};
pub use service::{
    default_probe, synthesize_probe, RetryDriver, RuleTables, ValidationService, MAX_RETRIES,
    RETRY_INTERVAL,
};
