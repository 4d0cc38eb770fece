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

//! The per-request counting and retry state machine.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// Observable state of a [`ValidationJob`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Probes are outstanding
    InProgress,
    /// Every expected acknowledgment arrived
    Satisfied,
    /// The retry budget was exhausted; the request failed
    Abandoned,
}

#[derive(Debug, Default)]
struct JobState {
    expected: usize,
    confirmed: usize,
    retries: u32,
    in_progress: bool,
    abandoned: bool,
}

/// One in-flight batch validation request: how many probe acknowledgments are expected, how many
/// arrived, and how often the batch was redispatched. All counter mutation is serialized on the
/// job's own lock. The `in_progress` flag gates confirmation: an acknowledgment arriving after
/// [`complete`](Self::complete) or [`reset`](Self::reset) is silently discarded, so a stale probe
/// from an abandoned round cannot credit a freshly restarted one.
#[derive(Debug, Default)]
pub struct ValidationJob {
    state: Mutex<JobState>,
    done: Condvar,
}

impl ValidationJob {
    /// Create a job with no expected acknowledgments. Such a job is trivially satisfied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to the expected-acknowledgment count.
    pub fn update_expected(&self, count: usize) {
        let mut state = self.state.lock().unwrap();
        state.expected += count;
    }

    /// Record one acknowledgment. Ignored unless the job is in progress.
    pub fn confirm_one(&self) {
        let mut state = self.state.lock().unwrap();
        if state.in_progress {
            state.confirmed += 1;
        }
    }

    /// Returns true if every expected acknowledgment arrived.
    pub fn is_satisfied(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.confirmed == state.expected
    }

    /// Mark the job finished and wake all waiters. Called once the job is satisfied.
    pub fn complete(&self) {
        let mut state = self.state.lock().unwrap();
        state.in_progress = false;
        self.done.notify_all();
    }

    /// Mark the job as having outstanding probes. Called when (re)starting a dispatch round.
    pub fn mark_in_progress(&self) {
        let mut state = self.state.lock().unwrap();
        state.in_progress = true;
    }

    /// Returns true if the job has outstanding probes.
    pub fn in_progress(&self) -> bool {
        self.state.lock().unwrap().in_progress
    }

    /// Count one redispatch round.
    pub fn increment_retry(&self) {
        let mut state = self.state.lock().unwrap();
        state.retries += 1;
    }

    /// Number of redispatch rounds so far.
    pub fn retry_count(&self) -> u32 {
        self.state.lock().unwrap().retries
    }

    /// Zero all counters and clear the in-progress flag.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        state.expected = 0;
        state.confirmed = 0;
        state.retries = 0;
        state.in_progress = false;
    }

    /// Give up on the job: reset it, mark it abandoned and wake all waiters.
    pub fn abandon(&self) {
        let mut state = self.state.lock().unwrap();
        state.expected = 0;
        state.confirmed = 0;
        state.retries = 0;
        state.in_progress = false;
        state.abandoned = true;
        self.done.notify_all();
    }

    /// Current status of the job.
    pub fn status(&self) -> JobStatus {
        let state = self.state.lock().unwrap();
        Self::status_of(&state)
    }

    fn status_of(state: &JobState) -> JobStatus {
        if state.abandoned {
            JobStatus::Abandoned
        } else if state.confirmed == state.expected {
            JobStatus::Satisfied
        } else {
            JobStatus::InProgress
        }
    }

    /// Block until the job is satisfied or abandoned.
    pub fn wait(&self) -> JobStatus {
        let mut state = self.state.lock().unwrap();
        loop {
            match Self::status_of(&state) {
                JobStatus::InProgress => state = self.done.wait(state).unwrap(),
                status => return status,
            }
        }
    }

    /// Block until the job is satisfied or abandoned, or until the timeout elapses. Returns
    /// [`JobStatus::InProgress`] on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> JobStatus {
        let deadline = std::time::Instant::now() + timeout;
        let mut state = self.state.lock().unwrap();
        loop {
            match Self::status_of(&state) {
                JobStatus::InProgress => {
                    let now = std::time::Instant::now();
                    if now >= deadline {
                        return JobStatus::InProgress;
                    }
                    let (guard, _) = self.done.wait_timeout(state, deadline - now).unwrap();
                    state = guard;
                }
                status => return status,
            }
        }
    }
}
