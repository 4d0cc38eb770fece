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

//! The validation service: probe synthesis, rule injection, dispatch, acknowledgment and retry.

use super::job::ValidationJob;
use super::registry::{ProbeKey, ProbeRegistry};
use crate::flowspace::FlowSpace;
use crate::packet::{
    EtherPayload, EthernetFrame, IcmpMessage, Ipv4Packet, Ipv4Payload, TcpSegment, UdpDatagram,
    VlanTag, ETHERTYPE_IPV4, ETHERTYPE_VLAN, IPPROTO_ICMP, IPPROTO_TCP, IPPROTO_UDP,
};
use crate::switch::{
    wildcards, PacketInAction, PortInfo, RuleTranslation, SwitchProvider, TransientRule,
};
use crate::types::{Link, MacAddress, PortId, SwitchId, SwitchPort};
use log::*;
use std::collections::HashMap;
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Number of redispatch rounds granted to a job before it is abandoned.
pub const MAX_RETRIES: u32 = 3;
/// Interval between redispatch passes of the [`RetryDriver`].
pub const RETRY_INTERVAL: Duration = Duration::from_millis(200);

const RULE_IDLE_TIMEOUT: u16 = 5;
const RULE_HARD_TIMEOUT: u16 = 0;

const FALLBACK_DST_MAC: MacAddress = MacAddress::new([0x01, 0x80, 0xc2, 0x12, 0x34, 0x56]);
const FALLBACK_NW_SRC: Ipv4Addr = Ipv4Addr::new(10, 1, 1, 1);
const FALLBACK_NW_DST: Ipv4Addr = Ipv4Addr::new(10, 1, 1, 2);
const FALLBACK_TP_SRC: u16 = 8;
const FALLBACK_TP_DST: u16 = 14;

/// Rule translation tables by link, as supplied by the topology layer.
pub type RuleTables = HashMap<Link, Box<dyn RuleTranslation + Send + Sync>>;

/// One dispatched probe whose acknowledgment is still outstanding, kept so the retry pass can
/// redispatch the identical probe.
#[derive(Debug)]
struct PendingProbe {
    job: Arc<ValidationJob>,
    link: Link,
    /// destination attachment point plus the rewritten bytes the probe must arrive with
    key: ProbeKey,
    /// the original bytes emitted from the source port
    packet: Vec<u8>,
    wildcards: u32,
}

/// Orchestrates active topology validation: synthesizes policy-compliant probes, injects
/// transient redirect rules at the far end of each link, fires the probes, and correlates the
/// returning packets against outstanding probes, with bounded retries per job.
///
/// Three actors touch the service concurrently: callers of the `validate_*` entry points, the
/// packet-in event path ([`handle_packet_in`](Self::handle_packet_in)), and the retry pass
/// ([`retry_tick`](Self::retry_tick), usually driven by a [`RetryDriver`]).
pub struct ValidationService<S> {
    switches: Arc<S>,
    registry: Arc<ProbeRegistry>,
    pending: Mutex<Vec<PendingProbe>>,
}

impl<S> fmt::Debug for ValidationService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationService")
            .field("outstanding_probes", &self.registry.len())
            .finish()
    }
}

impl<S: SwitchProvider> ValidationService<S> {
    /// Create a validation service over the given switches and probe registry.
    pub fn new(switches: Arc<S>, registry: Arc<ProbeRegistry>) -> Self {
        Self { switches, registry, pending: Mutex::new(Vec::new()) }
    }

    /// The probe registry this service correlates against.
    pub fn registry(&self) -> &Arc<ProbeRegistry> {
        &self.registry
    }

    /// Validate a single link. With `complete_flowspace_known` the static metadata is trusted and
    /// an already-satisfied job is returned without probing. Returns `None` if the probe could
    /// not be dispatched.
    pub fn validate_link(
        &self,
        link: &Link,
        table: Option<&dyn RuleTranslation>,
        complete_flowspace_known: bool,
    ) -> Option<Arc<ValidationJob>> {
        let job = Arc::new(ValidationJob::new());
        if complete_flowspace_known {
            return Some(job);
        }
        job.update_expected(1);
        job.mark_in_progress();
        if !self.dispatch_probe(link, table, &job) {
            self.abort_job(&job);
            return None;
        }
        Some(job)
    }

    /// Validate a multi-hop path, given as its ordered sequence of links. Dispatch is
    /// all-or-nothing: if any link's probe cannot be dispatched, every probe already registered
    /// for this job is unregistered and `None` is returned.
    pub fn validate_path(
        &self,
        path: &[Link],
        tables: &RuleTables,
        complete_flowspace_known: bool,
    ) -> Option<Arc<ValidationJob>> {
        self.validate_batch(path, tables, complete_flowspace_known)
    }

    /// Validate a set of links forming a topology. Same all-or-nothing dispatch semantics as
    /// [`validate_path`](Self::validate_path).
    pub fn validate_topology(
        &self,
        links: &[Link],
        tables: &RuleTables,
        complete_flowspace_known: bool,
    ) -> Option<Arc<ValidationJob>> {
        self.validate_batch(links, tables, complete_flowspace_known)
    }

    fn validate_batch(
        &self,
        links: &[Link],
        tables: &RuleTables,
        complete_flowspace_known: bool,
    ) -> Option<Arc<ValidationJob>> {
        let job = Arc::new(ValidationJob::new());
        if complete_flowspace_known {
            return Some(job);
        }
        job.update_expected(links.len());
        job.mark_in_progress();
        for link in links {
            let table = tables.get(link).map(|t| t.as_ref() as &dyn RuleTranslation);
            if !self.dispatch_probe(link, table, &job) {
                self.abort_job(&job);
                return None;
            }
        }
        Some(job)
    }

    /// Handler for inbound packet-in events. If the packet matches an outstanding probe, the
    /// probe is confirmed and the event is consumed (it is synthetic, not user traffic);
    /// otherwise the event passes through to later listeners.
    pub fn handle_packet_in(
        &self,
        switch: SwitchId,
        in_port: PortId,
        packet: &[u8],
    ) -> PacketInAction {
        let key = ProbeKey::new(switch, in_port, packet.to_vec());
        match self.registry.acknowledge(&key) {
            Some(job) => {
                trace!("probe acknowledged at {}:{}", switch, in_port);
                self.pending.lock().unwrap().retain(|p| p.key != key);
                job.confirm_one();
                if job.is_satisfied() {
                    debug!("validation job satisfied");
                    job.complete();
                }
                PacketInAction::Stop
            }
            None => PacketInAction::Continue,
        }
    }

    /// One retry pass: every job with outstanding probes gets its retry counter bumped and either
    /// its probes redispatched or, once the counter exceeds [`MAX_RETRIES`], the job abandoned
    /// (its probes unregistered, its waiters woken with a failure).
    pub fn retry_tick(&self) {
        let mut pending = self.pending.lock().unwrap();
        // entries of jobs that completed or were torn down elsewhere are stale
        pending.retain(|p| p.job.in_progress());

        let mut jobs: Vec<Arc<ValidationJob>> = Vec::new();
        for probe in pending.iter() {
            if !jobs.iter().any(|j| Arc::ptr_eq(j, &probe.job)) {
                jobs.push(probe.job.clone());
            }
        }

        for job in jobs {
            job.increment_retry();
            if job.retry_count() > MAX_RETRIES {
                debug!("abandoning validation job after {} redispatch rounds", MAX_RETRIES);
                self.registry.unregister_job(&job);
                pending.retain(|p| !Arc::ptr_eq(&p.job, &job));
                job.abandon();
            } else {
                for probe in pending.iter().filter(|p| Arc::ptr_eq(&p.job, &job)) {
                    self.redispatch(probe);
                }
            }
        }
    }

    fn redispatch(&self, probe: &PendingProbe) {
        debug!("redispatching probe on link {}", probe.link);
        let rule = TransientRule {
            in_port: probe.link.dst.port,
            match_packet: probe.key.packet.clone(),
            wildcards: probe.wildcards,
            idle_timeout: RULE_IDLE_TIMEOUT,
            hard_timeout: RULE_HARD_TIMEOUT,
        };
        if let Err(e) = self.switches.install_transient_rule(probe.link.dst.switch, rule) {
            error!("failure writing transient rule: {}", e);
            return;
        }
        if let Err(e) =
            self.switches.send_packet_out(probe.link.src.switch, probe.link.src.port, &probe.packet)
        {
            error!("failure writing packet out: {}", e);
        }
    }

    /// Dispatch one probe over a link. Returns false if the probe cannot be dispatched at all
    /// (endpoint not eligible for discovery, no packet synthesizable, rule injection failed).
    fn dispatch_probe(
        &self,
        link: &Link,
        table: Option<&dyn RuleTranslation>,
        job: &Arc<ValidationJob>,
    ) -> bool {
        debug!("validating random flowspace on link {}", link);

        let src_info = match self.discovery_allowed(link.src) {
            Some(info) => info,
            None => {
                debug!("source port of link {} is not eligible for discovery", link);
                return false;
            }
        };
        if self.discovery_allowed(link.dst).is_none() {
            debug!("destination port of link {} is not eligible for discovery", link);
            return false;
        }

        let probe = match src_info.egress_flowspace {
            Some(flowspace) => match synthesize_probe(link.src.switch, &flowspace) {
                Some(probe) => probe,
                None => return false,
            },
            None => default_probe(link.src.switch),
        };
        trace!("generated probe {:?}", probe);

        let packet = probe.serialize();
        let rewritten = match table {
            Some(table) => table.rewrite(&packet),
            None => packet.clone(),
        };

        let wildcard_mask = self.match_wildcards(link.dst.switch);
        let rule = TransientRule {
            in_port: link.dst.port,
            match_packet: rewritten.clone(),
            wildcards: wildcard_mask,
            idle_timeout: RULE_IDLE_TIMEOUT,
            hard_timeout: RULE_HARD_TIMEOUT,
        };
        if let Err(e) = self.switches.install_transient_rule(link.dst.switch, rule) {
            error!("failure writing transient rule: {}", e);
            return false;
        }

        let key = ProbeKey::new(link.dst.switch, link.dst.port, rewritten);
        self.registry.register(key.clone(), job.clone());
        self.pending.lock().unwrap().push(PendingProbe {
            job: job.clone(),
            link: *link,
            key,
            packet: packet.clone(),
            wildcards: wildcard_mask,
        });

        trace!("pushing probe towards {}", link.dst);
        if let Err(e) = self.switches.send_packet_out(link.src.switch, link.src.port, &packet) {
            // the probe stays registered; the next retry pass resends it
            error!("failure writing packet out: {}", e);
        }
        true
    }

    /// Tear a job out of the registry and the pending list, after a batch dispatch aborts.
    fn abort_job(&self, job: &Arc<ValidationJob>) {
        self.registry.unregister_job(job);
        self.pending.lock().unwrap().retain(|p| !Arc::ptr_eq(&p.job, job));
        job.reset();
    }

    /// A port is eligible for probing if its switch is connected, the port exists, it is not the
    /// administratively local port, and discovery is enabled on it.
    fn discovery_allowed(&self, port: SwitchPort) -> Option<PortInfo> {
        if port.port.is_local() {
            return None;
        }
        let info = self.switches.port(port.switch, port.port)?;
        if !info.discovery_enabled {
            return None;
        }
        Some(info)
    }

    /// Wildcard mask for a probe match: everything the switch can wildcard, minus the fields the
    /// match pins down (ingress port, MACs, addresses). VLAN stays wildcarded so tagged and
    /// untagged arrivals both hit the rule.
    fn match_wildcards(&self, switch: SwitchId) -> u32 {
        let capabilities = self.switches.wildcard_capabilities(switch);
        (capabilities
            & !wildcards::IN_PORT
            & !wildcards::DL_SRC
            & !wildcards::DL_DST
            & !wildcards::NW_SRC_MASK
            & !wildcards::NW_DST_MASK)
            | wildcards::DL_VLAN
    }
}

/// Synthesize a probe packet satisfying the given flow space. Every field is drawn by bounded
/// random sampling; fields without a discoverable permitted value fall back to the fixed probe
/// template (IPv4/TCP, `10.1.1.1 -> 10.1.1.2`, ports 8/14). Returns `None` if the sampled
/// ethertype is one no probe can be built for.
pub fn synthesize_probe(src_switch: SwitchId, flowspace: &FlowSpace) -> Option<EthernetFrame> {
    match flowspace.random_dl_type().unwrap_or(ETHERTYPE_IPV4) {
        ETHERTYPE_IPV4 => Some(ipv4_probe(src_switch, flowspace, None)),
        ETHERTYPE_VLAN => {
            let vlan = match flowspace.random_dl_vlan() {
                Some(vid) => {
                    Some(VlanTag { vid, pcp: flowspace.random_vlan_pcp().unwrap_or(0) })
                }
                None => {
                    debug!("no permitted vlan discovered, probing untagged");
                    None
                }
            };
            Some(ipv4_probe(src_switch, flowspace, vlan))
        }
        other => {
            debug!("cannot synthesize a probe for ethertype {:#06x}", other);
            None
        }
    }
}

fn ipv4_probe(src_switch: SwitchId, flowspace: &FlowSpace, vlan: Option<VlanTag>) -> EthernetFrame {
    let src = flowspace.random_dl_src().unwrap_or_else(|| MacAddress::from_u64(src_switch.0));
    let dst = flowspace.random_dl_dst().unwrap_or(FALLBACK_DST_MAC);

    let protocol = flowspace.random_nw_proto().unwrap_or(IPPROTO_TCP);
    let payload = match protocol {
        IPPROTO_TCP => Ipv4Payload::Tcp(TcpSegment {
            src_port: flowspace.random_tp_src().unwrap_or(FALLBACK_TP_SRC),
            dst_port: flowspace.random_tp_dst().unwrap_or(FALLBACK_TP_DST),
        }),
        IPPROTO_UDP => Ipv4Payload::Udp(UdpDatagram {
            src_port: flowspace.random_tp_src().unwrap_or(FALLBACK_TP_SRC),
            dst_port: flowspace.random_tp_dst().unwrap_or(FALLBACK_TP_DST),
        }),
        IPPROTO_ICMP => Ipv4Payload::Icmp(IcmpMessage::echo_request()),
        other => {
            debug!("no payload template for network protocol {}", other);
            Ipv4Payload::Raw { protocol: other, data: Vec::new() }
        }
    };

    EthernetFrame {
        dst,
        src,
        vlan,
        payload: EtherPayload::Ipv4(Ipv4Packet {
            tos: flowspace.random_nw_tos().unwrap_or(0),
            ttl: 255,
            src: flowspace.random_nw_src().unwrap_or(FALLBACK_NW_SRC),
            dst: flowspace.random_nw_dst().unwrap_or(FALLBACK_NW_DST),
            payload,
        }),
    }
}

/// The fixed probe template used when a source port has no flow space configured at all.
pub fn default_probe(src_switch: SwitchId) -> EthernetFrame {
    EthernetFrame {
        dst: FALLBACK_DST_MAC,
        src: MacAddress::from_u64(src_switch.0),
        vlan: None,
        payload: EtherPayload::Ipv4(Ipv4Packet {
            tos: 0,
            ttl: 255,
            src: FALLBACK_NW_SRC,
            dst: FALLBACK_NW_DST,
            payload: Ipv4Payload::Tcp(TcpSegment {
                src_port: FALLBACK_TP_SRC,
                dst_port: FALLBACK_TP_DST,
            }),
        }),
    }
}

/// Background thread invoking [`ValidationService::retry_tick`] at a fixed interval, standing in
/// for the host controller's scheduled executor. The thread stops when the driver is dropped.
#[derive(Debug)]
pub struct RetryDriver {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RetryDriver {
    /// Spawn a retry thread over the given service, ticking every `interval`.
    pub fn spawn<S>(service: Arc<ValidationService<S>>, interval: Duration) -> Self
    where
        S: SwitchProvider + Send + Sync + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let handle = thread::spawn(move || loop {
            thread::park_timeout(interval);
            if stop_flag.load(Ordering::Relaxed) {
                break;
            }
            service.retry_tick();
        });
        Self { stop, handle: Some(handle) }
    }

    /// Stop the retry thread and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

impl Drop for RetryDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}
