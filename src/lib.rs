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

//! # FlowProbe
//!
//! FlowProbe checks that the links an OpenFlow controller believes exist actually forward the
//! traffic they are supposed to. It combines two parts:
//!
//! - A [flow space](crate::flowspace) model: per port and direction, which header field values
//!   are permitted to cross. Flow spaces are built programmatically or ingested from textual
//!   descriptors ([`flowspace::parse_flowspace`]), and can be sampled for a random permitted
//!   packet.
//! - An active [validation](crate::validation) protocol: for every link under test, draw a
//!   policy-compliant probe packet from the source port's flow space, install a transient
//!   send-to-controller rule at the far end, fire the probe, and match the returning packet-in
//!   against the expectation. Outstanding probes are retried a bounded number of times before
//!   the request is declared failed.
//!
//! The crate is controller-agnostic: everything it needs from the surrounding controller is the
//! [`switch::SwitchProvider`] trait plus a hook delivering packet-in events to
//! [`validation::ValidationService::handle_packet_in`].
//!
//! ## Example
//!
//! Ingest a descriptor covering TCP traffic from `10.0.0.0/24` and check membership:
//!
//! ```
//! use flowprobe::flowspace::parse_flowspace;
//! use std::net::Ipv4Addr;
//!
//! # fn main() -> Result<(), flowprobe::Error> {
//! // network source 10.0.0.0/24, protocol tcp, destination port 80
//! let flowspace = parse_flowspace("167772160/136-159 ^ 6/128-135 ^ 80/216-231")?;
//!
//! assert!(flowspace.verify_nw_src(Ipv4Addr::new(10, 0, 0, 7)));
//! assert!(!flowspace.verify_nw_src(Ipv4Addr::new(10, 0, 1, 7)));
//! assert!(flowspace.verify_nw_proto(6));
//! assert!(flowspace.verify_tp_dst(80));
//!
//! // sampling draws a permitted value, if one is discoverable
//! assert_eq!(flowspace.random_tp_dst(), Some(80));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs, missing_debug_implementations)]

pub mod flowspace;
pub mod packet;
pub mod switch;
pub mod types;
pub mod validation;

mod error;
pub use error::Error;

// test modules
mod test;
