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

//! Module containing all error types

use crate::flowspace::DescriptorError;
use crate::packet::PacketError;
use crate::switch::SwitchError;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// A flow-space descriptor could not be parsed
    #[error("Malformed flow-space descriptor: {0}")]
    DescriptorError(#[from] DescriptorError),
    /// A packet could not be deserialized
    #[error("Packet Error: {0}")]
    PacketError(#[from] PacketError),
    /// A switch operation failed
    #[error("Switch Error: {0}")]
    SwitchError(#[from] SwitchError),
}
