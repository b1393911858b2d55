// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    block::{Block, BlockStatus},
    pager::{IpPoolView, ViewConfig},
    strings::*,
    virtualizer::count,
    PoolError,
};
use ipnet::IpNet;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// An IP pool as the backend describes it. Unknown fields are ignored.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct Network {
    pub network: IpNet,
    #[serde(default)]
    pub ipv6: bool,
    /// free host count as reported by the backend
    #[serde(default)]
    pub free_hosts: Option<u64>,
    /// node the pool is pinned to, if any
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Network {
    /// Paged view over this pool's addresses.
    pub fn ips(&self, config: ViewConfig) -> IpPoolView {
        IpPoolView::new(self.blocks.clone(), config)
    }

    /// Number of addresses in blocks with the given status.
    pub fn count_status(&self, status: &BlockStatus) -> u64 {
        self.blocks
            .iter()
            .filter(|b| &b.status == status)
            .map(Block::len)
            .sum()
    }

    /// Total addresses of the pool, blocked ones included.
    pub fn total_hosts(&self) -> u64 {
        count(&self.blocks, true)
    }
}

/* ---------------------------------- */

/// Parse a list of pools, bare or wrapped in a `{"status", "data"}` envelope.
pub fn parse_networks(json: &str) -> Result<Vec<Network>, PoolError> {
    let networks: Vec<Network> = serde_json::from_value(unwrap_envelope(json)?)?;
    debug!("parsed {} IP pools", networks.len());
    Ok(networks)
}

/// Parse a single pool, bare or wrapped in a `{"status", "data"}` envelope.
pub fn parse_network(json: &str) -> Result<Network, PoolError> {
    let network: Network = serde_json::from_value(unwrap_envelope(json)?)?;
    debug!("parsed IP pool {} with {} blocks", network.network, network.blocks.len());
    Ok(network)
}

/// Strip the response envelope if there is one. A non-OK status is an error.
fn unwrap_envelope(json: &str) -> Result<Value, PoolError> {
    let mut value: Value = serde_json::from_str(json)?;

    if let Value::Object(map) = &mut value {
        let status: Option<String> = match map.get("status") {
            Some(Value::String(s)) if map.contains_key("data") => Some(s.clone()),
            _ => None,
        };
        if let Some(status) = status {
            if status != STATUS_OK {
                return Err(PoolError::Envelope(status));
            }
            return Ok(map.remove("data").unwrap_or(Value::Null));
        }
    }
    Ok(value)
}

/* -------------------------------------------------------------------------- */
