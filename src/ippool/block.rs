// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{strings::*, PoolError};
use ipnet::IpNet;
use serde::{
    de::{self, IgnoredAny, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use std::fmt;

/// Allocation state of a block and of every address in it.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockStatus {
    Free,
    Busy,
    Blocked,
    /// any status string the backend sends that we don't know about
    Other(String),
}

impl BlockStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BlockStatus::Free => STATUS_FREE,
            BlockStatus::Busy => STATUS_BUSY,
            BlockStatus::Blocked => STATUS_BLOCKED,
            BlockStatus::Other(s) => s,
        }
    }

    #[inline]
    pub fn is_blocked(&self) -> bool {
        matches!(self, BlockStatus::Blocked)
    }
}

impl From<&str> for BlockStatus {
    fn from(s: &str) -> Self {
        match s {
            s if s == STATUS_FREE => BlockStatus::Free,
            s if s == STATUS_BUSY => BlockStatus::Busy,
            s if s == STATUS_BLOCKED => BlockStatus::Blocked,
            other => BlockStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for BlockStatus {
    fn from(s: String) -> Self {
        BlockStatus::from(s.as_str())
    }
}

impl From<BlockStatus> for String {
    fn from(status: BlockStatus) -> Self {
        match status {
            BlockStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/* -------------------------------------------------------------------------- */

/// Addresses covered by a single [Block].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BlockSpan {
    /// Inclusive numeric IPv4 range.
    Range { beg: u32, end: u32 },
    /// Single entry identified by a host name instead of an address
    /// (cloud providers hand out hostnames rather than IPs).
    Host(String),
}

/// A contiguous run of addresses sharing one status and assignment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Block {
    pub span: BlockSpan,
    pub status: BlockStatus,
    pub pod_name: Option<String>,
    pub user_name: Option<String>,
}

impl Block {
    /// Numeric block covering `beg..=end`.
    pub fn range(beg: u32, end: u32, status: impl Into<BlockStatus>) -> Self {
        Self {
            span: BlockSpan::Range { beg, end },
            status: status.into(),
            pod_name: None,
            user_name: None,
        }
    }

    /// Single-entry block for a non-numeric host identifier.
    pub fn host(host: impl Into<String>, status: impl Into<BlockStatus>) -> Self {
        Self {
            span: BlockSpan::Host(host.into()),
            status: status.into(),
            pod_name: None,
            user_name: None,
        }
    }

    /**
    Block spanning a whole IPv4 network, network address to broadcast
    address inclusive. IPv6 networks cannot be expressed as 32-bit blocks
    and are refused.
    */
    pub fn from_net(net: IpNet, status: impl Into<BlockStatus>) -> Result<Self, PoolError> {
        match net {
            IpNet::V4(v4) => Ok(Self::range(
                u32::from(v4.network()),
                u32::from(v4.broadcast()),
                status,
            )),
            IpNet::V6(_) => Err(PoolError::Block(format!("{ERR_BLK_NOT_V4}: '{net}'"))),
        }
    }

    /// Attach pod/user assignment labels.
    pub fn assigned(mut self, pod: impl Into<String>, user: impl Into<String>) -> Self {
        self.pod_name = Some(pod.into());
        self.user_name = Some(user.into());
        self
    }

    /// Number of addresses in the block. A range with `end < beg` is empty.
    pub fn len(&self) -> u64 {
        match self.span {
            BlockSpan::Range { beg, end } if end >= beg => (end - beg) as u64 + 1,
            BlockSpan::Range { .. } => 0,
            BlockSpan::Host(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.status.is_blocked()
    }

    #[inline]
    pub fn is_host(&self) -> bool {
        matches!(self.span, BlockSpan::Host(_))
    }

    /// Numeric range whose end lies below its start.
    pub fn is_malformed(&self) -> bool {
        matches!(self.span, BlockSpan::Range { beg, end } if end < beg)
    }

    /// Whether the block takes part in an enumeration.
    #[inline]
    pub(crate) fn is_included(&self, include_blocked: bool) -> bool {
        include_blocked || !self.is_blocked()
    }

    /// Materialize the row for one address of this block.
    pub(crate) fn row(&self, ip: String) -> AddressRow {
        AddressRow {
            ip,
            status: self.status.clone(),
            pod_name: self.pod_name.clone(),
            user_name: self.user_name.clone(),
        }
    }
}

/* ---------------------------------- */

#[derive(Deserialize)]
#[serde(untagged)]
enum Endpoint {
    Addr(u32),
    Host(String),
}

/// Blocks arrive from the backend as `[start, end, status, pod?, user?]`.
impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(BlockVisitor)
    }
}

struct BlockVisitor;

impl<'de> Visitor<'de> for BlockVisitor {
    type Value = Block;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ERR_BLK_EXPECT)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let start: Endpoint = seq
            .next_element()?
            .ok_or_else(|| de::Error::custom(ERR_BLK_START))?;

        let span: BlockSpan = match start {
            Endpoint::Addr(beg) => match seq.next_element::<Endpoint>()? {
                Some(Endpoint::Addr(end)) => BlockSpan::Range { beg, end },
                Some(Endpoint::Host(_)) => return Err(de::Error::custom(ERR_BLK_MIXED)),
                None => return Err(de::Error::custom(ERR_BLK_END)),
            },
            Endpoint::Host(host) => {
                // end repeats the host name, nothing to compute from it
                seq.next_element::<IgnoredAny>()?;
                BlockSpan::Host(host)
            }
        };

        // missing or null status: keep the block, it just isn't blocked
        let status: BlockStatus = seq
            .next_element::<Option<BlockStatus>>()?
            .flatten()
            .unwrap_or_else(|| BlockStatus::Other(String::new()));
        let pod_name: Option<String> = seq.next_element::<Option<String>>()?.flatten();
        let user_name: Option<String> = seq.next_element::<Option<String>>()?.flatten();

        while seq.next_element::<IgnoredAny>()?.is_some() {}

        Ok(Block {
            span,
            status,
            pod_name,
            user_name,
        })
    }
}

/* -------------------------------------------------------------------------- */

/// One address of a pool, materialized for display.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRow {
    /// dotted-quad address, or the host identifier of a host block
    pub ip: String,
    pub status: BlockStatus,
    pub pod_name: Option<String>,
    pub user_name: Option<String>,
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_RANGE: &str = r#"[3232235521, 3232235530, "busy", "nginx", "alice"]"#;
    const JSON_SHORT: &str = r#"[10, 12, "free"]"#;
    const JSON_NULLS: &str = r#"[10, 12, "free", null, null, "extra"]"#;
    const JSON_HOST: &str = r#"["ec2-1-2-3-4.compute.amazonaws.com", "ec2-1-2-3-4.compute.amazonaws.com", "busy", "web", "bob"]"#;
    const JSON_MIXED: &str = r#"[10, "host-1", "free"]"#;
    const JSON_NOSTATUS: &str = r#"[10, 12]"#;
    const JSON_NULLSTATUS: &str = r#"[10, 12, null]"#;

    #[test]
    fn test_decode_range_block() {
        let block: Block = serde_json::from_str(JSON_RANGE).unwrap();
        assert_eq!(
            block.span,
            BlockSpan::Range {
                beg: 3232235521,
                end: 3232235530
            }
        );
        assert_eq!(block.status, BlockStatus::Busy);
        assert_eq!(block.pod_name.as_deref(), Some("nginx"));
        assert_eq!(block.user_name.as_deref(), Some("alice"));
        assert_eq!(block.len(), 10);
    }

    #[test]
    fn test_decode_optional_tail() {
        let short: Block = serde_json::from_str(JSON_SHORT).unwrap();
        let nulls: Block = serde_json::from_str(JSON_NULLS).unwrap();
        assert_eq!(short, Block::range(10, 12, "free"));
        assert_eq!(short, nulls);
    }

    #[test]
    fn test_decode_host_block() {
        let block: Block = serde_json::from_str(JSON_HOST).unwrap();
        assert!(block.is_host());
        assert_eq!(block.len(), 1);
        assert_eq!(
            block,
            Block::host("ec2-1-2-3-4.compute.amazonaws.com", "busy").assigned("web", "bob")
        );
    }

    #[test]
    fn test_decode_rejects_bad_blocks() {
        assert!(serde_json::from_str::<Block>(JSON_MIXED).is_err());
        assert!(serde_json::from_str::<Block>(r#"[10]"#).is_err());
        assert!(serde_json::from_str::<Block>("[]").is_err());
    }

    #[test]
    fn test_decode_missing_status() {
        for json in [JSON_NOSTATUS, JSON_NULLSTATUS] {
            let block: Block = serde_json::from_str(json).unwrap();
            assert_eq!(block.status, BlockStatus::Other(String::new()), "{json}");
            assert!(!block.is_blocked());
            assert_eq!(block.len(), 3);
            assert_eq!(block.pod_name, None);
        }
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(BlockStatus::from("blocked"), BlockStatus::Blocked);
        assert_eq!(BlockStatus::from("reserved"), BlockStatus::Other("reserved".into()));
        assert_eq!(String::from(BlockStatus::Other("reserved".into())), "reserved");
        assert!(!BlockStatus::from("Blocked").is_blocked());
    }

    #[test]
    fn test_malformed_range_is_empty() {
        let block = Block::range(20, 10, "free");
        assert!(block.is_malformed());
        assert!(block.is_empty());
        assert!(!Block::range(10, 10, "free").is_empty());
    }

    #[test]
    fn test_from_net() {
        let block = Block::from_net("192.168.1.0/30".parse().unwrap(), "free").unwrap();
        assert_eq!(
            block.span,
            BlockSpan::Range {
                beg: 0xC0A8_0100,
                end: 0xC0A8_0103
            }
        );
        assert_eq!(block.len(), 4);
        assert!(Block::from_net("2001:db8::/126".parse().unwrap(), "free").is_err());
    }

    #[test]
    fn test_row_serializes_camel_case() {
        let row = Block::range(1, 1, "busy").assigned("db", "carol").row("0.0.0.1".into());
        let json: serde_json::Value = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ip": "0.0.0.1",
                "status": "busy",
                "podName": "db",
                "userName": "carol",
            })
        );
    }
}
