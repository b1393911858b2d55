// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::block::AddressRow;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, cmp::Ordering};

// Word-bounded numbers of one and two digits, ASCII word/digit classes only.
lazy_static! {
    static ref ONE_DIGIT: Regex = Regex::new(r"(?-u:\b)[0-9](?-u:\b)").unwrap();
    static ref TWO_DIGITS: Regex = Regex::new(r"(?-u:\b)[0-9]{2}(?-u:\b)").unwrap();
}

/// Row attribute to sort by.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Ip,
    Status,
    PodName,
    UserName,
}

/// Sort direction, `1` (ascending) or `-1` (descending) on the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn flip(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    #[inline]
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    }
}

impl TryFrom<i8> for SortDir {
    type Error = String;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(SortDir::Asc),
            -1 => Ok(SortDir::Desc),
            other => Err(format!("sort order must be 1 or -1, got {other}")),
        }
    }
}

impl From<SortDir> for i8 {
    fn from(dir: SortDir) -> Self {
        match dir {
            SortDir::Asc => 1,
            SortDir::Desc => -1,
        }
    }
}

/// One sorting criterion. Later criteria only break ties of earlier ones.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SortOrder {
    pub key: SortKey,
    #[serde(rename = "order")]
    pub dir: SortDir,
}

impl SortOrder {
    pub fn asc(key: SortKey) -> Self {
        Self { key, dir: SortDir::Asc }
    }

    pub fn desc(key: SortKey) -> Self {
        Self { key, dir: SortDir::Desc }
    }
}

/* ---------------------------------- */

/**
Sort key for an address so that plain string comparison gives numeric order:
every standalone number of one or two digits is zero-padded to three,
f.ex. `10.0.0.5` becomes `010.000.000.005`.

Host identifiers go through the same transformation.
*/
pub fn ip_sort_key(ip: &str) -> String {
    let padded: Cow<str> = ONE_DIGIT.replace_all(ip, "00${0}");
    TWO_DIGITS.replace_all(&padded, "0${0}").into_owned()
}

/**
Stable multi-criteria sort of `rows`.

Missing pod/user names sort before present ones. An empty `orders` leaves
the rows untouched.
*/
pub fn sort_rows(rows: &mut Vec<AddressRow>, orders: &[SortOrder]) {
    if orders.is_empty() || rows.len() < 2 {
        return;
    }

    let with_ip: bool = orders.iter().any(|o| o.key == SortKey::Ip);
    let mut keyed: Vec<(String, AddressRow)> = rows
        .drain(..)
        .map(|r| match with_ip {
            true => (ip_sort_key(&r.ip), r),
            false => (String::new(), r),
        })
        .collect();

    keyed.sort_by(|(ka, a), (kb, b)| {
        for order in orders {
            let ord: Ordering = match order.key {
                SortKey::Ip => ka.cmp(kb),
                SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
                SortKey::PodName => a.pod_name.cmp(&b.pod_name),
                SortKey::UserName => a.user_name.cmp(&b.user_name),
            };
            if ord != Ordering::Equal {
                return order.dir.apply(ord);
            }
        }
        Ordering::Equal
    });

    rows.extend(keyed.into_iter().map(|(_, r)| r));
}

/**
Make `key` the primary criterion, keeping the rest in their current order.

A key already present has its direction flipped; a new key starts ascending.
*/
pub fn toggle_sort(orders: &mut Vec<SortOrder>, key: SortKey) {
    let term: SortOrder = match orders.iter().position(|o| o.key == key) {
        Some(idx) => {
            let old: SortOrder = orders.remove(idx);
            SortOrder {
                key,
                dir: old.dir.flip(),
            }
        }
        None => SortOrder::asc(key),
    };
    orders.insert(0, term);
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ippool::BlockStatus;

    fn row(ip: &str, status: &str, pod: Option<&str>) -> AddressRow {
        AddressRow {
            ip: ip.to_string(),
            status: BlockStatus::from(status),
            pod_name: pod.map(str::to_string),
            user_name: None,
        }
    }

    fn ips(rows: &[AddressRow]) -> Vec<&str> {
        rows.iter().map(|r| r.ip.as_str()).collect()
    }

    #[test]
    fn test_ip_sort_key() {
        assert_eq!(ip_sort_key("10.0.0.5"), "010.000.000.005");
        assert_eq!(ip_sort_key("192.168.1.20"), "192.168.001.020");
        assert_eq!(ip_sort_key("255.255.255.255"), "255.255.255.255");
        assert_eq!(ip_sort_key("node-1"), "node-001");
    }

    #[test]
    fn test_ip_sort_key_ascii_classes() {
        // non-ASCII letters are not word characters, so they bound a number
        assert_eq!(ip_sort_key("nodé1"), "nodé001");
        assert_eq!(ip_sort_key("ü12"), "ü012");
        // non-ASCII digits are left alone
        assert_eq!(ip_sort_key("rack-٣"), "rack-٣");
    }

    #[test]
    fn test_sort_by_ip_is_numeric() {
        let mut rows = vec![
            row("10.0.0.20", "free", None),
            row("10.0.0.3", "free", None),
            row("10.0.0.100", "free", None),
            row("9.255.0.1", "free", None),
        ];
        sort_rows(&mut rows, &[SortOrder::asc(SortKey::Ip)]);
        assert_eq!(ips(&rows), ["9.255.0.1", "10.0.0.3", "10.0.0.20", "10.0.0.100"]);

        sort_rows(&mut rows, &[SortOrder::desc(SortKey::Ip)]);
        assert_eq!(ips(&rows), ["10.0.0.100", "10.0.0.20", "10.0.0.3", "9.255.0.1"]);
    }

    #[test]
    fn test_sort_multi_criteria() {
        let mut rows = vec![
            row("10.0.0.4", "free", None),
            row("10.0.0.2", "busy", Some("web")),
            row("10.0.0.3", "free", None),
            row("10.0.0.1", "busy", Some("db")),
        ];
        sort_rows(
            &mut rows,
            &[SortOrder::asc(SortKey::Status), SortOrder::desc(SortKey::Ip)],
        );
        assert_eq!(ips(&rows), ["10.0.0.2", "10.0.0.1", "10.0.0.4", "10.0.0.3"]);

        sort_rows(&mut rows, &[SortOrder::asc(SortKey::PodName)]);
        assert_eq!(rows[0].pod_name, None);
        assert_eq!(rows[3].pod_name.as_deref(), Some("web"));
    }

    #[test]
    fn test_toggle_sort() {
        let mut orders = vec![SortOrder::asc(SortKey::Ip)];
        toggle_sort(&mut orders, SortKey::Status);
        assert_eq!(
            orders,
            [SortOrder::asc(SortKey::Status), SortOrder::asc(SortKey::Ip)]
        );
        toggle_sort(&mut orders, SortKey::Ip);
        assert_eq!(
            orders,
            [SortOrder::desc(SortKey::Ip), SortOrder::asc(SortKey::Status)]
        );
    }

    #[test]
    fn test_sort_order_wire_format() {
        let order: SortOrder = serde_json::from_str(r#"{"key": "podName", "order": -1}"#).unwrap();
        assert_eq!(order, SortOrder::desc(SortKey::PodName));
        assert!(serde_json::from_str::<SortOrder>(r#"{"key": "ip", "order": 0}"#).is_err());
    }
}
