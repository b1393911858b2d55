// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paged, sortable enumeration of IP pool addresses from compact block lists.

mod block;
mod network;
mod pager;
mod sorting;
mod strings;
mod virtualizer;

use std::{error, fmt};
use strings::*;

pub use block::{AddressRow, Block, BlockSpan, BlockStatus};
pub use network::{parse_network, parse_networks, Network};
pub use pager::{IpPoolView, Page, PageState, ViewConfig, DEFAULT_PAGE_SIZE};
pub use sorting::{ip_sort_key, sort_rows, toggle_sort, SortDir, SortKey, SortOrder};
pub use virtualizer::*;

#[derive(Debug)]
pub enum PoolError {
    /// payload is not valid JSON or has the wrong shape
    Json(serde_json::Error),
    /// a block could not be built from its input
    Block(String),
    /// response envelope carried a status other than "OK"
    Envelope(String),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::Json(source) => {
                write!(f, "{ERR_JSON}: {source}")
            }
            PoolError::Block(msg) => {
                write!(f, "{ERR_BLOCK}: {msg}")
            }
            PoolError::Envelope(status) => {
                write!(f, "{ERR_ENVELOPE}: '{status}'")
            }
        }
    }
}

impl error::Error for PoolError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            PoolError::Json(source) => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PoolError {
    fn from(source: serde_json::Error) -> Self {
        PoolError::Json(source)
    }
}
