// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

pub(crate) static STATUS_FREE: &str = "free";
pub(crate) static STATUS_BUSY: &str = "busy";
pub(crate) static STATUS_BLOCKED: &str = "blocked";
pub(crate) static STATUS_OK: &str = "OK";

// mod.rs
pub(crate) static ERR_JSON: &str = "invalid IP pool JSON";
pub(crate) static ERR_BLOCK: &str = "invalid address block";
pub(crate) static ERR_ENVELOPE: &str = "backend returned a non-OK status";

// block.rs
pub(crate) static ERR_BLK_EXPECT: &str = "a block array [start, end, status, pod, user]";
pub(crate) static ERR_BLK_START: &str = "missing block start";
pub(crate) static ERR_BLK_END: &str = "missing block end";
pub(crate) static ERR_BLK_MIXED: &str = "numeric block start with non-numeric end";
pub(crate) static ERR_BLK_NOT_V4: &str = "only IPv4 networks can be turned into blocks";

// virtualizer.rs / pager.rs
pub(crate) static WARN_BLK_ORDER: &str = "block end is below its start, treating as empty";
