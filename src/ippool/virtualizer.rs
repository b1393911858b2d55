// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::block::{AddressRow, Block, BlockSpan};
use std::{iter::FusedIterator, net::Ipv4Addr};

/**
Total number of addresses in `blocks`.

Blocks with status "blocked" only count when `include_blocked` is set.
A host block counts as one address, a numeric block as `end - beg + 1`
(zero if its end lies below its start).
*/
pub fn count(blocks: &[Block], include_blocked: bool) -> u64 {
    blocks
        .iter()
        .filter(|b| b.is_included(include_blocked))
        .map(Block::len)
        .sum()
}

/**
Map a global index of the (filtered) enumeration to the block containing it.

### Returns
- `(block_index, offset_within_block)`, or `None` if `global_index` is past
  the end of the enumeration.
*/
pub fn find_start_offset(
    blocks: &[Block],
    include_blocked: bool,
    global_index: u64,
) -> Option<(usize, u64)> {
    let mut before: u64 = 0;
    for (idx, block) in blocks.iter().enumerate() {
        if !block.is_included(include_blocked) {
            continue;
        }
        let len: u64 = block.len();
        if before + len > global_index {
            return Some((idx, global_index - before));
        }
        before += len;
    }
    None
}

/**
Lazily enumerate addresses of `blocks`, starting at `start` (a global index).

Nothing is materialized up front, so this is fine to use on pools spanning
millions of addresses as long as the caller only takes what it needs.
*/
pub fn iterate(blocks: &[Block], include_blocked: bool, start: u64) -> BlockIter<'_> {
    BlockIter::new(blocks, include_blocked, start)
}

/// Collect the rows for global indices `start..end`. Empty past the end.
pub fn range(blocks: &[Block], include_blocked: bool, start: u64, end: u64) -> Vec<AddressRow> {
    let wanted: usize = usize::try_from(end.saturating_sub(start)).unwrap_or(usize::MAX);
    iterate(blocks, include_blocked, start)
        .take(wanted)
        .collect()
}

/// Format a 32-bit address as a dotted-quad string (network byte order).
#[inline]
pub fn int_to_dotted_quad(ip: u32) -> String {
    Ipv4Addr::from(ip.to_be_bytes()).to_string()
}

/* ---------------------------------- */

/// Cursor over the addresses of a block list. See [iterate].
#[derive(Clone, Debug)]
pub struct BlockIter<'a> {
    blocks: &'a [Block],
    include_blocked: bool,
    block: usize,
    offset: u64,
}

impl<'a> BlockIter<'a> {
    pub fn new(blocks: &'a [Block], include_blocked: bool, start: u64) -> Self {
        let (block, offset) =
            find_start_offset(blocks, include_blocked, start).unwrap_or((blocks.len(), 0));
        BlockIter {
            blocks,
            include_blocked,
            block,
            offset,
        }
    }

    #[inline]
    fn advance_block(&mut self) {
        self.block += 1;
        self.offset = 0;
    }
}

impl Iterator for BlockIter<'_> {
    type Item = AddressRow;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let block: &Block = self.blocks.get(self.block)?;

            if !block.is_included(self.include_blocked) || self.offset >= block.len() {
                self.advance_block();
                continue;
            }

            let row: AddressRow = match &block.span {
                // offset < len, so beg + offset never passes end
                BlockSpan::Range { beg, .. } => {
                    block.row(int_to_dotted_quad((*beg as u64 + self.offset) as u32))
                }
                BlockSpan::Host(host) => block.row(host.clone()),
            };
            self.offset += 1;

            return Some(row);
        }
    }
}

impl FusedIterator for BlockIter<'_> {}

/* -------------------------------------------------------------------------- */
