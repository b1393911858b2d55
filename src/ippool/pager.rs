// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    block::{AddressRow, Block},
    sorting::{sort_rows, toggle_sort, SortKey, SortOrder},
    strings::*,
    virtualizer::{count, range},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Settings of an [IpPoolView].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    /// rows per page, at least 1
    pub page_size: usize,
    /// include addresses of "blocked" blocks
    pub show_excluded: bool,
    /// sort criteria applied within a page
    pub order: Vec<SortOrder>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            show_excluded: false,
            order: vec![SortOrder::asc(SortKey::Ip)],
        }
    }
}

/// Paging bookkeeping after the latest page request.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub page_size: usize,
    /// 1-based
    pub current_page: usize,
    pub total_records: u64,
    pub total_pages: u64,
}

/// One page of rows plus the bookkeeping it was produced with.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Page {
    pub rows: Vec<AddressRow>,
    pub state: PageState,
}

/* ---------------------------------- */

/// ViewInner holds everything that changes together behind one lock.
struct ViewInner {
    blocks: Arc<[Block]>,
    config: ViewConfig,
    state: PageState,
    /// bumped whenever `blocks` or `config` change
    gen: u64,
}

impl ViewInner {
    fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            blocks: Arc::clone(&self.blocks),
            config: self.config.clone(),
            gen: self.gen,
        }
    }
}

/// What a page request works from, taken under a single read lock.
struct ViewSnapshot {
    blocks: Arc<[Block]>,
    config: ViewConfig,
    gen: u64,
}

/**
Paged view over the addresses of one IP pool.

The block list is an immutable snapshot. Updates go through
[IpPoolView::replace_blocks], which swaps in a whole new list, so readers
never observe a half-updated pool. Rows are produced on every page request
and not kept around.

Pages are computed outside the lock. Their bookkeeping is only recorded if
neither the blocks nor the settings changed in the meantime.
*/
pub struct IpPoolView {
    inner: RwLock<ViewInner>,
}

impl IpPoolView {
    pub fn new(blocks: impl Into<Arc<[Block]>>, mut config: ViewConfig) -> Self {
        config.page_size = config.page_size.max(1);
        let blocks: Arc<[Block]> = blocks.into();
        warn_malformed(&blocks);

        let total: u64 = count(&blocks, config.show_excluded);
        let state = PageState {
            page_size: config.page_size,
            current_page: 1,
            total_records: total,
            total_pages: total.div_ceil(config.page_size as u64),
        };

        Self {
            inner: RwLock::new(ViewInner {
                blocks,
                config,
                state,
                gen: 0,
            }),
        }
    }

    /// Current block list. Cheap, clones the [Arc] only.
    pub fn snapshot(&self) -> Arc<[Block]> {
        Arc::clone(&self.inner.read().blocks)
    }

    pub fn config(&self) -> ViewConfig {
        self.inner.read().config.clone()
    }

    /// Bookkeeping of the latest page request.
    pub fn state(&self) -> PageState {
        self.inner.read().state
    }

    /// Number of rows the view enumerates with the current settings.
    pub fn total_records(&self) -> u64 {
        let i = self.inner.read();
        count(&i.blocks, i.config.show_excluded)
    }

    /**
    Produce page `page` (1-based, 0 is treated as 1), sorted by the
    configured order. A page past the end has no rows.
    */
    pub fn get_page(&self, page: usize) -> Page {
        let snap: ViewSnapshot = self.take_snapshot();
        let page: Page = render(&snap, page, false);
        self.record(snap.gen, page.state);
        page
    }

    /// Re-produce the current page, clamped to the last page.
    pub fn refresh(&self) -> Page {
        let (snap, current) = {
            let i = self.inner.read();
            (i.snapshot(), i.state.current_page)
        };
        let page: Page = render(&snap, current, true);
        self.record(snap.gen, page.state);
        page
    }

    /// Swap in a new block list (f.ex. after an allocation change) and refresh.
    pub fn replace_blocks(&self, blocks: impl Into<Arc<[Block]>>) -> Page {
        let blocks: Arc<[Block]> = blocks.into();
        warn_malformed(&blocks);
        debug!("ippool view: replacing {} blocks", blocks.len());
        self.update(|i| i.blocks = blocks);
        self.refresh()
    }

    pub fn set_show_excluded(&self, show: bool) -> Page {
        self.update(|i| i.config.show_excluded = show);
        self.refresh()
    }

    pub fn set_order(&self, order: Vec<SortOrder>) -> Page {
        self.update(|i| i.config.order = order);
        self.refresh()
    }

    /// Make `key` the primary sort criterion, or flip it if it already is one.
    pub fn toggle_sort(&self, key: SortKey) -> Page {
        self.update(|i| toggle_sort(&mut i.config.order, key));
        self.refresh()
    }

    fn update(&self, f: impl FnOnce(&mut ViewInner)) {
        let mut i = self.inner.write();
        f(&mut i);
        i.gen += 1;
    }

    fn take_snapshot(&self) -> ViewSnapshot {
        self.inner.read().snapshot()
    }

    /// Store `state` unless the view changed since generation `gen`.
    fn record(&self, gen: u64, state: PageState) -> bool {
        let mut i = self.inner.write();
        if i.gen != gen {
            debug!("ippool view changed during page request, keeping newer state");
            return false;
        }
        i.state = state;
        true
    }
}

/// Produce one page from a snapshot. `clamp` limits the page to the last one.
fn render(snap: &ViewSnapshot, page: usize, clamp: bool) -> Page {
    let config: &ViewConfig = &snap.config;
    let page_size: u64 = config.page_size as u64;
    let total: u64 = count(&snap.blocks, config.show_excluded);
    let total_pages: u64 = total.div_ceil(page_size);

    let mut page: usize = page.max(1);
    if clamp {
        let last: usize = usize::try_from(total_pages).unwrap_or(usize::MAX);
        page = page.min(last.max(1));
    }

    let beg: u64 = (page as u64 - 1).saturating_mul(page_size);
    let mut rows: Vec<AddressRow> = range(
        &snap.blocks,
        config.show_excluded,
        beg,
        beg.saturating_add(page_size),
    );
    sort_rows(&mut rows, &config.order);

    debug!("ippool page {page}/{total_pages}: {} rows of {total}", rows.len());
    Page {
        rows,
        state: PageState {
            page_size: config.page_size,
            current_page: page,
            total_records: total,
            total_pages,
        },
    }
}

/// Log every block whose end lies below its start. Returns how many there were.
fn warn_malformed(blocks: &[Block]) -> usize {
    let mut found: usize = 0;
    for (idx, block) in blocks.iter().enumerate() {
        if block.is_malformed() {
            warn!(index = idx, span = ?block.span, "{WARN_BLK_ORDER}");
            found += 1;
        }
    }
    found
}

/* -------------------------------------------------------------------------- */
