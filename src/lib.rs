// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
Data layer of an IP pool admin page: turns the compact block lists a backend
returns for each pool into a paged, sortable enumeration of single addresses,
without materializing the address space.

```ignore
let net: Network = parse_network(json)?;
let view: IpPoolView = net.ips(ViewConfig::default());
let page: Page = view.get_page(1);
```
*/

pub mod ippool;

pub use ippool::{
    count, find_start_offset, int_to_dotted_quad, iterate, parse_network, parse_networks, range,
    AddressRow, Block, BlockIter, BlockSpan, BlockStatus, IpPoolView, Network, Page, PageState,
    PoolError, SortDir, SortKey, SortOrder, ViewConfig,
};
