// Copyright 2021 Datafuse Labs
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Range Pager
//!
//! Fetch large, unbounded result sets from a data source that only answers
//! range-scoped queries, such as `eth_getLogs` or `trace_filter` over block
//! numbers.
//!
//! The width of each queried range adapts to how many items the previous
//! range returned: it grows over sparse positions and shrinks over crowded
//! ones, keeping every query near a target density. Ranges are always
//! queried one at a time, in position order.
//!
//! ## Core Components
//!
//! - [`RangeWalker`]: walks a whole range end to end and returns everything found,
//!   honoring an item limit and a cooperative [`StopHandle`].
//! - [`get_page`]: fetches one fixed-size page and the [`Cursor`] to resume after it,
//!   exactly at item granularity, even inside a position holding many items.
//! - [`Pager`] and [`PaginatedResult`]: page-by-page iteration on top of [`get_page`].
//!
//! The remote query is supplied by the caller as a [`RangeQuery`] or
//! [`PageQuery`], usually an async closure.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::io;
//!
//! use range_pager::BlockRange;
//! use range_pager::Direction;
//! use range_pager::RangeWalker;
//! use range_pager::StopHandle;
//!
//! #[tokio::main]
//! async fn main() -> io::Result<()> {
//!     let walker = RangeWalker::default();
//!
//!     // Query the remote source for one range
//!     let query = |range: BlockRange, _stop: StopHandle| async move {
//!         Ok::<_, io::Error>(vec![range.low])
//!     };
//!
//!     // Walk blocks 1000 to 2000, collecting at most 500 items
//!     let items: Vec<u64> = walker
//!         .walk(1000, 2000, Direction::Forward, 500, &query)
//!         .await?;
//!     println!("found {} items", items.len());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod cursor;
pub mod errors;
pub mod item;
pub mod page;
pub mod paginated;
pub mod query;
pub mod range;
pub mod stop;
pub mod walker;
pub mod width;

pub use crate::config::PagerConfig;
pub use crate::config::RangeSizing;
pub use crate::config::SizingOptions;
pub use crate::config::WalkConfig;
pub use crate::cursor::Cursor;
pub use crate::errors::ConfigError;
pub use crate::item::PaginatableItem;
pub use crate::page::get_page;
pub use crate::page::Page;
pub use crate::paginated::PaginatedResult;
pub use crate::paginated::Pager;
pub use crate::query::PageQuery;
pub use crate::query::RangeQuery;
pub use crate::range::BlockRange;
pub use crate::range::Direction;
pub use crate::range::Position;
pub use crate::stop::StopHandle;
pub use crate::walker::fetch_by_range;
pub use crate::walker::RangeWalker;

/// A boxed stream of pages, as returned by [`Pager::pages`].
pub type PageStream<T, E> = futures::stream::BoxStream<'static, Result<Page<T>, E>>;
