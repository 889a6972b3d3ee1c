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

//! Walk an entire range end to end and collect everything found.

use log::debug;
use log::warn;

use crate::config::RangeSizing;
use crate::config::SizingOptions;
use crate::errors::ConfigError;
use crate::query::RangeQuery;
use crate::range::compute_bulk_range;
use crate::range::is_past_boundary;
use crate::range::next_start;
use crate::range::Direction;
use crate::range::Position;
use crate::stop::StopHandle;
use crate::width::next_width;

/// Fetch large amounts of data in batches, exploring with adaptive range widths.
///
/// The width of each range grows when a batch returns few items and shrinks
/// when it returns many, so that each query returns roughly the same number
/// of items. Useful for `eth_getLogs`-like APIs that scan positions to find
/// items.
///
/// Ranges are queried strictly one after another, from `from` toward `to`,
/// both inclusive. Each range reaches `width` positions past its start,
/// e.g. `[1000, 1100]` for width 100.
#[derive(Debug, Clone)]
pub struct RangeWalker {
    sizing: RangeSizing,
}

impl Default for RangeWalker {
    fn default() -> Self {
        Self {
            sizing: RangeSizing::bulk_defaults(),
        }
    }
}

impl RangeWalker {
    pub fn new(sizing: RangeSizing) -> Self {
        Self { sizing }
    }

    /// Build a walker, filling unset `options` with [`RangeSizing::bulk_defaults`].
    pub fn with_options(options: &SizingOptions) -> Result<Self, ConfigError> {
        let sizing = RangeSizing::resolve(options, RangeSizing::bulk_defaults())?;
        Ok(Self::new(sizing))
    }

    pub fn sizing(&self) -> &RangeSizing {
        &self.sizing
    }

    /// Walk `from` toward `to` in `direction`, returning at most `item_limit` items.
    ///
    /// The walk ends when `to` has been queried, when `item_limit` items have
    /// been collected, or right after a query calls [`StopHandle::stop`]; the
    /// batch of that query is kept.
    ///
    /// A query error aborts the walk and is returned unchanged.
    pub async fn walk<T, Q>(
        &self,
        from: Position,
        to: Position,
        direction: Direction,
        item_limit: usize,
        query: &Q,
    ) -> Result<Vec<T>, Q::Error>
    where
        T: Send,
        Q: RangeQuery<T> + ?Sized,
    {
        let sizing = &self.sizing;

        let stop = StopHandle::new();
        let mut items: Vec<T> = Vec::new();
        let mut start = from;
        let mut width = sizing.initial_width;

        loop {
            if stop.is_stopped() {
                debug!("RangeWalker::walk: stopped by query at {}", start);
                break;
            }

            if items.len() >= item_limit {
                debug!(
                    "RangeWalker::walk: item limit {} reached at {}",
                    item_limit, start
                );
                break;
            }

            let Some(range) = compute_bulk_range(start, width, direction, to) else {
                debug!("RangeWalker::walk: passed {} boundary {}", direction, to);
                break;
            };

            debug!("RangeWalker::walk: query {} width={}", range, width);

            let batch = query.query(range, stop.clone()).await?;
            let batch_len = batch.len();

            if batch_len > item_limit.saturating_mul(10) {
                warn!(
                    "RangeWalker::walk: range {} returns big batch of len={}, item_limit={}",
                    range, batch_len, item_limit
                );
            }

            items.extend(batch);

            if stop.is_stopped() {
                debug!("RangeWalker::walk: stop requested while querying {}", range);
                break;
            }

            let new_width = next_width(width, batch_len, sizing);
            if new_width != width {
                debug!(
                    "RangeWalker::walk: {} items in {}, width {} -> {}",
                    batch_len, range, width, new_width
                );
            }
            width = new_width;

            let Some(next) = next_start(&range, direction) else {
                break;
            };
            start = next;

            if is_past_boundary(start, direction, to) {
                debug!("RangeWalker::walk: reached {}", to);
                break;
            }
        }

        items.truncate(item_limit);
        Ok(items)
    }
}

/// Walk `from` toward `to` with a [`RangeWalker`] built from `options`.
///
/// A shortcut of [`RangeWalker::with_options`] followed by [`RangeWalker::walk`].
pub async fn fetch_by_range<T, Q>(
    from: Position,
    to: Position,
    direction: Direction,
    item_limit: usize,
    query: &Q,
    options: &SizingOptions,
) -> Result<Result<Vec<T>, Q::Error>, ConfigError>
where
    T: Send,
    Q: RangeQuery<T> + ?Sized,
{
    let walker = RangeWalker::with_options(options)?;
    Ok(walker.walk(from, to, direction, item_limit, query).await)
}
