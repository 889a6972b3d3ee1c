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

//! Defines the range query interfaces the walkers are driven by.
//!
//! A query fetches every matching item of one [`BlockRange`] from the remote
//! data source. How it does so (HTTP, RPC batching, auth) is opaque to the
//! walkers. Both traits are implemented for closures returning an owned
//! (`'static`) future, e.g. an `async move` block, so most callers never
//! implement them by hand.

use std::future::Future;

use crate::range::BlockRange;
use crate::stop::StopHandle;

/// A range query used by the bulk walker.
///
/// # Examples
///
/// ```rust
/// use range_pager::BlockRange;
/// use range_pager::RangeQuery;
/// use range_pager::StopHandle;
///
/// struct Logs;
///
/// #[async_trait::async_trait]
/// impl RangeQuery<u64> for Logs {
///     type Error = std::io::Error;
///
///     async fn query(&self, range: BlockRange, stop: StopHandle) -> Result<Vec<u64>, Self::Error> {
///         if range.high >= 1_000 {
///             stop.stop();
///         }
///         Ok((range.low..=range.high).filter(|b| b % 100 == 0).collect())
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait RangeQuery<T>: Send + Sync
where T: Send
{
    type Error: Send;

    /// Fetch all items within `range`, both ends inclusive.
    ///
    /// `stop` may be triggered to end the walk after this batch.
    /// An error aborts the walk and is returned to the caller unchanged.
    async fn query(&self, range: BlockRange, stop: StopHandle) -> Result<Vec<T>, Self::Error>;
}

/// A range query used by the pager.
///
/// Every returned item must lie within `range`. Items must be returned in the
/// order the walk visits them:
///
/// - positions in walk direction: ascending for a forward walk, descending
///   for a backward walk;
/// - items sharing a position by ascending
///   [`index_within_position`](crate::PaginatableItem::index_within_position),
///   in either direction.
///
/// A page cursor points after the last item of a page. If a batch is out of
/// walk order, the next page skips some items and repeats others.
///
/// # Examples
///
/// ```rust
/// use range_pager::BlockRange;
/// use range_pager::Direction;
/// use range_pager::PageQuery;
///
/// /// Two logs in every even block.
/// struct Logs {
///     direction: Direction,
/// }
///
/// #[async_trait::async_trait]
/// impl PageQuery<(u64, u64)> for Logs {
///     type Error = std::io::Error;
///
///     async fn query(&self, range: BlockRange) -> Result<Vec<(u64, u64)>, Self::Error> {
///         let mut blocks = (range.low..=range.high).filter(|b| b % 2 == 0).collect::<Vec<_>>();
///         if self.direction == Direction::Backward {
///             blocks.reverse();
///         }
///
///         // The index order within a block does not depend on the direction.
///         Ok(blocks.into_iter().flat_map(|b| [(b, 0), (b, 1)]).collect())
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait PageQuery<T>: Send + Sync
where T: Send
{
    type Error: Send;

    async fn query(&self, range: BlockRange) -> Result<Vec<T>, Self::Error>;
}

#[async_trait::async_trait]
impl<T, E, F, Fut> RangeQuery<T> for F
where
    T: Send + 'static,
    E: Send + 'static,
    F: Fn(BlockRange, StopHandle) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, E>> + Send + 'static,
{
    type Error = E;

    async fn query(&self, range: BlockRange, stop: StopHandle) -> Result<Vec<T>, E> {
        (self)(range, stop).await
    }
}

#[async_trait::async_trait]
impl<T, E, F, Fut> PageQuery<T> for F
where
    T: Send + 'static,
    E: Send + 'static,
    F: Fn(BlockRange) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, E>> + Send + 'static,
{
    type Error = E;

    async fn query(&self, range: BlockRange) -> Result<Vec<T>, E> {
        (self)(range).await
    }
}
