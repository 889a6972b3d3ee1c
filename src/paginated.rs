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

//! Page-by-page iteration over a range-scoped query.
//!
//! A [`Pager`] binds a [`PagerConfig`] to a [`PageQuery`]. Each fetched page
//! is a [`PaginatedResult`] that knows how to fetch the page after it, and
//! exposes the [`Cursor`] to persist for resuming later.

use std::fmt;
use std::sync::Arc;

use futures_util::StreamExt;

use crate::config::PagerConfig;
use crate::cursor::Cursor;
use crate::item::PaginatableItem;
use crate::page::get_page;
use crate::query::PageQuery;
use crate::PageStream;

/// Fetches pages of items from a query with a fixed configuration.
///
/// Cloning a pager is cheap: the configuration and the query are shared.
///
/// # Examples
///
/// ```rust
/// use range_pager::BlockRange;
/// use range_pager::Direction;
/// use range_pager::Pager;
/// use range_pager::PagerConfig;
/// use range_pager::SizingOptions;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     // One item in every tenth position.
///     let query = |range: BlockRange| async move {
///         let items = (range.low..=range.high)
///             .filter(|p| p % 10 == 0)
///             .map(|p| (p, 0u64))
///             .collect::<Vec<_>>();
///         Ok::<_, std::io::Error>(items)
///     };
///
///     let config = PagerConfig::new(Direction::Forward, 0, 99, 4, &SizingOptions::default())?;
///     let pager = Pager::new(config, query);
///
///     let mut page = pager.first_page::<(u64, u64)>().await?;
///     let mut all = page.items().to_vec();
///
///     while let Some(next) = page.next_page().await? {
///         all.extend_from_slice(next.items());
///         page = next;
///     }
///
///     assert_eq!(all.len(), 10);
///     Ok(())
/// }
/// ```
pub struct Pager<Q> {
    config: Arc<PagerConfig>,
    query: Arc<Q>,
}

impl<Q> Clone for Pager<Q> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            query: self.query.clone(),
        }
    }
}

impl<Q> fmt::Debug for Pager<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<Q> Pager<Q> {
    pub fn new(config: PagerConfig, query: Q) -> Self {
        Self {
            config: Arc::new(config),
            query: Arc::new(query),
        }
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// Fetch the first page, starting at the configured start position.
    pub async fn first_page<T>(&self) -> Result<PaginatedResult<T, Q>, Q::Error>
    where
        T: PaginatableItem + Send,
        Q: PageQuery<T>,
    {
        self.page(None).await
    }

    /// Fetch the page that `cursor` points to, e.g. a cursor restored from storage.
    ///
    /// `None` fetches the first page.
    pub async fn page<T>(&self, cursor: Option<&Cursor>) -> Result<PaginatedResult<T, Q>, Q::Error>
    where
        T: PaginatableItem + Send,
        Q: PageQuery<T>,
    {
        let page = get_page(&self.config, self.query.as_ref(), cursor).await?;

        Ok(PaginatedResult {
            items: page.items,
            cursor: page.next_cursor,
            pager: self.clone(),
        })
    }

    /// Return a stream of pages, starting at `cursor`, or at the first page if it is `None`.
    ///
    /// The stream yields at least one page. It ends after the page whose next
    /// cursor is terminal, or right after yielding an error.
    pub fn pages<T>(&self, cursor: Option<Cursor>) -> PageStream<T, Q::Error>
    where
        T: PaginatableItem + Send + 'static,
        Q: PageQuery<T> + 'static,
    {
        let init = Some((self.clone(), cursor));

        futures::stream::unfold(init, |state| async move {
            let (pager, cursor) = state?;

            match get_page::<T, Q>(&pager.config, pager.query.as_ref(), cursor.as_ref()).await {
                Ok(page) => {
                    let next = if page.has_more() {
                        Some((pager, Some(page.next_cursor)))
                    } else {
                        None
                    };
                    Some((Ok(page), next))
                }
                Err(e) => Some((Err(e), None)),
            }
        })
        .boxed()
    }
}

/// A single page of results and the means to fetch the page after it.
///
/// No page is cached: every [`next_page`](Self::next_page) issues fresh queries.
pub struct PaginatedResult<T, Q> {
    items: Vec<T>,

    /// The cursor of the *next* page.
    cursor: Cursor,

    pager: Pager<Q>,
}

impl<T, Q> fmt::Debug for PaginatedResult<T, Q>
where T: fmt::Debug
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatedResult")
            .field("items", &self.items)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl<T, Q> PaginatedResult<T, Q> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The cursor to persist to resume paging after this page.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn has_next_page(&self) -> bool {
        self.cursor.has_more
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn into_parts(self) -> (Vec<T>, Cursor) {
        (self.items, self.cursor)
    }

    /// Fetch the page after this one.
    ///
    /// Returns `Ok(None)` without querying if this is the last page.
    pub async fn next_page(&self) -> Result<Option<PaginatedResult<T, Q>>, Q::Error>
    where
        T: PaginatableItem + Send,
        Q: PageQuery<T>,
    {
        if !self.has_next_page() {
            return Ok(None);
        }

        let next = self.pager.page(Some(&self.cursor)).await?;
        Ok(Some(next))
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use futures_util::TryStreamExt;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::SizingOptions;
    use crate::page::Page;
    use crate::range::BlockRange;
    use crate::range::Direction;
    use crate::range::Position;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Transfer {
        block: u64,
        log_index: u64,
    }

    impl PaginatableItem for Transfer {
        fn position(&self) -> Position {
            self.block
        }

        fn index_within_position(&self) -> u64 {
            self.log_index
        }
    }

    /// Every block `b` divisible by 5 holds `b % 3 + 1` transfers.
    fn transfers_in(range: BlockRange) -> Vec<Transfer> {
        (range.low..=range.high)
            .filter(|b| b % 5 == 0)
            .flat_map(|block| (0..block % 3 + 1).map(move |log_index| Transfer { block, log_index }))
            .collect()
    }

    fn all_transfers(high: u64) -> Vec<Transfer> {
        transfers_in(BlockRange::new(0, high))
    }

    fn query(
        calls: Arc<AtomicUsize>,
    ) -> impl Fn(BlockRange) -> futures::future::Ready<Result<Vec<Transfer>, io::Error>> {
        move |range: BlockRange| {
            calls.fetch_add(1, Ordering::Relaxed);
            futures::future::ready(Ok(transfers_in(range)))
        }
    }

    fn pager_config(per_page: usize) -> PagerConfig {
        PagerConfig::new(Direction::Forward, 0, 60, per_page, &SizingOptions::default()).unwrap()
    }

    #[tokio::test]
    async fn test_next_page_chain() -> anyhow::Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let pager = Pager::new(pager_config(4), query(calls.clone()));

        let mut page = pager.first_page::<Transfer>().await?;
        let mut got = page.items().to_vec();

        while let Some(next) = page.next_page().await? {
            assert!(next.items().len() <= 4);
            got.extend_from_slice(next.items());
            page = next;
        }

        assert!(!page.has_next_page());
        assert!(page.cursor().is_terminal());
        assert_eq!(got, all_transfers(60));

        // The last page never queries again.
        let before = calls.load(Ordering::Relaxed);
        assert!(page.next_page().await?.is_none());
        assert_eq!(calls.load(Ordering::Relaxed), before);
        Ok(())
    }

    #[tokio::test]
    async fn test_next_page_is_not_cached() -> anyhow::Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let pager = Pager::new(pager_config(2), query(calls.clone()));

        let page = pager.first_page::<Transfer>().await?;
        assert!(page.has_next_page());

        let a = page.next_page().await?.map(|p| p.into_items());
        let after_first = calls.load(Ordering::Relaxed);
        let b = page.next_page().await?.map(|p| p.into_items());

        assert_eq!(a, b);
        assert!(calls.load(Ordering::Relaxed) > after_first);
        Ok(())
    }

    #[tokio::test]
    async fn test_resume_from_persisted_cursor() -> anyhow::Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let per_page = 3;

        let first = Pager::new(pager_config(per_page), query(calls.clone()))
            .first_page::<Transfer>()
            .await?;
        let (first_items, cursor) = first.into_parts();

        // Store the cursor as a process would before exiting.
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cursor.json");
        std::fs::write(&path, serde_json::to_vec(&cursor)?)?;

        // A new pager, as in a restarted process.
        let restored: Cursor = serde_json::from_slice(&std::fs::read(&path)?)?;
        assert_eq!(restored, cursor);

        let pager = Pager::new(pager_config(per_page), query(calls.clone()));
        let second = pager.page::<Transfer>(Some(&restored)).await?;

        let mut got = first_items;
        got.extend(second.into_items());

        assert_eq!(got, all_transfers(60)[..2 * per_page].to_vec());
        Ok(())
    }

    #[tokio::test]
    async fn test_pages_stream() -> anyhow::Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let pager = Pager::new(pager_config(5), query(calls));

        let pages: Vec<Page<Transfer>> = pager.pages::<Transfer>(None).try_collect().await?;

        assert!(pages.iter().all(|p| p.items.len() <= 5));
        assert!(!pages.last().map(|p| p.has_more()).unwrap_or(true));

        let got = pages.into_iter().flat_map(|p| p.items).collect::<Vec<_>>();
        assert_eq!(got, all_transfers(60));
        Ok(())
    }

    #[tokio::test]
    async fn test_pages_stream_ends_after_error() -> anyhow::Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let failing = move |range: BlockRange| {
            let n = counter.fetch_add(1, Ordering::Relaxed);
            let res = if n == 0 {
                Ok(transfers_in(range))
            } else {
                Err(io::Error::new(io::ErrorKind::Other, "node unavailable"))
            };
            futures::future::ready(res)
        };

        let config = PagerConfig::new(
            Direction::Forward,
            0,
            60,
            1,
            &SizingOptions::default().with_initial_width(100),
        )?;
        let pager = Pager::new(config, failing);

        let results = pager.pages::<Transfer>(None).collect::<Vec<_>>().await;

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert_eq!(err.to_string(), "node unavailable");
        Ok(())
    }

    #[tokio::test]
    async fn test_pages_stream_from_terminal_cursor() -> anyhow::Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let pager = Pager::new(pager_config(5), query(calls.clone()));

        let pages: Vec<Page<Transfer>> = pager
            .pages::<Transfer>(Some(Cursor::terminal()))
            .try_collect()
            .await?;

        assert_eq!(pages, vec![Page {
            items: vec![],
            next_cursor: Cursor::terminal(),
        }]);
        assert_eq!(calls.load(Ordering::Relaxed), 0);
        Ok(())
    }
}
