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

//! Fetch one fixed-size page of items and the cursor to resume after it.
//!
//! A page boundary may fall in the middle of a position that holds many
//! items. The cursor therefore records the address of the last returned item
//! (position and index within position), not the position the walk reached.
//! The next page re-queries from that position and drops the items already
//! returned.
//!
//! Items fetched beyond the page boundary are discarded, not buffered: the
//! next page fetches them again.

use log::debug;
use log::warn;

use crate::config::PagerConfig;
use crate::cursor::Cursor;
use crate::item::PaginatableItem;
use crate::query::PageQuery;
use crate::range::compute_range;
use crate::range::is_past_boundary;
use crate::range::next_start;
use crate::range::Position;
use crate::width::next_width;

/// One page of items and the cursor of the page after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Cursor,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.next_cursor.has_more
    }
}

/// Where a page fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Resume {
    position: Position,
    /// Items at `position` with an index `<=` this one were already returned.
    index: Option<u64>,
}

/// Fetch one page of at most `config.items_per_page` items.
///
/// With no `cursor` the page starts at `config.start_position`. A terminal
/// cursor yields an empty page and the terminal cursor again.
///
/// `query` must return each batch in walk order, positions descending for a
/// backward walk, see [`PageQuery`]. Items are neither sorted nor
/// deduplicated here.
///
/// A query error aborts the fetch and is returned unchanged.
pub async fn get_page<T, Q>(
    config: &PagerConfig,
    query: &Q,
    cursor: Option<&Cursor>,
) -> Result<Page<T>, Q::Error>
where
    T: PaginatableItem + Send,
    Q: PageQuery<T> + ?Sized,
{
    let direction = config.walk.direction;
    let boundary = config.walk.outer_boundary;
    let sizing = &config.walk.sizing;
    let per_page = config.items_per_page;

    let resume = match cursor {
        None => Resume {
            position: config.start_position,
            index: None,
        },
        Some(Cursor {
            resume_position: Some(position),
            resume_index,
            ..
        }) => Resume {
            position: *position,
            index: *resume_index,
        },
        Some(_) => {
            debug!("get_page: terminal cursor, no more pages");
            return Ok(Page {
                items: vec![],
                next_cursor: Cursor::terminal(),
            });
        }
    };

    let mut start = resume.position;
    let mut has_more = !is_past_boundary(start, direction, boundary);
    let mut width = sizing.initial_width;
    let mut first_batch = true;
    let mut found: Vec<T> = Vec::new();

    while found.len() < per_page && has_more {
        let Some(range) = compute_range(start, width, direction, boundary) else {
            has_more = false;
            break;
        };

        debug!("get_page: query {} width={}", range, width);

        let mut batch = query.query(range).await?;
        let batch_len = batch.len();

        if batch_len > per_page.saturating_mul(10) {
            warn!(
                "get_page: range {} returns big batch of len={}, items_per_page={}",
                range, batch_len, per_page
            );
        }

        if first_batch {
            if let Some(index) = resume.index {
                batch.retain(|item| {
                    item.position() != resume.position || item.index_within_position() > index
                });

                debug!(
                    "get_page: resume after {}.{}, skipped {} items",
                    resume.position,
                    index,
                    batch_len - batch.len()
                );
            }
            first_batch = false;
        }

        found.extend(batch);

        match next_start(&range, direction) {
            Some(next) => {
                start = next;
                has_more = !is_past_boundary(start, direction, boundary);
            }
            None => has_more = false,
        }

        // The unfiltered count is the activity of the range.
        if has_more {
            width = next_width(width, batch_len, sizing);
        }
    }

    // Items beyond the page are dropped; the next page has to start at the
    // last returned item even if the walk already reached the boundary.
    let overflowed = found.len() > per_page;
    found.truncate(per_page);

    let next_cursor = match found.last() {
        Some(last) if has_more || overflowed => Cursor::after(last),
        _ => Cursor::terminal(),
    };

    debug!(
        "get_page: {} items, next cursor: {}",
        found.len(),
        next_cursor
    );

    Ok(Page {
        items: found,
        next_cursor,
    })
}
