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

//! Positions, ranges and the direction a walk travels in.
//!
//! The functions here are the pure range arithmetic of both walkers:
//! computing the next range to query, stepping past a queried range and
//! checking whether a position already lies beyond the outer boundary.
//!
//! The pager queries exactly `width` positions per range
//! ([`compute_range`]); the bulk walker steps `width` positions past its
//! start and therefore queries `width + 1` ([`compute_bulk_range`]).

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// A range-addressable coordinate, e.g. a block number.
pub type Position = u64;

/// An inclusive range of positions `[low, high]` handed to one query.
///
/// `low <= high` always holds for ranges produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockRange {
    pub low: Position,
    pub high: Position,
}

impl BlockRange {
    pub fn new(low: Position, high: Position) -> Self {
        debug_assert!(low <= high, "BlockRange: low {} > high {}", low, high);
        Self { low, high }
    }

    /// Number of positions covered by this range.
    pub fn len(&self) -> u64 {
        self.high - self.low + 1
    }

    /// A range always covers at least one position.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, position: Position) -> bool {
        self.low <= position && position <= self.high
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// The order in which positions are visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Walk increasing positions toward the latest position.
    #[default]
    Forward,
    /// Walk decreasing positions toward the earliest position.
    Backward,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`Direction`] from an unknown name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction: {0:?}, expect \"forward\" or \"backward\"")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Direction::Forward),
            "backward" => Ok(Direction::Backward),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Compute the range to query next.
///
/// - Forward: covers `[start, start + width - 1]`, capped at `outer_boundary`.
/// - Backward: covers `[start - width + 1, start]`, floored at `outer_boundary`.
///
/// Returns `None` if `start` already lies beyond `outer_boundary`.
/// A `width` of 0 is treated as 1: the start position alone is always a valid range.
pub fn compute_range(
    start: Position,
    width: u64,
    direction: Direction,
    outer_boundary: Position,
) -> Option<BlockRange> {
    if is_past_boundary(start, direction, outer_boundary) {
        return None;
    }

    let extra = width.max(1) - 1;

    let range = match direction {
        Direction::Forward => {
            let high = start.saturating_add(extra).min(outer_boundary);
            BlockRange::new(start, high)
        }
        Direction::Backward => {
            let low = start.saturating_sub(extra).max(outer_boundary);
            BlockRange::new(low, start)
        }
    };

    Some(range)
}

/// Compute the range the bulk walker queries next.
///
/// The bulk walker steps `width` positions past `start`, so the range spans
/// `width + 1` positions:
///
/// - Forward: covers `[start, start + width]`, capped at `outer_boundary`.
/// - Backward: covers `[start - width, start]`, floored at `outer_boundary`.
///
/// Returns `None` if `start` already lies beyond `outer_boundary`.
pub fn compute_bulk_range(
    start: Position,
    width: u64,
    direction: Direction,
    outer_boundary: Position,
) -> Option<BlockRange> {
    if is_past_boundary(start, direction, outer_boundary) {
        return None;
    }

    let range = match direction {
        Direction::Forward => {
            let high = start.saturating_add(width).min(outer_boundary);
            BlockRange::new(start, high)
        }
        Direction::Backward => {
            let low = start.saturating_sub(width).max(outer_boundary);
            BlockRange::new(low, start)
        }
    };

    Some(range)
}

/// Whether `position` has moved beyond `outer_boundary` in the walk direction.
///
/// The boundary itself is not past: it is the last position a walk visits.
pub fn is_past_boundary(position: Position, direction: Direction, outer_boundary: Position) -> bool {
    match direction {
        Direction::Forward => position > outer_boundary,
        Direction::Backward => position < outer_boundary,
    }
}

/// The position one unit past `queried` in the walk direction.
///
/// Returns `None` when stepping would leave the representable positions,
/// which means there is nothing left to walk.
pub fn next_start(queried: &BlockRange, direction: Direction) -> Option<Position> {
    match direction {
        Direction::Forward => queried.high.checked_add(1),
        Direction::Backward => queried.low.checked_sub(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(low: u64, high: u64) -> BlockRange {
        BlockRange::new(low, high)
    }

    #[test]
    fn test_compute_range_forward() {
        assert_eq!(
            compute_range(1000, 100, Direction::Forward, 2000),
            Some(r(1000, 1099))
        );
        // Capped by the boundary
        assert_eq!(
            compute_range(1100, 150, Direction::Forward, 1200),
            Some(r(1100, 1200))
        );
        // The boundary itself is a valid 1-wide range
        assert_eq!(
            compute_range(1200, 150, Direction::Forward, 1200),
            Some(r(1200, 1200))
        );
        assert_eq!(compute_range(1201, 150, Direction::Forward, 1200), None);
    }

    #[test]
    fn test_compute_range_backward() {
        assert_eq!(
            compute_range(1200, 100, Direction::Backward, 1000),
            Some(r(1101, 1200))
        );
        assert_eq!(
            compute_range(1100, 150, Direction::Backward, 1000),
            Some(r(1000, 1100))
        );
        assert_eq!(
            compute_range(1000, 150, Direction::Backward, 1000),
            Some(r(1000, 1000))
        );
        assert_eq!(compute_range(999, 150, Direction::Backward, 1000), None);
    }

    #[test]
    fn test_compute_range_saturates_at_type_limits() {
        assert_eq!(
            compute_range(5, 100, Direction::Backward, 0),
            Some(r(0, 5))
        );
        assert_eq!(
            compute_range(u64::MAX - 1, 100, Direction::Forward, u64::MAX),
            Some(r(u64::MAX - 1, u64::MAX))
        );
    }

    #[test]
    fn test_compute_range_zero_width_collapses_to_start() {
        assert_eq!(compute_range(7, 0, Direction::Forward, 10), Some(r(7, 7)));
        assert_eq!(compute_range(7, 0, Direction::Backward, 0), Some(r(7, 7)));
    }

    #[test]
    fn test_compute_bulk_range() {
        assert_eq!(
            compute_bulk_range(1000, 100, Direction::Forward, 1200),
            Some(r(1000, 1100))
        );
        assert_eq!(
            compute_bulk_range(1101, 150, Direction::Forward, 1200),
            Some(r(1101, 1200))
        );
        assert_eq!(
            compute_bulk_range(1200, 100, Direction::Backward, 1000),
            Some(r(1100, 1200))
        );
        assert_eq!(
            compute_bulk_range(1099, 150, Direction::Backward, 1000),
            Some(r(1000, 1099))
        );
        assert_eq!(compute_bulk_range(1201, 1, Direction::Forward, 1200), None);
        assert_eq!(compute_bulk_range(999, 1, Direction::Backward, 1000), None);

        assert_eq!(compute_bulk_range(3, 100, Direction::Backward, 0), Some(r(0, 3)));
        assert_eq!(
            compute_bulk_range(u64::MAX - 1, 100, Direction::Forward, u64::MAX),
            Some(r(u64::MAX - 1, u64::MAX))
        );
    }

    #[test]
    fn test_next_start() {
        assert_eq!(next_start(&r(10, 20), Direction::Forward), Some(21));
        assert_eq!(next_start(&r(10, 20), Direction::Backward), Some(9));
        assert_eq!(next_start(&r(0, 20), Direction::Backward), None);
        assert_eq!(next_start(&r(10, u64::MAX), Direction::Forward), None);
    }

    #[test]
    fn test_block_range_len_and_display() {
        let range = r(1000, 1099);
        assert_eq!(range.len(), 100);
        assert!(range.contains(1000));
        assert!(range.contains(1099));
        assert!(!range.contains(1100));
        assert_eq!(range.to_string(), "[1000, 1099]");
    }

    #[test]
    fn test_direction_names() -> anyhow::Result<()> {
        assert_eq!("forward".parse::<Direction>()?, Direction::Forward);
        assert_eq!("backward".parse::<Direction>()?, Direction::Backward);
        assert_eq!(
            "sideways".parse::<Direction>(),
            Err(ParseDirectionError("sideways".to_string()))
        );

        assert_eq!(serde_json::to_string(&Direction::Backward)?, "\"backward\"");
        let d: Direction = serde_json::from_str("\"forward\"")?;
        assert_eq!(d, Direction::Forward);
        assert_eq!(Direction::Backward.to_string(), "backward");
        Ok(())
    }
}
