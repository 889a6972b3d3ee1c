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

//! Adaptive range width controller.

use crate::config::RangeSizing;

/// Compute the width of the next range from the item count of the last batch.
///
/// Exactly one rule applies, checked in this order:
/// 1. no items: multiply by `grow_on_zero`;
/// 2. at or above `high_activity_threshold`: divide by `shrink_on_high`;
/// 3. below `low_activity_threshold`: multiply by `grow_on_low`;
/// 4. otherwise keep the width.
///
/// The result is clamped to `[min_width, max_width]`, rounded to the nearest
/// integer and is never less than 1.
pub fn next_width(current_width: u64, items_last_batch: usize, sizing: &RangeSizing) -> u64 {
    let count = items_last_batch as f64;
    let mut width = current_width as f64;

    if items_last_batch == 0 {
        width *= sizing.grow_on_zero;
    } else if count >= sizing.high_activity_threshold {
        width /= sizing.shrink_on_high;
    } else if count < sizing.low_activity_threshold {
        width *= sizing.grow_on_low;
    }

    let width = width
        .min(sizing.max_width as f64)
        .max(sizing.min_width as f64)
        .round();

    // `as` saturates for out of range floats.
    (width as u64).max(1)
}
