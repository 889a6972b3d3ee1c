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

//! Items that can be paged with exact resumption.

use crate::range::Position;

/// An item that carries its own address within a paged walk.
///
/// For items sharing one position, [`index_within_position`] must be
/// strictly increasing in the order the query returns them. A page cursor
/// records the address of the last item returned, and the next page skips
/// every item at that position whose index is not greater.
///
/// [`index_within_position`]: PaginatableItem::index_within_position
pub trait PaginatableItem {
    /// The position this item was found at, e.g. a block number.
    fn position(&self) -> Position;

    /// The order of this item among the items at the same position, e.g. a
    /// log or transaction index within a block.
    fn index_within_position(&self) -> u64;
}

impl<T> PaginatableItem for &T
where T: PaginatableItem
{
    fn position(&self) -> Position {
        (**self).position()
    }

    fn index_within_position(&self) -> u64 {
        (**self).index_within_position()
    }
}

impl PaginatableItem for (Position, u64) {
    fn position(&self) -> Position {
        self.0
    }

    fn index_within_position(&self) -> u64 {
        self.1
    }
}
