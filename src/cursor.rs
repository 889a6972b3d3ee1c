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

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::item::PaginatableItem;
use crate::range::Position;

/// The resumption point of a paged walk.
///
/// A cursor is produced at the end of every page fetch and is the only state
/// a caller needs to store to continue paging later, possibly in another
/// process. Its serialized shape is stable:
///
/// ```json
/// {"resumePosition": 1042, "resumeIndex": 3, "hasMore": true}
/// ```
///
/// - `resume_position == None` is the terminal state: there are no more pages.
/// - When resuming at `resume_position`, every item at that position whose
///   index is `<= resume_index` has already been returned and is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub resume_position: Option<Position>,
    #[serde(default)]
    pub resume_index: Option<u64>,
    pub has_more: bool,
}

impl Cursor {
    /// A cursor that starts at `position` without skipping any item.
    pub fn start(position: Position) -> Self {
        Self {
            resume_position: Some(position),
            resume_index: None,
            has_more: true,
        }
    }

    /// A cursor that resumes right after `item`.
    pub fn after<T>(item: &T) -> Self
    where T: PaginatableItem + ?Sized {
        Self {
            resume_position: Some(item.position()),
            resume_index: Some(item.index_within_position()),
            has_more: true,
        }
    }

    /// The cursor of an exhausted walk.
    pub fn terminal() -> Self {
        Self {
            resume_position: None,
            resume_index: None,
            has_more: false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.resume_position.is_none()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.resume_position, self.resume_index) {
            (None, _) => write!(f, "(end)"),
            (Some(p), None) => write!(f, "(at {})", p),
            (Some(p), Some(i)) => write!(f, "(after {}.{})", p, i),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cursor_constructors() {
        let c = Cursor::start(100);
        assert_eq!(c.resume_position, Some(100));
        assert_eq!(c.resume_index, None);
        assert!(c.has_more);
        assert!(!c.is_terminal());

        let c = Cursor::after(&(42u64, 3u64));
        assert_eq!(c.resume_position, Some(42));
        assert_eq!(c.resume_index, Some(3));
        assert!(c.has_more);

        let c = Cursor::terminal();
        assert!(c.is_terminal());
        assert!(!c.has_more);
    }

    #[test]
    fn test_cursor_display() {
        assert_eq!(Cursor::start(5).to_string(), "(at 5)");
        assert_eq!(Cursor::after(&(5u64, 2u64)).to_string(), "(after 5.2)");
        assert_eq!(Cursor::terminal().to_string(), "(end)");
    }

    #[test]
    fn test_cursor_serde_shape() -> anyhow::Result<()> {
        let c = Cursor::after(&(1042u64, 3u64));
        let s = serde_json::to_string(&c)?;
        assert_eq!(
            s,
            r#"{"resumePosition":1042,"resumeIndex":3,"hasMore":true}"#
        );

        let s = serde_json::to_string(&Cursor::terminal())?;
        assert_eq!(
            s,
            r#"{"resumePosition":null,"resumeIndex":null,"hasMore":false}"#
        );

        // `resumeIndex` may be omitted.
        let c: Cursor = serde_json::from_str(r#"{"resumePosition":7,"hasMore":true}"#)?;
        assert_eq!(c, Cursor::start(7));
        Ok(())
    }
}
