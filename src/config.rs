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

//! Configuration of a walk.
//!
//! Callers describe the knobs they want to override with [`SizingOptions`].
//! The options are merged with a default set exactly once, by
//! [`RangeSizing::resolve`], which also validates the result. Walkers only
//! ever see the resolved, immutable [`RangeSizing`].

use serde::Deserialize;
use serde::Serialize;

use crate::errors::ConfigError;
use crate::range::Direction;
use crate::range::Position;

/// Optional overrides of the range sizing knobs.
///
/// Every field left as `None` takes the value from the default set used by
/// the walker it is passed to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SizingOptions {
    pub initial_width: Option<u64>,
    pub min_width: Option<u64>,
    pub max_width: Option<u64>,
    pub grow_on_zero: Option<f64>,
    pub grow_on_low: Option<f64>,
    pub shrink_on_high: Option<f64>,
    pub low_activity_threshold: Option<f64>,
    pub high_activity_threshold: Option<f64>,
}

impl SizingOptions {
    pub fn with_initial_width(mut self, v: u64) -> Self {
        self.initial_width = Some(v);
        self
    }

    pub fn with_min_width(mut self, v: u64) -> Self {
        self.min_width = Some(v);
        self
    }

    pub fn with_max_width(mut self, v: u64) -> Self {
        self.max_width = Some(v);
        self
    }

    pub fn with_grow_on_zero(mut self, v: f64) -> Self {
        self.grow_on_zero = Some(v);
        self
    }

    pub fn with_grow_on_low(mut self, v: f64) -> Self {
        self.grow_on_low = Some(v);
        self
    }

    pub fn with_shrink_on_high(mut self, v: f64) -> Self {
        self.shrink_on_high = Some(v);
        self
    }

    /// Set both activity thresholds at once.
    pub fn with_thresholds(mut self, low: f64, high: f64) -> Self {
        self.low_activity_threshold = Some(low);
        self.high_activity_threshold = Some(high);
        self
    }
}

/// The resolved knobs that drive the range width controller.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSizing {
    pub initial_width: u64,
    pub min_width: u64,
    pub max_width: u64,

    /// Width multiplier applied after a batch with no items.
    pub grow_on_zero: f64,
    /// Width multiplier applied after a batch below `low_activity_threshold`.
    pub grow_on_low: f64,
    /// Width divisor applied after a batch at or above `high_activity_threshold`.
    pub shrink_on_high: f64,

    pub low_activity_threshold: f64,
    pub high_activity_threshold: f64,
}

impl RangeSizing {
    /// Defaults of the bulk walker.
    pub fn bulk_defaults() -> Self {
        Self {
            initial_width: 100,
            min_width: 1,
            max_width: 100_000,
            grow_on_zero: 2.0,
            grow_on_low: 1.5,
            shrink_on_high: 2.0,
            low_activity_threshold: 10.0,
            high_activity_threshold: 50.0,
        }
    }

    /// Defaults of the pager, with thresholds derived from the page size.
    pub fn pager_defaults(items_per_page: usize) -> Self {
        let per_page = items_per_page as f64;

        Self {
            initial_width: 10,
            min_width: 1,
            max_width: 100_000_000,
            grow_on_zero: 2.0,
            grow_on_low: 1.5,
            shrink_on_high: 2.0,
            low_activity_threshold: per_page * 0.8,
            high_activity_threshold: per_page * 1.2,
        }
    }

    /// Merge `options` over `defaults` and validate the result.
    pub fn resolve(options: &SizingOptions, defaults: RangeSizing) -> Result<Self, ConfigError> {
        let sizing = Self {
            initial_width: options.initial_width.unwrap_or(defaults.initial_width),
            min_width: options.min_width.unwrap_or(defaults.min_width),
            max_width: options.max_width.unwrap_or(defaults.max_width),
            grow_on_zero: options.grow_on_zero.unwrap_or(defaults.grow_on_zero),
            grow_on_low: options.grow_on_low.unwrap_or(defaults.grow_on_low),
            shrink_on_high: options.shrink_on_high.unwrap_or(defaults.shrink_on_high),
            low_activity_threshold: options
                .low_activity_threshold
                .unwrap_or(defaults.low_activity_threshold),
            high_activity_threshold: options
                .high_activity_threshold
                .unwrap_or(defaults.high_activity_threshold),
        };

        sizing.validate()?;
        Ok(sizing)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_width == 0 {
            return Err(ConfigError::ZeroWidth);
        }

        if self.max_width < self.min_width {
            return Err(ConfigError::WidthBounds {
                min: self.min_width,
                max: self.max_width,
            });
        }

        if self.initial_width < self.min_width || self.initial_width > self.max_width {
            return Err(ConfigError::InitialWidth {
                initial: self.initial_width,
                min: self.min_width,
                max: self.max_width,
            });
        }

        for (name, value) in [
            ("grow_on_zero", self.grow_on_zero),
            ("grow_on_low", self.grow_on_low),
            ("shrink_on_high", self.shrink_on_high),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Factor { name, value });
            }
        }

        for (name, value) in [
            ("low_activity_threshold", self.low_activity_threshold),
            ("high_activity_threshold", self.high_activity_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Threshold { name, value });
            }
        }

        Ok(())
    }
}

/// Immutable configuration of one walk.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkConfig {
    pub direction: Direction,

    /// The last position a walk may visit: the latest position when walking
    /// forward, the earliest when walking backward. Inclusive.
    pub outer_boundary: Position,

    pub sizing: RangeSizing,
}

impl WalkConfig {
    pub fn new(direction: Direction, outer_boundary: Position, sizing: RangeSizing) -> Self {
        Self {
            direction,
            outer_boundary,
            sizing,
        }
    }
}

/// Immutable configuration of a pager.
#[derive(Debug, Clone, PartialEq)]
pub struct PagerConfig {
    pub walk: WalkConfig,

    /// Where the first page starts when no cursor is given.
    pub start_position: Position,

    pub items_per_page: usize,
}

impl PagerConfig {
    /// Build a pager configuration, filling unset `options` with
    /// [`RangeSizing::pager_defaults`].
    pub fn new(
        direction: Direction,
        start_position: Position,
        outer_boundary: Position,
        items_per_page: usize,
        options: &SizingOptions,
    ) -> Result<Self, ConfigError> {
        if items_per_page == 0 {
            return Err(ConfigError::ZeroPageSize);
        }

        let sizing = RangeSizing::resolve(options, RangeSizing::pager_defaults(items_per_page))?;

        Ok(Self {
            walk: WalkConfig::new(direction, outer_boundary, sizing),
            start_position,
            items_per_page,
        })
    }
}
