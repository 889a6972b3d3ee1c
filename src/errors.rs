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

/// Errors that can occur when resolving a walk or pager configuration.
///
/// These are raised once, before any range is queried.
#[derive(Clone, PartialEq, thiserror::Error, Debug)]
pub enum ConfigError {
    /// The smallest range width must cover at least one position.
    #[error("ZeroWidth: min_width must be >= 1")]
    ZeroWidth,

    #[error("WidthBounds: max_width={max} < min_width={min}")]
    WidthBounds { min: u64, max: u64 },

    #[error("InitialWidth: initial_width={initial} is not in [{min}, {max}]")]
    InitialWidth { initial: u64, min: u64, max: u64 },

    /// A width multiplier or divisor must be finite and greater than zero.
    #[error("Factor: {name}={value} must be finite and > 0")]
    Factor { name: &'static str, value: f64 },

    /// An activity threshold must be finite and not negative.
    #[error("Threshold: {name}={value} must be finite and >= 0")]
    Threshold { name: &'static str, value: f64 },

    #[error("ZeroPageSize: items_per_page must be >= 1")]
    ZeroPageSize,
}
