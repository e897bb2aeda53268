// Copyright 2025 Fernando Borretti
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


use serde::Deserialize;
use serde::Serialize;

/// How well a verse has been memorized, from 0 (just added, or most recently
/// forgotten) to 5. Out-of-range values are clamped on construction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct MasteryLevel(u8);

impl MasteryLevel {
    pub const MIN: MasteryLevel = MasteryLevel(0);
    pub const MAX: MasteryLevel = MasteryLevel(5);

    pub fn new(level: i64) -> Self {
        Self(level.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// One level up, saturating at the maximum.
    pub fn raised(self) -> Self {
        Self::new(self.0 as i64 + 1)
    }

    /// One level down, saturating at zero.
    pub fn lowered(self) -> Self {
        Self::new(self.0 as i64 - 1)
    }

    pub fn is_mastered(self) -> bool {
        self == Self::MAX
    }
}

impl From<i64> for MasteryLevel {
    fn from(level: i64) -> Self {
        Self::new(level)
    }
}

impl From<MasteryLevel> for u8 {
    fn from(level: MasteryLevel) -> u8 {
        level.0
    }
}
