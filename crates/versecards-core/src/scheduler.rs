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


//! Leitner-style review scheduling.
//!
//! Each mastery level maps to a fixed wait before the next review. A
//! successful recall moves the card one level up the ladder, a failed one
//! moves it one level down.

use crate::error::Fallible;
use crate::types::card::MemoryCard;
use crate::types::date::Date;
use crate::types::mastery::MasteryLevel;
use crate::types::outcome::Outcome;
use crate::types::timestamp::Timestamp;

pub type IntervalDays = i64;

/// Days until the next review, indexed by mastery level. Levels past the end
/// of the table use the last entry.
pub const INTERVALS: [IntervalDays; 5] = [1, 3, 7, 14, 30];

/// The interval for a card sitting at `level`.
pub fn interval(level: MasteryLevel) -> IntervalDays {
    let idx = level.value() as usize;
    INTERVALS
        .get(idx)
        .copied()
        .unwrap_or(INTERVALS[INTERVALS.len() - 1])
}

/// Given a card's current level and the outcome of a review, compute its new
/// level and the wait until it is next due.
pub fn next_state(current: MasteryLevel, outcome: Outcome) -> (MasteryLevel, IntervalDays) {
    let level = match outcome {
        Outcome::Success => current.raised(),
        Outcome::Failure => current.lowered(),
    };
    (level, interval(level))
}

/// The date a card reviewed at `reviewed_at` with the given interval falls due.
pub fn due_date(reviewed_at: Timestamp, interval_days: IntervalDays) -> Fallible<Date> {
    reviewed_at.date().add_days(interval_days)
}

/// Apply a review to a card, returning the updated card. Identity, text and
/// notes are carried over unchanged.
pub fn apply_review(
    card: &MemoryCard,
    outcome: Outcome,
    reviewed_at: Timestamp,
) -> Fallible<MemoryCard> {
    let (mastery_level, review_interval_days) = next_state(card.mastery_level, outcome);
    Ok(MemoryCard {
        mastery_level,
        review_count: card.review_count + 1,
        last_reviewed_at: Some(reviewed_at),
        next_review_date: due_date(reviewed_at, review_interval_days)?,
        review_interval_days,
        ..card.clone()
    })
}
