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

use crate::scheduler::IntervalDays;
use crate::types::date::Date;
use crate::types::ids::CardId;
use crate::types::ids::UserId;
use crate::types::mastery::MasteryLevel;
use crate::types::timestamp::Timestamp;
use crate::types::verse_reference::VerseReference;

/// A verse being memorized by one user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryCard {
    pub id: CardId,
    pub user: UserId,
    /// Immutable after creation.
    pub verse_reference: VerseReference,
    /// Snapshot of the verse text taken when the card was added.
    pub verse_text: String,
    pub notes: String,
    pub mastery_level: MasteryLevel,
    /// The number of completed reviews. Never decreases.
    pub review_count: usize,
    /// Absent until the first review.
    pub last_reviewed_at: Option<Timestamp>,
    pub next_review_date: Date,
    /// The interval that produced `next_review_date`.
    pub review_interval_days: IntervalDays,
    pub created_at: Timestamp,
    /// Bumped by the store on every successful write. A write carrying an
    /// older version than the stored one is rejected as a conflict.
    #[serde(default)]
    pub version: u64,
}

impl MemoryCard {
    pub fn is_due(&self, as_of: Date) -> bool {
        self.next_review_date <= as_of
    }
}

/// A card that has not been stored yet, and therefore has no ID.
#[derive(Clone, Debug, PartialEq)]
pub struct NewCard {
    pub user: UserId,
    pub verse_reference: VerseReference,
    pub verse_text: String,
    pub notes: String,
    pub mastery_level: MasteryLevel,
    pub review_count: usize,
    pub last_reviewed_at: Option<Timestamp>,
    pub next_review_date: Date,
    pub review_interval_days: IntervalDays,
    pub created_at: Timestamp,
}

impl NewCard {
    /// A freshly added card: mastery zero, never reviewed, due on the day it
    /// was created.
    pub fn new(
        user: UserId,
        verse_reference: VerseReference,
        verse_text: String,
        notes: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            user,
            verse_reference,
            verse_text,
            notes,
            mastery_level: MasteryLevel::MIN,
            review_count: 0,
            last_reviewed_at: None,
            next_review_date: created_at.date(),
            review_interval_days: 1,
            created_at,
        }
    }

    pub fn into_card(self, id: CardId) -> MemoryCard {
        MemoryCard {
            id,
            user: self.user,
            verse_reference: self.verse_reference,
            verse_text: self.verse_text,
            notes: self.notes,
            mastery_level: self.mastery_level,
            review_count: self.review_count,
            last_reviewed_at: self.last_reviewed_at,
            next_review_date: self.next_review_date,
            review_interval_days: self.review_interval_days,
            created_at: self.created_at,
            version: 0,
        }
    }
}
