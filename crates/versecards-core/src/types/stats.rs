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


use serde::Serialize;

use crate::types::card::MemoryCard;
use crate::types::date::Date;
use crate::types::mastery::MasteryLevel;

const LEVELS: usize = MasteryLevel::MAX.value() as usize + 1;

/// Summary of one user's collection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MemoryStats {
    pub total_cards: usize,
    pub due_cards: usize,
    /// Cards at the maximum mastery level.
    pub mastered_cards: usize,
    pub total_reviews: usize,
    /// Number of cards at each mastery level, indexed by level.
    pub cards_by_level: [usize; LEVELS],
}

impl MemoryStats {
    pub fn from_cards(cards: &[MemoryCard], as_of: Date) -> Self {
        let mut cards_by_level = [0; LEVELS];
        for card in cards {
            cards_by_level[card.mastery_level.value() as usize] += 1;
        }
        MemoryStats {
            total_cards: cards.len(),
            due_cards: cards.iter().filter(|card| card.is_due(as_of)).count(),
            mastered_cards: cards_by_level[LEVELS - 1],
            total_reviews: cards.iter().map(|card| card.review_count).sum(),
            cards_by_level,
        }
    }
}
