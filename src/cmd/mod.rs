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


pub mod cards;
pub mod due;
pub mod serve;
pub mod stats;

use std::path::Path;

use versecards_core::Fallible;
use versecards_core::MemoryCard;
use versecards_core::MemoryCardService;
use versecards_core::SqliteStore;
use versecards_core::SystemClock;

pub type CardService = MemoryCardService<SqliteStore, SystemClock>;

pub fn open_service(database: &Path) -> Fallible<CardService> {
    Ok(MemoryCardService::new(SqliteStore::open(database)?, SystemClock))
}

/// Render a card as a few lines of plain text.
pub fn format_card(card: &MemoryCard) -> String {
    let mut out = format!(
        "[{}] {} (level {}, {} reviews)\n    {}\n",
        card.id,
        card.verse_reference,
        card.mastery_level.value(),
        card.review_count,
        card.verse_text
    );
    if !card.notes.is_empty() {
        out.push_str(&format!("    notes: {}\n", card.notes));
    }
    out.push_str(&format!(
        "    next review: {} (interval {} days)",
        card.next_review_date, card.review_interval_days
    ));
    if let Some(last) = card.last_reviewed_at {
        out.push_str(&format!(", last reviewed {last}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use versecards_core::CardId;
    use versecards_core::NewCard;
    use versecards_core::Timestamp;

    use super::*;

    #[test]
    fn test_format_new_card() -> Fallible<()> {
        let card = NewCard::new(
            "alice".parse()?,
            "John 11:35".parse()?,
            "Jesus wept.".to_string(),
            String::new(),
            Timestamp::try_from("2024-02-10T10:00:00.000".to_string())?,
        )
        .into_card(CardId::new(4));
        assert_eq!(
            format_card(&card),
            "[4] John 11:35 (level 0, 0 reviews)\n    Jesus wept.\n    next review: 2024-02-10 (interval 1 days)"
        );
        Ok(())
    }
}
