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


use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::store::MemoryCardStore;
use crate::types::card::MemoryCard;
use crate::types::card::NewCard;
use crate::types::date::Date;
use crate::types::ids::CardId;
use crate::types::ids::UserId;
use crate::types::verse_reference::VerseReference;

/// A store that keeps everything in a map. Used in tests and as the backing
/// cache for browser storage.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    cards: HashMap<CardId, MemoryCard>,
    last_id: i64,
}

/// The saved form of an [`InMemoryStore`]. The ID counter travels with the
/// cards so that IDs of deleted cards are never handed out again.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub last_id: i64,
    pub cards: Vec<MemoryCard>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            last_id: self.last_id,
            cards: self.cards(),
        }
    }

    /// Rebuild a store from a snapshot. The counter never goes below the
    /// largest stored ID, even if the snapshot's counter is behind.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let last_id = snapshot
            .cards
            .iter()
            .map(|card| card.id.into_inner())
            .fold(snapshot.last_id, i64::max);
        Self {
            cards: snapshot
                .cards
                .into_iter()
                .map(|card| (card.id, card))
                .collect(),
            last_id,
        }
    }

    /// Every stored card, ordered by ID.
    pub fn cards(&self) -> Vec<MemoryCard> {
        let mut cards: Vec<MemoryCard> = self.cards.values().cloned().collect();
        cards.sort_by_key(|card| card.id);
        cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn user_cards<'a>(&'a self, user: &'a UserId) -> impl Iterator<Item = &'a MemoryCard> + 'a {
        self.cards.values().filter(move |card| &card.user == user)
    }
}

impl MemoryCardStore for InMemoryStore {
    fn insert(&mut self, card: NewCard) -> Fallible<CardId> {
        let duplicate = self
            .user_cards(&card.user)
            .any(|existing| existing.verse_reference == card.verse_reference);
        if duplicate {
            return Err(ErrorReport::already_exists(format!(
                "{} already has a card for {}.",
                card.user, card.verse_reference
            )));
        }
        self.last_id += 1;
        let id = CardId::new(self.last_id);
        self.cards.insert(id, card.into_card(id));
        Ok(id)
    }

    fn find_by_user_and_reference(
        &self,
        user: &UserId,
        reference: &VerseReference,
    ) -> Fallible<Option<MemoryCard>> {
        Ok(self
            .user_cards(user)
            .find(|card| &card.verse_reference == reference)
            .cloned())
    }

    fn find_by_id(&self, id: CardId) -> Fallible<Option<MemoryCard>> {
        Ok(self.cards.get(&id).cloned())
    }

    fn update(&mut self, card: &mut MemoryCard) -> Fallible<()> {
        let stored = self
            .cards
            .get_mut(&card.id)
            .ok_or_else(|| ErrorReport::not_found(format!("no card with ID {}.", card.id)))?;
        if stored.version != card.version {
            return Err(ErrorReport::conflict(format!(
                "card {} was modified concurrently.",
                card.id
            )));
        }
        card.version += 1;
        stored.version = card.version;
        stored.notes = card.notes.clone();
        stored.mastery_level = card.mastery_level;
        stored.review_count = card.review_count;
        stored.last_reviewed_at = card.last_reviewed_at;
        stored.next_review_date = card.next_review_date;
        stored.review_interval_days = card.review_interval_days;
        Ok(())
    }

    fn delete(&mut self, id: CardId) -> Fallible<()> {
        match self.cards.remove(&id) {
            Some(_) => Ok(()),
            None => Err(ErrorReport::not_found(format!("no card with ID {id}."))),
        }
    }

    fn query_due(&self, user: &UserId, as_of: Date) -> Fallible<Vec<MemoryCard>> {
        Ok(self
            .user_cards(user)
            .filter(|card| card.is_due(as_of))
            .cloned()
            .collect())
    }

    fn list_by_user(&self, user: &UserId) -> Fallible<Vec<MemoryCard>> {
        Ok(self.user_cards(user).cloned().collect())
    }
}
