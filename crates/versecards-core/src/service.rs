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


use crate::clock::Clock;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::scheduler::apply_review;
use crate::store::MemoryCardStore;
use crate::types::card::MemoryCard;
use crate::types::card::NewCard;
use crate::types::date::Date;
use crate::types::ids::CardId;
use crate::types::ids::UserId;
use crate::types::outcome::Outcome;
use crate::types::stats::MemoryStats;
use crate::types::verse_reference::VerseReference;

/// Memorization operations for any number of users over a single store.
///
/// Every operation is one read-modify-write against the store. The service
/// keeps no state of its own beyond the store and the clock.
pub struct MemoryCardService<S, C> {
    store: S,
    clock: C,
}

impl<S: MemoryCardStore, C: Clock> MemoryCardService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn today(&self) -> Date {
        self.clock.today()
    }

    pub fn get_card(&self, user: &UserId, reference: &VerseReference) -> Fallible<MemoryCard> {
        self.store
            .find_by_user_and_reference(user, reference)?
            .ok_or_else(|| ErrorReport::not_found(format!("{user} has no card for {reference}.")))
    }

    pub fn add_card(
        &mut self,
        user: &UserId,
        reference: VerseReference,
        verse_text: impl Into<String>,
        notes: Option<String>,
    ) -> Fallible<MemoryCard> {
        if self
            .store
            .find_by_user_and_reference(user, &reference)?
            .is_some()
        {
            return Err(ErrorReport::already_exists(format!(
                "{user} already has a card for {reference}."
            )));
        }
        let new_card = NewCard::new(
            user.clone(),
            reference,
            verse_text.into(),
            notes.unwrap_or_default(),
            self.clock.now(),
        );
        let id = self.store.insert(new_card.clone())?;
        log::debug!("Added {} for {user} as card {id}", new_card.verse_reference);
        Ok(new_card.into_card(id))
    }

    pub fn record_review(&mut self, id: CardId, outcome: Outcome) -> Fallible<MemoryCard> {
        let card = self.load(id)?;
        let mut reviewed = apply_review(&card, outcome, self.clock.now())?;
        self.store.update(&mut reviewed)?;
        log::debug!(
            "Reviewed card {id} ({outcome}): level {} -> {}, due {}",
            card.mastery_level.value(),
            reviewed.mastery_level.value(),
            reviewed.next_review_date
        );
        Ok(reviewed)
    }

    pub fn update_notes(&mut self, id: CardId, notes: impl Into<String>) -> Fallible<MemoryCard> {
        let mut card = MemoryCard {
            notes: notes.into(),
            ..self.load(id)?
        };
        self.store.update(&mut card)?;
        log::debug!("Updated notes on card {id}");
        Ok(card)
    }

    pub fn remove_card(&mut self, id: CardId) -> Fallible<()> {
        self.store.delete(id)?;
        log::debug!("Removed card {id}");
        Ok(())
    }

    /// The user's cards due on or before `as_of`, earliest first, ties broken
    /// by verse reference.
    pub fn list_due_cards(&self, user: &UserId, as_of: Date) -> Fallible<Vec<MemoryCard>> {
        let mut cards = self.store.query_due(user, as_of)?;
        cards.sort_by(|a, b| {
            (a.next_review_date, &a.verse_reference).cmp(&(b.next_review_date, &b.verse_reference))
        });
        Ok(cards)
    }

    /// All of the user's cards, ordered by verse reference.
    pub fn list_cards(&self, user: &UserId) -> Fallible<Vec<MemoryCard>> {
        let mut cards = self.store.list_by_user(user)?;
        cards.sort_by(|a, b| a.verse_reference.cmp(&b.verse_reference));
        Ok(cards)
    }

    pub fn stats(&self, user: &UserId, as_of: Date) -> Fallible<MemoryStats> {
        let cards = self.store.list_by_user(user)?;
        Ok(MemoryStats::from_cards(&cards, as_of))
    }

    fn load(&self, id: CardId) -> Fallible<MemoryCard> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| ErrorReport::not_found(format!("no card with ID {id}.")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::ErrorKind;
    use crate::store::InMemoryStore;
    use crate::types::mastery::MasteryLevel;
    use crate::types::timestamp::Timestamp;

    type TestService = MemoryCardService<InMemoryStore, FixedClock>;

    fn ts(s: &str) -> Timestamp {
        Timestamp::try_from(s.to_string()).unwrap()
    }

    fn service() -> TestService {
        MemoryCardService::new(
            InMemoryStore::new(),
            FixedClock::new(ts("2024-05-01T07:30:00.000")),
        )
    }

    fn alice() -> UserId {
        "alice".parse().unwrap()
    }

    fn verse(s: &str) -> VerseReference {
        s.parse().unwrap()
    }

    #[test]
    fn test_add_then_get() -> Fallible<()> {
        let mut service = service();
        let added = service.add_card(
            &alice(),
            verse("John 3:16"),
            "For God so loved the world",
            Some("favourite".to_string()),
        )?;
        let card = service.get_card(&alice(), &verse("John 3:16"))?;
        assert_eq!(card, added);
        assert_eq!(card.mastery_level, MasteryLevel::MIN);
        assert_eq!(card.review_count, 0);
        assert_eq!(card.review_interval_days, 1);
        assert_eq!(card.last_reviewed_at, None);
        assert_eq!(card.next_review_date, service.today());
        assert_eq!(card.notes, "favourite");
        Ok(())
    }

    #[test]
    fn test_get_missing() {
        let service = service();
        let err = service.get_card(&alice(), &verse("John 3:16")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_duplicate_add_leaves_store_unchanged() -> Fallible<()> {
        let mut service = service();
        let first = service.add_card(&alice(), verse("John 3:16"), "original", None)?;
        let err = service
            .add_card(&alice(), verse("John 3:16"), "replacement", None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(service.store().len(), 1);
        assert_eq!(service.get_card(&alice(), &verse("John 3:16"))?, first);
        Ok(())
    }

    #[test]
    fn test_readd_after_remove() -> Fallible<()> {
        let mut service = service();
        let card = service.add_card(&alice(), verse("John 3:16"), "text", None)?;
        service.record_review(card.id, Outcome::Success)?;
        service.remove_card(card.id)?;
        let again = service.add_card(&alice(), verse("John 3:16"), "text", None)?;
        assert_ne!(again.id, card.id);
        assert_eq!(again.review_count, 0);
        Ok(())
    }

    #[test]
    fn test_success_from_level_two() -> Fallible<()> {
        let mut service = service();
        let mut card = service.add_card(&alice(), verse("Psalm 23:1"), "The Lord is", None)?;
        card.mastery_level = MasteryLevel::new(2);
        card.review_interval_days = 7;
        card.review_count = 3;
        service.store.update(&mut card)?;

        service.clock().set(ts("2024-05-08T20:00:00.000"));
        let reviewed = service.record_review(card.id, Outcome::Success)?;
        assert_eq!(reviewed.mastery_level, MasteryLevel::new(3));
        assert_eq!(reviewed.review_interval_days, 14);
        assert_eq!(reviewed.review_count, 4);
        let last = reviewed.last_reviewed_at.unwrap();
        assert_eq!(last, ts("2024-05-08T20:00:00.000"));
        assert_eq!(reviewed.next_review_date, last.date().add_days(14)?);
        assert_eq!(service.store().find_by_id(card.id)?, Some(reviewed));
        Ok(())
    }

    #[test]
    fn test_failure_at_level_zero() -> Fallible<()> {
        let mut service = service();
        let card = service.add_card(&alice(), verse("Psalm 23:1"), "The Lord is", None)?;
        let reviewed = service.record_review(card.id, Outcome::Failure)?;
        assert_eq!(reviewed.mastery_level, MasteryLevel::MIN);
        assert_eq!(reviewed.review_interval_days, 1);
        assert_eq!(reviewed.next_review_date, service.today().add_days(1)?);
        assert_eq!(reviewed.review_count, 1);
        Ok(())
    }

    #[test]
    fn test_review_count_always_increments() -> Fallible<()> {
        let mut service = service();
        let card = service.add_card(&alice(), verse("Romans 8:28"), "And we know", None)?;
        let outcomes = [
            Outcome::Success,
            Outcome::Failure,
            Outcome::Failure,
            Outcome::Success,
            Outcome::Success,
        ];
        for (i, outcome) in outcomes.into_iter().enumerate() {
            let reviewed = service.record_review(card.id, outcome)?;
            assert_eq!(reviewed.review_count, i + 1);
        }
        Ok(())
    }

    #[test]
    fn test_mastery_saturates() -> Fallible<()> {
        let mut service = service();
        let card = service.add_card(&alice(), verse("Romans 8:28"), "And we know", None)?;
        let mut last = card;
        for _ in 0..8 {
            last = service.record_review(last.id, Outcome::Success)?;
        }
        assert!(last.mastery_level.is_mastered());
        assert_eq!(last.review_interval_days, 30);
        Ok(())
    }

    #[test]
    fn test_review_missing_card() {
        let mut service = service();
        let err = service
            .record_review(CardId::new(99), Outcome::Success)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(service.store().is_empty());
    }

    #[test]
    fn test_update_notes_keeps_schedule() -> Fallible<()> {
        let mut service = service();
        let card = service.add_card(&alice(), verse("John 1:1"), "In the beginning", None)?;
        let reviewed = service.record_review(card.id, Outcome::Success)?;
        let updated = service.update_notes(card.id, "compare Genesis 1:1")?;
        assert_eq!(updated.notes, "compare Genesis 1:1");
        assert_eq!(updated.version, reviewed.version + 1);
        assert_eq!(
            MemoryCard {
                notes: reviewed.notes.clone(),
                version: reviewed.version,
                ..updated.clone()
            },
            reviewed
        );
        let err = service.update_notes(CardId::new(42), "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn test_remove_missing() {
        let mut service = service();
        let err = service.remove_card(CardId::new(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_list_due_cards_order() -> Fallible<()> {
        let mut service = service();
        let bob: UserId = "bob".parse()?;
        // Added 2024-05-01, all due that day.
        let romans = service.add_card(&alice(), verse("Romans 8:28"), "", None)?;
        service.add_card(&alice(), verse("John 3:16"), "", None)?;
        let psalm = service.add_card(&alice(), verse("Psalm 23:1"), "", None)?;
        service.add_card(&bob, verse("Genesis 1:1"), "", None)?;

        // Romans: success -> due 2024-05-04. Psalm: failure -> due 2024-05-02.
        service.record_review(romans.id, Outcome::Success)?;
        service.record_review(psalm.id, Outcome::Failure)?;

        let refs = |cards: Vec<MemoryCard>| -> Vec<String> {
            cards
                .into_iter()
                .map(|c| c.verse_reference.to_string())
                .collect()
        };
        let day = |s: &str| -> Date { s.parse().unwrap() };

        assert_eq!(refs(service.list_due_cards(&alice(), day("2024-04-30"))?), Vec::<String>::new());
        assert_eq!(refs(service.list_due_cards(&alice(), day("2024-05-01"))?), vec!["John 3:16"]);
        assert_eq!(
            refs(service.list_due_cards(&alice(), day("2024-05-02"))?),
            vec!["John 3:16", "Psalm 23:1"]
        );
        assert_eq!(
            refs(service.list_due_cards(&alice(), day("2024-05-04"))?),
            vec!["John 3:16", "Psalm 23:1", "Romans 8:28"]
        );
        assert_eq!(refs(service.list_due_cards(&bob, day("2024-05-04"))?), vec!["Genesis 1:1"]);
        Ok(())
    }

    #[test]
    fn test_list_due_ties_broken_by_reference() -> Fallible<()> {
        let mut service = service();
        for reference in ["Romans 8:28", "Acts 1:8", "John 3:16"] {
            service.add_card(&alice(), verse(reference), "", None)?;
        }
        let due = service.list_due_cards(&alice(), service.today())?;
        let refs: Vec<&str> = due.iter().map(|c| c.verse_reference.as_str()).collect();
        assert_eq!(refs, vec!["Acts 1:8", "John 3:16", "Romans 8:28"]);
        Ok(())
    }

    #[test]
    fn test_stats() -> Fallible<()> {
        let mut service = service();
        let john = service.add_card(&alice(), verse("John 3:16"), "", None)?;
        service.add_card(&alice(), verse("John 1:1"), "", None)?;
        for _ in 0..5 {
            service.record_review(john.id, Outcome::Success)?;
        }
        let stats = service.stats(&alice(), service.today())?;
        assert_eq!(stats.total_cards, 2);
        assert_eq!(stats.due_cards, 1);
        assert_eq!(stats.mastered_cards, 1);
        assert_eq!(stats.total_reviews, 5);
        assert_eq!(stats.cards_by_level, [1, 0, 0, 0, 0, 1]);
        Ok(())
    }

    #[test]
    fn test_list_cards_sorted() -> Fallible<()> {
        let mut service = service();
        for reference in ["Romans 8:28", "Acts 1:8"] {
            service.add_card(&alice(), verse(reference), "", None)?;
        }
        let cards = service.list_cards(&alice())?;
        assert_eq!(cards[0].verse_reference.as_str(), "Acts 1:8");
        assert_eq!(cards[1].verse_reference.as_str(), "Romans 8:28");
        Ok(())
    }
}
