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


use versecards_core::CardId;
use versecards_core::Date;
use versecards_core::ErrorReport;
use versecards_core::Fallible;
use versecards_core::InMemoryStore;
use versecards_core::MemoryCard;
use versecards_core::MemoryCardStore;
use versecards_core::NewCard;
use versecards_core::StoreSnapshot;
use versecards_core::UserId;
use versecards_core::VerseReference;
use web_sys::Storage as WebStorage;

const STORE_KEY: &str = "versecards:store";

/// Where the serialized store lives between page loads.
pub trait Backend {
    fn read(&self) -> Fallible<Option<String>>;
    fn write(&self, json: &str) -> Fallible<()>;
}

impl Backend for WebStorage {
    fn read(&self) -> Fallible<Option<String>> {
        self.get_item(STORE_KEY)
            .map_err(|_| ErrorReport::store_unavailable("failed to read localStorage"))
    }

    fn write(&self, json: &str) -> Fallible<()> {
        self.set_item(STORE_KEY, json)
            .map_err(|_| ErrorReport::store_unavailable("failed to write localStorage"))
    }
}

/// A card store kept in memory and mirrored to `localStorage` after every
/// write. Without `localStorage` (private browsing, some embedded views) it
/// behaves as a purely in-memory store.
///
/// A write only becomes visible once it has been saved: if saving fails the
/// store is left exactly as it was.
pub struct LocalStore<B = WebStorage> {
    backend: Option<B>,
    cards: InMemoryStore,
}

impl LocalStore<WebStorage> {
    pub fn new() -> Fallible<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        Self::with_backend(storage)
    }
}

impl<B: Backend> LocalStore<B> {
    pub fn with_backend(backend: Option<B>) -> Fallible<Self> {
        let saved = match &backend {
            Some(backend) => backend.read()?,
            None => None,
        };
        let snapshot: StoreSnapshot = match saved {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                ErrorReport::store_unavailable(format!("corrupt card data in localStorage: {e}"))
            })?,
            None => StoreSnapshot::default(),
        };
        Ok(Self {
            backend,
            cards: InMemoryStore::from_snapshot(snapshot),
        })
    }

    /// Run `op` against a copy of the cards, save the copy, and only then
    /// make it current.
    fn write<T>(&mut self, op: impl FnOnce(&mut InMemoryStore) -> Fallible<T>) -> Fallible<T> {
        let mut staged = self.cards.clone();
        let value = op(&mut staged)?;
        if let Some(backend) = &self.backend {
            backend.write(&serde_json::to_string(&staged.snapshot())?)?;
        }
        self.cards = staged;
        Ok(value)
    }
}

impl<B: Backend> MemoryCardStore for LocalStore<B> {
    fn insert(&mut self, card: NewCard) -> Fallible<CardId> {
        self.write(|cards| cards.insert(card))
    }

    fn find_by_user_and_reference(
        &self,
        user: &UserId,
        reference: &VerseReference,
    ) -> Fallible<Option<MemoryCard>> {
        self.cards.find_by_user_and_reference(user, reference)
    }

    fn find_by_id(&self, id: CardId) -> Fallible<Option<MemoryCard>> {
        self.cards.find_by_id(id)
    }

    fn update(&mut self, card: &mut MemoryCard) -> Fallible<()> {
        let mut written = card.clone();
        self.write(|cards| cards.update(&mut written))?;
        *card = written;
        Ok(())
    }

    fn delete(&mut self, id: CardId) -> Fallible<()> {
        self.write(|cards| cards.delete(id))
    }

    fn query_due(&self, user: &UserId, as_of: Date) -> Fallible<Vec<MemoryCard>> {
        self.cards.query_due(user, as_of)
    }

    fn list_by_user(&self, user: &UserId) -> Fallible<Vec<MemoryCard>> {
        self.cards.list_by_user(user)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::cell::RefCell;
    use std::rc::Rc;

    use versecards_core::ErrorKind;
    use versecards_core::Timestamp;

    use super::*;

    /// A backend shared between store instances, standing in for a page
    /// reload. Writes fail while `full` is set.
    #[derive(Clone, Default)]
    struct FakeStorage {
        saved: Rc<RefCell<Option<String>>>,
        full: Rc<Cell<bool>>,
    }

    impl Backend for FakeStorage {
        fn read(&self) -> Fallible<Option<String>> {
            Ok(self.saved.borrow().clone())
        }

        fn write(&self, json: &str) -> Fallible<()> {
            if self.full.get() {
                return Err(ErrorReport::store_unavailable("quota exceeded"));
            }
            *self.saved.borrow_mut() = Some(json.to_string());
            Ok(())
        }
    }

    fn new_card(reference: &str) -> Fallible<NewCard> {
        Ok(NewCard::new(
            "alice".parse()?,
            reference.parse()?,
            "text".to_string(),
            String::new(),
            Timestamp::try_from("2024-03-01T08:00:00.000".to_string())?,
        ))
    }

    #[test]
    fn test_reload_keeps_cards() -> Fallible<()> {
        let storage = FakeStorage::default();
        let mut store = LocalStore::with_backend(Some(storage.clone()))?;
        let id = store.insert(new_card("John 3:16")?)?;
        let mut card = store.find_by_id(id)?.unwrap();
        card.notes = "memorize by Easter".to_string();
        store.update(&mut card)?;

        let reloaded = LocalStore::with_backend(Some(storage))?;
        assert_eq!(reloaded.find_by_id(id)?, Some(card));
        Ok(())
    }

    #[test]
    fn test_removed_id_stays_removed_after_reload() -> Fallible<()> {
        let storage = FakeStorage::default();
        let mut store = LocalStore::with_backend(Some(storage.clone()))?;
        store.insert(new_card("John 3:16")?)?;
        let removed = store.insert(new_card("John 3:17")?)?;
        store.delete(removed)?;

        let mut reloaded = LocalStore::with_backend(Some(storage))?;
        let id = reloaded.insert(new_card("Psalm 23:1")?)?;
        assert_ne!(id, removed);
        assert_eq!(reloaded.find_by_id(removed)?, None);
        Ok(())
    }

    #[test]
    fn test_failed_save_leaves_store_unchanged() -> Fallible<()> {
        let storage = FakeStorage::default();
        let mut store = LocalStore::with_backend(Some(storage.clone()))?;
        let id = store.insert(new_card("John 3:16")?)?;
        let saved = storage.saved.borrow().clone();

        storage.full.set(true);
        let err = store.insert(new_card("John 3:17")?).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        let alice: UserId = "alice".parse()?;
        assert_eq!(store.list_by_user(&alice)?.len(), 1);

        let mut card = store.find_by_id(id)?.unwrap();
        card.notes = "unsaved".to_string();
        let err = store.update(&mut card).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        assert_eq!(card.version, 0);
        assert_eq!(store.find_by_id(id)?.unwrap().notes, "");

        let err = store.delete(id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        assert!(store.find_by_id(id)?.is_some());
        assert_eq!(*storage.saved.borrow(), saved);

        // Once there is room again, the retried add goes through.
        storage.full.set(false);
        store.insert(new_card("John 3:17")?)?;
        assert_eq!(store.list_by_user(&alice)?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_without_storage() -> Fallible<()> {
        let mut store: LocalStore<FakeStorage> = LocalStore::with_backend(None)?;
        let id = store.insert(new_card("John 3:16")?)?;
        assert!(store.find_by_id(id)?.is_some());
        Ok(())
    }

    #[test]
    fn test_corrupt_data() {
        let storage = FakeStorage::default();
        *storage.saved.borrow_mut() = Some("not json".to_string());
        let err = LocalStore::with_backend(Some(storage)).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    }
}
