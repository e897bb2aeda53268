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


//! The persistence boundary.

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::InMemoryStore;
pub use memory::StoreSnapshot;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use crate::error::Fallible;
use crate::types::card::MemoryCard;
use crate::types::card::NewCard;
use crate::types::date::Date;
use crate::types::ids::CardId;
use crate::types::ids::UserId;
use crate::types::verse_reference::VerseReference;

/// Durable keyed storage of memory cards.
///
/// Implementations serialize concurrent writes to the same card themselves.
/// I/O failures are reported as `StoreUnavailable`; any retry policy lives in
/// the implementation, never in its callers.
pub trait MemoryCardStore {
    /// Store a new card and return its assigned ID. Fails with `AlreadyExists`
    /// if the user already has a card for that verse.
    fn insert(&mut self, card: NewCard) -> Fallible<CardId>;

    fn find_by_user_and_reference(
        &self,
        user: &UserId,
        reference: &VerseReference,
    ) -> Fallible<Option<MemoryCard>>;

    fn find_by_id(&self, id: CardId) -> Fallible<Option<MemoryCard>>;

    /// Overwrite the mutable fields of a stored card (notes and scheduling
    /// state), provided the stored version still equals `card.version`. On
    /// success both the stored version and `card.version` are bumped by one.
    ///
    /// Fails with `NotFound` if the card is gone, and with `Conflict` if the
    /// card was written since `card` was read.
    fn update(&mut self, card: &mut MemoryCard) -> Fallible<()>;

    /// Permanently delete a card. Fails with `NotFound` if it does not exist.
    fn delete(&mut self, id: CardId) -> Fallible<()>;

    /// The user's cards due on or before `as_of`, in no particular order.
    fn query_due(&self, user: &UserId, as_of: Date) -> Fallible<Vec<MemoryCard>>;

    /// All of the user's cards, in no particular order.
    fn list_by_user(&self, user: &UserId) -> Fallible<Vec<MemoryCard>>;
}
