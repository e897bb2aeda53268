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


//! versecards-core: Core library for the versecards memorization scheduler.
//!
//! This library provides WASM-compatible types and algorithms for:
//! - Scheduling verse reviews on a fixed mastery ladder
//! - Memory card types and their persistence boundary
//! - The card service that ties the two together
//!
//! The `sqlite` feature adds a SQLite-backed store; the `clock` feature adds
//! the system clock.

pub mod clock;
pub mod error;
pub mod scheduler;
pub mod service;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use clock::Clock;
pub use clock::FixedClock;
#[cfg(feature = "clock")]
pub use clock::SystemClock;
pub use error::{ErrorKind, ErrorReport, Fallible, fail};
pub use scheduler::{IntervalDays, next_state};
pub use service::MemoryCardService;
pub use store::{InMemoryStore, MemoryCardStore, StoreSnapshot};
#[cfg(feature = "sqlite")]
pub use store::SqliteStore;
pub use types::card::{MemoryCard, NewCard};
pub use types::date::Date;
pub use types::ids::{CardId, UserId};
pub use types::mastery::MasteryLevel;
pub use types::outcome::Outcome;
pub use types::stats::MemoryStats;
pub use types::timestamp::Timestamp;
pub use types::verse_reference::VerseReference;
