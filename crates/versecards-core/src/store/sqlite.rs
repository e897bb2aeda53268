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


use std::path::Path;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::store::MemoryCardStore;
use crate::types::card::MemoryCard;
use crate::types::card::NewCard;
use crate::types::date::Date;
use crate::types::ids::CardId;
use crate::types::ids::UserId;
use crate::types::mastery::MasteryLevel;
use crate::types::timestamp::Timestamp;
use crate::types::verse_reference::VerseReference;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS memory_cards (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    verse_reference TEXT NOT NULL,
    verse_text TEXT NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    mastery_level INTEGER NOT NULL CHECK(mastery_level BETWEEN 0 AND 5),
    review_count INTEGER NOT NULL CHECK(review_count >= 0),
    last_reviewed_at TEXT,
    next_review_date TEXT NOT NULL,
    review_interval_days INTEGER NOT NULL CHECK(review_interval_days >= 1),
    created_at TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 0 CHECK(version >= 0)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_memory_cards_user_reference
    ON memory_cards(user_id, verse_reference);
CREATE INDEX IF NOT EXISTS idx_memory_cards_due
    ON memory_cards(user_id, next_review_date);
"#;

const SELECT_COLUMNS: &str = "id, user_id, verse_reference, verse_text, notes, mastery_level, \
     review_count, last_reviewed_at, next_review_date, review_interval_days, created_at, version";

/// A card store backed by a SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Fallible<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        log::info!("Opened card database at {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> Fallible<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Fallible<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    fn select(&self, clause: &str, params: impl rusqlite::Params) -> Fallible<Vec<MemoryCard>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM memory_cards {clause}");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params, CardRow::from_row)?
            .collect::<Result<Vec<CardRow>, rusqlite::Error>>()?;
        rows.into_iter().map(MemoryCard::try_from).collect()
    }
}

/// A row as stored, before its columns are parsed into domain types.
struct CardRow {
    id: i64,
    user_id: String,
    verse_reference: String,
    verse_text: String,
    notes: String,
    mastery_level: i64,
    review_count: i64,
    last_reviewed_at: Option<String>,
    next_review_date: String,
    review_interval_days: i64,
    created_at: String,
    version: i64,
}

impl CardRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            verse_reference: row.get(2)?,
            verse_text: row.get(3)?,
            notes: row.get(4)?,
            mastery_level: row.get(5)?,
            review_count: row.get(6)?,
            last_reviewed_at: row.get(7)?,
            next_review_date: row.get(8)?,
            review_interval_days: row.get(9)?,
            created_at: row.get(10)?,
            version: row.get(11)?,
        })
    }
}

impl TryFrom<CardRow> for MemoryCard {
    type Error = ErrorReport;

    fn try_from(row: CardRow) -> Result<Self, Self::Error> {
        let corrupt = |e: ErrorReport| {
            ErrorReport::store_unavailable(format!(
                "corrupt row for card {}: {}",
                row.id,
                e.message()
            ))
        };
        let review_count = usize::try_from(row.review_count)
            .map_err(|_| ErrorReport::new("negative review count"))
            .map_err(corrupt)?;
        let version = u64::try_from(row.version)
            .map_err(|_| ErrorReport::new("negative version"))
            .map_err(corrupt)?;
        Ok(MemoryCard {
            id: CardId::new(row.id),
            user: UserId::try_from(row.user_id.clone()).map_err(corrupt)?,
            verse_reference: VerseReference::parse(&row.verse_reference).map_err(corrupt)?,
            verse_text: row.verse_text.clone(),
            notes: row.notes.clone(),
            mastery_level: MasteryLevel::new(row.mastery_level),
            review_count,
            last_reviewed_at: row
                .last_reviewed_at
                .clone()
                .map(Timestamp::try_from)
                .transpose()
                .map_err(corrupt)?,
            next_review_date: row.next_review_date.parse::<Date>().map_err(corrupt)?,
            review_interval_days: row.review_interval_days,
            created_at: Timestamp::try_from(row.created_at.clone()).map_err(corrupt)?,
            version,
        })
    }
}

impl MemoryCardStore for SqliteStore {
    fn insert(&mut self, card: NewCard) -> Fallible<CardId> {
        self.conn.execute(
            "INSERT INTO memory_cards (user_id, verse_reference, verse_text, notes, \
             mastery_level, review_count, last_reviewed_at, next_review_date, \
             review_interval_days, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                card.user.as_str(),
                card.verse_reference.as_str(),
                card.verse_text,
                card.notes,
                card.mastery_level.value(),
                card.review_count as i64,
                card.last_reviewed_at.map(String::from),
                card.next_review_date.to_string(),
                card.review_interval_days,
                card.created_at.to_string(),
            ],
        )?;
        let id = CardId::new(self.conn.last_insert_rowid());
        log::debug!("Inserted card {id} ({}) for {}", card.verse_reference, card.user);
        Ok(id)
    }

    fn find_by_user_and_reference(
        &self,
        user: &UserId,
        reference: &VerseReference,
    ) -> Fallible<Option<MemoryCard>> {
        let cards = self.select(
            "WHERE user_id = ?1 AND verse_reference = ?2",
            params![user.as_str(), reference.as_str()],
        )?;
        Ok(cards.into_iter().next())
    }

    fn find_by_id(&self, id: CardId) -> Fallible<Option<MemoryCard>> {
        let cards = self.select("WHERE id = ?1", params![id.into_inner()])?;
        Ok(cards.into_iter().next())
    }

    fn update(&mut self, card: &mut MemoryCard) -> Fallible<()> {
        let expected = i64::try_from(card.version).map_err(|_| {
            ErrorReport::invalid_input(format!("card {} has an invalid version.", card.id))
        })?;
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE memory_cards SET notes = ?1, mastery_level = ?2, review_count = ?3, \
             last_reviewed_at = ?4, next_review_date = ?5, review_interval_days = ?6, \
             version = version + 1 \
             WHERE id = ?7 AND version = ?8",
            params![
                card.notes,
                card.mastery_level.value(),
                card.review_count as i64,
                card.last_reviewed_at.map(String::from),
                card.next_review_date.to_string(),
                card.review_interval_days,
                card.id.into_inner(),
                expected,
            ],
        )?;
        if changed == 0 {
            let exists = tx
                .query_row(
                    "SELECT 1 FROM memory_cards WHERE id = ?1",
                    params![card.id.into_inner()],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            return Err(if exists {
                ErrorReport::conflict(format!("card {} was modified concurrently.", card.id))
            } else {
                ErrorReport::not_found(format!("no card with ID {}.", card.id))
            });
        }
        tx.commit()?;
        card.version += 1;
        log::debug!("Updated card {} to version {}", card.id, card.version);
        Ok(())
    }

    fn delete(&mut self, id: CardId) -> Fallible<()> {
        let deleted = self.conn.execute(
            "DELETE FROM memory_cards WHERE id = ?1",
            params![id.into_inner()],
        )?;
        if deleted == 0 {
            return Err(ErrorReport::not_found(format!("no card with ID {id}.")));
        }
        log::debug!("Deleted card {id}");
        Ok(())
    }

    fn query_due(&self, user: &UserId, as_of: Date) -> Fallible<Vec<MemoryCard>> {
        self.select(
            "WHERE user_id = ?1 AND next_review_date <= ?2 \
             ORDER BY next_review_date, verse_reference",
            params![user.as_str(), as_of.to_string()],
        )
    }

    fn list_by_user(&self, user: &UserId) -> Fallible<Vec<MemoryCard>> {
        self.select(
            "WHERE user_id = ?1 ORDER BY verse_reference",
            params![user.as_str()],
        )
    }
}
