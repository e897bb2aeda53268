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


use chrono::DateTime;
use chrono::Duration;
use serde::Serialize;
use versecards_core::CardId;
use versecards_core::Clock;
use versecards_core::Date;
use versecards_core::ErrorReport;
use versecards_core::MemoryCardService;
use versecards_core::MemoryCardStore;
use versecards_core::Outcome;
use versecards_core::Timestamp;
use versecards_core::UserId;
use versecards_core::VerseReference;
use wasm_bindgen::prelude::*;
use web_sys::console;

mod storage;

use storage::LocalStore;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"versecards WASM initialized".into());
}

/// The browser's clock, in local time.
struct BrowserClock;

impl Clock for BrowserClock {
    fn now(&self) -> Timestamp {
        let now = js_sys::Date::new_0();
        let utc = DateTime::from_timestamp_millis(now.get_time() as i64).unwrap_or_default();
        // getTimezoneOffset() is UTC minus local time, in minutes.
        let offset = Duration::minutes(now.get_timezone_offset() as i64);
        Timestamp::new(utc.naive_utc() - offset)
    }
}

fn js_error(e: ErrorReport) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error(e.into()))
}

fn parse_as_of(as_of: Option<String>, clock: &BrowserClock) -> Result<Date, JsValue> {
    match as_of {
        Some(s) => s.parse().map_err(js_error),
        None => Ok(clock.today()),
    }
}

/// Memorization tools for one signed-in user. Cards are returned as JSON
/// strings; errors are thrown as strings.
#[wasm_bindgen]
pub struct MemoryTools {
    user: UserId,
    service: MemoryCardService<LocalStore, BrowserClock>,
}

#[wasm_bindgen]
impl MemoryTools {
    #[wasm_bindgen(constructor)]
    pub fn new(user: &str) -> Result<MemoryTools, JsValue> {
        let user: UserId = user.parse().map_err(js_error)?;
        let store = LocalStore::new().map_err(js_error)?;
        Ok(Self {
            user,
            service: MemoryCardService::new(store, BrowserClock),
        })
    }

    /// The card for a verse, as JSON.
    #[wasm_bindgen]
    pub fn get_card(&self, reference: &str) -> Result<String, JsValue> {
        let reference: VerseReference = reference.parse().map_err(js_error)?;
        let card = self
            .service
            .get_card(&self.user, &reference)
            .map_err(js_error)?;
        to_json(&card)
    }

    /// Whether the user is already memorizing a verse.
    #[wasm_bindgen]
    pub fn has_card(&self, reference: &str) -> Result<bool, JsValue> {
        let reference: VerseReference = reference.parse().map_err(js_error)?;
        let found = self
            .service
            .store()
            .find_by_user_and_reference(&self.user, &reference)
            .map_err(js_error)?;
        Ok(found.is_some())
    }

    #[wasm_bindgen]
    pub fn add_card(
        &mut self,
        reference: &str,
        verse_text: &str,
        notes: Option<String>,
    ) -> Result<String, JsValue> {
        let reference: VerseReference = reference.parse().map_err(js_error)?;
        let card = self
            .service
            .add_card(&self.user, reference, verse_text, notes)
            .map_err(js_error)?;
        to_json(&card)
    }

    /// Record a review. `outcome` is "success" or "failure".
    #[wasm_bindgen]
    pub fn record_review(&mut self, card_id: u32, outcome: &str) -> Result<String, JsValue> {
        let outcome: Outcome = outcome.parse().map_err(js_error)?;
        let card = self
            .service
            .record_review(CardId::new(card_id.into()), outcome)
            .map_err(js_error)?;
        to_json(&card)
    }

    #[wasm_bindgen]
    pub fn update_notes(&mut self, card_id: u32, notes: &str) -> Result<String, JsValue> {
        let card = self
            .service
            .update_notes(CardId::new(card_id.into()), notes)
            .map_err(js_error)?;
        to_json(&card)
    }

    #[wasm_bindgen]
    pub fn remove_card(&mut self, card_id: u32) -> Result<(), JsValue> {
        self.service
            .remove_card(CardId::new(card_id.into()))
            .map_err(js_error)
    }

    /// Cards due on or before `as_of` (YYYY-MM-DD, default today), as a JSON array.
    #[wasm_bindgen]
    pub fn list_due_cards(&self, as_of: Option<String>) -> Result<String, JsValue> {
        let as_of = parse_as_of(as_of, self.service.clock())?;
        let cards = self
            .service
            .list_due_cards(&self.user, as_of)
            .map_err(js_error)?;
        to_json(&cards)
    }

    #[wasm_bindgen]
    pub fn list_cards(&self) -> Result<String, JsValue> {
        let cards = self.service.list_cards(&self.user).map_err(js_error)?;
        to_json(&cards)
    }

    #[wasm_bindgen]
    pub fn stats(&self, as_of: Option<String>) -> Result<String, JsValue> {
        let as_of = parse_as_of(as_of, self.service.clock())?;
        let stats = self.service.stats(&self.user, as_of).map_err(js_error)?;
        to_json(&stats)
    }
}
