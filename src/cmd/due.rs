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


use versecards_core::Date;
use versecards_core::Fallible;
use versecards_core::MemoryCard;

use crate::cmd::format_card;
use crate::cmd::open_service;
use crate::config::Settings;

pub fn list_due(settings: &Settings, as_of: Option<Date>, limit: Option<usize>) -> Fallible<()> {
    let user = settings.user()?;
    let service = open_service(&settings.database)?;
    let as_of: Date = as_of.unwrap_or_else(|| service.today());
    let due: Vec<MemoryCard> = service.list_due_cards(&user, as_of)?;
    let total = due.len();
    let due: Vec<MemoryCard> = match limit {
        Some(limit) => due.into_iter().take(limit).collect(),
        None => due,
    };
    if due.is_empty() {
        println!("No cards due on {as_of}.");
        return Ok(());
    }
    for card in due.iter() {
        println!("{}", format_card(card));
    }
    if due.len() < total {
        println!("({} of {total} due cards shown.)", due.len());
    }
    Ok(())
}
