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
use versecards_core::Fallible;
use versecards_core::MemoryCard;
use versecards_core::Outcome;
use versecards_core::VerseReference;

use crate::cmd::format_card;
use crate::cmd::open_service;
use crate::config::Settings;

pub fn add_card(
    settings: &Settings,
    reference: VerseReference,
    text: String,
    notes: Option<String>,
) -> Fallible<()> {
    let user = settings.user()?;
    let mut service = open_service(&settings.database)?;
    let card: MemoryCard = service.add_card(&user, reference, text, notes)?;
    println!("{}", format_card(&card));
    Ok(())
}

pub fn show_card(settings: &Settings, reference: VerseReference) -> Fallible<()> {
    let user = settings.user()?;
    let service = open_service(&settings.database)?;
    let card: MemoryCard = service.get_card(&user, &reference)?;
    println!("{}", format_card(&card));
    Ok(())
}

pub fn record_review(settings: &Settings, id: CardId, outcome: Outcome) -> Fallible<()> {
    let mut service = open_service(&settings.database)?;
    let card: MemoryCard = service.record_review(id, outcome)?;
    println!("{}", format_card(&card));
    Ok(())
}

pub fn update_notes(settings: &Settings, id: CardId, notes: String) -> Fallible<()> {
    let mut service = open_service(&settings.database)?;
    let card: MemoryCard = service.update_notes(id, notes)?;
    println!("{}", format_card(&card));
    Ok(())
}

pub fn remove_card(settings: &Settings, id: CardId) -> Fallible<()> {
    let mut service = open_service(&settings.database)?;
    service.remove_card(id)?;
    println!("Removed card {id}.");
    Ok(())
}

pub fn list_cards(settings: &Settings) -> Fallible<()> {
    let user = settings.user()?;
    let service = open_service(&settings.database)?;
    let cards: Vec<MemoryCard> = service.list_cards(&user)?;
    if cards.is_empty() {
        println!("No cards.");
    }
    for card in cards.iter() {
        println!("{}", format_card(card));
    }
    Ok(())
}
