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


use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use versecards_core::Date;
use versecards_core::Fallible;
use versecards_core::MemoryStats;

use crate::cmd::open_service;
use crate::config::Settings;

#[derive(ValueEnum, Clone, Copy, PartialEq)]
pub enum StatsFormat {
    /// Human-readable text.
    Text,
    /// A JSON object.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(settings: &Settings, as_of: Option<Date>, format: StatsFormat) -> Fallible<()> {
    let user = settings.user()?;
    let service = open_service(&settings.database)?;
    let as_of: Date = as_of.unwrap_or_else(|| service.today());
    let stats: MemoryStats = service.stats(&user, as_of)?;
    match format {
        StatsFormat::Text => println!("{}", render_text(&stats, as_of)),
        StatsFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(())
}

fn render_text(stats: &MemoryStats, as_of: Date) -> String {
    let mut out = String::new();
    out.push_str(&format!("Cards: {}\n", stats.total_cards));
    out.push_str(&format!("Due on {as_of}: {}\n", stats.due_cards));
    out.push_str(&format!("Mastered: {}\n", stats.mastered_cards));
    out.push_str(&format!("Reviews: {}\n", stats.total_reviews));
    out.push_str("By level:");
    for (level, count) in stats.cards_by_level.iter().enumerate() {
        out.push_str(&format!("\n  {level}: {count}"));
    }
    out
}
