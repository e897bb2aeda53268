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


use clap::Parser;
use clap::Subcommand;
use versecards_core::CardId;
use versecards_core::Date;
use versecards_core::Fallible;
use versecards_core::Outcome;
use versecards_core::VerseReference;

use crate::cmd::cards::add_card;
use crate::cmd::cards::list_cards;
use crate::cmd::cards::record_review;
use crate::cmd::cards::remove_card;
use crate::cmd::cards::show_card;
use crate::cmd::cards::update_notes;
use crate::cmd::due::list_due;
use crate::cmd::serve::server::ServerConfig;
use crate::cmd::serve::server::start_server;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::config::Config;
use crate::config::Settings;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file. By default, `versecards.toml` in the current directory is used if it exists.
    #[arg(long, global = true)]
    config: Option<String>,
    /// Path to the card database. Overrides the configuration file.
    #[arg(long, global = true)]
    database: Option<String>,
    /// The user whose cards to work with. Overrides the configuration file.
    #[arg(long, global = true)]
    user: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start memorizing a verse.
    Add {
        /// The verse reference, e.g. "John 3:16".
        reference: VerseReference,
        /// The text of the verse.
        text: String,
        /// Optional notes to attach to the card.
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show the card for a verse.
    Show {
        /// The verse reference, e.g. "John 3:16".
        reference: VerseReference,
    },
    /// Record the outcome of reviewing a card.
    Review {
        /// The card ID.
        id: CardId,
        /// Whether the verse was recalled: "success" or "failure".
        outcome: Outcome,
    },
    /// Replace the notes on a card.
    Notes {
        /// The card ID.
        id: CardId,
        /// The new notes.
        notes: String,
    },
    /// Delete a card and its review history.
    Remove {
        /// The card ID.
        id: CardId,
    },
    /// List the cards due for review, earliest first.
    Due {
        /// List cards due on or before this date (YYYY-MM-DD). By default, today.
        #[arg(long)]
        as_of: Option<Date>,
        /// Maximum number of cards to list.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List all cards.
    List,
    /// Print collection statistics.
    Stats {
        /// Count cards due on or before this date (YYYY-MM-DD). By default, today.
        #[arg(long)]
        as_of: Option<Date>,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Serve the card operations as a JSON API.
    Serve {
        /// The host address to bind to. Overrides the configuration file.
        #[arg(long)]
        host: Option<String>,
        /// The port to listen on. Overrides the configuration file.
        #[arg(long)]
        port: Option<u16>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let config: Config = Config::load(cli.config.as_deref())?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level()))
        .init();
    let settings: Settings = Settings::resolve(config, cli.database, cli.user);
    match cli.command {
        Command::Add {
            reference,
            text,
            notes,
        } => add_card(&settings, reference, text, notes),
        Command::Show { reference } => show_card(&settings, reference),
        Command::Review { id, outcome } => record_review(&settings, id, outcome),
        Command::Notes { id, notes } => update_notes(&settings, id, notes),
        Command::Remove { id } => remove_card(&settings, id),
        Command::Due { as_of, limit } => list_due(&settings, as_of, limit),
        Command::List => list_cards(&settings),
        Command::Stats { as_of, format } => print_stats(&settings, as_of, format),
        Command::Serve { host, port } => {
            let config = ServerConfig {
                database: settings.database,
                host: host.unwrap_or(settings.host),
                port: port.unwrap_or(settings.port),
            };
            start_server(config).await
        }
    }
}
