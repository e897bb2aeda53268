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


use std::path::PathBuf;

use axum::Router;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use tokio::net::TcpListener;
use tokio::signal;
use versecards_core::Fallible;

use crate::cmd::open_service;
use crate::cmd::serve::handlers::add_card_handler;
use crate::cmd::serve::handlers::due_handler;
use crate::cmd::serve::handlers::get_card_handler;
use crate::cmd::serve::handlers::list_cards_handler;
use crate::cmd::serve::handlers::not_found_handler;
use crate::cmd::serve::handlers::notes_handler;
use crate::cmd::serve::handlers::remove_handler;
use crate::cmd::serve::handlers::review_handler;
use crate::cmd::serve::handlers::stats_handler;
use crate::cmd::serve::state::ServerState;

pub struct ServerConfig {
    pub database: PathBuf,
    pub host: String,
    pub port: u16,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let state = ServerState::new(open_service(&config.database)?);

    let app = Router::new();
    let app = app.route(
        "/users/{user}/cards",
        get(list_cards_handler).post(add_card_handler),
    );
    let app = app.route("/users/{user}/cards/{reference}", get(get_card_handler));
    let app = app.route("/users/{user}/due", get(due_handler));
    let app = app.route("/users/{user}/stats", get(stats_handler));
    let app = app.route("/cards/{id}", delete(remove_handler));
    let app = app.route("/cards/{id}/review", post(review_handler));
    let app = app.route("/cards/{id}/notes", put(notes_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("{}:{}", config.host, config.port);

    // Serve until Ctrl+C.
    let listener = TcpListener::bind(&bind).await?;
    log::info!("Listening on http://{bind}/");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => log::debug!("Received Ctrl+C, shutting down gracefully"),
        Err(e) => {
            log::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}
