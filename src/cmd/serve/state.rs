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


use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use versecards_core::ErrorReport;

use crate::cmd::CardService;
use crate::cmd::serve::handlers::ApiError;

#[derive(Clone)]
pub struct ServerState {
    pub service: Arc<Mutex<CardService>>,
}

impl ServerState {
    pub fn new(service: CardService) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, CardService>, ApiError> {
        self.service
            .lock()
            .map_err(|_| ApiError::from(ErrorReport::new("server state lock poisoned")))
    }
}
