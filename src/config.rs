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


use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use versecards_core::ErrorReport;
use versecards_core::Fallible;
use versecards_core::UserId;
use versecards_core::fail;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "versecards.toml";
pub const DEFAULT_DATABASE: &str = "versecards.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The contents of the configuration file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database: Option<String>,
    pub user: Option<String>,
    pub log_level: Option<String>,
    pub server: ServerSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    /// Load the configuration from an explicit path, or from the default file
    /// if it exists. An explicit path that does not exist is an error.
    pub fn load(path: Option<&str>) -> Fallible<Self> {
        match path {
            Some(path) => {
                let path = Path::new(path);
                if !path.exists() {
                    return fail(format!("config file {} does not exist.", path.display()));
                }
                Self::read(path)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::read(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Fallible<Self> {
        let text = read_to_string(path)?;
        let config = Self::parse(&text)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Fallible<Self> {
        toml::from_str(text)
            .map_err(|e| ErrorReport::new(format!("Failed to parse config file: {e}")))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Configuration after command-line overrides have been applied.
pub struct Settings {
    pub database: PathBuf,
    pub user: Option<String>,
    pub host: String,
    pub port: u16,
}

impl Settings {
    pub fn resolve(config: Config, database: Option<String>, user: Option<String>) -> Self {
        Settings {
            database: PathBuf::from(
                database
                    .or(config.database)
                    .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            ),
            user: user.or(config.user),
            host: config.server.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: config.server.port.unwrap_or(DEFAULT_PORT),
        }
    }

    pub fn user(&self) -> Fallible<UserId> {
        match &self.user {
            Some(user) => user.parse(),
            None => fail("no user given: pass --user or set `user` in the config file."),
        }
    }
}
