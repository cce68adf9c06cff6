// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Twitter Graph library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use crate::chunk::LOOKUP_BATCH_LIMIT;
use crate::error::{Result, TwitterError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use surf::Url;

/// Client configuration.
///
/// Every field has a default, so an empty JSON object deserializes to [ClientConfig::default].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root of the v1.1 REST API. Endpoint paths are resolved relative to it, so it should end
    /// with a slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout enforced by the HTTP transport. `None` waits indefinitely.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: Option<u64>,

    /// IDs per `users/lookup` request. Clamped to `1..=100`.
    #[serde(default = "default_lookup_batch_size")]
    pub lookup_batch_size: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://api.twitter.com/1.1/".into()
}

fn default_timeout_secs() -> Option<u64> {
    Some(30)
}

fn default_lookup_batch_size() -> usize {
    LOOKUP_BATCH_LIMIT
}

fn default_user_agent() -> String {
    format!("twitter-graph/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            lookup_batch_size: default_lookup_batch_size(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|err| TwitterError::InvalidConfig {
            message: format!("bad base url {}: {}", self.base_url, err),
        })?;
        // Without a trailing slash `Url::join` would replace the last path segment.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn batch_size(&self) -> usize {
        self.lookup_batch_size.max(1).min(LOOKUP_BATCH_LIMIT)
    }
}
