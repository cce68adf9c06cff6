// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Twitter Graph library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use crate::types::{Graph, Subject};
use snafu::Snafu;

/// Errors produced while walking the social graph or resolving profiles.
///
/// None of these are recovered from inside the crate. In particular, a failed page or batch
/// request is never turned into an empty result: an empty friend list and a failed request must
/// stay distinguishable to the caller.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TwitterError {
    /// An operation on the authenticated user was attempted without an authorized session.
    #[snafu(display("{} requires an authorized user session", operation))]
    AuthorizationRequired { operation: String },

    /// The remote service answered with a non-success status, or no response was received.
    #[snafu(display("request to {} failed: {}", endpoint, message))]
    RemoteRequestFailed {
        endpoint: String,
        /// HTTP status of the response, `None` if the request never produced one.
        status: Option<u16>,
        /// Twitter error code from the response body, if one was given.
        code: Option<i32>,
        message: String,
    },

    /// A response body did not have the expected shape.
    #[snafu(display("malformed response from {}: {}", endpoint, source))]
    MalformedResponse {
        endpoint: String,
        source: serde_json::Error,
    },

    /// The graph only exists for the authenticated user, but another subject was given.
    #[snafu(display("{} cannot be listed for {}", graph, subject))]
    UnsupportedSubject { graph: Graph, subject: Subject },

    #[snafu(display("invalid lookup batch size {}, must be at least 1", size))]
    InvalidBatchSize { size: usize },

    #[snafu(display("invalid client configuration: {}", message))]
    InvalidConfig { message: String },
}

impl TwitterError {
    /// Convert a failed `surf` request into a [TwitterError::RemoteRequestFailed].
    ///
    /// Errors which reach here never produced a response we could interpret, so no status is
    /// recorded.
    pub(crate) fn from_client_error(endpoint: &str, source: surf::Error) -> Self {
        Self::RemoteRequestFailed {
            endpoint: endpoint.to_string(),
            status: None,
            code: None,
            message: source.to_string(),
        }
    }

    /// The HTTP status of the failed response, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// The Twitter error code of the failed response, if any.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::RemoteRequestFailed { code, .. } => *code,
            _ => None,
        }
    }
}

pub type Result<T, E = TwitterError> = std::result::Result<T, E>;
