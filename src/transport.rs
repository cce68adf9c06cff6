// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Twitter Graph library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! The HTTP capability the client is built on.

use crate::config::ClientConfig;
use crate::error::{Result, TwitterError};
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::sync::Arc;
use surf::http::{headers, Method};
use surf::{middleware::Next, Body, Client, Request, Response, Url};
use tracing::{event, Level};

/// A request to a v1.1 endpoint, relative to the configured base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Endpoint path, e.g. `friends/ids.json`.
    pub path: String,
    /// Query parameters for `GET`, form fields for `POST`.
    pub params: Vec<(String, String)>,
    /// Value of the `Authorization` header, if the request is signed.
    pub authorization: Option<String>,
}

impl ApiRequest {
    /// The value of a parameter, if present.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A raw response: any status, body not yet interpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests and returns whatever the server answered.
///
/// Implementations only fail when no response was received at all. Interpreting error statuses
/// is left to the caller (see [crate::client::response_to_result]). Timeouts and retries are the
/// implementation's business.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        (**self).send(request)
    }
}

/// [Transport] backed by a `surf` client.
#[derive(Clone, Debug)]
pub struct SurfTransport {
    client: Client,
}

impl SurfTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let invalid = |err: surf::Error| TwitterError::InvalidConfig {
            message: err.to_string(),
        };
        let surf_config = surf::Config::new()
            .set_base_url(config.base_url()?)
            .set_timeout(config.timeout())
            .add_header(headers::USER_AGENT, config.user_agent.as_str())
            .map_err(invalid)?;
        let client = Client::try_from(surf_config).map_err(|err| TwitterError::InvalidConfig {
            message: format!("unable to build HTTP client: {}", err),
        })?;
        Ok(Self {
            client: client.with(trace),
        })
    }
}

impl SurfTransport {
    /// The full URL of `request`. Parameters of anything but a `POST` go in the query string as
    /// `key=value` pairs, in order.
    pub fn url(&self, request: &ApiRequest) -> surf::Result<Url> {
        let mut url = match &self.client.config().base_url {
            Some(base) => base.join(&request.path)?,
            None => Url::parse(&request.path)?,
        };
        if request.method != Method::Post && !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.params);
        }
        Ok(url)
    }

    /// The `application/x-www-form-urlencoded` body of a `POST` request, keys in sorted order.
    /// A repeated key keeps its last value.
    pub fn form(&self, request: &ApiRequest) -> surf::Result<Body> {
        Body::from_form(&request.params.iter().cloned().collect::<BTreeMap<_, _>>())
    }
}

impl Transport for SurfTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        Box::pin(async move {
            let endpoint = request.path.as_str();
            let fail = |err: surf::Error| TwitterError::from_client_error(endpoint, err);

            let url = self.url(&request).map_err(fail)?;
            let mut builder = self.client.request(request.method, url);
            if request.method == Method::Post {
                builder = builder.body(self.form(&request).map_err(fail)?);
            }
            if let Some(authorization) = &request.authorization {
                builder = builder.header(headers::AUTHORIZATION, authorization.as_str());
            }

            let mut res = builder.send().await.map_err(fail)?;
            let body = res.body_bytes().await.map_err(fail)?;
            Ok(ApiResponse {
                status: res.status().into(),
                body,
            })
        })
    }
}

/// Client middleware which logs requests and responses.
pub fn trace(req: Request, client: Client, next: Next<'_>) -> BoxFuture<surf::Result<Response>> {
    Box::pin(async move {
        let method = req.method();
        let url = req.url().clone();
        event!(
            Level::DEBUG,
            "--> sending request {{method: {}, url: {}}}",
            method,
            url
        );
        let res = next.run(req, client).await;
        match &res {
            Ok(res) => event!(
                Level::DEBUG,
                "<-- received response {{method: {}, url: {}, status: {}}}",
                method,
                url,
                res.status()
            ),
            Err(err) => event!(
                Level::WARN,
                "<-- request failed {{method: {}, url: {}, error: {}}}",
                method,
                url,
                err
            ),
        }
        res
    })
}
