// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Twitter Graph library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use crate::auth::Authorizer;
use crate::chunk::{chunk_ids, IdBatch};
use crate::config::ClientConfig;
use crate::error::{MalformedResponseSnafu, Result, TwitterError};
use crate::transport::{ApiRequest, ApiResponse, SurfTransport, Transport};
use crate::types::{CursorPage, CursoredIds, Graph, Subject, TwitterProfile, START_CURSOR};
use futures::prelude::*;
use futures::stream::FuturesOrdered;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use snafu::ResultExt;
use std::sync::Arc;
use surf::http::Method;
use surf::Url;
use tracing::{event, Level};

const USERS_LOOKUP: &str = "users/lookup.json";

/// Deserialize the body of a successful response.
///
/// This function combined with [response_to_result] defines how responses from the Twitter API
/// are decoded into Rust types.
pub fn response_body<T: DeserializeOwned>(endpoint: &str, res: &ApiResponse) -> Result<T> {
    serde_json::from_slice(&res.body).context(MalformedResponseSnafu { endpoint })
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    code: Option<i32>,
    #[serde(default)]
    message: String,
}

/// Turn responses with non-success statuses into errors.
///
/// Successful responses are passed through unchanged. Otherwise the body is interpreted as a
/// Twitter error document, either `{"errors": [{"code": .., "message": ..}]}` or
/// `{"error": ".."}`, and the first error it contains becomes a
/// [TwitterError::RemoteRequestFailed]. Bodies in neither shape are reported verbatim.
pub fn response_to_result(endpoint: &str, res: ApiResponse) -> Result<ApiResponse> {
    if res.is_success() {
        return Ok(res);
    }

    let body: ErrorBody = serde_json::from_slice(&res.body).unwrap_or_default();
    let (code, message) = match (body.errors.into_iter().next(), body.error) {
        (Some(entry), _) => (entry.code, entry.message),
        (None, Some(message)) => (None, message),
        (None, None) => (None, String::from_utf8_lossy(&res.body).trim().to_string()),
    };
    let message = if message.is_empty() {
        format!("HTTP status {}", res.status)
    } else {
        message
    };

    Err(TwitterError::RemoteRequestFailed {
        endpoint: endpoint.to_string(),
        status: Some(res.status),
        code,
        message,
    })
}

/// Async client for the social graph endpoints.
///
/// Paged ID lists are fetched with [fetch_page](Self::fetch_page) and its graph-specific
/// shorthands. A page of IDs is turned into a page of profiles with [resolve](Self::resolve),
/// which looks the IDs up in batches of at most 100, all batches in flight at once.
#[derive(Clone, Debug)]
pub struct TwitterClient<T = SurfTransport> {
    transport: T,
    authorizer: Arc<dyn Authorizer>,
    base_url: Url,
    batch_size: usize,
}

impl TwitterClient<SurfTransport> {
    /// A client talking to the API over HTTP.
    pub fn new(config: &ClientConfig, authorizer: impl Authorizer + 'static) -> Result<Self> {
        Self::with_transport(config, SurfTransport::new(config)?, authorizer)
    }
}

impl<T: Transport> TwitterClient<T> {
    pub fn with_transport(
        config: &ClientConfig,
        transport: T,
        authorizer: impl Authorizer + 'static,
    ) -> Result<Self> {
        Ok(Self {
            transport,
            authorizer: Arc::new(authorizer),
            base_url: config.base_url()?,
            batch_size: config.batch_size(),
        })
    }

    pub fn is_authorized(&self) -> bool {
        self.authorizer.is_authorized()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn ensure_authorized(&self, operation: impl Into<String>) -> Result<()> {
        if self.is_authorized() {
            Ok(())
        } else {
            Err(TwitterError::AuthorizationRequired {
                operation: operation.into(),
            })
        }
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<ApiRequest> {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| TwitterError::InvalidConfig {
                message: format!("bad endpoint path {}: {}", path, err),
            })?;
        let authorization = self.authorizer.authorization_header(method, &url, &params);
        Ok(ApiRequest {
            method,
            path: path.to_string(),
            params,
            authorization,
        })
    }

    async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<R> {
        let result = match self.request(Method::Get, path, params) {
            Ok(request) => self
                .transport
                .send(request)
                .await
                .and_then(|res| response_to_result(path, res))
                .and_then(|res| response_body(path, &res)),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            event!(Level::WARN, "GET {} failed: {}", path, err);
        }
        result
    }

    /// Fetch one page of the ID list `graph` of `subject`.
    ///
    /// `cursor` is [START_CURSOR] for the first page, or a cursor returned with an earlier page.
    /// Walking the graph of [Subject::CurrentUser] needs an authorized session and fails with
    /// [TwitterError::AuthorizationRequired] before anything is sent if there is none. Explicit
    /// user IDs and screen names are sent as-is; whether they need authorization is up to the
    /// server.
    ///
    /// [Graph::Blocks] is only defined for the authenticated user.
    pub async fn fetch_page(
        &self,
        graph: Graph,
        subject: &Subject,
        cursor: i64,
    ) -> Result<CursorPage<u64>> {
        if graph == Graph::Blocks && *subject != Subject::CurrentUser {
            return Err(TwitterError::UnsupportedSubject {
                graph,
                subject: subject.clone(),
            });
        }
        if *subject == Subject::CurrentUser {
            self.ensure_authorized(format!("listing {} of the current user", graph))?;
        }

        let mut params = vec![("cursor".to_string(), cursor.to_string())];
        params.extend(subject.query_param());
        event!(
            Level::DEBUG,
            "fetching {} of {} at cursor {}",
            graph,
            subject,
            cursor
        );
        let page: CursoredIds = self.get(graph.ids_endpoint(), params).await?;
        Ok(page.into())
    }

    pub async fn friend_ids(&self, subject: &Subject, cursor: i64) -> Result<CursorPage<u64>> {
        self.fetch_page(Graph::Friends, subject, cursor).await
    }

    pub async fn follower_ids(&self, subject: &Subject, cursor: i64) -> Result<CursorPage<u64>> {
        self.fetch_page(Graph::Followers, subject, cursor).await
    }

    /// IDs of users blocked by the authenticated user.
    pub async fn blocked_ids(&self, cursor: i64) -> Result<CursorPage<u64>> {
        self.fetch_page(Graph::Blocks, &Subject::CurrentUser, cursor)
            .await
    }

    /// Every page of `graph` for `subject`, starting at [START_CURSOR].
    ///
    /// The stream ends after the page whose next cursor is 0, or right after the first error.
    pub fn id_pages(
        &self,
        graph: Graph,
        subject: Subject,
    ) -> impl Stream<Item = Result<CursorPage<u64>>> + '_ {
        stream::try_unfold(Some(START_CURSOR), move |cursor| {
            let subject = subject.clone();
            async move {
                let cursor = match cursor {
                    Some(cursor) => cursor,
                    None => return Ok(None),
                };
                let page = self.fetch_page(graph, &subject, cursor).await?;
                let next = if page.has_next() {
                    Some(page.next_cursor)
                } else {
                    None
                };
                Ok::<_, TwitterError>(Some((page, next)))
            }
        })
    }

    /// All IDs of `graph` for `subject`, in server order.
    pub async fn all_ids(&self, graph: Graph, subject: Subject) -> Result<Vec<u64>> {
        self.id_pages(graph, subject)
            .try_fold(Vec::new(), |mut ids, page| async move {
                ids.extend(page.items);
                Ok::<_, TwitterError>(ids)
            })
            .await
    }

    pub(crate) async fn lookup_batch(&self, batch: IdBatch<'_>) -> Result<Vec<TwitterProfile>> {
        let params = vec![
            ("user_id".to_string(), batch.to_string()),
            ("include_entities".to_string(), "false".to_string()),
        ];
        self.get(USERS_LOOKUP, params).await
    }

    /// Look up the profiles of `ids`.
    ///
    /// The IDs are split into batches of at most [batch_size](Self::batch_size), and one lookup
    /// per batch is sent concurrently. Profiles are returned in batch order regardless of which
    /// lookup completes first. Users that no longer exist are silently left out by Twitter, so
    /// there may be fewer profiles than IDs.
    ///
    /// If any lookup fails, the whole call fails with the error of the earliest failed batch and
    /// lookups still in flight are dropped. Dropping the returned future likewise cancels every
    /// outstanding lookup.
    pub async fn lookup_users(&self, ids: &[u64]) -> Result<Vec<TwitterProfile>> {
        let batches = chunk_ids(ids, self.batch_size)?;
        event!(
            Level::DEBUG,
            "looking up {} users in {} batches",
            ids.len(),
            batches.len()
        );
        let resolved: Vec<Vec<TwitterProfile>> = batches
            .into_iter()
            .map(|batch| self.lookup_batch(batch))
            .collect::<FuturesOrdered<_>>()
            .try_collect()
            .await?;
        Ok(resolved.into_iter().flatten().collect())
    }

    /// Replace the IDs of `page` with their profiles, keeping its cursors.
    ///
    /// See [lookup_users](Self::lookup_users) for batching and failure behavior.
    pub async fn resolve(&self, page: &CursorPage<u64>) -> Result<CursorPage<TwitterProfile>> {
        let profiles = self.lookup_users(&page.items).await?;
        Ok(page.with_items(profiles))
    }

    /// [fetch_page](Self::fetch_page) followed by [resolve](Self::resolve).
    pub async fn fetch_resolved_page(
        &self,
        graph: Graph,
        subject: &Subject,
        cursor: i64,
    ) -> Result<CursorPage<TwitterProfile>> {
        let page = self.fetch_page(graph, subject, cursor).await?;
        self.resolve(&page).await
    }

    pub async fn friends(
        &self,
        subject: &Subject,
        cursor: i64,
    ) -> Result<CursorPage<TwitterProfile>> {
        self.fetch_resolved_page(Graph::Friends, subject, cursor)
            .await
    }

    pub async fn followers(
        &self,
        subject: &Subject,
        cursor: i64,
    ) -> Result<CursorPage<TwitterProfile>> {
        self.fetch_resolved_page(Graph::Followers, subject, cursor)
            .await
    }

    pub async fn blocked_users(&self, cursor: i64) -> Result<CursorPage<TwitterProfile>> {
        self.fetch_resolved_page(Graph::Blocks, &Subject::CurrentUser, cursor)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BearerToken;

    #[test]
    fn success_passes_through() {
        let res = ApiResponse::new(200, "[]");
        assert_eq!(response_to_result("users/lookup.json", res.clone()).unwrap(), res);
    }

    #[test]
    fn error_document_is_interpreted() {
        let res = ApiResponse::new(
            404,
            r#"{"errors":[{"code":34,"message":"Sorry, that page does not exist."}]}"#,
        );
        let err = response_to_result("friends/ids.json", res).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.code(), Some(34));
        assert_eq!(
            err.to_string(),
            "request to friends/ids.json failed: Sorry, that page does not exist."
        );
    }

    #[test]
    fn legacy_error_and_plain_bodies() {
        let err = response_to_result(
            "followers/ids.json",
            ApiResponse::new(401, r#"{"error":"Not authorized."}"#),
        )
        .unwrap_err();
        assert_eq!(err.code(), None);
        assert!(err.to_string().ends_with("Not authorized."));

        let err = response_to_result("followers/ids.json", ApiResponse::new(502, "Bad Gateway\n"))
            .unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().ends_with("Bad Gateway"));

        let err =
            response_to_result("followers/ids.json", ApiResponse::new(503, "")).unwrap_err();
        assert!(err.to_string().ends_with("HTTP status 503"));
    }

    #[test]
    fn requests_are_signed_against_the_endpoint_url() {
        let client = TwitterClient::new(&ClientConfig::default(), BearerToken::new("t")).unwrap();
        let request = client
            .request(Method::Get, "friends/ids.json", vec![])
            .unwrap();
        assert_eq!(request.path, "friends/ids.json");
        assert_eq!(request.authorization.as_deref(), Some("Bearer t"));

        assert!(matches!(
            client.request(Method::Get, "http://[::1", vec![]),
            Err(TwitterError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn unparseable_body_is_malformed() {
        let res = ApiResponse::new(200, r#"{"ids": "nope"}"#);
        assert!(matches!(
            response_body::<CursoredIds>("friends/ids.json", &res),
            Err(TwitterError::MalformedResponse { .. })
        ));
    }
}
