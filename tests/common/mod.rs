// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Twitter Graph library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

#![allow(dead_code)]

use async_std::task;
use futures::future::BoxFuture;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use surf::http::Method;
use surf::Url;
use twitter_graph::{
    ApiRequest, ApiResponse, Authorizer, ClientConfig, Result, Transport, TwitterClient,
};

type Handler = dyn Fn(&ApiRequest) -> (Duration, Result<ApiResponse>) + Send + Sync;

/// A [Transport] answering from a closure, optionally after a delay.
///
/// Every request is recorded when it is sent. `completed` counts responses that were actually
/// delivered, so requests dropped while waiting are not counted.
pub struct ScriptedTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<ApiRequest>>,
    completed: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn new(
        handler: impl Fn(&ApiRequest) -> (Duration, Result<ApiResponse>) + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            completed: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Answer immediately.
    pub fn immediate(
        handler: impl Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Self::new(move |req| (Duration::from_millis(0), handler(req)))
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        self.requests.lock().unwrap().push(request.clone());
        let (delay, result) = (self.handler)(&request);
        let completed = self.completed.clone();
        Box::pin(async move {
            if delay > Duration::from_millis(0) {
                task::sleep(delay).await;
            }
            completed.fetch_add(1, Ordering::SeqCst);
            result
        })
    }
}

/// An authorized user session with a fixed signature.
#[derive(Debug)]
pub struct UserSession;

impl Authorizer for UserSession {
    fn is_authorized(&self) -> bool {
        true
    }

    fn authorization_header(&self, _: Method, _: &Url, _: &[(String, String)]) -> Option<String> {
        Some("OAuth oauth_token=\"test\"".to_string())
    }
}

pub fn client(
    transport: &Arc<ScriptedTransport>,
    authorizer: impl Authorizer + 'static,
) -> TwitterClient<Arc<ScriptedTransport>> {
    TwitterClient::with_transport(&ClientConfig::default(), transport.clone(), authorizer).unwrap()
}

pub fn ids_response(ids: &[u64], previous_cursor: i64, next_cursor: i64) -> ApiResponse {
    let body = json!({
        "ids": ids,
        "previous_cursor": previous_cursor,
        "previous_cursor_str": previous_cursor.to_string(),
        "next_cursor": next_cursor,
        "next_cursor_str": next_cursor.to_string(),
    });
    ApiResponse::new(200, body.to_string())
}

pub fn profile_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "id_str": id.to_string(),
        "screen_name": format!("user{}", id),
        "name": format!("User {}", id),
        "followers_count": id * 10,
    })
}

pub fn profiles_response(ids: &[u64]) -> ApiResponse {
    let body: Vec<_> = ids.iter().copied().map(profile_json).collect();
    ApiResponse::new(200, serde_json::Value::from(body).to_string())
}

/// The IDs requested by a `users/lookup` request.
pub fn requested_ids(req: &ApiRequest) -> Vec<u64> {
    req.param("user_id")
        .unwrap_or_default()
        .split(',')
        .filter(|id| !id.is_empty())
        .map(|id| id.parse().unwrap())
        .collect()
}

pub fn error_response(status: u16, code: i32, message: &str) -> ApiResponse {
    let body = json!({ "errors": [{ "code": code, "message": message }] });
    ApiResponse::new(status, body.to_string())
}
