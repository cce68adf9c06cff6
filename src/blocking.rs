// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Twitter Graph library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! A blocking facade over [TwitterClient].
//!
//! Every call blocks the current thread until the response arrives. Unlike the async client,
//! profile lookups for a page are sent one batch at a time, and the first failed batch stops the
//! remaining ones from being sent at all. Do not call these from inside an async task.

use crate::auth::Authorizer;
use crate::chunk::chunk_ids;
use crate::client::TwitterClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::transport::{SurfTransport, Transport};
use crate::types::{CursorPage, Graph, Subject, TwitterProfile, END_CURSOR, START_CURSOR};
use async_std::task::block_on;
use tracing::{event, Level};

#[derive(Clone, Debug)]
pub struct BlockingClient<T = SurfTransport> {
    inner: TwitterClient<T>,
}

impl BlockingClient<SurfTransport> {
    pub fn new(config: &ClientConfig, authorizer: impl Authorizer + 'static) -> Result<Self> {
        Ok(Self {
            inner: TwitterClient::new(config, authorizer)?,
        })
    }
}

impl<T: Transport> From<TwitterClient<T>> for BlockingClient<T> {
    fn from(inner: TwitterClient<T>) -> Self {
        Self { inner }
    }
}

impl<T: Transport> BlockingClient<T> {
    pub fn with_transport(
        config: &ClientConfig,
        transport: T,
        authorizer: impl Authorizer + 'static,
    ) -> Result<Self> {
        TwitterClient::with_transport(config, transport, authorizer).map(Self::from)
    }

    /// The async client this one wraps.
    pub fn inner(&self) -> &TwitterClient<T> {
        &self.inner
    }

    pub fn fetch_page(
        &self,
        graph: Graph,
        subject: &Subject,
        cursor: i64,
    ) -> Result<CursorPage<u64>> {
        block_on(self.inner.fetch_page(graph, subject, cursor))
    }

    pub fn friend_ids(&self, subject: &Subject, cursor: i64) -> Result<CursorPage<u64>> {
        self.fetch_page(Graph::Friends, subject, cursor)
    }

    pub fn follower_ids(&self, subject: &Subject, cursor: i64) -> Result<CursorPage<u64>> {
        self.fetch_page(Graph::Followers, subject, cursor)
    }

    pub fn blocked_ids(&self, cursor: i64) -> Result<CursorPage<u64>> {
        self.fetch_page(Graph::Blocks, &Subject::CurrentUser, cursor)
    }

    /// Walk every page of `graph` for `subject` and collect the IDs in server order.
    pub fn all_ids(&self, graph: Graph, subject: &Subject) -> Result<Vec<u64>> {
        let mut ids = Vec::new();
        let mut cursor = START_CURSOR;
        loop {
            let page = self.fetch_page(graph, subject, cursor)?;
            ids.extend_from_slice(&page.items);
            if page.next_cursor == END_CURSOR {
                return Ok(ids);
            }
            cursor = page.next_cursor;
        }
    }

    /// Look up the profiles of `ids`, one batch after another.
    pub fn lookup_users(&self, ids: &[u64]) -> Result<Vec<TwitterProfile>> {
        let batches = chunk_ids(ids, self.inner.batch_size())?;
        let mut profiles = Vec::with_capacity(ids.len());
        for (i, batch) in batches.into_iter().enumerate() {
            event!(
                Level::DEBUG,
                "looking up batch {} ({} users)",
                i,
                batch.len()
            );
            profiles.extend(block_on(self.inner.lookup_batch(batch))?);
        }
        Ok(profiles)
    }

    pub fn resolve(&self, page: &CursorPage<u64>) -> Result<CursorPage<TwitterProfile>> {
        let profiles = self.lookup_users(&page.items)?;
        Ok(page.with_items(profiles))
    }

    pub fn fetch_resolved_page(
        &self,
        graph: Graph,
        subject: &Subject,
        cursor: i64,
    ) -> Result<CursorPage<TwitterProfile>> {
        let page = self.fetch_page(graph, subject, cursor)?;
        self.resolve(&page)
    }

    pub fn friends(&self, subject: &Subject, cursor: i64) -> Result<CursorPage<TwitterProfile>> {
        self.fetch_resolved_page(Graph::Friends, subject, cursor)
    }

    pub fn followers(&self, subject: &Subject, cursor: i64) -> Result<CursorPage<TwitterProfile>> {
        self.fetch_resolved_page(Graph::Followers, subject, cursor)
    }

    pub fn blocked_users(&self, cursor: i64) -> Result<CursorPage<TwitterProfile>> {
        self.fetch_resolved_page(Graph::Blocks, &Subject::CurrentUser, cursor)
    }
}
