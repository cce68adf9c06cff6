// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Twitter Graph library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! # Walking the Twitter social graph.
//!
//! The friend, follower and block lists of the Twitter v1.1 API are served as cursored pages of
//! numeric user IDs. This crate fetches those pages and turns them into pages of full profiles
//! by looking the IDs up through `users/lookup`, which accepts at most 100 IDs per request.
//!
//! A page is requested with an opaque cursor: [START_CURSOR] for the first page, then the
//! `next_cursor` of the previous page, until a page comes back whose `next_cursor` is
//! [END_CURSOR]. Resolving a page to profiles keeps its cursors, since they describe positions
//! in the ID list and resolution neither reorders nor adds IDs. Twitter silently drops users it
//! cannot resolve, so a resolved page may be shorter than the page of IDs it came from.
//!
//! [TwitterClient] is async and looks up all batches of a page concurrently.
//! [blocking::BlockingClient] wraps it for synchronous callers and looks batches up one at a
//! time. Both fail the whole call on the first failed request; nothing is ever reported as an
//! empty result instead of an error.
//!
//! HTTP goes through the [Transport] trait, implemented over `surf` by [SurfTransport]. Request
//! signing is delegated to an [Authorizer].

pub mod auth;
pub mod blocking;
pub mod chunk;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;
pub mod types;

pub use auth::*;
pub use chunk::{chunk_ids, IdBatch, LOOKUP_BATCH_LIMIT};
pub use client::TwitterClient;
pub use config::ClientConfig;
pub use error::*;
pub use transport::{ApiRequest, ApiResponse, SurfTransport, Transport};
pub use types::*;
