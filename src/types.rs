// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Twitter Graph library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use fmt::{Display, Formatter};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Cursor token requesting the first page of a sequence.
pub const START_CURSOR: i64 = -1;

/// Cursor token meaning "there is no such page".
pub const END_CURSOR: i64 = 0;

/// One page of a cursored sequence.
///
/// The cursor tokens describe the position of the page in the server-side sequence that
/// produced it. They are carried through unchanged when the items are transformed locally, so a
/// page of profiles resolved from a page of IDs still points at its neighbours in the ID
/// sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub previous_cursor: i64,
    pub next_cursor: i64,
}

impl<T> CursorPage<T> {
    pub fn new(items: Vec<T>, previous_cursor: i64, next_cursor: i64) -> Self {
        Self {
            items,
            previous_cursor,
            next_cursor,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next_cursor != END_CURSOR
    }

    pub fn has_previous(&self) -> bool {
        self.previous_cursor != END_CURSOR
    }

    /// Replace the items of this page, keeping its cursor tokens.
    pub fn with_items<U>(&self, items: Vec<U>) -> CursorPage<U> {
        CursorPage {
            items,
            previous_cursor: self.previous_cursor,
            next_cursor: self.next_cursor,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> CursorPage<U> {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            previous_cursor: self.previous_cursor,
            next_cursor: self.next_cursor,
        }
    }
}

/// Response body of the `*/ids` endpoints.
///
/// Twitter also sends string versions of the cursors, which we ignore.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct CursoredIds {
    pub ids: Vec<u64>,
    pub previous_cursor: i64,
    pub next_cursor: i64,
}

impl From<CursoredIds> for CursorPage<u64> {
    fn from(page: CursoredIds) -> Self {
        Self::new(page.ids, page.previous_cursor, page.next_cursor)
    }
}

/// Whose social graph to walk.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Subject {
    /// The user owning the authorized session.
    CurrentUser,
    UserId(u64),
    ScreenName(String),
}

impl Subject {
    /// The query parameter selecting this subject. The authenticated user is implied by the
    /// session, so it has none.
    pub fn query_param(&self) -> Option<(String, String)> {
        match self {
            Self::CurrentUser => None,
            Self::UserId(id) => Some(("user_id".to_string(), id.to_string())),
            Self::ScreenName(name) => Some(("screen_name".to_string(), name.clone())),
        }
    }
}

impl From<u64> for Subject {
    fn from(id: u64) -> Self {
        Self::UserId(id)
    }
}

impl From<&str> for Subject {
    fn from(screen_name: &str) -> Self {
        Self::ScreenName(screen_name.trim_start_matches('@').to_string())
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentUser => write!(f, "current user"),
            Self::UserId(id) => write!(f, "user {}", id),
            Self::ScreenName(name) => write!(f, "@{}", name),
        }
    }
}

/// The cursored ID lists making up a user's social graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Graph {
    /// Users the subject follows.
    Friends,
    /// Users following the subject.
    Followers,
    /// Users blocked by the authenticated user. Only defined for [Subject::CurrentUser].
    Blocks,
}

impl Graph {
    pub fn ids_endpoint(self) -> &'static str {
        match self {
            Self::Friends => "friends/ids.json",
            Self::Followers => "followers/ids.json",
            Self::Blocks => "blocks/ids.json",
        }
    }
}

impl Display for Graph {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Friends => "friends",
            Self::Followers => "followers",
            Self::Blocks => "blocks",
        };
        write!(f, "{}", name)
    }
}

/// A user profile as returned by `users/lookup`.
///
/// Only `id` and `screen_name` are required; a profile missing either is a malformed response.
/// Every other field has an explicit default which is also used when Twitter sends `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterProfile {
    pub id: u64,
    pub screen_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "profile_image_url_https")]
    pub profile_image_url: Option<String>,
    #[serde(default, rename = "lang")]
    pub language: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub utc_offset: Option<i32>,
    /// Creation time exactly as Twitter formats it, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub statuses_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub friends_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub followers_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub favourites_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub listed_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub protected: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub verified: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub geo_enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub following: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub follow_request_sent: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notifications: bool,
}

impl Display for TwitterProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_as_json(self, f)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Display implementation for types which serialize to JSON. Displays as a valid JSON object.
pub fn fmt_as_json<T: Serialize>(v: &T, f: &mut Formatter<'_>) -> fmt::Result {
    let string = serde_json::to_string(v).map_err(|_| fmt::Error)?;
    write!(f, "{}", string)
}
