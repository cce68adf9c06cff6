// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Twitter Graph library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Splitting ID lists into batches accepted by `users/lookup`.

use crate::error::{Result, TwitterError};
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// The most IDs `users/lookup` accepts in a single request.
pub const LOOKUP_BATCH_LIMIT: usize = 100;

/// A contiguous, non-empty run of IDs from a larger ordered list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdBatch<'a> {
    ids: &'a [u64],
}

impl<'a> IdBatch<'a> {
    pub fn ids(&self) -> &'a [u64] {
        self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Comma-separated, as expected by the `user_id` parameter of `users/lookup`.
impl<'a> Display for IdBatch<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ids.iter().join(","))
    }
}

/// Split `ids` into batches of at most `max_size`, front to back.
///
/// Concatenating the batches in order yields `ids` again. Every batch is non-empty, so an empty
/// list yields no batches at all.
pub fn chunk_ids(ids: &[u64], max_size: usize) -> Result<Vec<IdBatch<'_>>> {
    if max_size == 0 {
        return Err(TwitterError::InvalidBatchSize { size: max_size });
    }
    Ok(ids.chunks(max_size).map(|ids| IdBatch { ids }).collect())
}
