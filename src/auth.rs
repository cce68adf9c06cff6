// Copyright (c) 2022 Espresso Systems (espressosys.com)
// This file is part of the Twitter Graph library.

// This program is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
// You should have received a copy of the GNU General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.

use std::fmt::Debug;
use surf::http::Method;
use surf::Url;

/// Signs outgoing requests.
///
/// Request signing (OAuth 1.0a for user context) lives outside this crate. Implementations
/// produce the value of the `Authorization` header for a request, and report whether they
/// represent an authorized user session. Operations on [Subject::CurrentUser](crate::Subject)
/// are refused up front when `is_authorized` is false.
pub trait Authorizer: Debug + Send + Sync {
    fn is_authorized(&self) -> bool;

    /// The `Authorization` header for a request, or `None` to send it unsigned.
    ///
    /// `params` are the query or form parameters of the request, which OAuth 1.0a includes in the
    /// signature base string.
    fn authorization_header(
        &self,
        method: Method,
        url: &Url,
        params: &[(String, String)],
    ) -> Option<String>;
}

/// No credentials at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct Anonymous;

impl Authorizer for Anonymous {
    fn is_authorized(&self) -> bool {
        false
    }

    fn authorization_header(&self, _: Method, _: &Url, _: &[(String, String)]) -> Option<String> {
        None
    }
}

/// Application-only authentication.
///
/// A bearer token can read public graphs by user ID or screen name, but it has no user context,
/// so it does not count as an authorized session.
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

impl Authorizer for BearerToken {
    fn is_authorized(&self) -> bool {
        false
    }

    fn authorization_header(&self, _: Method, _: &Url, _: &[(String, String)]) -> Option<String> {
        Some(format!("Bearer {}", self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_is_not_a_user_session() {
        let url = Url::parse("https://api.twitter.com/1.1/friends/ids.json").unwrap();
        let token = BearerToken::new("abc");
        assert!(!token.is_authorized());
        assert_eq!(
            token.authorization_header(Method::Get, &url, &[]),
            Some("Bearer abc".to_string())
        );
        assert_eq!(format!("{:?}", token), "BearerToken(..)");
        assert_eq!(Anonymous.authorization_header(Method::Get, &url, &[]), None);
    }
}
