use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, COOKIE};

use crate::error::Error;

/// Supplies the credential headers attached to every request
pub trait AuthProvider {
    fn headers(&self) -> Result<HeaderMap, Error>;

    /// Whether requests carry a user session; decides the output container
    fn is_authenticated(&self) -> bool;
}

impl<A: AuthProvider + ?Sized> AuthProvider for Box<A> {
    fn headers(&self) -> Result<HeaderMap, Error> {
        (**self).headers()
    }

    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}

impl<A: AuthProvider + ?Sized> AuthProvider for &A {
    fn headers(&self) -> Result<HeaderMap, Error> {
        (**self).headers()
    }

    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}

/// No credentials; only freely streamable transcodings resolve
#[derive(Debug, Default, Clone, Copy)]
pub struct Anonymous;

impl AuthProvider for Anonymous {
    fn headers(&self) -> Result<HeaderMap, Error> {
        Ok(HeaderMap::new())
    }

    fn is_authenticated(&self) -> bool {
        false
    }
}

/// Browser session cookie, plus the OAuth token embedded in it
#[derive(Clone)]
pub struct CookieAuth {
    cookie: String,
    oauth_token: String,
}

impl std::fmt::Debug for CookieAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieAuth").finish_non_exhaustive()
    }
}

impl CookieAuth {
    const TOKEN_KEY: &str = "oauth_token";

    pub fn new(cookie: impl Into<String>) -> Result<Self, Error> {
        let cookie = cookie.into();
        let oauth_token = cookie
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| key.trim() == Self::TOKEN_KEY)
            .map(|(_, value)| value.trim())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::AuthError("oauth_token not found in cookie".into()))?
            .to_owned();

        Ok(CookieAuth {
            cookie,
            oauth_token,
        })
    }

    pub fn oauth_token(&self) -> &str {
        &self.oauth_token
    }
}

impl AuthProvider for CookieAuth {
    fn headers(&self) -> Result<HeaderMap, Error> {
        let mut authorization = HeaderValue::from_str(&format!("OAuth {}", self.oauth_token))?;
        authorization.set_sensitive(true);
        let mut cookie = HeaderValue::from_str(&self.cookie)?;
        cookie.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(COOKIE, cookie);
        Ok(headers)
    }

    fn is_authenticated(&self) -> bool {
        true
    }
}
