//! Cookie Transport
//!
//! Writes the access and refresh tokens to the outbound response as
//! hardened cookies, and reads them back from inbound requests. The caller
//! hands over the response headers explicitly.

use axum::http::HeaderMap;
use platform::cookie::{CookieConfig, append_set_cookie, extract_cookie};
use platform::hashing::SecretString;

use crate::application::config::AuthConfig;

#[derive(Debug, Clone)]
pub struct CookieTransport {
    access: CookieConfig,
    refresh: CookieConfig,
}

impl CookieTransport {
    pub fn new(config: &AuthConfig) -> Self {
        let access = CookieConfig {
            name: config.access_cookie_name.clone(),
            secure: config.cookie_secure,
            http_only: true,
            same_site: config.access_cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(secs(config.access_token_ttl)),
        };
        let refresh = CookieConfig {
            name: config.refresh_cookie_name.clone(),
            secure: config.cookie_secure,
            http_only: true,
            same_site: config.refresh_cookie_same_site,
            path: config.refresh_cookie_path.clone(),
            max_age_secs: Some(secs(config.refresh_token_ttl)),
        };

        Self { access, refresh }
    }

    pub fn set_access_cookie(&self, response: &mut HeaderMap, token: &str) {
        append_set_cookie(response, &self.access.build_set_cookie(token));
    }

    pub fn set_refresh_cookie(&self, response: &mut HeaderMap, token: &SecretString) {
        append_set_cookie(response, &self.refresh.build_set_cookie(token.expose()));
    }

    /// Expire both cookies, each on the path it was set with
    pub fn clear(&self, response: &mut HeaderMap) {
        append_set_cookie(response, &self.access.build_delete_cookie());
        append_set_cookie(response, &self.refresh.build_delete_cookie());
    }

    pub fn access_token(&self, request: &HeaderMap) -> Option<String> {
        extract_cookie(request, &self.access.name)
    }

    pub fn refresh_token(&self, request: &HeaderMap) -> Option<SecretString> {
        extract_cookie(request, &self.refresh.name).map(SecretString::new)
    }
}

fn secs(ttl: std::time::Duration) -> i64 {
    i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)
}
