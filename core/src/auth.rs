//! Credentials and the `Authorization` header they produce.
//!
//! Exactly one header is attached per request. When several credential
//! fields are available the precedence is: username + password (HTTP basic),
//! then username + API key, then access token. With none of them the request
//! goes out unauthenticated.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use secrecy::{ExposeSecret, SecretString};

/// Authentication material for the Ulule API.
#[derive(Debug, Default)]
pub enum Credentials {
    /// `Authorization: Bearer {username}:{api_key}`
    ApiKey {
        username: String,
        api_key: SecretString,
    },
    /// `Authorization: Bearer {token}`
    AccessToken(SecretString),
    /// `Authorization: Basic base64({username}:{password})`
    Basic {
        username: String,
        password: SecretString,
    },
    #[default]
    Anonymous,
}

impl Credentials {
    pub fn api_key(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Credentials::ApiKey {
            username: username.into(),
            api_key: SecretString::from(api_key.into()),
        }
    }

    pub fn access_token(token: impl Into<String>) -> Self {
        Credentials::AccessToken(SecretString::from(token.into()))
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Basic {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Pick a credential from loosely populated fields. Blank strings count as
    /// unset; anything else is used byte for byte.
    pub fn from_fields(
        username: Option<&str>,
        password: Option<&str>,
        api_key: Option<&str>,
        access_token: Option<&str>,
    ) -> Self {
        fn set(field: Option<&str>) -> Option<&str> {
            field.filter(|value| !value.trim().is_empty())
        }

        match (set(username), set(password), set(api_key), set(access_token)) {
            (Some(user), Some(password), _, _) => Credentials::basic(user, password),
            (Some(user), None, Some(key), _) => Credentials::api_key(user, key),
            (_, _, _, Some(token)) => Credentials::access_token(token),
            _ => Credentials::Anonymous,
        }
    }

    /// Read `ULULE_USERNAME`, `ULULE_PASSWORD`, `ULULE_APIKEY` and
    /// `ULULE_ACCESS_TOKEN`.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        let username = var("ULULE_USERNAME");
        let password = var("ULULE_PASSWORD");
        let api_key = var("ULULE_APIKEY");
        let access_token = var("ULULE_ACCESS_TOKEN");

        Self::from_fields(
            username.as_deref(),
            password.as_deref(),
            api_key.as_deref(),
            access_token.as_deref(),
        )
    }

    /// Value of the `Authorization` header, or `None` for anonymous access.
    pub fn authorization(&self) -> Option<String> {
        match self {
            Credentials::Basic { username, password } => {
                let pair = format!("{username}:{}", password.expose_secret());
                Some(format!("Basic {}", STANDARD.encode(pair)))
            }
            Credentials::ApiKey { username, api_key } => {
                Some(format!("Bearer {username}:{}", api_key.expose_secret()))
            }
            Credentials::AccessToken(token) => Some(format!("Bearer {}", token.expose_secret())),
            Credentials::Anonymous => None,
        }
    }

    /// Short label for logs; never includes secret material.
    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::ApiKey { .. } => "api_key",
            Credentials::AccessToken(_) => "access_token",
            Credentials::Basic { .. } => "basic",
            Credentials::Anonymous => "anonymous",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_header_joins_username_and_key() {
        let creds = Credentials::api_key("alice", "s3cret");
        assert_eq!(creds.authorization().as_deref(), Some("Bearer alice:s3cret"));
    }

    #[test]
    fn access_token_header() {
        let creds = Credentials::access_token("tok-123");
        assert_eq!(creds.authorization().as_deref(), Some("Bearer tok-123"));
    }

    #[test]
    fn basic_header_is_base64_encoded() {
        let creds = Credentials::basic("Aladdin", "open sesame");
        assert_eq!(
            creds.authorization().as_deref(),
            Some("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==")
        );
    }

    #[test]
    fn anonymous_sends_no_header() {
        assert!(Credentials::Anonymous.authorization().is_none());
        assert!(Credentials::default().authorization().is_none());
    }

    #[test]
    fn password_wins_over_api_key_and_token() {
        let creds = Credentials::from_fields(Some("alice"), Some("pw"), Some("key"), Some("tok"));
        assert_eq!(creds.kind(), "basic");
    }

    #[test]
    fn api_key_wins_over_token() {
        let creds = Credentials::from_fields(Some("alice"), None, Some("key"), Some("tok"));
        assert_eq!(creds.authorization().as_deref(), Some("Bearer alice:key"));
    }

    #[test]
    fn token_used_without_username() {
        let creds = Credentials::from_fields(None, Some("pw"), Some("key"), Some("tok"));
        assert_eq!(creds.authorization().as_deref(), Some("Bearer tok"));
    }

    #[test]
    fn empty_fields_are_unset() {
        let creds = Credentials::from_fields(Some(""), Some(""), Some(""), Some("  "));
        assert_eq!(creds.kind(), "anonymous");
    }

    #[test]
    fn surrounding_spaces_are_part_of_the_secret() {
        let creds = Credentials::from_fields(Some("alice"), None, Some(" key "), None);
        assert_eq!(creds.authorization().as_deref(), Some("Bearer alice: key "));

        let creds = Credentials::from_fields(Some("Aladdin"), Some("open sesame "), None, None);
        let expected = format!("Basic {}", STANDARD.encode("Aladdin:open sesame "));
        assert_eq!(creds.authorization(), Some(expected));

        let creds = Credentials::from_fields(None, None, None, Some("\ttok"));
        assert_eq!(creds.authorization().as_deref(), Some("Bearer \ttok"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let creds = Credentials::api_key("alice", "s3cret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("s3cret"));
    }
}
