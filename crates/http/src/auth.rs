//! Bearer-token verification.
//!
//! The service never validates tokens itself: it hands them to an
//! [`IdentityVerifier`] and trusts the identity it gets back.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use ocdtracker_core::Identity;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    /// The verifier answered and rejected the token.
    #[error("token rejected: {0}")]
    Invalid(String),

    /// The verifier could not be reached or answered nonsense.
    #[error("identity verifier unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError>;
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively. Returns `None` when the header
/// is missing, uses another scheme, or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Forwards the token to a userinfo-style endpoint.
pub struct RemoteVerifier {
    client: reqwest::Client,
    url: String,
}

#[derive(Deserialize)]
struct UserInfo {
    #[serde(alias = "uid")]
    sub: String,
    email: Option<String>,
    #[serde(alias = "display_name")]
    name: Option<String>,
    #[serde(alias = "photo_url")]
    picture: Option<String>,
}

impl RemoteVerifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, VerifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VerifyError::Unavailable(e.to_string()))?;
        Ok(Self { client, url: url.into() })
    }
}

#[async_trait]
impl IdentityVerifier for RemoteVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| VerifyError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(VerifyError::Invalid(format!("verifier answered {status}")));
        }
        if !status.is_success() {
            return Err(VerifyError::Unavailable(format!("verifier answered {status}")));
        }

        let info: UserInfo =
            response.json().await.map_err(|e| VerifyError::Unavailable(e.to_string()))?;
        if info.sub.trim().is_empty() {
            return Err(VerifyError::Invalid("verifier returned an empty subject".to_owned()));
        }
        Ok(Identity {
            uid: info.sub,
            email: info.email,
            display_name: info.name,
            photo_url: info.picture,
        })
    }
}

/// Fixed token table for local development and tests.
#[derive(Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        pairs.iter().fold(Self::new(), |verifier, (token, uid)| {
            verifier.with_identity(token.clone(), Identity::new(uid.clone()))
        })
    }

    #[must_use]
    pub fn with_identity(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| VerifyError::Invalid("unknown static token".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn remote(server: &MockServer) -> RemoteVerifier {
        RemoteVerifier::new(format!("{}/userinfo", server.uri()), Duration::from_secs(5)).unwrap()
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_accepts_any_scheme_case() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("BEARER  abc ")), Some("abc"));
    }

    #[test]
    fn bearer_token_rejects_missing_or_empty() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwdw==")), None);
    }

    #[tokio::test]
    async fn static_verifier_resolves_known_tokens() {
        let verifier = StaticTokenVerifier::from_pairs(&[("t1".to_owned(), "alice".to_owned())]);
        assert_eq!(verifier.verify("t1").await.unwrap().uid, "alice");
        assert!(matches!(verifier.verify("t2").await, Err(VerifyError::Invalid(_))));
    }

    #[tokio::test]
    async fn remote_verifier_reports_unreachable_endpoint() {
        let verifier =
            RemoteVerifier::new("http://127.0.0.1:1/userinfo", Duration::from_secs(2)).unwrap();
        assert!(matches!(verifier.verify("t").await, Err(VerifyError::Unavailable(_))));
    }

    #[tokio::test]
    async fn remote_verifier_maps_userinfo() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("Authorization", "Bearer good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sub": "uid-42",
                "email": "jane@example.com",
                "name": "Jane",
                "picture": "https://img.example/jane.png"
            })))
            .mount(&server)
            .await;

        let verifier = remote(&server);
        let identity = verifier.verify("good").await.unwrap();
        assert_eq!(identity.uid, "uid-42");
        assert_eq!(identity.email.as_deref(), Some("jane@example.com"));
        assert_eq!(identity.display_name.as_deref(), Some("Jane"));
        assert_eq!(identity.photo_url.as_deref(), Some("https://img.example/jane.png"));
    }

    #[tokio::test]
    async fn remote_verifier_separates_rejection_from_outage() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("Authorization", "Bearer expired"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(header("Authorization", "Bearer flaky"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let verifier = remote(&server);
        assert!(matches!(verifier.verify("expired").await, Err(VerifyError::Invalid(_))));
        assert!(matches!(verifier.verify("flaky").await, Err(VerifyError::Unavailable(_))));
    }

    #[tokio::test]
    async fn remote_verifier_rejects_empty_subject() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"sub": " "})))
            .mount(&server)
            .await;

        assert!(matches!(remote(&server).verify("t").await, Err(VerifyError::Invalid(_))));
    }

    #[test]
    fn userinfo_accepts_uid_alias() {
        let info: UserInfo =
            serde_json::from_str(r#"{"uid":"u1","display_name":"A","photo_url":"p.png"}"#)
                .unwrap();
        assert_eq!(info.sub, "u1");
        assert_eq!(info.name.as_deref(), Some("A"));
        assert_eq!(info.picture.as_deref(), Some("p.png"));
    }
}
