//! Identity backends: resolving bearer tokens to principals.

use async_trait::async_trait;
use karigari_error::{AccessError, KarigariResult};
use karigari_interface::{Principal, TokenVerifier};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::instrument;

/// Verifies tokens against a fixed token -> user id table.
///
/// For development and tests; production deployments use
/// [`RemoteTokenVerifier`].
pub struct StaticTokenVerifier {
    tokens: HashMap<String, String>,
}

impl StaticTokenVerifier {
    /// Create a verifier over the given token table.
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> KarigariResult<Principal> {
        match self.tokens.get(token) {
            Some(user_id) => Ok(Principal {
                user_id: user_id.clone(),
            }),
            None => Err(AccessError::unauthorized("Invalid token").into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(alias = "userId")]
    user_id: String,
}

/// Verifies tokens against a remote identity service.
///
/// Sends the bearer token to the configured endpoint and expects a JSON
/// body carrying the owning-user identifier. Any rejection or transport
/// failure surfaces as unauthorized; the pipeline trusts the returned
/// identifier for all ownership checks.
pub struct RemoteTokenVerifier {
    http: reqwest::Client,
    endpoint: String,
}

impl RemoteTokenVerifier {
    /// Create a verifier calling the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl TokenVerifier for RemoteTokenVerifier {
    #[instrument(skip(self, token))]
    async fn verify(&self, token: &str) -> KarigariResult<Principal> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AccessError::unauthorized(format!("identity service unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AccessError::unauthorized("Invalid token").into());
        }

        let verified: VerifyResponse = response
            .json()
            .await
            .map_err(|e| AccessError::unauthorized(format!("malformed identity response: {}", e)))?;

        Ok(Principal {
            user_id: verified.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_verifier_resolves_known_tokens() {
        let verifier = StaticTokenVerifier::new(HashMap::from([(
            "dev-token".to_string(),
            "dev-user".to_string(),
        )]));

        let principal = verifier.verify("dev-token").await.unwrap();
        assert_eq!(principal.user_id, "dev-user");

        assert!(verifier.verify("wrong").await.is_err());
    }

    #[test]
    fn verify_response_accepts_both_spellings() {
        let snake: VerifyResponse = serde_json::from_str(r#"{"user_id": "u1"}"#).unwrap();
        assert_eq!(snake.user_id, "u1");
        let camel: VerifyResponse = serde_json::from_str(r#"{"userId": "u2"}"#).unwrap();
        assert_eq!(camel.user_id, "u2");
    }
}
