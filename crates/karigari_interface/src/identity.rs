//! Trait definition for the identity service.

use async_trait::async_trait;
use karigari_error::KarigariResult;
use serde::{Deserialize, Serialize};

/// The authenticated caller, as vouched for by the identity service.
///
/// The pipeline trusts this identifier for all ownership checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// The owning-user identifier records are scoped to
    pub user_id: String,
}

/// Verifies bearer credentials against the identity service.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Resolve a bearer token to the authenticated principal.
    ///
    /// # Errors
    ///
    /// Returns an unauthorized access error for missing, malformed, or
    /// rejected credentials.
    async fn verify(&self, token: &str) -> KarigariResult<Principal>;
}
