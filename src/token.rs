//! Fixture token builder.
//!
//! Produces an unsigned, JWT-shaped credential for seeding an authenticated
//! session in a test environment: two base64url segments (header, claims)
//! joined by dots, with an empty signature segment. The frontend under test
//! only decodes the claims, so no cryptographic validity is needed.

use crate::error::Result;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Subject used by the admin verification scenario.
pub const ADMIN_SUBJECT: &str = "e2e-admin";

/// Expiry far enough in the future that the token never ages out mid-run.
pub const FAR_FUTURE_EXP: u64 = 9_999_999_999;

/// JWT header for an unsigned token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub alg: String,
    pub typ: String,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            alg: "none".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Claims carried by the fixture token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub roles: Vec<String>,
    pub exp: u64,
}

/// An unsigned fixture credential.
#[derive(Debug, Clone)]
pub struct FixtureToken {
    header: Header,
    claims: Claims,
}

impl FixtureToken {
    /// Build a token for the given subject and roles, expiring far in the future.
    pub fn new(sub: impl Into<String>, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            header: Header::default(),
            claims: Claims {
                sub: sub.into(),
                roles: roles.into_iter().map(Into::into).collect(),
                exp: FAR_FUTURE_EXP,
            },
        }
    }

    /// The token used by the admin verification scenario: subject `e2e-admin`,
    /// single `ADMIN` role.
    pub fn admin() -> Self {
        Self::new(ADMIN_SUBJECT, ["ADMIN"])
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Encode as `base64url(header).base64url(claims).` with no padding and an
    /// empty signature segment.
    pub fn encode(&self) -> Result<String> {
        let header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&self.header)?);
        let claims = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&self.claims)?);
        Ok(format!("{header}.{claims}."))
    }
}
