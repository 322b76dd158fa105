use super::model::{AuthenticatedUser, CustomClaims};
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    claims_namespace: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    // Standard JWT claims (validated by jsonwebtoken library)
    sub: String,
    #[serde(rename = "iss")]
    _iss: String,
    #[serde(rename = "aud")]
    _aud: AudienceClaim,
    #[serde(rename = "exp")]
    _exp: u64,

    #[serde(default)]
    kind: Option<String>,
    #[serde(rename = "accountId", default)]
    account_id: Option<String>,
    #[serde(rename = "sessionUid", default)]
    session_uid: Option<String>,

    // OIDC profile claims, used for request attribution
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,

    // Namespaced custom claims; the namespace is configured per deployment
    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

/// Audience can be either a single string or an array of strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum AudienceClaim {
    Single(String),
    Multiple(Vec<String>),
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        claims_namespace: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            claims_namespace,
            leeway: leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        // Decode header to get kid
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        // Reject unsupported algorithms before touching the key set
        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let decoding_key = self.jwks_client.get_key(&kid).await.map_err(|e| match e {
            super::jwks::JwksError::KeyNotFound(_) => AppError::Auth(e.to_string()),
            _ => AppError::ExternalServiceError(e.to_string()),
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        self.into_user(token_data.claims)
    }

    fn into_user(&self, claims: Claims) -> Result<AuthenticatedUser, AppError> {
        // Token exchange tokens may not have the 'kind' claim
        if let Some(kind) = &claims.kind {
            if kind != "AccessToken" {
                return Err(AppError::Auth("Token is not an access token".to_string()));
            }
        }

        let roles = match claims.extra.get(&self.claims_namespace) {
            Some(value) => {
                let custom: CustomClaims = serde_json::from_value(value.clone())
                    .map_err(|e| AppError::Auth(format!("Invalid custom claims: {}", e)))?;
                if custom.token_type != "global" {
                    return Err(AppError::Auth(
                        "This service requires a global access token".to_string(),
                    ));
                }
                custom.roles
            }
            None => Vec::new(),
        };

        // For token exchange tokens, account_id may not be present, use sub instead
        let account_id = claims.account_id.unwrap_or_else(|| claims.sub.clone());

        Ok(AuthenticatedUser {
            account_id,
            sub: claims.sub,
            session_uid: claims.session_uid,
            roles,
            name: claims.name,
            email: claims.email,
            phone_number: claims.phone_number,
        })
    }
}
