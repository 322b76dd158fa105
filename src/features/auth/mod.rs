//! Identity integration with the external OIDC provider.
//!
//! Tokens are issued elsewhere; this feature only validates bearer tokens
//! against the provider's JWKS and exposes the resolved identity.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/auth/me` | Yes | Current identity and roles |

mod jwks;
mod validator;

pub mod dto;
pub mod guards;
pub mod handler;
pub mod model;
pub mod routes;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
