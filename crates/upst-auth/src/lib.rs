//! OIDC token exchange for OCI session tokens.
//!
//! This crate owns the RSA key material bound into the session token, a
//! lenient inspector for OIDC identity tokens, and the exchanger that trades
//! an identity token for a UPST against an OCI identity domain.

pub mod exchange;
pub mod jwt;
pub mod keys;

pub use exchange::{
    Backoff, ExchangeError, ExchangeRequest, ExchangeResult, TokenExchanger, client_credential,
    token_endpoint,
};
pub use jwt::{JwtError, OidcClaims, SafeClaims, TokenInspection};
pub use keys::{Fingerprint, KEY_BITS, KeyPair};
