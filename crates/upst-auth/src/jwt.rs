//! Best-effort inspection of OIDC identity tokens.
//!
//! Nothing here verifies signatures: token validity is the exchange
//! endpoint's concern. Inspection only surfaces metadata that is safe to
//! print in debug logs.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Number of characters of `sub` kept in debug output.
const SUBJECT_PREFIX_LEN: usize = 10;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token has {0} segment(s), expected 3")]
    Malformed(usize),
    #[error("{0} segment is not valid base64")]
    Encoding(&'static str),
    #[error("{0} segment is not valid JSON")]
    Json(&'static str),
}

/// Claims of interest in an OIDC identity token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OidcClaims {
    pub iss: Option<String>,
    pub sub: Option<String>,
    pub aud: Option<serde_json::Value>,
    pub exp: Option<i64>,
    pub iat: Option<i64>,
}

/// Subset of claims that may be printed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SafeClaims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
}

impl OidcClaims {
    pub fn safe(&self) -> SafeClaims {
        SafeClaims {
            iss: self.iss.clone(),
            aud: self.aud.clone(),
            exp: self.exp,
            iat: self.iat,
            sub: self.sub.as_deref().map(truncate_subject),
            expires_at: self.exp.and_then(to_rfc3339),
            issued_at: self.iat.and_then(to_rfc3339),
        }
    }
}

/// Decoded header and claims of a token.
#[derive(Debug, Clone)]
pub struct TokenInspection {
    pub header: serde_json::Value,
    pub claims: OidcClaims,
    pub signature_present: bool,
}

pub fn segment_count(token: &str) -> usize {
    token.split('.').count()
}

/// Decode the header and payload segments of a dot-separated token.
pub fn inspect(token: &str) -> Result<TokenInspection, JwtError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() < 3 {
        return Err(JwtError::Malformed(parts.len()));
    }

    let header = decode_segment(parts[0], "header")?;
    let payload = decode_segment(parts[1], "payload")?;
    let claims = serde_json::from_value(payload).map_err(|_| JwtError::Json("payload"))?;

    Ok(TokenInspection {
        header,
        claims,
        signature_present: !parts[2].is_empty(),
    })
}

/// Debug lines describing a token without revealing it.
pub fn describe(token: &str) -> Vec<String> {
    let mut lines = vec![format!(
        "JWT Token received (length: {} characters)",
        token.chars().count()
    )];

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        lines.push(
            "Warning: JWT token does not have the expected format (header.payload.signature)"
                .to_string(),
        );
        return lines;
    }

    match decode_segment(parts[0], "header") {
        Ok(header) => lines.push(format!("JWT Header: {}", header)),
        Err(e) => lines.push(format!("Failed to parse JWT header: {}", e)),
    }

    let claims = decode_segment(parts[1], "payload").and_then(|payload| {
        serde_json::from_value::<OidcClaims>(payload).map_err(|_| JwtError::Json("payload"))
    });
    match claims {
        Ok(claims) => {
            let safe = serde_json::to_string(&claims.safe()).unwrap_or_default();
            lines.push(format!("JWT Payload (safe parts): {}", safe));
        }
        Err(e) => lines.push(format!("Failed to parse JWT payload: {}", e)),
    }

    let present = if parts[2].is_empty() { "No" } else { "Yes" };
    lines.push(format!("JWT Signature present: {}", present));
    lines
}

fn decode_segment(segment: &str, name: &'static str) -> Result<serde_json::Value, JwtError> {
    let bytes = URL_SAFE_LENIENT
        .decode(segment)
        .or_else(|_| STANDARD_LENIENT.decode(segment))
        .map_err(|_| JwtError::Encoding(name))?;
    serde_json::from_slice(&bytes).map_err(|_| JwtError::Json(name))
}

fn truncate_subject(sub: &str) -> String {
    let prefix: String = sub.chars().take(SUBJECT_PREFIX_LEN).collect();
    format!("{}...", prefix)
}

fn to_rfc3339(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}
