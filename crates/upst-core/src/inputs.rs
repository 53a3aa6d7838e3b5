//! Run inputs read through the platform adapter.

use crate::platform::Platform;
use crate::{Error, Result};
use secrecy::SecretString;
use std::time::Duration;

pub const OIDC_CLIENT_IDENTIFIER: &str = "oidc_client_identifier";
pub const DOMAIN_BASE_URL: &str = "domain_base_url";
pub const OCI_TENANCY: &str = "oci_tenancy";
pub const OCI_REGION: &str = "oci_region";
pub const RETRY_COUNT: &str = "retry_count";
pub const HTTP_TIMEOUT: &str = "http_timeout";

/// Per-request deadline used when `http_timeout` is not supplied.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Validated inputs for one run.
#[derive(Debug)]
pub struct RunInputs {
    /// `client_id:client_secret` of the confidential token exchange app.
    pub oidc_client_identifier: SecretString,
    pub domain_base_url: String,
    pub oci_tenancy: String,
    pub oci_region: String,
    pub retry_count: u32,
    /// Deadline applied to each outbound HTTP call.
    pub http_timeout: Duration,
}

impl RunInputs {
    /// Read and validate every input. Performs no network activity.
    pub fn read(platform: &dyn Platform) -> Result<Self> {
        let oidc_client_identifier = platform.get_input(OIDC_CLIENT_IDENTIFIER, true)?;
        let domain_base_url = platform.get_input(DOMAIN_BASE_URL, true)?;
        let oci_tenancy = platform.get_input(OCI_TENANCY, true)?;
        let oci_region = platform.get_input(OCI_REGION, true)?;

        let retry_count = parse_retry_count(&platform.get_input(RETRY_COUNT, false)?)?;
        let http_timeout = parse_http_timeout(&platform.get_input(HTTP_TIMEOUT, false)?)?;

        for (name, value) in [(OCI_TENANCY, &oci_tenancy), (OCI_REGION, &oci_region)] {
            if value.contains(['\n', '\r']) {
                return Err(Error::InvalidInput {
                    name: name.to_string(),
                    reason: "must be a single line".to_string(),
                });
            }
        }

        Ok(Self {
            oidc_client_identifier: SecretString::new(oidc_client_identifier),
            domain_base_url,
            oci_tenancy,
            oci_region,
            retry_count,
            http_timeout,
        })
    }
}

/// Parse the optional retry budget. Empty means zero retries.
pub fn parse_retry_count(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u32>()
        .map_err(|_| Error::InvalidRetryCount(raw.to_string()))
}

/// Parse the optional per-request timeout in seconds.
pub fn parse_http_timeout(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_HTTP_TIMEOUT);
    }
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::InvalidInput {
            name: HTTP_TIMEOUT.to_string(),
            reason: format!("expected a positive number of seconds, got {:?}", raw),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_count_defaults_to_zero() {
        assert_eq!(parse_retry_count("").unwrap(), 0);
        assert_eq!(parse_retry_count("  ").unwrap(), 0);
    }

    #[test]
    fn test_retry_count_parses() {
        assert_eq!(parse_retry_count("3").unwrap(), 3);
        assert_eq!(parse_retry_count(" 2 ").unwrap(), 2);
    }

    #[test]
    fn test_retry_count_rejects_negative_and_garbage() {
        for raw in ["-1", "abc", "1.5", "2x"] {
            let err = parse_retry_count(raw).unwrap_err();
            assert!(matches!(err, Error::InvalidRetryCount(_)), "{raw}");
            assert!(err.is_configuration());
        }
    }

    #[test]
    fn test_http_timeout() {
        assert_eq!(parse_http_timeout("").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_http_timeout("5").unwrap(), Duration::from_secs(5));
        assert!(parse_http_timeout("0").is_err());
        assert!(parse_http_timeout("-3").is_err());
    }
}
