//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Exchange a CI OIDC token for an OCI session token and configure the OCI CLI.
#[derive(Debug, Default, Parser)]
#[command(name = "oci-upst")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// CI platform: github, gitlab, bitbucket or local [default: $PLATFORM, then github]
    #[arg(long)]
    pub platform: Option<String>,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Directory the credentials are written under [default: $HOME]
    #[arg(long)]
    pub home: Option<PathBuf>,

    /// `client_id:client_secret` of the token exchange application
    #[arg(long)]
    pub oidc_client_identifier: Option<String>,

    /// Base URL of the OCI identity domain
    #[arg(long)]
    pub domain_base_url: Option<String>,

    /// Tenancy OCID
    #[arg(long)]
    pub oci_tenancy: Option<String>,

    /// Region identifier, e.g. us-ashburn-1
    #[arg(long)]
    pub oci_region: Option<String>,

    /// Extra exchange attempts after the first failure
    #[arg(long, allow_hyphen_values = true)]
    pub retry_count: Option<String>,

    /// Per-request HTTP timeout in seconds
    #[arg(long)]
    pub http_timeout: Option<String>,
}

impl Cli {
    /// Input overrides given on the command line, keyed by input name.
    pub fn input_overrides(&self) -> Vec<(&'static str, &str)> {
        use upst_core::inputs::*;

        [
            (OIDC_CLIENT_IDENTIFIER, &self.oidc_client_identifier),
            (DOMAIN_BASE_URL, &self.domain_base_url),
            (OCI_TENANCY, &self.oci_tenancy),
            (OCI_REGION, &self.oci_region),
            (RETRY_COUNT, &self.retry_count),
            (HTTP_TIMEOUT, &self.http_timeout),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "oci-upst",
            "--platform",
            "local",
            "--debug",
            "--oci-region",
            "us-ashburn-1",
            "--retry-count",
            "-1",
        ])
        .unwrap();

        assert_eq!(cli.platform.as_deref(), Some("local"));
        assert!(cli.debug);
        assert_eq!(
            cli.input_overrides(),
            vec![("oci_region", "us-ashburn-1"), ("retry_count", "-1")]
        );
    }

    #[test]
    fn test_no_flags() {
        let cli = Cli::try_parse_from(["oci-upst"]).unwrap();
        assert!(cli.platform.is_none());
        assert!(cli.input_overrides().is_empty());
    }
}
