//! Run orchestration and the single failure boundary.

use crate::writer::{CredentialBundle, CredentialLayout, CredentialWriter};
use secrecy::ExposeSecret;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, instrument};
use upst_auth::{
    Backoff, ExchangeRequest, KeyPair, TokenExchanger, client_credential, jwt, token_endpoint,
};
use upst_core::{Error, Platform, Result, RunInputs, Severity};

/// Outcome reported to the entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Configured,
    Failed,
}

impl RunStatus {
    pub fn exit_code(self) -> ExitCode {
        match self {
            RunStatus::Configured => ExitCode::SUCCESS,
            RunStatus::Failed => ExitCode::FAILURE,
        }
    }
}

/// Sequences one credential exchange: inputs, identity token, exchange,
/// credential write, outputs.
pub struct Bootstrapper<'a> {
    platform: &'a dyn Platform,
    keys: &'a KeyPair,
    home: Option<PathBuf>,
    backoff: Backoff,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(platform: &'a dyn Platform, keys: &'a KeyPair, home: Option<PathBuf>) -> Self {
        Self {
            platform,
            keys,
            home,
            backoff: Backoff::default(),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Run to completion, reporting any failure through the platform once.
    pub async fn execute(&self) -> RunStatus {
        match self.run().await {
            Ok(()) => RunStatus::Configured,
            Err(err) => {
                self.platform.set_failed(&failure_message(&err));
                RunStatus::Failed
            }
        }
    }

    #[instrument(skip_all, fields(platform = %self.platform.kind()))]
    pub async fn run(&self) -> Result<()> {
        let home = self.home.as_deref().ok_or(Error::HomeNotSet)?;
        let inputs = RunInputs::read(self.platform)?;
        let endpoint = token_endpoint(&inputs.domain_base_url)?;
        debug!(retry_count = inputs.retry_count, "Inputs validated");

        let audience = self.platform.kind().config().audience;
        let subject_token = self.platform.get_oidc_token(audience).await?;

        if self.platform.is_debug() {
            for line in jwt::describe(subject_token.expose_secret()) {
                self.platform.log(Severity::Debug, &line);
            }
        }

        let public_key = self.keys.public_key_base64()?;
        self.platform
            .debug(&format!("Public key fingerprint: {}", self.keys.fingerprint()?));

        let request = ExchangeRequest {
            endpoint,
            client_credential: client_credential(&inputs.oidc_client_identifier),
            public_key,
            subject_token,
            retry_budget: inputs.retry_count,
        };
        let exchanger = TokenExchanger::new(inputs.http_timeout)?.with_backoff(self.backoff);
        let result = exchanger.exchange(self.platform, &request).await?;
        self.platform.info("OCI issued a Session Token");

        let bundle =
            CredentialBundle::new(self.keys, result.token, inputs.oci_tenancy, inputs.oci_region)?;
        CredentialWriter::new(self.platform, CredentialLayout::under(home))
            .write(&bundle)
            .await?;
        self.platform
            .info("OCI CLI has been configured to use the session token");

        self.platform.set_output("configured", "true")
    }
}

/// Human-readable failure naming the phase that failed.
pub fn failure_message(err: &Error) -> String {
    format!("Failed during {}: {}", err.phase(), err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_names_phase() {
        assert_eq!(
            failure_message(&Error::InputRequired("oci_tenancy".to_string())),
            "Failed during configuration: Input required and not supplied: oci_tenancy"
        );
        assert_eq!(
            failure_message(&Error::HomeNotSet),
            format!("Failed during configuration: {}", Error::HomeNotSet)
        );
    }
}
