//! Environment-variable driven platform (GitLab, Bitbucket, local runs).

use async_trait::async_trait;
use secrecy::SecretString;
use tracing::{debug, error, info, warn};
use upst_core::{Environment, Error, Platform, PlatformConfig, PlatformKind, Result, Severity};

/// Adapter for platforms that hand the OIDC token over in an environment
/// variable, parameterised by [`PlatformConfig::token_env_var`].
pub struct EnvPlatform {
    config: PlatformConfig,
    env: Environment,
}

impl EnvPlatform {
    pub fn new(config: PlatformConfig, env: Environment) -> Self {
        Self { config, env }
    }

    /// Candidate variable names for an input, in lookup order.
    fn candidates(name: &str) -> [String; 4] {
        let upper = name.to_uppercase();
        [
            format!("INPUT_{}", upper),
            upper.clone(),
            format!("OCI_{}", upper),
            format!("OIDC_{}", upper),
        ]
    }
}

#[async_trait]
impl Platform for EnvPlatform {
    fn kind(&self) -> PlatformKind {
        self.config.kind
    }

    fn get_input(&self, name: &str, required: bool) -> Result<String> {
        let value = Self::candidates(name)
            .iter()
            .find_map(|key| self.env.get(key))
            .unwrap_or_default()
            .to_string();

        if required && value.is_empty() {
            return Err(Error::InputRequired(name.to_string()));
        }
        Ok(value)
    }

    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => debug!(target: "upst", "{}", message),
            Severity::Info => info!(target: "upst", "{}", message),
            Severity::Warning => warn!(target: "upst", "{}", message),
            Severity::Error => error!(target: "upst", "{}", message),
        }
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        println!("::set-output name={}::{}", name, value);
        Ok(())
    }

    fn set_failed(&self, message: &str) {
        self.error(message);
    }

    fn is_debug(&self) -> bool {
        self.env.get("DEBUG") == Some("true")
    }

    async fn get_oidc_token(&self, _audience: &str) -> Result<SecretString> {
        let Some(var) = self.config.token_env_var else {
            return Err(Error::TokenUnavailable(
                "No OIDC token configuration available".to_string(),
            ));
        };
        self.env
            .get(var)
            .map(|token| SecretString::new(token.to_string()))
            .ok_or_else(|| Error::TokenUnavailable(format!("{} environment variable not found", var)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn local(env: Environment) -> EnvPlatform {
        EnvPlatform::new(PlatformKind::Local.config(), env)
    }

    #[test]
    fn test_input_lookup_order() {
        let env = Environment::new()
            .with("OCI_REGION", "us-ashburn-1")
            .with("INPUT_OCI_REGION", "eu-frankfurt-1")
            .with("OIDC_DOMAIN_BASE_URL", "https://idcs.example.com")
            .with("OCI_OCI_TENANCY", "ocid1.tenancy.oc1..aaaa");
        let platform = local(env);

        assert_eq!(platform.get_input("oci_region", true).unwrap(), "eu-frankfurt-1");
        assert_eq!(
            platform.get_input("domain_base_url", true).unwrap(),
            "https://idcs.example.com"
        );
        assert_eq!(
            platform.get_input("oci_tenancy", true).unwrap(),
            "ocid1.tenancy.oc1..aaaa"
        );
    }

    #[test]
    fn test_required_input_missing() {
        let platform = local(Environment::new());
        let err = platform.get_input("oci_tenancy", true).unwrap_err();
        assert_eq!(err.to_string(), "Input required and not supplied: oci_tenancy");
    }

    #[test]
    fn test_optional_input_missing_is_empty() {
        let platform = local(Environment::new().with("INPUT_RETRY_COUNT", ""));
        assert_eq!(platform.get_input("retry_count", false).unwrap(), "");
    }

    #[test]
    fn test_debug_toggle() {
        assert!(local(Environment::new().with("DEBUG", "true")).is_debug());
        assert!(!local(Environment::new().with("DEBUG", "1")).is_debug());
        assert!(!local(Environment::new()).is_debug());
    }

    #[tokio::test]
    async fn test_token_from_env() {
        let platform = local(Environment::new().with("LOCAL_OIDC_TOKEN", "a.b.c"));
        let token = platform.get_oidc_token("https://cloud.oracle.com").await.unwrap();
        assert_eq!(token.expose_secret(), "a.b.c");
    }

    #[tokio::test]
    async fn test_token_missing() {
        let platform = EnvPlatform::new(PlatformKind::Gitlab.config(), Environment::new());
        let err = platform
            .get_oidc_token("https://cloud.oracle.com/gitlab")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TokenUnavailable(_)));
        assert!(err.to_string().contains("CI_JOB_JWT_V2 environment variable not found"));
    }

    #[tokio::test]
    async fn test_no_token_variable_configured() {
        let platform = EnvPlatform::new(PlatformKind::Github.config(), Environment::new());
        let err = platform.get_oidc_token("aud").await.unwrap_err();
        assert!(err.to_string().contains("No OIDC token configuration available"));
    }
}
