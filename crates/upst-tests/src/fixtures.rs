//! Test fixtures for key material, identity tokens and environments.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use once_cell::sync::Lazy;
use upst_auth::KeyPair;
use upst_core::Environment;

pub const CLIENT_IDENTIFIER: &str = "test-client-id:test-client-secret-0123";
pub const TENANCY: &str = "ocid1.tenancy.oc1..aaaaaaaatestfixture";
pub const REGION: &str = "us-ashburn-1";
pub const SUBJECT: &str = "repo:example/infra:ref:refs/heads/main";

static KEYS: Lazy<KeyPair> = Lazy::new(|| KeyPair::generate().expect("RSA key generation"));

/// One keypair per test binary; generating 2048-bit keys is slow.
pub fn shared_keys() -> &'static KeyPair {
    &KEYS
}

/// A structurally valid, unsigned identity token.
pub fn sample_jwt() -> String {
    let header = serde_json::json!({"alg": "RS256", "typ": "JWT", "kid": "test"});
    let payload = serde_json::json!({
        "iss": "https://token.actions.githubusercontent.com",
        "sub": SUBJECT,
        "aud": "https://cloud.oracle.com",
        "exp": 1_700_000_600,
        "iat": 1_700_000_000,
    });
    format!(
        "{}.{}.c2lnbmF0dXJl",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

/// Builder for the environment of a `local` platform run.
pub struct LocalEnv {
    env: Environment,
}

impl LocalEnv {
    /// All required inputs set and `LOCAL_OIDC_TOKEN="a.b.c"`.
    pub fn new(domain_base_url: &str) -> Self {
        let env = Environment::new()
            .with("INPUT_OIDC_CLIENT_IDENTIFIER", CLIENT_IDENTIFIER)
            .with("INPUT_DOMAIN_BASE_URL", domain_base_url)
            .with("INPUT_OCI_TENANCY", TENANCY)
            .with("INPUT_OCI_REGION", REGION)
            .with("LOCAL_OIDC_TOKEN", "a.b.c");
        Self { env }
    }

    pub fn retry_count(self, value: &str) -> Self {
        self.set("INPUT_RETRY_COUNT", value)
    }

    pub fn token(self, value: &str) -> Self {
        self.set("LOCAL_OIDC_TOKEN", value)
    }

    pub fn debug(self) -> Self {
        self.set("DEBUG", "true")
    }

    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.env.set(key, value);
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.env.remove(key);
        self
    }

    pub fn build(self) -> Environment {
        self.env
    }
}
