//! Platform port (hexagonal architecture).
//!
//! A `Platform` normalises how a CI environment supplies inputs and identity
//! tokens and how it receives logs, outputs and the final failure signal.

use crate::Result;
use async_trait::async_trait;
use secrecy::SecretString;
use std::fmt;
use std::str::FromStr;

/// CI platform discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    Github,
    Gitlab,
    Bitbucket,
    Local,
}

impl PlatformKind {
    pub const ALL: [PlatformKind; 4] = [
        PlatformKind::Github,
        PlatformKind::Gitlab,
        PlatformKind::Bitbucket,
        PlatformKind::Local,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Github => "github",
            PlatformKind::Gitlab => "gitlab",
            PlatformKind::Bitbucket => "bitbucket",
            PlatformKind::Local => "local",
        }
    }

    /// Static configuration for this platform.
    pub fn config(self) -> PlatformConfig {
        match self {
            PlatformKind::Github => PlatformConfig {
                kind: self,
                token_env_var: None,
                audience: "https://cloud.oracle.com",
            },
            PlatformKind::Gitlab => PlatformConfig {
                kind: self,
                token_env_var: Some("CI_JOB_JWT_V2"),
                audience: "https://cloud.oracle.com/gitlab",
            },
            PlatformKind::Bitbucket => PlatformConfig {
                kind: self,
                token_env_var: Some("BITBUCKET_STEP_OIDC_TOKEN"),
                audience: "https://cloud.oracle.com/bitbucket",
            },
            PlatformKind::Local => PlatformConfig {
                kind: self,
                token_env_var: Some("LOCAL_OIDC_TOKEN"),
                audience: "https://cloud.oracle.com",
            },
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        PlatformKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| crate::Error::UnsupportedPlatform(s.to_string()))
    }
}

/// Per-platform static record, selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformConfig {
    pub kind: PlatformKind,
    /// Environment variable carrying the raw OIDC token, for env-driven platforms.
    pub token_env_var: Option<&'static str>,
    /// Audience expected by the token exchange endpoint.
    pub audience: &'static str,
}

/// Log severity channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(name)
    }
}

/// Capabilities a CI platform offers to a run.
#[async_trait]
pub trait Platform: Send + Sync {
    /// The discriminator this adapter was built for.
    fn kind(&self) -> PlatformKind;

    /// Read a named input. Missing required inputs fail with
    /// [`crate::Error::InputRequired`]; missing optional inputs yield `""`.
    fn get_input(&self, name: &str, required: bool) -> Result<String>;

    /// Emit a message on a severity channel, ungated.
    fn log(&self, severity: Severity, message: &str);

    /// Record a named output visible to the calling CI system.
    fn set_output(&self, name: &str, value: &str) -> Result<()>;

    /// Mark the run as failed. Only the top-level boundary calls this.
    fn set_failed(&self, message: &str);

    /// Whether verbose logging is enabled.
    fn is_debug(&self) -> bool;

    /// Fetch a raw OIDC identity token for `audience`.
    async fn get_oidc_token(&self, audience: &str) -> Result<SecretString>;

    /// Debug channel. No-op unless [`Platform::is_debug`] is true.
    fn debug(&self, message: &str) {
        if self.is_debug() {
            self.log(Severity::Debug, message);
        }
    }

    fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }

    fn warning(&self, message: &str) {
        self.log(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }
}
