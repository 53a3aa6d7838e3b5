//! Error types for the session bootstrapper.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The stage of a run an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configuration,
    KeyMaterial,
    TokenAcquisition,
    Exchange,
    CredentialWrite,
    Reporting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Configuration => "configuration",
            Phase::KeyMaterial => "key generation",
            Phase::TokenAcquisition => "OIDC token acquisition",
            Phase::Exchange => "token exchange",
            Phase::CredentialWrite => "credential write",
            Phase::Reporting => "output reporting",
        };
        f.write_str(name)
    }
}

/// One of the four files materialised for the OCI CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Config,
    PrivateKey,
    PublicKey,
    SessionToken,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Artifact::Config => "OCI config",
            Artifact::PrivateKey => "private key",
            Artifact::PublicKey => "public key",
            Artifact::SessionToken => "session token",
        };
        f.write_str(name)
    }
}

/// A single failed artifact write.
#[derive(Debug)]
pub struct ArtifactFailure {
    pub artifact: Artifact,
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl fmt::Display for ArtifactFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.artifact, self.path.display(), self.source)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    // Configuration errors
    #[error("Input required and not supplied: {0}")]
    InputRequired(String),

    #[error("Invalid input {name}: {reason}")]
    InvalidInput { name: String, reason: String },

    #[error("retry_count must be a non-negative number, got {0:?}")]
    InvalidRetryCount(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("HOME environment variable is not defined")]
    HomeNotSet,

    // Key material
    #[error("Key material error: {0}")]
    KeyMaterial(String),

    // Token acquisition
    #[error("Unable to obtain OIDC token: {0}")]
    TokenUnavailable(String),

    // Exchange
    #[error("token exchange failed after {attempts} attempt(s): {source}")]
    TokenExchange {
        attempts: u32,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // Credential write
    #[error("Invalid credential material: {0}")]
    CredentialValidation(String),

    #[error("Unable to create OCI config folder {}: {source}", .path.display())]
    ConfigDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write OCI configuration files: {}", join_failures(.0))]
    CredentialWrite(Vec<ArtifactFailure>),

    // Reporting
    #[error("Failed to set output: {0}")]
    Output(String),
}

fn join_failures(failures: &[ArtifactFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// The phase of the run this error aborted.
    pub fn phase(&self) -> Phase {
        match self {
            Error::InputRequired(_)
            | Error::InvalidInput { .. }
            | Error::InvalidRetryCount(_)
            | Error::UnsupportedPlatform(_)
            | Error::HomeNotSet => Phase::Configuration,
            Error::KeyMaterial(_) => Phase::KeyMaterial,
            Error::TokenUnavailable(_) => Phase::TokenAcquisition,
            Error::TokenExchange { .. } => Phase::Exchange,
            Error::CredentialValidation(_)
            | Error::ConfigDir { .. }
            | Error::CredentialWrite(_) => Phase::CredentialWrite,
            Error::Output(_) => Phase::Reporting,
        }
    }

    /// Whether the error was raised before any network activity could start.
    pub fn is_configuration(&self) -> bool {
        self.phase() == Phase::Configuration
    }
}

pub type Result<T> = std::result::Result<T, Error>;
