//! OCI session bootstrapper core
//!
//! Shared vocabulary for the credential exchange pipeline: the error
//! taxonomy, the environment snapshot, run inputs and the `Platform` port
//! that every CI adapter implements.

pub mod env;
pub mod error;
pub mod inputs;
pub mod platform;

pub use env::Environment;
pub use error::{Artifact, ArtifactFailure, Error, Phase, Result};
pub use inputs::RunInputs;
pub use platform::{Platform, PlatformConfig, PlatformKind, Severity};
