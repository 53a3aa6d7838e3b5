//! OCI session bootstrapper.
//!
//! Exchanges the CI job's OIDC identity token for an OCI session token
//! (UPST) and writes the result as OCI CLI configuration.

pub mod args;
pub mod config;
pub mod logging;
pub mod run;
pub mod writer;

pub use args::Cli;
pub use config::RunConfig;
pub use run::{Bootstrapper, RunStatus, failure_message};
pub use writer::{CredentialBundle, CredentialLayout, CredentialWriter, render_config};
