//! `oci-upst` entrypoint.

use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use upst_auth::KeyPair;
use upst_cli::{Bootstrapper, Cli, RunConfig, RunStatus, logging};
use upst_core::Environment;
use upst_platform::create_platform;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match RunConfig::resolve(&cli, Environment::from_process()) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(cli.debug);
            error!("{}", upst_cli::failure_message(&e));
            return ExitCode::FAILURE;
        }
    };
    logging::init_logging(config.debug);

    let platform = match create_platform(config.platform, config.env) {
        Ok(platform) => platform,
        Err(e) => {
            error!("{}", upst_cli::failure_message(&e));
            return ExitCode::FAILURE;
        }
    };

    let keys = match KeyPair::generate() {
        Ok(keys) => keys,
        Err(e) => {
            platform.set_failed(&upst_cli::failure_message(&e));
            return RunStatus::Failed.exit_code();
        }
    };

    Bootstrapper::new(platform.as_ref(), &keys, config.home)
        .execute()
        .await
        .exit_code()
}
