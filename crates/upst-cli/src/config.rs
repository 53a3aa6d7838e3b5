//! Run configuration resolved from the command line and the environment.

use crate::args::Cli;
use std::path::PathBuf;
use upst_core::{Environment, PlatformKind, Result};

/// Plain variables accepted in place of their `INPUT_<NAME>` form.
pub const MAPPED_VARIABLES: [&str; 7] = [
    "OIDC_CLIENT_IDENTIFIER",
    "DOMAIN_BASE_URL",
    "OCI_TENANCY",
    "OCI_REGION",
    "RETRY_COUNT",
    "HTTP_TIMEOUT",
    "PLATFORM",
];

#[derive(Debug)]
pub struct RunConfig {
    pub platform: PlatformKind,
    pub home: Option<PathBuf>,
    pub debug: bool,
    /// Snapshot handed to the platform adapter, inputs already mapped.
    pub env: Environment,
}

impl RunConfig {
    /// Resolve configuration. Flags beat `INPUT_<NAME>`, which beats `<NAME>`.
    pub fn resolve(cli: &Cli, env: Environment) -> Result<Self> {
        let mut env = map_plain_variables(env);

        for (name, value) in cli.input_overrides() {
            env.set(input_key(name), value);
        }

        if cli.debug {
            env.set("DEBUG", "true");
            env.set("RUNNER_DEBUG", "1");
        }

        let platform: PlatformKind = match cli.platform.as_deref() {
            Some(name) => name.parse()?,
            None => env
                .get("INPUT_PLATFORM")
                .unwrap_or(PlatformKind::Github.as_str())
                .parse()?,
        };

        let home = cli
            .home
            .clone()
            .or_else(|| env.get("HOME").map(PathBuf::from));

        let debug = match platform {
            PlatformKind::Github => env.get("RUNNER_DEBUG") == Some("1"),
            _ => env.get("DEBUG") == Some("true"),
        };

        Ok(Self {
            platform,
            home,
            debug,
            env,
        })
    }
}

/// Copy each plain variable to `INPUT_<NAME>` unless that form is already set.
pub fn map_plain_variables(mut env: Environment) -> Environment {
    for name in MAPPED_VARIABLES {
        let key = format!("INPUT_{}", name);
        if env.contains(&key) {
            continue;
        }
        if let Some(value) = env.get(name).map(str::to_string) {
            env.set(key, value);
        }
    }
    env
}

fn input_key(name: &str) -> String {
    format!("INPUT_{}", name.to_uppercase())
}
