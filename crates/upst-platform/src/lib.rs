//! CI platform adapters.

pub mod env;
pub mod github;

pub use env::EnvPlatform;
pub use github::{GitHubPlatform, escape_data};

use upst_core::{Environment, Platform, PlatformKind, Result};

/// Build the adapter for `kind` over an environment snapshot.
pub fn create_platform(kind: PlatformKind, env: Environment) -> Result<Box<dyn Platform>> {
    match kind {
        PlatformKind::Github => Ok(Box::new(GitHubPlatform::new(env)?)),
        other => Ok(Box::new(EnvPlatform::new(other.config(), env))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_selects_adapter() {
        for kind in PlatformKind::ALL {
            let platform = create_platform(kind, Environment::new()).unwrap();
            assert_eq!(platform.kind(), kind);
        }
    }
}
