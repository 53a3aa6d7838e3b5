//! Immutable snapshot of the process environment.
//!
//! The process environment is captured once at startup and every adapter
//! reads from the snapshot, so tests can hand in a fully controlled set of
//! variables without mutating global state.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;

#[derive(Clone, Default)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Build from raw OS pairs. Entries that are not valid unicode are skipped.
    pub fn from_os_vars<I: IntoIterator<Item = (OsString, OsString)>>(vars: I) -> Self {
        vars.into_iter()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.vars.remove(key);
    }

    /// Look up a variable. Empty values count as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// Values may hold tokens; only names are printed.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.vars.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_is_unset() {
        let env = Environment::new().with("DEBUG", "").with("HOME", "/home/runner");
        assert_eq!(env.get("DEBUG"), None);
        assert!(!env.contains("DEBUG"));
        assert_eq!(env.get("HOME"), Some("/home/runner"));
    }

    #[test]
    fn test_debug_hides_values() {
        let env = Environment::new().with("LOCAL_OIDC_TOKEN", "a.b.c");
        let rendered = format!("{:?}", env);
        assert!(rendered.contains("LOCAL_OIDC_TOKEN"));
        assert!(!rendered.contains("a.b.c"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_variables_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let env = Environment::from_os_vars([
            (OsString::from("HOME"), OsString::from("/home/runner")),
            (OsString::from("BROKEN"), OsString::from_vec(vec![0xff, 0xfe])),
            (OsString::from_vec(vec![0x80]), OsString::from("value")),
        ]);

        assert_eq!(env.get("HOME"), Some("/home/runner"));
        assert!(!env.contains("BROKEN"));
        assert_eq!(format!("{:?}", env), r#"{"HOME"}"#);
    }
}
