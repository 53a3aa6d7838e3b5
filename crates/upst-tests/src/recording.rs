//! Platform double that records everything a run reports.

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use upst_core::{Environment, Platform, PlatformKind, Result, Severity};
use upst_platform::create_platform;

/// Wraps a real adapter and records logs, outputs, failures and token
/// requests while delegating inputs and tokens to it.
pub struct RecordingPlatform {
    inner: Box<dyn Platform>,
    logs: Mutex<Vec<(Severity, String)>>,
    outputs: Mutex<Vec<(String, String)>>,
    failures: Mutex<Vec<String>>,
    token_requests: AtomicUsize,
}

impl RecordingPlatform {
    pub fn wrap(inner: Box<dyn Platform>) -> Self {
        Self {
            inner,
            logs: Mutex::default(),
            outputs: Mutex::default(),
            failures: Mutex::default(),
            token_requests: AtomicUsize::new(0),
        }
    }

    pub fn local(env: Environment) -> Self {
        Self::for_kind(PlatformKind::Local, env)
    }

    pub fn for_kind(kind: PlatformKind, env: Environment) -> Self {
        Self::wrap(create_platform(kind, env).expect("platform adapter"))
    }

    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn all_messages(&self) -> Vec<String> {
        self.logs.lock().unwrap().iter().map(|(_, m)| m.clone()).collect()
    }

    pub fn outputs(&self) -> Vec<(String, String)> {
        self.outputs.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }

    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    fn kind(&self) -> PlatformKind {
        self.inner.kind()
    }

    fn get_input(&self, name: &str, required: bool) -> Result<String> {
        self.inner.get_input(name, required)
    }

    fn log(&self, severity: Severity, message: &str) {
        self.logs
            .lock()
            .unwrap()
            .push((severity, message.to_string()));
        self.inner.log(severity, message);
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        self.outputs
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
        self.inner.set_output(name, value)
    }

    fn set_failed(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
        self.error(message);
    }

    fn is_debug(&self) -> bool {
        self.inner.is_debug()
    }

    async fn get_oidc_token(&self, audience: &str) -> Result<SecretString> {
        self.token_requests.fetch_add(1, Ordering::SeqCst);
        self.inner.get_oidc_token(audience).await
    }
}
