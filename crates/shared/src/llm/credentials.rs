use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::config::{AssistantConfig, DEFAULT_API_KEY_ENV};
use crate::config_env::{non_empty_trimmed, optional_trimmed_env};

#[derive(Debug, Error)]
pub enum SecretStoreError {
    #[error("secret store unavailable: {0}")]
    Unavailable(String),
    #[error("secret store entry is malformed: {0}")]
    Malformed(String),
}

/// Host-provided secrets lookup, consulted after the explicit key and the environment.
pub trait SecretStore: Send + Sync {
    fn lookup(&self, key: &str) -> Result<Option<String>, SecretStoreError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoSecretStore;

impl SecretStore for NoSecretStore {
    fn lookup(&self, _key: &str) -> Result<Option<String>, SecretStoreError> {
        Ok(None)
    }
}

/// Reads `KEY=value` entries from a dotenv-formatted secrets file on every lookup.
#[derive(Debug, Clone)]
pub struct DotenvSecretStore {
    path: PathBuf,
}

impl DotenvSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SecretStore for DotenvSecretStore {
    fn lookup(&self, key: &str) -> Result<Option<String>, SecretStoreError> {
        let entries = dotenvy::from_path_iter(&self.path).map_err(|err| {
            SecretStoreError::Unavailable(format!("{}: {err}", self.path.display()))
        })?;

        for entry in entries {
            let (name, value) = entry.map_err(|err| SecretStoreError::Malformed(err.to_string()))?;
            if name == key {
                return Ok(non_empty_trimmed(&value));
            }
        }

        Ok(None)
    }
}

#[derive(Clone)]
pub struct CredentialResolver {
    env_key: String,
    secret_store: Arc<dyn SecretStore>,
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("env_key", &self.env_key)
            .finish_non_exhaustive()
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY_ENV, Arc::new(NoSecretStore))
    }
}

impl CredentialResolver {
    pub fn new(env_key: impl Into<String>, secret_store: Arc<dyn SecretStore>) -> Self {
        Self {
            env_key: env_key.into(),
            secret_store,
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(
            config.api_key_env.clone(),
            Arc::new(DotenvSecretStore::new(config.secrets_file.clone())),
        )
    }

    /// First non-empty source wins: explicit argument, environment, secret store.
    /// Secret store failures count as "no key" and are never surfaced.
    pub fn resolve(&self, explicit: Option<&str>) -> Option<String> {
        if let Some(key) = explicit.and_then(non_empty_trimmed) {
            return Some(key);
        }

        if let Some(key) = optional_trimmed_env(&self.env_key) {
            return Some(key);
        }

        match self.secret_store.lookup(&self.env_key) {
            Ok(key) => key,
            Err(err) => {
                debug!("secret store lookup skipped: {err}");
                None
            }
        }
    }
}

/// Resolves a key with the default `GROQ_API_KEY` variable and no secret store.
pub fn resolve_api_key(explicit: Option<&str>) -> Option<String> {
    CredentialResolver::default().resolve(explicit)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{
        CredentialResolver, NoSecretStore, SecretStore, SecretStoreError, resolve_api_key,
    };

    struct FixedSecretStore(Option<&'static str>);

    impl SecretStore for FixedSecretStore {
        fn lookup(&self, _key: &str) -> Result<Option<String>, SecretStoreError> {
            Ok(self.0.map(ToString::to_string))
        }
    }

    struct BrokenSecretStore;

    impl SecretStore for BrokenSecretStore {
        fn lookup(&self, _key: &str) -> Result<Option<String>, SecretStoreError> {
            Err(SecretStoreError::Unavailable("not configured".to_string()))
        }
    }

    const UNSET_ENV_KEY: &str = "POWERGAS_TEST_KEY_THAT_IS_NEVER_SET";

    #[test]
    fn explicit_key_is_trimmed_and_wins() {
        let resolver =
            CredentialResolver::new(UNSET_ENV_KEY, Arc::new(FixedSecretStore(Some("secret"))));
        assert_eq!(resolver.resolve(Some("abc ")).as_deref(), Some("abc"));
    }

    #[test]
    fn blank_explicit_key_falls_through_to_secret_store() {
        let resolver =
            CredentialResolver::new(UNSET_ENV_KEY, Arc::new(FixedSecretStore(Some("secret"))));
        assert_eq!(resolver.resolve(Some("   ")).as_deref(), Some("secret"));
    }

    #[test]
    fn failing_secret_store_resolves_to_none() {
        let resolver = CredentialResolver::new(UNSET_ENV_KEY, Arc::new(BrokenSecretStore));
        assert_eq!(resolver.resolve(None), None);
    }

    #[test]
    fn default_resolver_prefers_the_explicit_key() {
        assert_eq!(resolve_api_key(Some(" gsk-test ")).as_deref(), Some("gsk-test"));
    }

    #[test]
    fn no_source_yields_none() {
        let resolver = CredentialResolver::new(UNSET_ENV_KEY, Arc::new(NoSecretStore));
        assert_eq!(resolver.resolve(None), None);
    }
}
