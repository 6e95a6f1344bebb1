use serde::de::DeserializeOwned;

/// Failure to build a configuration from the environment.
#[derive(Debug, thiserror::Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(#[from] envy::Error);

/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field names map to upper-case
/// env var names (`database_url` ← `DATABASE_URL`). Use `#[serde(default = ...)]`
/// for optional settings.
pub trait Config: Sized + DeserializeOwned {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::from_env()?)
    }

    /// Build from explicit key/value pairs, same naming rules as [`Config::from_env`].
    fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = pairs.into_iter().map(|(k, v)| (k.into(), v.into()));
        Ok(envy::from_iter(pairs)?)
    }
}
