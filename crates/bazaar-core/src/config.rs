//! Environment-driven service configuration.

/// Load a service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field `baas_url` is read from
/// `BAAS_URL`, and so on. Optional settings use `#[serde(default = ...)]`.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Deserialize from the process environment.
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or malformed; only call at start-up.
    fn from_env() -> Self {
        Self::try_from_env().expect("failed to load config from environment")
    }

    fn try_from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Deserialize from explicit key/value pairs (keys in `SCREAMING_SNAKE_CASE`).
    fn from_pairs<I>(pairs: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(pairs)
    }
}
