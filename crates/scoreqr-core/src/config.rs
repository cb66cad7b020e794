/// Trait for loading configuration from environment variables.
///
/// Implementors derive `serde::Deserialize` and call `from_env()` once at
/// startup.
///
/// # Panics
///
/// Panics if a required env var is missing or fails to deserialize.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        envy::from_env().expect("failed to load config from environment")
    }
}
