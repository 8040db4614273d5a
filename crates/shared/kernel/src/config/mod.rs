use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Prefix for environment overrides (`TESSERA__CACHE__CAPACITY=512`).
pub const ENV_PREFIX: &str = "TESSERA";

/// Custom error type for config loading.
#[tessera_derive::tessera_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Layered configuration loader: an optional file overlaid with environment overrides.
///
/// 1. **Base File**: when `path` is given, the file must exist; its format follows the
///    extension (TOML, JSON, YAML). Without a path only defaults and the environment apply.
/// 2. **Environment Overrides**: variables prefixed with `TESSERA__`; nested keys use double
///    underscores (`TESSERA__PROPAGATION__MAX_DEPTH` maps to `propagation.max_depth`).
///
/// Fields absent from every layer keep the target type's serde defaults.
///
/// # Errors
/// * The given file is missing or malformed.
/// * A value does not match the structure of `T`.
///
/// # Example
/// ```rust
/// use tessera_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct CliConfig {
///     verbose: bool,
/// }
///
/// let cfg: CliConfig = load_config(Some("config/local.toml")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let mut builder = Config::builder();

    if let Some(path) = path.as_ref().map(AsRef::as_ref) {
        info!(path = %path.display(), "Loading config");
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
