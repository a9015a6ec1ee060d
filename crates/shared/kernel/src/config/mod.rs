use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Prefix of environment overrides, e.g. `AUTOIMS__DATABASE__PATH`.
pub const ENV_PREFIX: &str = "AUTOIMS";
/// Base name of the config file looked up when no path is given.
pub const DEFAULT_CONFIG: &str = "server";

#[autoims_derive::autoims_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads `T` from a config file overlaid with `AUTOIMS__*` environment variables.
///
/// * `Some(path)`: the file must exist. Any format the `config` crate knows
///   works (`server.toml`, `server.yaml`, ...); the extension may be omitted.
/// * `None`: `./server.*` is used when present, otherwise defaults plus environment.
///
/// Nested keys use a double underscore: `AUTOIMS__SERVER__PORT=8080` sets `server.port`.
///
/// # Errors
///
/// Fails when an explicit file is missing or the merged values do not fit `T`.
///
/// ```rust
/// use autoims_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (file, required) = match &path {
        Some(p) => (p.as_ref(), true),
        None => (Path::new(DEFAULT_CONFIG), false),
    };

    info!(path = %file.display(), required, "Loading config");

    Config::builder()
        .add_source(File::from(file).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
