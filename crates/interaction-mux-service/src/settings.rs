//! Configuration loading.
//!
//! Sources are applied in order, later sources overriding earlier ones:
//!  1. `/etc/interaction-mux/service.yaml`
//!  2. `./config/service.yaml`
//!  3. the file named by `IM_CONFIG_FILE`, which must exist when set
//!  4. environment variables prefixed `IM__`, e.g. `IM__SERVER__PORT=9090`
//!
//! Missing files fall back to built-in defaults. A malformed file or a value
//! that cannot be coerced to its field type is an error.

use interaction_mux_api::ServiceConfig;

/// Environment variable naming an explicit configuration file
pub const CONFIG_FILE_ENV: &str = "IM_CONFIG_FILE";

/// Environment source reading `IM__`-prefixed variables
pub fn environment() -> config::Environment {
    config::Environment::with_prefix("IM").separator("__")
}

/// Load the service configuration from the standard locations, the optional
/// `explicit_path` and `environment`.
pub fn load_config(
    explicit_path: Option<&str>,
    environment: config::Environment,
) -> Result<ServiceConfig, config::ConfigError> {
    let mut builder = config::Config::builder()
        .add_source(
            config::File::with_name("/etc/interaction-mux/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        )
        .add_source(
            config::File::with_name("config/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        );

    if let Some(path) = explicit_path.filter(|p| !p.is_empty()) {
        builder = builder.add_source(
            config::File::with_name(path)
                .required(true)
                .format(config::FileFormat::Yaml),
        );
    }

    builder
        .add_source(environment)
        .build()?
        .try_deserialize()
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
