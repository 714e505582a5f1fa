use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Server, Settings, Uploads};

/// Loads the application configuration.
///
/// Defaults are layered first, then an optional `atelier.toml` in the working
/// directory, then environment variables prefixed with `ATELIER_` (e.g.
/// `ATELIER_SERVER__PORT=8080`). The file is optional so the binary runs
/// out of the box.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let defaults = Settings::default();

    let builder = config::Config::builder()
        .set_default("server.host", defaults.server.host)?
        .set_default("server.port", u64::from(defaults.server.port))?
        .set_default("uploads.max_image_bytes", defaults.uploads.max_image_bytes as u64)?
        .set_default(
            "uploads.max_images_per_order",
            defaults.uploads.max_images_per_order as u64,
        )?
        .set_default(
            "uploads.allowed_mime_types",
            defaults.uploads.allowed_mime_types,
        )?
        .add_source(config::File::with_name("atelier").required(false))
        .add_source(config::Environment::with_prefix("ATELIER").separator("__"))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    validate(&settings)?;

    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.uploads.max_images_per_order == 0 {
        return Err(ConfigError::ValidationError(
            "uploads.max_images_per_order must be at least 1".to_string(),
        ));
    }
    if settings.uploads.max_image_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "uploads.max_image_bytes must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        assert!(validate(&Settings::default()).is_ok());
    }

    #[test]
    fn zero_image_budget_is_rejected() {
        let mut settings = Settings::default();
        settings.uploads.max_images_per_order = 0;
        assert!(matches!(
            validate(&settings),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
