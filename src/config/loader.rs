//! Loading and validation of `.vizreg.toml` configuration files.

use std::path::Path;

use tracing::debug;

use super::schema::Config;
use crate::error::{Result, VizError};

/// Environment variables that override file-provided values.
const ENV_API_KEY: &str = "VIZREG_API_KEY";
const ENV_API_SECRET: &str = "VIZREG_API_SECRET";
const ENV_ENDPOINT: &str = "VIZREG_ENDPOINT";

/// Loads configuration from `path`, applies environment overrides, and
/// validates that credentials are present.
///
/// # Errors
///
/// * [`VizError::ConfigNotFound`] when the file does not exist.
/// * [`VizError::ConfigParse`] when the TOML is malformed.
/// * [`VizError::MissingCredentials`] when neither the file nor the
///   environment provides `api_key` and `api_secret`.
pub fn load_config(path: &Path) -> Result<Config> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            VizError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            VizError::Io(e)
        }
    })?;

    let mut config: Config =
        toml::from_str(&raw).map_err(|e| VizError::ConfigParse(e.to_string()))?;

    apply_overrides(&mut config, |name| std::env::var(name).ok());

    if !config.has_credentials() {
        return Err(VizError::MissingCredentials);
    }

    debug!(
        endpoint = %config.endpoint,
        project = config.project.as_deref().unwrap_or("-"),
        "configuration loaded"
    );
    Ok(config)
}

/// Applies environment overrides using the given lookup function.
///
/// Split out from [`load_config`] so tests can inject values without
/// mutating the process environment.
fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_API_KEY) {
        config.api_key = key;
    }
    if let Some(secret) = lookup(ENV_API_SECRET) {
        config.api_secret = secret;
    }
    if let Some(endpoint) = lookup(ENV_ENDPOINT) {
        config.endpoint = endpoint;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(".vizreg.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            api_key = "key"
            api_secret = "secret"
            endpoint = "https://service.test"

            [render]
            command = "yarn"
            args = ["render"]
            "#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.api_key, "key");
        assert_eq!(config.endpoint, "https://service.test");
        assert_eq!(config.render.command, "yarn");
    }

    #[test]
    fn test_missing_file_is_config_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        match load_config(&missing) {
            Err(VizError::ConfigNotFound { path }) => assert!(path.ends_with("nope.toml")),
            other => panic!("expected ConfigNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "api_key = [unclosed");
        assert!(matches!(load_config(&path), Err(VizError::ConfigParse(_))));
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [render]
            command = "make"
            "#,
        );
        assert!(matches!(
            load_config(&path),
            Err(VizError::MissingCredentials)
        ));
    }

    #[test]
    fn test_env_overrides_take_precedence() {
        let mut config: Config = toml::from_str(
            r#"
            api_key = "file-key"
            api_secret = "file-secret"

            [render]
            command = "make"
            "#,
        )
        .unwrap();

        apply_overrides(&mut config, |name| match name {
            ENV_API_KEY => Some("env-key".to_string()),
            ENV_ENDPOINT => Some("https://override.test".to_string()),
            _ => None,
        });

        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.api_secret, "file-secret");
        assert_eq!(config.endpoint, "https://override.test");
    }
}
