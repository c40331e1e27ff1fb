//! Configuration loading

use tracing::warn;

use crate::{Config, Error, Result};

/// Load configuration from a config file and environment variables
///
/// Config file search order:
/// 1. `explicit_path` (from `--config` or `AACDB_CONFIG_PATH`)
/// 2. ./aacdb.yaml (current working directory)
/// 3. /config/aacdb.yaml (container mount path)
/// 4. Fall back to environment variables only
///
/// An explicit path that does not exist is an error; the implicit
/// locations are skipped silently.
pub fn load_config(explicit_path: Option<&str>) -> Result<Config> {
    if let Some(path) = explicit_path {
        if !std::path::Path::new(path).exists() {
            return Err(Error::InvalidInput(format!("config file not found: {path}")));
        }
    }

    let config_path = explicit_path.map(ToString::to_string).or_else(|| {
        ["aacdb.yaml", "/config/aacdb.yaml"]
            .into_iter()
            .find(|p| std::path::Path::new(p).exists())
            .map(ToString::to_string)
    });

    let config = match config_path {
        Some(path) => {
            eprintln!("Loading config from {path}");
            Config::from_file(&path)?
        }
        None => Config::from_env()?,
    };

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Config validation error: {error}");
        }
        return Err(Error::InvalidInput(format!(
            "configuration validation failed with {} error(s): {}",
            errors.len(),
            errors.join("; ")
        )));
    }

    Ok(config)
}

/// Emit warnings for settings that are valid but unsafe
///
/// Separate from [`load_config`] because logging is initialized from the
/// loaded config.
pub fn warn_insecure_defaults(config: &Config) {
    if config.bootstrap.uses_placeholder_password() {
        warn!(
            "Application user '{}' is configured with the placeholder password",
            config.bootstrap.username
        );
        warn!("Set AACDB_BOOTSTRAP__PASSWORD or bootstrap.password before deploying");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::{io::Write, sync::Arc};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn warnings_for(config: &Config) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || warn_insecure_defaults(config));

        let bytes = logs.0.lock().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let err = load_config(Some("/nonexistent/aacdb.yaml")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_invalid_file_fails_validation() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(file, "bootstrap:\n  collection: \"bad$name\"\n").unwrap();

        let err = load_config(file.path().to_str()).unwrap_err();
        assert!(err.to_string().contains("bootstrap.collection"));
    }

    #[test]
    fn test_placeholder_password_warns() {
        let output = warnings_for(&Config::default());
        assert!(output.contains("WARN"));
        assert!(output.contains("'aacuser' is configured with the placeholder password"));
        assert!(output.contains("AACDB_BOOTSTRAP__PASSWORD"));
    }

    #[test]
    fn test_custom_password_is_quiet() {
        let mut config = Config::default();
        config.bootstrap.password = "a-real-secret".to_string();
        assert!(!config.bootstrap.uses_placeholder_password());

        assert!(warnings_for(&config).is_empty());
    }
}
