//! Configuration service implementation.
//!
//! Loads the client configuration from `config.toml`, creating it with
//! defaults on first use, then applies `BANKBOT_*` environment overrides.

use std::str::FromStr;

use bankbot_core::config::ClientConfig;
use bankbot_core::error::{BankbotError, Result};

use crate::paths::{BankbotPaths, ServiceType};
use crate::storage::AtomicTomlFile;

pub const ENV_BASE_URL: &str = "BANKBOT_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "BANKBOT_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "BANKBOT_LOG_LEVEL";

/// Configuration service bound to one config directory.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: BankbotPaths,
}

impl ConfigService {
    pub fn new(paths: BankbotPaths) -> Self {
        Self { paths }
    }

    /// Loads the configuration using the process environment for overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Loads the configuration with an explicit environment lookup.
    pub fn load_with_env<F>(&self, env: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self.load_file()?;
        apply_env_overrides(&mut config, env)?;
        config.validate()?;
        tracing::debug!(
            "[ConfigService] Loaded config: base_url={}, timeout_secs={}",
            config.base_url,
            config.timeout_secs
        );
        Ok(config)
    }

    fn load_file(&self) -> Result<ClientConfig> {
        let path = self.paths.get_path(ServiceType::Config)?;
        let file = AtomicTomlFile::<ClientConfig>::new(path);

        match file.load()? {
            Some(config) => Ok(config),
            None => {
                let config = ClientConfig::default();
                if let Err(e) = file.save(&config) {
                    // A read-only config dir must not block the client.
                    tracing::warn!("[ConfigService] Could not write default config: {}", e);
                } else {
                    tracing::info!(
                        "[ConfigService] Created default config at {}",
                        file.path().display()
                    );
                }
                Ok(config)
            }
        }
    }
}

fn apply_env_overrides<F>(config: &mut ClientConfig, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = env(ENV_BASE_URL) {
        config.base_url = base_url;
    }
    if let Some(timeout) = env(ENV_TIMEOUT_SECS) {
        config.timeout_secs = parse_env(ENV_TIMEOUT_SECS, &timeout)?;
    }
    if let Some(level) = env(ENV_LOG_LEVEL) {
        config.log_level = level;
    }
    Ok(())
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| BankbotError::config(format!("Invalid {key} value '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> ConfigService {
        ConfigService::new(BankbotPaths::new(Some(dir.path().to_path_buf())))
    }

    #[test]
    fn test_creates_default_config() {
        let dir = TempDir::new().unwrap();
        let config = service(&dir).load_with_env(|_| None).unwrap();

        assert_eq!(config, ClientConfig::default());
        assert!(dir.path().join("config.toml").exists());
    }

    #[test]
    fn test_reads_existing_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "base_url = \"https://bank.example\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = service(&dir).load_with_env(|_| None).unwrap();
        assert_eq!(config.base_url, "https://bank.example");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BASE_URL, "http://10.0.0.2:8080"),
            (ENV_TIMEOUT_SECS, "12"),
        ]);

        let config = service(&dir)
            .load_with_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.timeout_secs, 12);
    }

    #[test]
    fn test_invalid_env_value() {
        let dir = TempDir::new().unwrap();
        let result = service(&dir).load_with_env(|key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(BankbotError::Config(_))));
    }
}
