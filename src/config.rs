use crate::error::{CheckError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub controller: ControllerConfig,
    #[serde(default)]
    pub applications: InternalApplicationsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ControllerConfig {
    pub url: String,
    pub client_id: String,
    pub client_secret: String,
    /// PEM bundle used to verify the controller's TLS certificate
    #[serde(default)]
    pub certificate: Option<PathBuf>,
}

/// Controller-internal applications that the application list endpoint omits.
/// An id of 0 means "not configured".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InternalApplicationsConfig {
    #[serde(default)]
    pub analytics_application_id: i64,
    #[serde(default)]
    pub db_mon_application_id: i64,
    #[serde(default)]
    pub sim_application_id: i64,
}

impl InternalApplicationsConfig {
    pub fn configured_ids(&self) -> Vec<i64> {
        [
            self.analytics_application_id,
            self.db_mon_application_id,
            self.sim_application_id,
        ]
        .into_iter()
        .filter(|id| *id != 0)
        .collect()
    }
}

impl Config {
    /// Loads `.env`, reads the TOML file and applies `APPD_*` overrides.
    pub fn load(config_path: &Path) -> Result<Self> {
        dotenv::dotenv().ok();

        let config_content = fs::read_to_string(config_path).map_err(|e| {
            CheckError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let mut config = Self::from_toml_str(&config_content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("APPD_CONTROLLER_URL") {
            self.controller.url = url;
        }
        if let Ok(client_id) = std::env::var("APPD_CLIENT_ID") {
            self.controller.client_id = client_id;
        }
        if let Ok(client_secret) = std::env::var("APPD_CLIENT_SECRET") {
            self.controller.client_secret = client_secret;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.controller.url.trim().is_empty() {
            return Err(CheckError::Config("controller.url must not be empty".into()));
        }
        if self.controller.client_id.trim().is_empty()
            || self.controller.client_secret.trim().is_empty()
        {
            return Err(CheckError::Config(
                "controller.client_id and controller.client_secret are required".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[controller]
url = "https://example.saas.appdynamics.com"
client_id = "reporter@customer1"
client_secret = "s3cret"

[applications]
analytics_application_id = 12
sim_application_id = 40
"#;

    #[test]
    fn test_parses_controller_and_internal_applications() {
        let config = Config::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.controller.url, "https://example.saas.appdynamics.com");
        assert!(config.controller.certificate.is_none());
        assert_eq!(config.applications.db_mon_application_id, 0);
        assert_eq!(config.applications.configured_ids(), vec![12, 40]);
    }

    #[test]
    fn test_applications_section_is_optional() {
        let config = Config::from_toml_str(
            "[controller]\nurl = \"https://c\"\nclient_id = \"a\"\nclient_secret = \"b\"\n",
        )
        .unwrap();

        assert!(config.applications.configured_ids().is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        let config = Config::from_toml_str(
            "[controller]\nurl = \"https://c\"\nclient_id = \"\"\nclient_secret = \"b\"\n",
        )
        .unwrap();

        assert!(matches!(config.validate(), Err(CheckError::Config(_))));
    }

    #[test]
    fn test_load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(!config.controller.client_id.is_empty());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let result = Config::load(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(CheckError::Config(_))));
    }
}
