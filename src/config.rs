// file: src/config.rs
// description: dataface configuration loaded from yaml with placeholder substitution
// reference: https://docs.rs/config

use crate::error::{Result, XchembkuError};
use crate::utils::{ConfigTemplate, Validator};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Names the configuration file when none is given on the command line.
pub const CONFIGFILE_ENVVAR: &str = "XCHEMBKU_CONFIGFILE";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub xchembku_dataface_specification: DatafaceSpecification,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatafaceSpecification {
    /// Callers talk to the database in-process.
    Direct(DirectSpecification),
    /// Callers talk to a dataface service over http.
    Service(ServiceSpecification),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectSpecification {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub soakdb3: Option<Soakdb3Config>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceSpecification {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub soakdb3: Option<Soakdb3Config>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub bind: String,
    pub client_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Soakdb3Config {
    pub url: String,
}

impl DatafaceSpecification {
    /// The in-process part: what a service wraps, or the direct spec itself.
    pub fn direct_specification(&self) -> DirectSpecification {
        match self {
            DatafaceSpecification::Direct(direct) => direct.clone(),
            DatafaceSpecification::Service(service) => DirectSpecification {
                database: service.database.clone(),
                soakdb3: service.soakdb3.clone(),
            },
        }
    }

    fn validate(&self) -> Result<()> {
        let direct = self.direct_specification();
        Validator::validate_not_empty("database.uri", &direct.database.uri)?;

        if let Some(soakdb3) = &direct.soakdb3 {
            Validator::validate_url(&soakdb3.url)?;
        }

        if let DatafaceSpecification::Service(service) = self {
            service.server.bind_address()?;
            Validator::validate_url(&service.server.client_url)?;
        }

        Ok(())
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> Result<SocketAddr> {
        Validator::validate_bind_address(&self.bind)
    }
}

impl Config {
    /// Loads a yaml configuration file, substituting `{CWD}`,
    /// `{configurator_directory}` and any extra placeholders first.
    pub fn load(path: &Path, substitutions: &[(&str, &str)]) -> Result<Self> {
        dotenv().ok();

        let text = std::fs::read_to_string(path).map_err(|source| XchembkuError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;

        let directory = path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        let mut template = ConfigTemplate::with_environment(Some(&directory));
        template.substitute_all(substitutions.iter().copied());

        Self::from_yaml(&template.render(&text))
    }

    /// Loads the file named by `XCHEMBKU_CONFIGFILE`.
    pub fn load_from_environment(substitutions: &[(&str, &str)]) -> Result<Self> {
        dotenv().ok();

        let filename = std::env::var(CONFIGFILE_ENVVAR).map_err(|_| {
            XchembkuError::Config(format!("environment variable {} is not set", CONFIGFILE_ENVVAR))
        })?;

        let path = PathBuf::from(&filename);
        if !path.exists() {
            return Err(XchembkuError::Config(format!(
                "unable to find {} {}",
                CONFIGFILE_ENVVAR, filename
            )));
        }

        Self::load(&path, substitutions)
    }

    /// Parses already-substituted yaml text, then applies `XCHEMBKU__` overrides.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let unresolved = ConfigTemplate::unresolved(text)?;
        if !unresolved.is_empty() {
            debug!("Unresolved configuration placeholders: {:?}", unresolved);
        }

        let settings = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Yaml))
            .add_source(
                config::Environment::with_prefix("XCHEMBKU")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| XchembkuError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| XchembkuError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// A direct dataface over a local database directory.
    pub fn direct(database_uri: impl Into<String>) -> Self {
        Self {
            xchembku_dataface_specification: DatafaceSpecification::Direct(DirectSpecification {
                database: DatabaseConfig {
                    uri: database_uri.into(),
                },
                soakdb3: None,
            }),
        }
    }

    fn validate(&self) -> Result<()> {
        self.xchembku_dataface_specification.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SERVICE_YAML: &str = r#"
xchembku_dataface_specification:
  type: service
  database:
    uri: "{output_directory}/xchembku"
  server:
    bind: "127.0.0.1:27821"
    client_url: "http://127.0.0.1:27821"
  soakdb3:
    url: "http://127.0.0.1:27831"
"#;

    #[test]
    fn test_load_service_with_substitution() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("service.yaml");
        std::fs::write(&path, SERVICE_YAML).unwrap();

        let config = Config::load(&path, &[("output_directory", "/tmp/out")]).unwrap();

        match &config.xchembku_dataface_specification {
            DatafaceSpecification::Service(service) => {
                assert_eq!(service.database.uri, "/tmp/out/xchembku");
                assert_eq!(service.server.bind_address().unwrap().port(), 27821);
                assert_eq!(
                    service.soakdb3.as_ref().map(|s| s.url.as_str()),
                    Some("http://127.0.0.1:27831")
                );
            }
            other => panic!("expected service specification, got {:?}", other),
        }
    }

    #[test]
    fn test_configurator_directory_placeholder() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("direct.yaml");
        std::fs::write(
            &path,
            "xchembku_dataface_specification:\n  type: direct\n  database:\n    uri: \"{configurator_directory}/db\"\n",
        )
        .unwrap();

        let config = Config::load(&path, &[]).unwrap();
        let direct = config.xchembku_dataface_specification.direct_specification();

        assert_eq!(direct.database.uri, format!("{}/db", temp.path().display()));
        assert!(direct.soakdb3.is_none());
    }

    #[test]
    fn test_rejects_bad_client_url() {
        let yaml = SERVICE_YAML
            .replace("http://127.0.0.1:27821", "127.0.0.1:27821")
            .replace("{output_directory}", "/tmp");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, XchembkuError::Validation(_)));
    }

    #[test]
    fn test_rejects_unknown_type() {
        let yaml = "xchembku_dataface_specification:\n  type: carrier_pigeon\n  database:\n    uri: x\n";
        assert!(matches!(
            Config::from_yaml(yaml).unwrap_err(),
            XchembkuError::Config(_)
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/xchembku.yaml"), &[]).unwrap_err();
        assert!(matches!(err, XchembkuError::ConfigFile { .. }));
    }

    #[test]
    fn test_direct_constructor() {
        let config = Config::direct("/tmp/db");
        assert!(config.validate().is_ok());
        assert!(Config::direct("  ").validate().is_err());
    }
}
