use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{
    BootstrapPlan, CollectionSpec, CredentialSpec, IndexSpec, RoleGrant, DOCUMENTED_FIELDS,
};

/// Password shipped in the defaults; must be replaced in real deployments
pub const PLACEHOLDER_PASSWORD: &str = "SECRET";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mongo: MongoConfig,
    pub bootstrap: BootstrapConfig,
    pub logging: LoggingConfig,
}

/// Administrative connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    /// Full connection string; takes precedence over host/port
    pub uri: Option<String>,
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub app_name: String,
    pub connect_timeout_seconds: u64,
    pub server_selection_timeout_seconds: u64,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: None,
            host: "localhost".to_string(),
            port: 27017,
            username: None,
            password: None,
            app_name: "aacdb".to_string(),
            connect_timeout_seconds: 10,
            server_selection_timeout_seconds: 10,
        }
    }
}

/// What to provision
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Application database holding the collection
    pub database: String,
    /// Database the application user authenticates against
    pub auth_database: String,
    pub collection: String,
    pub username: String,
    pub password: String,
    /// Defaults to `readWrite` and `dbAdmin` on `database`
    pub roles: Option<Vec<RoleGrant>>,
    pub indexes: Vec<IndexSpec>,
    pub documented_fields: Vec<String>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            database: "aac".to_string(),
            auth_database: "admin".to_string(),
            collection: "animals".to_string(),
            username: "aacuser".to_string(),
            password: PLACEHOLDER_PASSWORD.to_string(),
            roles: None,
            indexes: IndexSpec::shelter_defaults(),
            documented_fields: DOCUMENTED_FIELDS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl BootstrapConfig {
    /// Build the provisioning plan described by this section
    #[must_use]
    pub fn plan(&self) -> BootstrapPlan {
        BootstrapPlan {
            credential: CredentialSpec {
                username: self.username.clone(),
                password: self.password.clone(),
                database: self.auth_database.clone(),
                roles: self.role_grants(),
            },
            collection: CollectionSpec::new(&self.database, &self.collection),
            indexes: self.indexes.clone(),
            documented_fields: self.documented_fields.clone(),
        }
    }

    /// Configured roles, or the default grants scoped to `database`
    #[must_use]
    pub fn role_grants(&self) -> Vec<RoleGrant> {
        self.roles.clone().unwrap_or_else(|| {
            vec![
                RoleGrant::new("readWrite", &self.database),
                RoleGrant::new("dbAdmin", &self.database),
            ]
        })
    }

    #[must_use]
    pub fn uses_placeholder_password(&self) -> bool {
        self.password == PLACEHOLDER_PASSWORD
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "pretty", "compact" or "json"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // A named file is required; a missing one fails the build below
        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path));
        }

        // AACDB_MONGO__HOST, AACDB_BOOTSTRAP__PASSWORD, ...
        builder = builder.add_source(
            Environment::with_prefix("AACDB")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Connection string for the administrative client
    ///
    /// Admin credentials are not part of it; they are applied to the parsed
    /// client options so they never need URL encoding.
    #[must_use]
    pub fn mongo_uri(&self) -> String {
        match self.mongo.uri.as_deref().filter(|u| !u.is_empty()) {
            Some(uri) => uri.to_string(),
            None => format!("mongodb://{}:{}", self.mongo.host, self.mongo.port),
        }
    }

    /// Check for misconfigurations, collecting every problem found
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let b = &self.bootstrap;

        for (name, value) in [
            ("bootstrap.database", &b.database),
            ("bootstrap.auth_database", &b.auth_database),
            ("bootstrap.collection", &b.collection),
            ("bootstrap.username", &b.username),
            ("bootstrap.password", &b.password),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{name} must not be empty"));
            }
        }

        if b.collection.contains('$') {
            errors.push(format!(
                "bootstrap.collection '{}' must not contain '$'",
                b.collection
            ));
        }
        if b.roles.as_ref().is_some_and(Vec::is_empty) {
            errors.push("bootstrap.roles must contain at least one role".to_string());
        }
        if b.indexes.is_empty() {
            errors.push("bootstrap.indexes must contain at least one index".to_string());
        }

        let mut seen = HashSet::new();
        for index in &b.indexes {
            if index.field.trim().is_empty() {
                errors.push("bootstrap.indexes contains an empty field name".to_string());
            } else if !seen.insert(index.index_name()) {
                errors.push(format!(
                    "bootstrap.indexes lists index '{}' more than once",
                    index.index_name()
                ));
            }
        }

        if self.mongo.connect_timeout_seconds == 0 {
            errors.push("mongo.connect_timeout_seconds must be greater than 0".to_string());
        }
        if self.mongo.server_selection_timeout_seconds == 0 {
            errors.push(
                "mongo.server_selection_timeout_seconds must be greater than 0".to_string(),
            );
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "compact" | "json") {
            errors.push(format!(
                "logging.format '{}' must be one of pretty, compact, json",
                self.logging.format
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
