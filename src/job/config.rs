use crate::store::{CertificateEntry, NamingPrefixes, StoreDescriptor};
use crate::utils::errors::{AgentError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Job document handed over by the host orchestrator
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub job: JobDetails,
}

#[derive(Clone, Deserialize)]
pub struct ServerConfig {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Host (and optional port) of the appliance management interface
    pub client_machine: String,
    pub store_path: String,
    #[serde(default)]
    pub properties: Value,
}

#[derive(Clone, Default, Deserialize)]
pub struct JobDetails {
    #[serde(default)]
    pub operation_type: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub entry_contents: Option<String>,
    #[serde(default)]
    pub pfx_password: Option<String>,
}

impl std::fmt::Debug for JobDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobDetails")
            .field("operation_type", &self.operation_type)
            .field("alias", &self.alias)
            .field("has_entry_contents", &self.entry_contents.is_some())
            .finish()
    }
}

impl JobConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AgentError::Config(format!("Failed to read job file {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)?;
        if config.store.client_machine.trim().is_empty() {
            return Err(AgentError::Config("store.client_machine is empty".to_string()));
        }
        Ok(config)
    }

    pub fn store_descriptor(&self) -> StoreDescriptor {
        StoreDescriptor::parse(&self.store.store_path)
    }

    pub fn naming_prefixes(&self) -> Result<NamingPrefixes> {
        NamingPrefixes::from_properties(&self.store.properties)
    }

    /// The certificate to add; requires `entry_contents`
    pub fn certificate_entry(&self) -> Result<CertificateEntry> {
        let contents = self
            .job
            .entry_contents
            .as_deref()
            .filter(|contents| !contents.trim().is_empty())
            .ok_or_else(|| {
                AgentError::InvalidInput("Add job carries no certificate contents".to_string())
            })?;

        Ok(CertificateEntry {
            alias: self.job.alias.clone(),
            contents: contents.to_string(),
            pfx_password: self.job.pfx_password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MANAGE_JOB: &str = r#"{
        "server": {"username": "admin", "password": "secret"},
        "store": {
            "client_machine": "dp.example.com:5554",
            "store_path": "dom1\\cert",
            "properties": {"CryptoCertObjectPrefix": "CC_", "KeyFilePrefix": "kf_"}
        },
        "job": {
            "operation_type": "Add",
            "alias": "web",
            "entry_contents": "TUlJ",
            "pfx_password": "p"
        }
    }"#;

    #[test]
    fn test_load_job_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MANAGE_JOB.as_bytes()).unwrap();

        let config = JobConfig::load(file.path()).unwrap();
        assert_eq!(config.server.username, "admin");
        assert_eq!(config.job.operation_type, "Add");

        let store = config.store_descriptor();
        assert_eq!(store.domain, "dom1");
        assert_eq!(store.certificate_store, "cert");

        let prefixes = config.naming_prefixes().unwrap();
        assert_eq!(prefixes.crypto_cert_object_prefix, "cc_");
        assert_eq!(prefixes.key_file_prefix, "kf_");

        let entry = config.certificate_entry().unwrap();
        assert_eq!(entry.alias.as_deref(), Some("web"));
        assert_eq!(entry.password(), Some("p"));
    }

    #[test]
    fn test_inventory_job_needs_no_job_section() {
        let config = JobConfig::from_json(
            r#"{"server": {"username": "admin"}, "store": {"client_machine": "dp", "store_path": "pubcert"}}"#,
        )
        .unwrap();
        assert!(config.server.password.is_none());
        assert!(config.store.properties.is_null());
        assert!(config.certificate_entry().is_err());
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let config = JobConfig::from_json(MANAGE_JOB).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret"));
        assert!(!printed.contains("TUlJ"));
    }
}
