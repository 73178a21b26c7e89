use crate::utils::errors::{AgentError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

/// Agent-wide settings, loaded once per process and passed by reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Scheme used to reach the appliance management interface
    pub protocol: String,
    /// Store paths containing this name are treated as the public certificate store
    pub public_cert_store_name: String,
    pub max_inventory_capacity: usize,
    #[serde(deserialize_with = "deserialize_name_list")]
    pub inventory_blacklist: Vec<String>,
    /// Skip TLS verification of the appliance certificate
    pub accept_invalid_certs: bool,
    pub request_timeout_secs: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            protocol: "https".to_string(),
            public_cert_store_name: "pubcert".to_string(),
            max_inventory_capacity: 1000,
            inventory_blacklist: Vec::new(),
            accept_invalid_certs: false,
            request_timeout_secs: 30,
        }
    }
}

impl AgentSettings {
    /// Load settings from a YAML file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let settings = Self::from_yaml(&contents)?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.protocol != "https" && self.protocol != "http" {
            return Err(AgentError::Config(format!(
                "Unsupported protocol '{}', expected http or https",
                self.protocol
            )));
        }
        if self.public_cert_store_name.trim().is_empty() {
            return Err(AgentError::Config(
                "public_cert_store_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL of the appliance management interface
    pub fn base_url(&self, client_machine: &str) -> String {
        format!("{}://{}", self.protocol, client_machine.trim())
    }

    pub fn is_public_store(&self, store_path: &str) -> bool {
        store_path.contains(&self.public_cert_store_name)
    }

    pub fn is_blacklisted(&self, name: &str) -> bool {
        self.inventory_blacklist.iter().any(|entry| entry == name)
    }
}

/// Accept either a YAML list or a single comma-separated string
fn deserialize_name_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NameList {
        List(Vec<String>),
        Csv(String),
    }

    let names = match NameList::deserialize(deserializer)? {
        NameList::List(list) => list,
        NameList::Csv(csv) => csv.split(',').map(str::to_string).collect(),
    };

    Ok(names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_empty_document() {
        let settings = AgentSettings::from_yaml("").unwrap();
        assert_eq!(settings, AgentSettings::default());
        assert_eq!(settings.public_cert_store_name, "pubcert");
        assert_eq!(settings.protocol, "https");
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let settings = AgentSettings::from_yaml("max_inventory_capacity: 5\n").unwrap();
        assert_eq!(settings.max_inventory_capacity, 5);
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn test_blacklist_as_comma_separated_string() {
        let settings =
            AgentSettings::from_yaml("inventory_blacklist: \"a.pem, b.pem,,c.pem\"\n").unwrap();
        assert_eq!(settings.inventory_blacklist, vec!["a.pem", "b.pem", "c.pem"]);
        assert!(settings.is_blacklisted("b.pem"));
        assert!(!settings.is_blacklisted("d.pem"));
    }

    #[test]
    fn test_blacklist_as_list() {
        let settings =
            AgentSettings::from_yaml("inventory_blacklist:\n  - x.pem\n  - \" y.pem \"\n").unwrap();
        assert_eq!(settings.inventory_blacklist, vec!["x.pem", "y.pem"]);
    }

    #[test]
    fn test_invalid_protocol_rejected() {
        let err = AgentSettings::from_yaml("protocol: ftp\n").unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn test_public_store_detection_and_base_url() {
        let settings = AgentSettings::default();
        assert!(settings.is_public_store("default/pubcert"));
        assert!(!settings.is_public_store("domain1\\cert"));
        assert_eq!(settings.base_url(" dp.example.com:5554 "), "https://dp.example.com:5554");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AgentSettings::load(&dir.path().join("missing.yaml")).unwrap();
        assert_eq!(settings, AgentSettings::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "public_cert_store_name: sharedcert\naccept_invalid_certs: true\n")
            .unwrap();
        let settings = AgentSettings::load(&path).unwrap();
        assert_eq!(settings.public_cert_store_name, "sharedcert");
        assert!(settings.accept_invalid_certs);
    }
}
