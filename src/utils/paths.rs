use crate::utils::errors::{AgentError, Result};
use std::path::{Path, PathBuf};

pub struct AgentPaths;
pub const PROGRAM_NAME: &str = "datapower-agent";

impl AgentPaths {
    /// Get the config directory: ~/.config/datapower-agent/
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(PROGRAM_NAME))
            .ok_or_else(|| AgentError::Config("Cannot determine config directory".to_string()))
    }

    /// Get the default settings file: ~/.config/datapower-agent/config.yaml
    pub fn settings_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.yaml"))
    }

    /// Expand a leading `~/` against the user's home directory
    pub fn expand_home(path: &str) -> Result<PathBuf> {
        match path.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .ok_or_else(|| AgentError::Config("Cannot determine home directory".to_string())),
            None => Ok(Path::new(path).to_path_buf()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        let path = AgentPaths::expand_home("/etc/datapower-agent/config.yaml").unwrap();
        assert_eq!(path, PathBuf::from("/etc/datapower-agent/config.yaml"));
    }

    #[test]
    fn test_expand_home_relative_to_home() {
        if let Some(home) = dirs::home_dir() {
            let path = AgentPaths::expand_home("~/agent.yaml").unwrap();
            assert_eq!(path, home.join("agent.yaml"));
        }
    }
}
