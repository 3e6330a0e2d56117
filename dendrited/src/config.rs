//! Daemon configuration: a JSON file with the environment server address,
//! the trained-parameter file location and the policy description. Every
//! field has a default matching the original pendulum agent, so an empty
//! config (or none at all) still produces a runnable daemon.

use std::path::{Path, PathBuf};

use dendrite::params::PolicySpec;
use serde::{Deserialize, Serialize};

use crate::error::DaemonError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Address of the simulation environment's TCP server.
    #[serde(default = "default_server_addr")]
    pub server_addr: String,

    /// JSON file of labeled weight matrices and bias vectors.
    #[serde(default = "default_parameter_file")]
    pub parameter_file: PathBuf,

    /// Topology, parameter labels and calibration for the loaded policy.
    #[serde(default = "PolicySpec::pendulum_actor")]
    pub policy: PolicySpec,
}

fn default_server_addr() -> String {
    "127.0.0.1:1000".to_string()
}

fn default_parameter_file() -> PathBuf {
    PathBuf::from("extracted_weights.json")
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            server_addr: default_server_addr(),
            parameter_file: default_parameter_file(),
            policy: PolicySpec::pendulum_actor(),
        }
    }
}

impl DaemonConfig {
    pub fn from_file(path: &Path) -> Result<Self, DaemonError> {
        let text = std::fs::read_to_string(path).map_err(|e| DaemonError::Config {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| DaemonError::Config {
            path: path.display().to_string(),
            detail: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg: DaemonConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.server_addr, "127.0.0.1:1000");
        assert_eq!(cfg.parameter_file, PathBuf::from("extracted_weights.json"));
        assert_eq!(cfg.policy, PolicySpec::pendulum_actor());
    }

    #[test]
    fn overrides_are_honored() {
        let cfg: DaemonConfig = serde_json::from_str(
            r#"{
                "server_addr": "10.0.0.2:4242",
                "parameter_file": "/var/lib/dendrited/policy.json"
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.server_addr, "10.0.0.2:4242");
        assert_eq!(
            cfg.parameter_file,
            PathBuf::from("/var/lib/dendrited/policy.json")
        );
    }

    #[test]
    fn policy_block_round_trips() {
        let cfg = DaemonConfig::default();
        let text = serde_json::to_string(&cfg).unwrap();
        let back: DaemonConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.policy, cfg.policy);
    }
}
