use crate::cluster::types::IP_PORT_SEPARATOR;
use crate::error::ClusterError;
use std::path::{Path, PathBuf};

/// Network identity of the local node plus the location of the cluster
/// conf file listing all configured members.
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub server_ip: String,
    pub server_port: u16,
    pub cluster_conf: PathBuf,
}

impl NetConfig {
    pub fn new(
        server_ip: impl Into<String>,
        server_port: u16,
        cluster_conf: impl Into<PathBuf>,
    ) -> Self {
        Self {
            server_ip: server_ip.into(),
            server_port,
            cluster_conf: cluster_conf.into(),
        }
    }

    /// The local node's address key.
    pub fn server_key(&self) -> String {
        format!("{}{}{}", self.server_ip, IP_PORT_SEPARATOR, self.server_port)
    }
}

/// Reads the ordered member address list, one `ip:port` per line.
///
/// Blank lines and `#` comments are skipped. The caller decides what a
/// read failure means; the refresh task keeps its previous view.
pub fn read_cluster_conf(path: &Path) -> Result<Vec<String>, ClusterError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ClusterError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
