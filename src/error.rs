//! Recoverable failure taxonomy for the cluster node.
//!
//! None of these conditions are fatal: the refresh task keeps its previous
//! view on `ConfigRead`, ingestion drops the offending payload on `Parse`,
//! and the report task skips the unreachable peer for the cycle on `Send`.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for cluster operations.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Failures the membership core recovers from without dying.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The cluster conf file could not be read this cycle.
    #[error("failed to read cluster conf {path:?}: {source}")]
    ConfigRead {
        /// Location of the conf file that failed to read.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// A heartbeat payload did not match the `site#ip:port#millis#` shape.
    #[error("malformed heartbeat payload: {0}")]
    Parse(String),

    /// A heartbeat could not be delivered to one peer.
    #[error("failed to send server status to {target}: {reason}")]
    Send {
        /// Address key of the unreachable peer.
        target: String,
        /// Transport-level detail.
        reason: String,
    },
}
