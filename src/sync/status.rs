use super::protocol::ENDPOINT_SERVER_STATUS;
use crate::error::ClusterError;
use std::time::Duration;

/// Outbound half of the status exchange.
///
/// One send per destination per report cycle: a failed delivery is
/// reported to the caller and otherwise forgotten. Peer unreachability
/// surfaces through heartbeat expiry on the receiving side, never through
/// send-failure signaling.
#[derive(Clone)]
pub struct StatusSynchronizer {
    http_client: reqwest::Client,
}

impl StatusSynchronizer {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }

    /// Delivers one heartbeat payload to the peer at `target_key`
    /// (`ip:port`). Single attempt with a short timeout.
    pub async fn send(&self, target_key: &str, payload: String) -> Result<(), ClusterError> {
        let url = format!("http://{}{}", target_key, ENDPOINT_SERVER_STATUS);

        let response = self
            .http_client
            .post(url)
            .body(payload)
            .timeout(Duration::from_millis(500))
            .send()
            .await
            .map_err(|e| ClusterError::Send {
                target: target_key.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ClusterError::Send {
                target: target_key.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        Ok(())
    }
}
