use crate::error::ClusterError;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Silence window (ms) after which a peer is considered dead.
pub const EXPIRY_WINDOW_MS: u64 = 15_000;

/// Cadence (ms) of the heartbeat report task.
pub const REPORT_PERIOD_MS: u64 = 3_000;

/// Cadence (ms) of the cluster conf refresh task.
pub const REFRESH_PERIOD_MS: u64 = 5_000;

/// Site tag under which local-cluster heartbeats are recorded.
pub const LOCALHOST_SITE: &str = "cluster_status";

/// Separator between ip and port in an address key.
pub const IP_PORT_SEPARATOR: char = ':';

/// One member of the naming cluster.
///
/// Identity is the address key (`ip:port`) alone: two records with the same
/// key compare equal regardless of health or timestamps. Everything else is
/// mutable state refreshed by heartbeat ingestion and liveness evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub ip: String,
    pub port: u16,
    /// Site tag this member last reported under.
    pub site: String,
    /// Whether the member is currently considered reachable.
    pub alive: bool,
    /// Timestamp (ms) the sender put into its most recent heartbeat.
    pub last_ref_time: u64,
    /// `last_ref_time` rendered for display (`YYYY-MM-DD HH:MM:SS`).
    pub last_ref_time_str: String,
}

impl Member {
    /// Creates a cold record: not alive, no heartbeat seen yet.
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self {
            ip: ip.into(),
            port,
            site: LOCALHOST_SITE.to_string(),
            alive: false,
            last_ref_time: 0,
            last_ref_time_str: String::new(),
        }
    }

    /// The address key used for equality, map lookups and self-exclusion
    /// during broadcast.
    pub fn key(&self) -> String {
        format!("{}{}{}", self.ip, IP_PORT_SEPARATOR, self.port)
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.ip == other.ip && self.port == other.port
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ip.hash(state);
        self.port.hash(state);
    }
}

/// A parsed heartbeat. Wire format is flat text, `{site}#{ip:port}#{millis}#`,
/// trailing delimiter included. No version field, no checksum.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartbeatPayload {
    pub site: String,
    pub ip: String,
    pub port: u16,
    pub timestamp: u64,
}

impl HeartbeatPayload {
    /// Renders the wire form of one heartbeat.
    pub fn encode(site: &str, key: &str, timestamp: u64) -> String {
        format!("{}#{}#{}#", site, key, timestamp)
    }

    /// Parses a payload, rejecting anything that does not carry exactly the
    /// three fields plus the trailing delimiter.
    pub fn parse(raw: &str) -> Result<Self, ClusterError> {
        let parts: Vec<&str> = raw.split('#').collect();
        if parts.len() != 4 || !parts[3].is_empty() {
            return Err(ClusterError::Parse(format!(
                "expected site#ip:port#millis#, got {:?}",
                raw
            )));
        }

        let (ip, port_str) = parts[1].split_once(IP_PORT_SEPARATOR).ok_or_else(|| {
            ClusterError::Parse(format!("address missing separator: {:?}", parts[1]))
        })?;
        let port: u16 = port_str
            .parse()
            .map_err(|_| ClusterError::Parse(format!("invalid port: {:?}", port_str)))?;
        let timestamp: u64 = parts[2]
            .parse()
            .map_err(|_| ClusterError::Parse(format!("non-numeric timestamp: {:?}", parts[2])))?;

        Ok(Self {
            site: parts[0].to_string(),
            ip: ip.to_string(),
            port,
            timestamp,
        })
    }
}

/// Capability handed to consumers that want membership updates.
///
/// Implementations receive the full member list and the healthy subset on
/// every change batch, invoked off the producer's path in registration
/// order. Deliveries may repeat; each one is the latest snapshot.
pub trait MemberChangeListener: Send + Sync {
    fn on_change(&self, members: Vec<Member>, healthy: Vec<Member>);
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

/// Formats a millisecond timestamp the way the status views expect.
pub fn format_ref_time(millis: u64) -> String {
    chrono::DateTime::from_timestamp_millis(millis as i64)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
