//! Cluster Membership & Health Module
//!
//! Maintains this node's view of the naming cluster: which peers are
//! configured, which are currently reachable, and who wants to know when
//! either answer changes.
//!
//! ## Core Mechanisms
//! - **Config Refresh**: The full member set is periodically reconciled against the cluster conf; peers join and leave the set only through this path.
//! - **Heartbeat Exchange**: Every report period the node evaluates liveness, delivers a heartbeat to itself, and broadcasts the same payload to every peer.
//! - **Expiry-based Liveness**: A peer is alive while its last received heartbeat is younger than `EXPIRY_WINDOW_MS`; silence beyond the window drops it from the healthy list.

pub mod service;
pub mod types;
