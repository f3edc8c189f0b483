//! Server Status Synchronization Module
//!
//! HTTP plumbing for the heartbeat exchange between naming cluster nodes.
//!
//! ## Responsibilities
//! - **Outbound**: `StatusSynchronizer` delivers one heartbeat payload per peer per report cycle, fire-and-forget.
//! - **Inbound**: axum handlers accept peer heartbeats and feed them to ingestion, and expose the current member lists for inspection.
//! - **Protocol**: Endpoint paths and reply shapes shared by both sides.

pub mod handlers;
pub mod protocol;
pub mod status;
