//! Naming Server Cluster Membership Library
//!
//! This library crate implements the membership and health tracking core of
//! a naming-server cluster node, plus the supporting plumbing the node needs
//! to run it. It serves as the foundation for the binary executable
//! (`main.rs`).
//!
//! ## Architecture Modules
//! The node is composed of four loosely coupled subsystems:
//!
//! - **`cluster`**: The membership core. Tracks the full member set, ingests
//!   heartbeats from peers and from the node itself, derives the healthy
//!   subset by heartbeat expiry, and notifies registered listeners when
//!   either picture changes.
//! - **`config`**: The node's network identity and the cluster conf file
//!   naming the configured members.
//! - **`sync`**: HTTP status exchange between nodes: fire-and-forget
//!   outbound heartbeat delivery and the inbound ingestion endpoint.
//! - **`executor`**: Self-re-arming periodic task scheduling and one-shot
//!   dispatch for the core's background work.

pub mod cluster;
pub mod config;
pub mod error;
pub mod executor;
pub mod sync;
