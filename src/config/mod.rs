//! Node Configuration Module
//!
//! Holds the local node's network identity and reads the cluster conf file
//! that names the configured members. The refresh task treats a read
//! failure as "no update this cycle", so a transiently unreadable conf
//! never clears the member list.

pub mod net;
