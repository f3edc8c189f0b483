use crate::cluster::types::Member;
use serde::{Deserialize, Serialize};

/// Peers POST raw heartbeat payload text here.
pub const ENDPOINT_SERVER_STATUS: &str = "/internal/server/status";

/// Serves the current full and healthy member lists.
pub const ENDPOINT_SERVER_LIST: &str = "/internal/server/list";

/// Reply for a status ingestion request.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusReply {
    pub success: bool,
}

/// Current membership view, as served to peers and operators.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServerListResponse {
    pub members: Vec<Member>,
    pub healthy: Vec<Member>,
}
