use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;

use super::protocol::{ServerListResponse, StatusReply};
use crate::cluster::service::MemberListService;

/// Receives one heartbeat payload from a peer and feeds it to ingestion.
///
/// A malformed payload is dropped with a 400; it never reaches the tables
/// and never kills the receiving task.
pub async fn handle_server_status(
    Extension(service): Extension<Arc<MemberListService>>,
    body: String,
) -> (StatusCode, Json<StatusReply>) {
    match service.on_receive_server_status(&body).await {
        Ok(()) => (StatusCode::OK, Json(StatusReply { success: true })),
        Err(e) => {
            tracing::warn!("Dropped peer heartbeat: {}", e);
            (StatusCode::BAD_REQUEST, Json(StatusReply { success: false }))
        }
    }
}

/// Serves the node's current view of the cluster.
pub async fn handle_server_list(
    Extension(service): Extension<Arc<MemberListService>>,
) -> (StatusCode, Json<ServerListResponse>) {
    let members = service.members().await;
    let healthy = service.healthy_members().await;

    (
        StatusCode::OK,
        Json(ServerListResponse { members, healthy }),
    )
}
