use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use naming_cluster::cluster::service::MemberListService;
use naming_cluster::cluster::types::{Member, MemberChangeListener};
use naming_cluster::config::net::NetConfig;
use naming_cluster::sync::handlers::{handle_server_list, handle_server_status};
use naming_cluster::sync::protocol::{ENDPOINT_SERVER_LIST, ENDPOINT_SERVER_STATUS};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 5 {
        eprintln!("Usage: {} --bind <addr:port> --conf <cluster.conf>", args[0]);
        eprintln!(
            "Example: {} --bind 127.0.0.1:9001 --conf ./cluster.conf",
            args[0]
        );

        std::process::exit(1);
    }

    let mut bind_addr: Option<SocketAddr> = None;
    let mut conf_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            "--conf" => {
                conf_path = Some(args[i + 1].clone());
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let bind_addr = bind_addr.expect("--bind is required");
    let conf_path = conf_path.expect("--conf is required");

    tracing::info!("Starting naming cluster node on {}", bind_addr);

    let net = NetConfig::new(bind_addr.ip().to_string(), bind_addr.port(), conf_path);
    let service = MemberListService::new(net);

    service.register_listener(Arc::new(ChangeLogger)).await;

    // 1. Periodic refresh + heartbeat report:
    service.clone().start().await;

    // 2. Spawn stats reporter:
    let stats_service = service.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(5));

        loop {
            interval.tick().await;
            let members = stats_service.members().await;
            let healthy = stats_service.healthy_members().await;
            tracing::info!(
                "Cluster stats: {} members, {} healthy",
                members.len(),
                healthy.len()
            );
        }
    });

    // 3. HTTP Router:
    let app = Router::new()
        .route(ENDPOINT_SERVER_STATUS, post(handle_server_status))
        .route(ENDPOINT_SERVER_LIST, get(handle_server_list))
        .layer(Extension(service));

    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Logs every membership change batch delivered to the node's consumers.
struct ChangeLogger;

impl MemberChangeListener for ChangeLogger {
    fn on_change(&self, members: Vec<Member>, healthy: Vec<Member>) {
        tracing::info!(
            "Member list changed: {} members, {} healthy",
            members.len(),
            healthy.len()
        );
        for member in healthy {
            tracing::info!(
                "  - {} (site={}, last beat {})",
                member.key(),
                member.site,
                member.last_ref_time_str
            );
        }
    }
}
