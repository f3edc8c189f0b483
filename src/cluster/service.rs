use super::types::{
    format_ref_time, now_ms, HeartbeatPayload, Member, MemberChangeListener, EXPIRY_WINDOW_MS,
    IP_PORT_SEPARATOR, LOCALHOST_SITE, REFRESH_PERIOD_MS, REPORT_PERIOD_MS,
};
use crate::config::net::{read_cluster_conf, NetConfig};
use crate::error::ClusterError;
use crate::executor::schedule;
use crate::sync::status::StatusSynchronizer;

use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// The node's view of the naming cluster.
///
/// Owns the full member set, the derived healthy subset, the per-key
/// heartbeat table and the per-site record table. Mutation arrives from
/// three concurrent sources: the refresh task, the report task (which also
/// self-delivers a heartbeat), and network deliveries from every peer.
///
/// Locking discipline: `ingest_lock` serializes every logical mutation
/// (ingestion, refresh application, liveness evaluation). The list fields
/// are published wholesale under short `RwLock` writes so readers never see
/// a half-rebuilt set.
pub struct MemberListService {
    /// Local node identity plus the cluster conf location.
    pub net: NetConfig,
    /// All configured members, healthy or not. Replaced wholesale on refresh.
    pub(crate) members: RwLock<Vec<Member>>,
    /// Members currently deemed reachable. Rebuilt only by `check_heartbeat`.
    pub(crate) healthy: RwLock<Vec<Member>>,
    /// Address key -> last local receive time (ms). Last write wins.
    pub(crate) beats: DashMap<String, u64>,
    /// Site tag -> latest ingested records for that site.
    pub(crate) site_table: DashMap<String, Vec<Member>>,
    listeners: RwLock<Vec<Arc<dyn MemberChangeListener>>>,
    synchronizer: StatusSynchronizer,
    ingest_lock: Mutex<()>,
}

impl MemberListService {
    pub fn new(net: NetConfig) -> Arc<Self> {
        Arc::new(Self {
            net,
            members: RwLock::new(Vec::new()),
            healthy: RwLock::new(Vec::new()),
            beats: DashMap::new(),
            site_table: DashMap::new(),
            listeners: RwLock::new(Vec::new()),
            synchronizer: StatusSynchronizer::new(),
            ingest_lock: Mutex::new(()),
        })
    }

    /// Spawns the two periodic tasks. Both re-arm themselves for the
    /// lifetime of the process; a failed cycle is logged and the next one
    /// runs on schedule.
    pub async fn start(self: Arc<Self>) {
        tracing::info!("Starting member list service for {}", self.net.server_key());

        let refresh_service = self.clone();
        schedule::schedule_recurring(
            "member-list-refresh",
            Duration::from_millis(REFRESH_PERIOD_MS),
            move || {
                let service = refresh_service.clone();
                async move { service.refresh_member_list().await }
            },
        );

        let report_service = self.clone();
        schedule::schedule_recurring(
            "server-status-report",
            Duration::from_millis(REPORT_PERIOD_MS),
            move || {
                let service = report_service.clone();
                async move { service.report_status().await }
            },
        );
    }

    /// Registers a consumer for membership change batches. There is no
    /// removal: listeners live as long as the service.
    pub async fn register_listener(&self, listener: Arc<dyn MemberChangeListener>) {
        self.listeners.write().await.push(listener);
    }

    /// Snapshot of the full member set.
    pub async fn members(&self) -> Vec<Member> {
        self.members.read().await.clone()
    }

    /// Snapshot of the members currently deemed reachable.
    pub async fn healthy_members(&self) -> Vec<Member> {
        self.healthy.read().await.clone()
    }

    /// One refresh cycle: reconcile the full set against the cluster conf.
    ///
    /// A conf read failure means "no update this cycle": the previous full
    /// set is retained and the next cycle retries.
    pub async fn refresh_member_list(&self) -> anyhow::Result<()> {
        let lines = match read_cluster_conf(&self.net.cluster_conf) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::error!("Failed to read cluster conf: {}", e);
                return Ok(());
            }
        };
        tracing::debug!("Cluster conf members: {:?}", lines);

        let mut refreshed: Vec<Member> = Vec::new();
        for line in &lines {
            let Some((ip, port_str)) = line.split_once(IP_PORT_SEPARATOR) else {
                tracing::warn!("Skipping malformed cluster conf entry {:?}", line);
                continue;
            };
            let port: u16 = match port_str.parse() {
                Ok(port) => port,
                Err(_) => {
                    tracing::warn!("Skipping malformed cluster conf entry {:?}", line);
                    continue;
                }
            };
            let member = Member::new(ip, port);
            if !refreshed.contains(&member) {
                refreshed.push(member);
            }
        }

        self.apply_refreshed(refreshed).await;
        Ok(())
    }

    /// Publishes a freshly read member list and reports the delta.
    ///
    /// Members that survive the refresh keep their current records; new
    /// members come in cold and stay out of the healthy list until they
    /// produce a heartbeat.
    pub(crate) async fn apply_refreshed(&self, refreshed: Vec<Member>) {
        let _guard = self.ingest_lock.lock().await;

        let old = self.members.read().await.clone();
        let old_keys: HashSet<String> = old.iter().map(Member::key).collect();
        let new_keys: HashSet<String> = refreshed.iter().map(Member::key).collect();

        let added: Vec<&Member> = refreshed
            .iter()
            .filter(|member| !old_keys.contains(&member.key()))
            .collect();
        let removed: Vec<&Member> = old
            .iter()
            .filter(|member| !new_keys.contains(&member.key()))
            .collect();

        if added.is_empty() && removed.is_empty() {
            return;
        }

        let mut next: Vec<Member> = old
            .iter()
            .filter(|member| new_keys.contains(&member.key()))
            .cloned()
            .collect();
        next.extend(added.iter().map(|member| (*member).clone()));

        tracing::info!(
            "Member list updated, new: {}, dead: {}, members: {}",
            added.len(),
            removed.len(),
            next.len()
        );

        *self.members.write().await = next;
        self.notify_listeners().await;
    }

    /// Ingests one heartbeat payload (network delivery or self-report).
    ///
    /// The whole update is a single critical section: concurrent deliveries
    /// queue behind the lock, so a site list merge never loses another
    /// sender's record. Malformed payloads are rejected before any table is
    /// touched.
    pub async fn on_receive_server_status(&self, status: &str) -> Result<(), ClusterError> {
        let _guard = self.ingest_lock.lock().await;

        tracing::debug!("Received cluster heartbeat: {}", status);
        let payload = HeartbeatPayload::parse(status)?;

        let site = payload.site.clone();
        let mut member = Member::new(payload.ip, payload.port);
        member.site = payload.site;
        member.last_ref_time = payload.timestamp;
        member.last_ref_time_str = format_ref_time(payload.timestamp);

        let key = member.key();
        let now = now_ms();

        // Best-effort hint from the previous beat; check_heartbeat
        // recomputes this authoritatively on the next evaluation pass.
        if let Some(last_beat) = self.beats.get(&key).map(|entry| *entry.value()) {
            member.alive = now.saturating_sub(last_beat) < EXPIRY_WINDOW_MS;
        }
        self.beats.insert(key.clone(), now);

        // Merge-not-replace: swap in the record for this key, keep the rest.
        let mut records = self
            .site_table
            .get(&site)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        match records.iter_mut().find(|existing| existing.key() == key) {
            Some(existing) => *existing = member,
            None => records.push(member),
        }
        self.site_table.insert(site, records);

        Ok(())
    }

    /// One liveness pass over the local site's records, at the current time.
    pub(crate) async fn check_heartbeat(&self) {
        self.check_heartbeat_at(now_ms()).await;
    }

    /// Re-evaluates aliveness for every recorded local-site member.
    ///
    /// A member with no recorded beat is left out of the evaluation
    /// entirely (neither promoted nor demoted), and a member no longer in
    /// the full set is inert: a still-fresh beat cannot keep it in the
    /// healthy list. If any member changed state the healthy list is
    /// rebuilt to exactly the members currently evaluated alive.
    pub(crate) async fn check_heartbeat_at(&self, now: u64) {
        let _guard = self.ingest_lock.lock().await;

        tracing::debug!("Checking cluster heartbeats");

        let Some(recorded) = self
            .site_table
            .get(LOCALHOST_SITE)
            .map(|entry| entry.value().clone())
        else {
            // Nothing ingested for the local site yet; valid no-op pass.
            return;
        };

        let member_keys: HashSet<String> = self.members.read().await.iter().map(Member::key).collect();
        let healthy_keys: HashSet<String> = self.healthy.read().await.iter().map(Member::key).collect();

        let mut evaluated = recorded;
        let mut new_healthy: Vec<Member> = Vec::new();
        let mut changed = false;

        for member in evaluated.iter_mut() {
            let key = member.key();
            let Some(last_beat) = self.beats.get(&key).map(|entry| *entry.value()) else {
                continue;
            };
            member.alive = now.saturating_sub(last_beat) < EXPIRY_WINDOW_MS;

            if !member_keys.contains(&key) {
                // Dropped from the full set since its last beat.
                if healthy_keys.contains(&key) {
                    changed = true;
                }
                continue;
            }

            if member.alive && !healthy_keys.contains(&key) {
                changed = true;
            } else if !member.alive && healthy_keys.contains(&key) {
                changed = true;
            }
            if member.alive {
                new_healthy.push(member.clone());
            }
        }

        self.site_table.insert(LOCALHOST_SITE.to_string(), evaluated);

        if changed {
            tracing::info!(
                "Healthy member list changed: {} of {} members alive",
                new_healthy.len(),
                member_keys.len()
            );
            *self.healthy.write().await = new_healthy;
            self.notify_listeners().await;
        }
    }

    /// One report cycle: evaluate liveness, self-deliver a heartbeat, then
    /// broadcast the same payload to every other member.
    pub async fn report_status(&self) -> anyhow::Result<()> {
        self.check_heartbeat().await;

        let self_key = self.net.server_key();
        let status = HeartbeatPayload::encode(LOCALHOST_SITE, &self_key, now_ms());

        // Self-delivery comes first and never touches the network: a node
        // partitioned from every peer still sees its own heartbeats.
        self.on_receive_server_status(&status).await?;

        let members = self.members.read().await.clone();
        for member in members {
            let key = member.key();
            if key == self_key {
                continue;
            }
            let payload = status.clone();
            let synchronizer = self.synchronizer.clone();
            schedule::submit("server-status-send", async move {
                if let Err(e) = synchronizer.send(&key, payload).await {
                    // No retry this cycle; the peer just looks dead until
                    // its own heartbeats resume.
                    tracing::warn!("{}", e);
                }
            });
        }

        Ok(())
    }

    /// Hands the current snapshots to every listener, in registration
    /// order, on a submitted task rather than the producer's stack.
    async fn notify_listeners(&self) {
        let listeners = self.listeners.read().await.clone();
        if listeners.is_empty() {
            return;
        }

        let members = self.members.read().await.clone();
        let healthy = self.healthy.read().await.clone();

        schedule::submit("member-change-notify", async move {
            for listener in listeners {
                listener.on_change(members.clone(), healthy.clone());
            }
        });
    }
}
