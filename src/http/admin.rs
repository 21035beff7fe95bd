// author: kodeholic (powered by Claude)
// Admin REST API 핸들러 (조회 전용)

use axum::{extract::State, response::IntoResponse, Json};

use crate::utils::current_timestamp;

use super::dto::*;
use super::state::HttpState;

/// GET /admin/status
pub async fn admin_status(State(state): State<HttpState>) -> impl IntoResponse {
    let uptime_secs = current_timestamp().saturating_sub(state.start_time_ms) / 1000;

    Json(ServerStatus {
        uptime_secs,
        connection_count:  state.hub.count(),
        broadcaster_count: state.registry.count(),
        server_ip:         state.server_ip.to_string(),
    })
}

/// GET /admin/connections
pub async fn admin_connections(State(state): State<HttpState>) -> impl IntoResponse {
    let now = current_timestamp();
    let mut list: Vec<ConnectionSummary> = state.hub
        .all_connections()
        .into_iter()
        .map(|(id, conn)| ConnectionSummary {
            broadcaster:    state.registry.contains(&id),
            address:        conn.remote_addr.to_string(),
            connected_secs: now.saturating_sub(conn.connected_at) / 1000,
            id,
        })
        .collect();
    list.sort_by(|a, b| a.id.cmp(&b.id));
    Json(list)
}

/// GET /admin/broadcasters
pub async fn admin_broadcasters(State(state): State<HttpState>) -> impl IntoResponse {
    Json(BroadcasterList { broadcasters: state.registry.ids() })
}
