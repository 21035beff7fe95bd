// author: kodeholic (powered by Claude)
// HTTP 응답 DTO

use serde::Serialize;

/// GET /ip
#[derive(Serialize)]
pub struct IpResponse {
    pub ip: String,
}

/// GET /admin/status
#[derive(Serialize)]
pub struct ServerStatus {
    pub uptime_secs:       u64,
    pub connection_count:  usize,
    pub broadcaster_count: usize,
    pub server_ip:         String,
}

/// GET /admin/connections 아이템
#[derive(Serialize)]
pub struct ConnectionSummary {
    pub id:             String,
    pub address:        String,
    pub broadcaster:    bool,
    pub connected_secs: u64,
}

/// GET /admin/broadcasters
#[derive(Serialize)]
pub struct BroadcasterList {
    pub broadcasters: Vec<String>,
}
