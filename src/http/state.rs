// author: kodeholic (powered by Claude)
// HttpState — HTTP 핸들러 공유 상태

use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::core::{BroadcasterRegistry, ConnectionHub};
use crate::trace::TraceHub;
use crate::utils::current_timestamp;

#[derive(Clone)]
pub struct HttpState {
    pub hub:           Arc<ConnectionHub>,
    pub registry:      Arc<BroadcasterRegistry>,
    pub trace_hub:     Arc<TraceHub>,
    /// GET /ip 응답 + .local 치환용 서버 주소
    pub server_ip:     Ipv4Addr,
    /// 서버 프로세스 시작 시각 (Unix millis) — uptime 계산용
    pub start_time_ms: u64,
}

impl HttpState {
    pub fn new(
        hub:       Arc<ConnectionHub>,
        registry:  Arc<BroadcasterRegistry>,
        trace_hub: Arc<TraceHub>,
        server_ip: Ipv4Addr,
    ) -> Self {
        Self { hub, registry, trace_hub, server_ip, start_time_ms: current_timestamp() }
    }
}
