// author: kodeholic (powered by Claude)
// Relay — 시그널링 이벤트 라우터
//
//   broadcaster : 레지스트리 등록 → 발신자 제외 전원에게 "broadcaster"
//   watcher     : 등록된 송출자 전원에게 "watcher"(id=발신자)
//   offer/answer: 대상 id 에게 그대로 전달 (id=발신자)
//   candidate   : .local 치환 후 대상 id 에게 전달
//   disconnect  : 레지스트리 해제 → 나머지 전원에게 "clientDisconnected"
//
// 대상 조회는 ConnectionHub(전체 연결) 기준. 없으면 조용히 버림 (best-effort).
// 레지스트리 갱신과 알림 전송은 원자적이지 않다 — 전송 중 끊긴 연결은 그냥 못 받음.

use serde_json::Value;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{info, trace, warn};

use crate::protocol::candidate::rewrite_candidate;
use crate::protocol::event::{client, server, sys};
use crate::protocol::message::{make_no_data, make_packet, PeerPayload, RelayedPayload};
use crate::trace::{TraceDir, TraceEvent, TraceHub};

use super::connection::ConnectionHub;
use super::registry::BroadcasterRegistry;

pub struct Relay {
    hub:       Arc<ConnectionHub>,
    registry:  Arc<BroadcasterRegistry>,
    /// 루프백 발신자의 .local 치환에 쓰는 서버 IPv4
    server_ip: Ipv4Addr,
    trace_hub: Option<Arc<TraceHub>>,
}

impl Relay {
    pub fn new(
        hub:       Arc<ConnectionHub>,
        registry:  Arc<BroadcasterRegistry>,
        server_ip: Ipv4Addr,
        trace_hub: Option<Arc<TraceHub>>,
    ) -> Self {
        Self { hub, registry, server_ip, trace_hub }
    }

    pub fn hub(&self) -> &Arc<ConnectionHub> {
        &self.hub
    }

    pub fn registry(&self) -> &Arc<BroadcasterRegistry> {
        &self.registry
    }

    pub fn server_ip(&self) -> Ipv4Addr {
        self.server_ip
    }

    // ------------------------------------------------------------------------
    // [이벤트 핸들러]
    // ------------------------------------------------------------------------

    /// 송출자 등록 후 발신자 제외 전원에게 알림
    /// 반환: 알림을 받은 연결 수
    pub fn on_broadcaster(&self, source_id: &str) -> usize {
        let conn = match self.hub.get(source_id) {
            Some(c) => c,
            None => {
                warn!("[relay] broadcaster from unknown connection {}", source_id);
                return 0;
            }
        };

        self.registry.register(source_id, conn);
        info!("[relay] broadcaster registered: {}", source_id);
        self.publish(TraceDir::In, Some(source_id), client::BROADCASTER, "registered");

        let sent = self.hub.broadcast_except(source_id, &make_no_data(server::BROADCASTER));
        // 수신자가 여럿이라 conn_id 없이 한 건만 남김
        self.publish(TraceDir::Out, None, server::BROADCASTER, format!("from={} fan-out={}", source_id, sent));
        sent
    }

    /// 시청자는 등록하지 않음. 모든 송출자에게 시청자 id 를 전달
    /// (송출자가 여럿이면 전부 받음 — 한 명만 고르지 않는다)
    pub fn on_watcher(&self, source_id: &str) -> usize {
        info!("[relay] watcher: {}", source_id);
        self.publish(TraceDir::In, Some(source_id), client::WATCHER, "watch request");

        let json = make_packet(server::WATCHER, PeerPayload { id: source_id.to_string() });
        let mut sent = 0;
        for (broadcaster_id, conn) in self.registry.all_broadcasters() {
            if conn.push(&json) {
                sent += 1;
                self.publish(TraceDir::Out, Some(&broadcaster_id), server::WATCHER, format!("watcher={}", source_id));
            }
        }
        sent
    }

    pub fn on_offer(&self, source_id: &str, target_id: &str, payload: Value) -> bool {
        self.forward(server::OFFER, source_id, target_id, payload)
    }

    pub fn on_answer(&self, source_id: &str, target_id: &str, payload: Value) -> bool {
        self.forward(server::ANSWER, source_id, target_id, payload)
    }

    /// 발신자의 관측 주소로 .local 치환 후 전달
    pub fn on_candidate(&self, source_id: &str, target_id: &str, payload: Value) -> bool {
        let payload = match self.hub.get(source_id) {
            Some(conn) => rewrite_candidate(payload, conn.remote_addr.ip(), self.server_ip),
            None       => payload,
        };
        self.forward(server::CANDIDATE, source_id, target_id, payload)
    }

    /// 레지스트리 해제 (없으면 무시) 후 나머지 전원에게 알림
    pub fn on_disconnect(&self, source_id: &str) -> usize {
        if self.registry.unregister(source_id) {
            info!("[relay] broadcaster removed: {}", source_id);
        }
        self.publish(TraceDir::Sys, Some(source_id), sys::DISCONNECT, "connection closed");

        let json = make_packet(server::CLIENT_DISCONNECTED, PeerPayload { id: source_id.to_string() });
        self.hub.broadcast_except(source_id, &json)
    }

    // ------------------------------------------------------------------------
    // [내부]
    // ------------------------------------------------------------------------

    fn forward(&self, event: &str, source_id: &str, target_id: &str, payload: Value) -> bool {
        trace!("[relay] {} {} -> {}", event, source_id, target_id);
        self.publish(TraceDir::In, Some(source_id), event, format!("to={}", target_id));

        let json = make_packet(event, RelayedPayload { id: source_id.to_string(), data: payload });
        let delivered = self.hub.send_to(target_id, &json);
        if delivered {
            self.publish(TraceDir::Out, Some(target_id), event, format!("from={}", source_id));
        }
        delivered
    }

    fn publish(&self, dir: TraceDir, conn_id: Option<&str>, event: &str, summary: impl Into<String>) {
        if let Some(hub) = &self.trace_hub {
            hub.publish(TraceEvent::new(dir, conn_id, event, summary));
        }
    }
}
