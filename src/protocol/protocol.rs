// author: kodeholic (powered by Claude)

use axum::{
    extract::{ws::{Message, WebSocket, WebSocketUpgrade}, ConnectInfo, State},
    response::Response,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, trace, warn};

use crate::client_log::ClientLogSink;
use crate::config;
use crate::core::{BroadcasterRegistry, ConnectionHub, EgressTx, Relay};
use crate::error::RelayError;
use crate::protocol::{
    error_code::to_error_code,
    event::{client, server, sys},
    message::{make_packet, Envelope, ErrorPayload, PeerPayload, SignalPayload},
};
use crate::trace::{TraceDir, TraceEvent, TraceHub};
use crate::utils::random_id;

// ----------------------------------------------------------------------------
// [공유 상태]
// ----------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub relay:      Arc<Relay>,
    pub trace_hub:  Arc<TraceHub>,
    /// None 이면 파일 로그 비활성 — clientLog 무시
    pub client_log: Option<Arc<ClientLogSink>>,
}

impl AppState {
    pub fn new(server_ip: Ipv4Addr, client_log: Option<Arc<ClientLogSink>>) -> Self {
        let trace_hub = TraceHub::new();
        let relay = Relay::new(
            Arc::new(ConnectionHub::new()),
            Arc::new(BroadcasterRegistry::new()),
            server_ip,
            Some(Arc::clone(&trace_hub)),
        );
        Self { relay: Arc::new(relay), trace_hub, client_log }
    }

    pub fn hub(&self) -> &Arc<ConnectionHub> {
        self.relay.hub()
    }

    pub fn registry(&self) -> &Arc<BroadcasterRegistry> {
        self.relay.registry()
    }
}

// ----------------------------------------------------------------------------
// [WS 진입점]
// ----------------------------------------------------------------------------

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, remote_addr, state))
}

// ----------------------------------------------------------------------------
// [핵심] 개별 클라이언트 WS 생명주기
// ----------------------------------------------------------------------------

async fn handle_socket(socket: WebSocket, remote_addr: SocketAddr, state: AppState) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (egress_tx, mut egress_rx) = mpsc::channel::<String>(config::EGRESS_QUEUE_SIZE);

    let conn_id = random_id(config::CONNECTION_ID_LEN);

    // CONNECT 를 큐 맨 앞에 넣은 뒤 허브 등록 — 다른 연결의 메시지가 앞지르지 않음
    let _ = egress_tx.try_send(make_packet(server::CONNECT, PeerPayload { id: conn_id.clone() }));
    state.hub().register(&conn_id, egress_tx.clone(), remote_addr);

    info!("[ws] client connected: {} ({})", conn_id, remote_addr);
    state.trace_hub.publish(TraceEvent::new(
        TraceDir::Sys, Some(&conn_id), sys::CONNECT, remote_addr.to_string(),
    ));

    // [writer] egress 큐 → WS 송신
    let writer = tokio::spawn(async move {
        while let Some(json) = egress_rx.recv().await {
            if ws_tx.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // [reader] WS 수신 → 이벤트 dispatch (연결 단위 순차 처리)
    while let Some(msg) = ws_rx.next().await {
        let text = match msg {
            Ok(Message::Text(t))  => t,
            Ok(Message::Close(_)) => break,
            Err(e) => { warn!("[ws] {} socket error: {}", conn_id, e); break; }
            _ => continue,
        };

        let envelope: Envelope = match serde_json::from_str(&text) {
            Ok(env) => env,
            Err(e) => {
                warn!("[ws] {} malformed frame: {}", conn_id, e);
                reply_error(&egress_tx, RelayError::InvalidPayload(e.to_string()));
                continue;
            }
        };

        if let Err(e) = dispatch(&state, &conn_id, remote_addr, envelope).await {
            warn!("[ws] {} rejected frame: {}", conn_id, e);
            reply_error(&egress_tx, e);
        }
    }

    // 클린업 — 끊긴 경위와 무관하게 항상 수행
    state.hub().unregister(&conn_id);
    state.relay.on_disconnect(&conn_id);
    info!("[ws] client disconnected: {}", conn_id);

    writer.abort();
}

async fn dispatch(
    state:       &AppState,
    conn_id:     &str,
    remote_addr: SocketAddr,
    envelope:    Envelope,
) -> Result<(), RelayError> {
    trace!("[ws] {} <- {}", conn_id, envelope.event);

    match envelope.event.as_str() {
        client::BROADCASTER => { state.relay.on_broadcaster(conn_id); }
        client::WATCHER     => { state.relay.on_watcher(conn_id); }
        client::OFFER => {
            let p = parse_signal(envelope.d)?;
            state.relay.on_offer(conn_id, &p.id, p.data);
        }
        client::ANSWER => {
            let p = parse_signal(envelope.d)?;
            state.relay.on_answer(conn_id, &p.id, p.data);
        }
        client::CANDIDATE => {
            let p = parse_signal(envelope.d)?;
            state.relay.on_candidate(conn_id, &p.id, p.data);
        }
        client::CLIENT_LOG => {
            if let Some(sink) = &state.client_log {
                let entry = envelope.d.unwrap_or(serde_json::Value::Null);
                if let Err(e) = sink.append(conn_id, &remote_addr.ip().to_string(), entry).await {
                    error!("[client-log] write failed: {}", e);
                }
            }
        }
        unknown => return Err(RelayError::UnknownEvent(unknown.to_string())),
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// [내부 유틸]
// ----------------------------------------------------------------------------

fn parse_signal(d: Option<serde_json::Value>) -> Result<SignalPayload, RelayError> {
    let value = d.ok_or_else(|| RelayError::InvalidPayload("missing payload".to_string()))?;
    serde_json::from_value(value).map_err(|e| RelayError::InvalidPayload(e.to_string()))
}

fn reply_error(tx: &EgressTx, err: RelayError) {
    let json = make_packet(server::ERROR, ErrorPayload {
        code:   to_error_code(&err),
        reason: err.to_string(),
    });
    let _ = tx.try_send(json);
}
