// author: kodeholic (powered by Claude)

use futures_util::{SinkExt, StreamExt};
use portpicker::pick_unused_port;
use serde_json::{json, Value};
use signal_relay::client_log::ClientLogSink;
use signal_relay::protocol::AppState;
use signal_relay::{build_router, serve};
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::{connect_async, tungstenite::Message};

const SERVER_IP: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 10);

// ----------------------------------------------------------------------------
// [테스트 헬퍼]
// ----------------------------------------------------------------------------

async fn spawn_server(state: AppState) -> String {
    let port = pick_unused_port().expect("사용 가능한 포트를 찾을 수 없습니다.");
    let addr = format!("127.0.0.1:{}", port);

    let app = build_router(state, Path::new("public"));
    let listener = TcpListener::bind(&addr).await.unwrap();
    tokio::spawn(async move {
        serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

async fn spawn_test_server() -> (String, AppState) {
    let state = AppState::new(SERVER_IP, None);
    let addr = spawn_server(state.clone()).await;
    (addr, state)
}

type WsTx = futures_util::stream::SplitSink<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    Message,
>;
type WsRx = futures_util::stream::SplitStream<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
>;

struct Client {
    id: String,
    tx: WsTx,
    rx: WsRx,
}

/// 연결 + CONNECT 수신까지
async fn connect(addr: &str) -> Client {
    let (ws, _) = connect_async(format!("ws://{}/ws", addr)).await.expect("WS 연결 실패");
    let (tx, mut rx) = ws.split();
    let hello = recv(&mut rx).await;
    assert_eq!(hello["event"], "connect");
    let id = hello["d"]["id"].as_str().expect("connect id").to_string();
    Client { id, tx, rx }
}

async fn send(tx: &mut WsTx, payload: Value) {
    tx.send(Message::Text(payload.to_string().into())).await.expect("전송 실패");
}

async fn recv(rx: &mut WsRx) -> Value {
    timeout(Duration::from_secs(2), async {
        loop {
            match rx.next().await.expect("수신 실패").expect("메시지 에러") {
                Message::Text(t) => return serde_json::from_str::<Value>(&t).expect("JSON 파싱 실패"),
                _ => continue,
            }
        }
    })
    .await
    .expect("수신 타임아웃")
}

/// 짧은 시간 내 아무것도 오지 않아야 함
async fn assert_silent(rx: &mut WsRx, label: &str) {
    let got = timeout(Duration::from_millis(200), rx.next()).await;
    assert!(got.is_err(), "{}: 예상치 못한 메시지 수신 {:?}", label, got);
}

fn assert_event(packet: &Value, expected: &str, label: &str) {
    assert_eq!(
        packet["event"], expected,
        "{}: 기대 event={}, 실제={}", label, expected, packet["event"]
    );
}

// ----------------------------------------------------------------------------
// [시나리오 1] broadcaster → 발신자 제외 전원 알림
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_broadcaster_announced_to_others_only() {
    let (addr, state) = spawn_test_server().await;
    let mut a = connect(&addr).await;
    let mut b = connect(&addr).await;
    let mut c = connect(&addr).await;

    send(&mut a.tx, json!({ "event": "broadcaster" })).await;

    assert_event(&recv(&mut b.rx).await, "broadcaster", "B");
    assert_event(&recv(&mut c.rx).await, "broadcaster", "C");
    assert_silent(&mut a.rx, "A").await;
    assert!(state.registry().contains(&a.id));
}

// ----------------------------------------------------------------------------
// [시나리오 2] watcher → 모든 송출자에게 전달
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_watcher_reaches_every_broadcaster() {
    let (addr, state) = spawn_test_server().await;
    let mut x = connect(&addr).await;
    let mut y = connect(&addr).await;

    send(&mut x.tx, json!({ "event": "broadcaster" })).await;
    recv(&mut y.rx).await; // X 등록 알림
    send(&mut y.tx, json!({ "event": "broadcaster" })).await;
    recv(&mut x.rx).await; // Y 등록 알림

    let mut w = connect(&addr).await;
    send(&mut w.tx, json!({ "event": "watcher" })).await;

    for (label, peer) in [("X", &mut x), ("Y", &mut y)] {
        let msg = recv(&mut peer.rx).await;
        assert_event(&msg, "watcher", label);
        assert_eq!(msg["d"]["id"], w.id.as_str());
    }
    assert_silent(&mut w.rx, "W").await;
    assert!(!state.registry().contains(&w.id));
}

// ----------------------------------------------------------------------------
// [시나리오 3] offer — 대상에게만, payload 그대로
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_offer_is_identifier_exact() {
    let (addr, _state) = spawn_test_server().await;
    let mut a = connect(&addr).await;
    let mut b = connect(&addr).await;
    let mut c = connect(&addr).await;

    let sdp = json!({ "type": "offer", "sdp": "v=0\r\no=- 4611 2 IN IP4 127.0.0.1\r\ns=-\r\n" });
    send(&mut a.tx, json!({ "event": "offer", "d": { "id": b.id, "data": sdp } })).await;

    let msg = recv(&mut b.rx).await;
    assert_event(&msg, "offer", "B");
    assert_eq!(msg["d"]["id"], a.id.as_str());
    assert_eq!(msg["d"]["data"], sdp);

    assert_silent(&mut c.rx, "C").await;
    assert_silent(&mut a.rx, "A").await;
}

#[tokio::test]
async fn test_answer_round_trip() {
    let (addr, _state) = spawn_test_server().await;
    let mut broadcaster = connect(&addr).await;
    let mut watcher = connect(&addr).await;

    let answer = json!({ "type": "answer", "sdp": "v=0\r\n" });
    send(&mut watcher.tx, json!({ "event": "answer", "d": { "id": broadcaster.id, "data": answer } })).await;

    let msg = recv(&mut broadcaster.rx).await;
    assert_event(&msg, "answer", "broadcaster");
    assert_eq!(msg["d"]["id"], watcher.id.as_str());
    assert_eq!(msg["d"]["data"], answer);
}

// ----------------------------------------------------------------------------
// [시나리오 4] 존재하지 않는 대상 — 조용히 버림, 연결 유지
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_answer_to_missing_target_is_dropped() {
    let (addr, _state) = spawn_test_server().await;
    let mut a = connect(&addr).await;
    let mut b = connect(&addr).await;

    send(&mut a.tx, json!({ "event": "answer", "d": { "id": "nonexistent-id", "data": {} } })).await;
    assert_silent(&mut a.rx, "A").await;
    assert_silent(&mut b.rx, "B").await;

    // 연결은 여전히 정상
    send(&mut a.tx, json!({ "event": "offer", "d": { "id": b.id, "data": { "ok": true } } })).await;
    assert_event(&recv(&mut b.rx).await, "offer", "B after drop");
}

// ----------------------------------------------------------------------------
// [시나리오 5] disconnect — 레지스트리 해제 + clientDisconnected
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_disconnect_removes_broadcaster() {
    let (addr, state) = spawn_test_server().await;
    let mut x = connect(&addr).await;
    let mut y = connect(&addr).await;

    send(&mut x.tx, json!({ "event": "broadcaster" })).await;
    recv(&mut y.rx).await;
    assert!(state.registry().contains(&x.id));

    let x_id = x.id.clone();
    x.tx.send(Message::Close(None)).await.unwrap();
    drop(x);

    let msg = recv(&mut y.rx).await;
    assert_event(&msg, "clientDisconnected", "Y");
    assert_eq!(msg["d"]["id"], x_id.as_str());
    assert!(!state.registry().contains(&x_id));
    assert_eq!(state.registry().count(), 0);

    let mut w = connect(&addr).await;
    send(&mut w.tx, json!({ "event": "watcher" })).await;
    assert_silent(&mut w.rx, "W").await;
    assert_silent(&mut y.rx, "Y").await;
}

// ----------------------------------------------------------------------------
// [시나리오 6] candidate — 루프백 발신자는 서버 IP 로 치환
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_candidate_mdns_rewritten_with_server_ip() {
    let (addr, _state) = spawn_test_server().await;
    let mut a = connect(&addr).await;
    let mut b = connect(&addr).await;

    let cand = json!({
        "candidate": "candidate:1 1 udp 2122260223 8c1a9f3e-d4b2-4a11-9c77-2f6a1e0b9d55.local 54321 typ host",
        "sdpMid": "0",
        "sdpMLineIndex": 0,
    });
    send(&mut a.tx, json!({ "event": "candidate", "d": { "id": b.id, "data": cand } })).await;

    let msg = recv(&mut b.rx).await;
    assert_event(&msg, "candidate", "B");
    assert_eq!(msg["d"]["id"], a.id.as_str());
    assert_eq!(
        msg["d"]["data"]["candidate"],
        "candidate:1 1 udp 2122260223 192.0.2.10 54321 typ host"
    );
    assert_eq!(msg["d"]["data"]["sdpMLineIndex"], 0);
}

#[tokio::test]
async fn test_candidate_without_mdns_passes_unchanged() {
    let (addr, _state) = spawn_test_server().await;
    let mut a = connect(&addr).await;
    let mut b = connect(&addr).await;

    let cand = json!({ "candidate": "candidate:1 1 udp 2122260223 10.1.2.3 54321 typ host", "sdpMid": "0" });
    send(&mut a.tx, json!({ "event": "candidate", "d": { "id": b.id, "data": cand } })).await;

    let msg = recv(&mut b.rx).await;
    assert_eq!(msg["d"]["data"], cand);
}

// ----------------------------------------------------------------------------
// [시나리오 7] 잘못된 프레임 — error 응답, 연결 유지
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_malformed_frames_get_error_reply() {
    let (addr, _state) = spawn_test_server().await;
    let mut a = connect(&addr).await;

    a.tx.send(Message::Text("not json".to_string().into())).await.unwrap();
    let err = recv(&mut a.rx).await;
    assert_event(&err, "error", "malformed");
    assert_eq!(err["d"]["code"], 1004);

    send(&mut a.tx, json!({ "event": "dance" })).await;
    let err = recv(&mut a.rx).await;
    assert_eq!(err["d"]["code"], 1003);

    send(&mut a.tx, json!({ "event": "offer", "d": { "data": {} } })).await;
    let err = recv(&mut a.rx).await;
    assert_eq!(err["d"]["code"], 1004);
}

// ----------------------------------------------------------------------------
// [시나리오 8] clientLog — client.log 에 한 줄 기록
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_client_log_written_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(ClientLogSink::create(dir.path()).await.unwrap());
    let state = AppState::new(SERVER_IP, Some(Arc::clone(&sink)));
    let addr = spawn_server(state).await;

    let mut a = connect(&addr).await;
    send(&mut a.tx, json!({ "event": "clientLog", "d": { "level": "info", "msg": "ice connected" } })).await;
    // 같은 연결의 이벤트는 순차 처리 — 뒤따른 에러 응답이 오면 기록도 끝난 상태
    send(&mut a.tx, json!({ "event": "dance" })).await;
    recv(&mut a.rx).await;

    let text = tokio::fs::read_to_string(sink.path()).await.unwrap();
    let line: Value = serde_json::from_str(text.lines().next().expect("한 줄 이상")).unwrap();
    assert_eq!(line["socketId"], a.id.as_str());
    assert_eq!(line["address"], "127.0.0.1");
    assert_eq!(line["msg"], "ice connected");
}

#[tokio::test]
async fn test_client_log_ignored_when_disabled() {
    let (addr, _state) = spawn_test_server().await;
    let mut a = connect(&addr).await;
    send(&mut a.tx, json!({ "event": "clientLog", "d": { "msg": "x" } })).await;
    assert_silent(&mut a.rx, "A").await;
}
