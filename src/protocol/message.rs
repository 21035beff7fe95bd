// author: kodeholic (powered by Claude)

use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// [공통] 이벤트 봉투 (Envelope)
// ----------------------------------------------------------------------------

/// 모든 WebSocket 메시지의 최상위 구조체
/// 수신/송신 공통으로 사용하며, payload는 event에 따라 해석합니다.
///
/// 예시:
///   { "event": "offer", "d": { "id": "Xk2...", "data": { "type": "offer", "sdp": "..." } } }
#[derive(Serialize, Deserialize, Debug)]
pub struct Envelope {
    /// 이벤트 이름 (protocol::event 참조)
    pub event: String,
    /// payload. event에 따라 구조가 달라지므로 raw JSON으로 보관
    #[serde(default)]
    pub d: Option<serde_json::Value>,
}

impl Envelope {
    pub fn new(event: &str, payload: impl Serialize) -> Self {
        Self {
            event: event.to_string(),
            d:     Some(serde_json::to_value(payload).unwrap_or(serde_json::Value::Null)),
        }
    }

    pub fn no_data(event: &str) -> Self {
        Self { event: event.to_string(), d: None }
    }
}

// ----------------------------------------------------------------------------
// [C→S] offer / answer / candidate 공통
// ----------------------------------------------------------------------------

/// id: 전달 대상 연결 ID, data: SDP 또는 ICE 후보 (불투명)
#[derive(Deserialize, Debug)]
pub struct SignalPayload {
    pub id:   String,
    #[serde(default)]
    pub data: serde_json::Value,
}

// ----------------------------------------------------------------------------
// [S→C]
// ----------------------------------------------------------------------------

/// offer / answer / candidate 전달 — id: 발신자 연결 ID
#[derive(Serialize, Debug)]
pub struct RelayedPayload {
    pub id:   String,
    pub data: serde_json::Value,
}

/// connect / watcher / clientDisconnected — 연결 ID 하나만 전달
#[derive(Serialize, Debug)]
pub struct PeerPayload {
    pub id: String,
}

#[derive(Serialize, Debug)]
pub struct ErrorPayload {
    pub code:   u16,
    pub reason: String,
}

// ----------------------------------------------------------------------------
// [헬퍼] 직렬화된 패킷 문자열 생성
// ----------------------------------------------------------------------------

pub fn make_packet(event: &str, payload: impl Serialize) -> String {
    serde_json::to_string(&Envelope::new(event, payload)).unwrap_or_default()
}

pub fn make_no_data(event: &str) -> String {
    serde_json::to_string(&Envelope::no_data(event)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn envelope_without_d_parses() {
        let env: Envelope = serde_json::from_str(r#"{"event":"watcher"}"#).unwrap();
        assert_eq!(env.event, "watcher");
        assert!(env.d.is_none());
    }

    #[test]
    fn signal_payload_missing_data_is_null() {
        let p: SignalPayload = serde_json::from_value(json!({ "id": "abc" })).unwrap();
        assert_eq!(p.id, "abc");
        assert!(p.data.is_null());
    }

    #[test]
    fn signal_payload_requires_id() {
        let r = serde_json::from_value::<SignalPayload>(json!({ "data": {} }));
        assert!(r.is_err());
    }

    #[test]
    fn make_packet_shape() {
        let s = make_packet("watcher", PeerPayload { id: "w1".into() });
        let v: Value = serde_json::from_str(&s).unwrap();
        assert_eq!(v["event"], "watcher");
        assert_eq!(v["d"]["id"], "w1");
    }

    #[test]
    fn make_no_data_has_null_d() {
        let v: Value = serde_json::from_str(&make_no_data("broadcaster")).unwrap();
        assert_eq!(v["event"], "broadcaster");
        assert!(v["d"].is_null());
    }
}
