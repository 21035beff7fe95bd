// author: kodeholic (powered by Claude)

/// Client → Server 이벤트 이름
pub mod client {
    /// 송출자 선언 — 레지스트리 등록 후 나머지 전원에게 알림
    pub const BROADCASTER: &str = "broadcaster";
    /// 시청 요청 — 등록된 송출자 전원에게 전달
    pub const WATCHER:     &str = "watcher";
    /// SDP offer (d: id=대상, data=SDP)
    pub const OFFER:       &str = "offer";
    /// SDP answer (d: id=대상, data=SDP)
    pub const ANSWER:      &str = "answer";
    /// ICE 후보 (d: id=대상, data=candidate) — .local 치환 대상
    pub const CANDIDATE:   &str = "candidate";
    /// 클라이언트 측 로그 항목 (client.log 에 기록)
    pub const CLIENT_LOG:  &str = "clientLog";
}

/// Server → Client 이벤트 이름
pub mod server {
    /// 연결 직후 본인 연결 ID 안내
    pub const CONNECT:             &str = "connect";
    /// 새 송출자 등장 (발신자 제외 전원)
    pub const BROADCASTER:         &str = "broadcaster";
    /// 시청자 등장 (d: id=시청자)
    pub const WATCHER:             &str = "watcher";
    pub const OFFER:               &str = "offer";
    pub const ANSWER:              &str = "answer";
    pub const CANDIDATE:           &str = "candidate";
    /// 연결 종료 (d: id=종료된 연결)
    pub const CLIENT_DISCONNECTED: &str = "clientDisconnected";
    /// 프레임 파싱 실패 / 알 수 없는 이벤트
    pub const ERROR:               &str = "error";
}

/// 트레이스 전용 시스템 이벤트 이름 (클라이언트로 나가지 않음)
pub mod sys {
    /// WS 연결 수립
    pub const CONNECT:    &str = "connect";
    /// WS 연결 종료
    pub const DISCONNECT: &str = "disconnect";
}
