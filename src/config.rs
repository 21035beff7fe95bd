// author: kodeholic (powered by Claude)
// 매직 넘버를 배제하고 릴레이 전체의 동작을 제어하는 상수 모음입니다.

/// 시그널링(WS) + HTTP 공용 TCP 포트
pub const SIGNALING_PORT: u16 = 3000;

/// 연결별 송신(Egress) 큐 사이즈.
/// 꽉 차면 지연 발생 방지를 위해 메시지를 버립니다(fire-and-forget).
pub const EGRESS_QUEUE_SIZE: usize = 256;

/// 연결 ID 길이 (영숫자)
pub const CONNECTION_ID_LEN: usize = 20;

// ----------------------------------------------------------------------------
// 파일 로그
// ----------------------------------------------------------------------------

/// false 로 두면 server.log / client.log 를 모두 쓰지 않음
/// 실행 시 --no-file-logging 으로도 끌 수 있음
pub const ENABLE_FILE_LOGGING: bool = true;

/// 로그 파일 디렉토리 (기동 시 생성)
pub const LOG_DIR: &str = "logs";

/// 서버 프로세스 로그 (stdout 과 동일 내용)
pub const SERVER_LOG_FILE: &str = "server.log";

/// 클라이언트가 clientLog 로 보고한 항목 (JSON Lines)
pub const CLIENT_LOG_FILE: &str = "client.log";

// ----------------------------------------------------------------------------
// HTTP
// ----------------------------------------------------------------------------

/// 정적 파일(클라이언트 앱) 디렉토리
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// /trace SSE keep-alive 주기 (초)
pub const TRACE_KEEPALIVE_SECS: u64 = 15;

// ----------------------------------------------------------------------------
// ICE 후보 치환
// ----------------------------------------------------------------------------

/// 브라우저가 실제 IP 대신 쓰는 mDNS 호스트명 접미사
pub const LOCAL_HOST_SUFFIX: &str = ".local";

/// 로컬 IPv4 감지 실패 시 폴백
pub const FALLBACK_IPV4: std::net::Ipv4Addr = std::net::Ipv4Addr::LOCALHOST;
