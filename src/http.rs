// author: kodeholic (powered by Claude)
//
// HTTP REST API 핸들러
//
// GET /ip                    → 서버 LAN IPv4 ({"ip": "..."})
// GET /admin/status          → 릴레이 상태 요약
// GET /admin/connections     → 접속 중인 연결 목록
// GET /admin/broadcasters    → 등록된 송출자 id 목록
// GET /trace[/{conn_id}]     → 시그널링 이벤트 SSE

pub mod admin;
pub mod dto;
pub mod ip;
pub mod state;
pub mod trace;

pub use admin::{admin_broadcasters, admin_connections, admin_status};
pub use ip::get_ip;
pub use state::HttpState;
pub use trace::trace_stream;
