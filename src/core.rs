// author: kodeholic (powered by Claude)
// 네트워크 로직과 분리된 순수 상태 관리 + 라우팅 모듈입니다.

pub mod connection;
pub mod registry;
pub mod relay;

pub use connection::{Connection, ConnectionHub, EgressTx};
pub use registry::BroadcasterRegistry;
pub use relay::Relay;
