// author: kodeholic (powered by Claude)
// ConnectionHub — 살아있는 WS 연결 전체의 라우팅 테이블
//
// "대상 id 로 전달" / "발신자 제외 전원에게" 는 모두 여기서 해석한다.
// (시청자는 레지스트리에 없으므로 BroadcasterRegistry 로는 찾을 수 없음)

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{trace, warn};

use crate::utils::current_timestamp;

/// 연결별 송신 큐 (직렬화된 Envelope JSON)
pub type EgressTx = mpsc::Sender<String>;

// ----------------------------------------------------------------------------
// [Connection] WS accept 시 등록, WS 종료 시 제거
// ----------------------------------------------------------------------------

pub struct Connection {
    pub tx:           EgressTx,
    /// 전송 계층이 관측한 원격 주소 (.local 치환 시 사용)
    pub remote_addr:  SocketAddr,
    pub connected_at: u64,
}

impl Connection {
    pub fn new(tx: EgressTx, remote_addr: SocketAddr) -> Self {
        Self { tx, remote_addr, connected_at: current_timestamp() }
    }

    /// fire-and-forget 전송 — 큐가 가득 찼거나 닫혔으면 버림
    pub fn push(&self, json: &str) -> bool {
        match self.tx.try_send(json.to_string()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("[hub] egress queue full, message dropped (remote={})", self.remote_addr);
                false
            }
            Err(TrySendError::Closed(_)) => {
                trace!("[hub] egress closed, message dropped (remote={})", self.remote_addr);
                false
            }
        }
    }
}

// ----------------------------------------------------------------------------
// [ConnectionHub]
// ----------------------------------------------------------------------------

pub struct ConnectionHub {
    conns: RwLock<HashMap<String, Arc<Connection>>>,
}

impl Default for ConnectionHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionHub {
    pub fn new() -> Self {
        trace!("Initializing ConnectionHub");
        Self { conns: RwLock::new(HashMap::new()) }
    }

    pub fn register(&self, conn_id: &str, tx: EgressTx, remote_addr: SocketAddr) -> Arc<Connection> {
        let conn = Arc::new(Connection::new(tx, remote_addr));
        self.conns.write().unwrap().insert(conn_id.to_string(), Arc::clone(&conn));
        trace!("Connection registered: {} ({})", conn_id, remote_addr);
        conn
    }

    pub fn unregister(&self, conn_id: &str) {
        self.conns.write().unwrap().remove(conn_id);
        trace!("Connection unregistered: {}", conn_id);
    }

    pub fn get(&self, conn_id: &str) -> Option<Arc<Connection>> {
        self.conns.read().unwrap().get(conn_id).cloned()
    }

    /// 단일 대상 전송. 대상이 없으면 조용히 false
    pub fn send_to(&self, conn_id: &str, json: &str) -> bool {
        match self.get(conn_id) {
            Some(conn) => conn.push(json),
            None => {
                trace!("[hub] target {} not connected, dropped", conn_id);
                false
            }
        }
    }

    /// exclude 를 제외한 전 연결에 전송, 실제 큐에 넣은 수 반환
    pub fn broadcast_except(&self, exclude: &str, json: &str) -> usize {
        let targets: Vec<Arc<Connection>> = {
            let conns = self.conns.read().unwrap();
            conns.iter()
                .filter(|(id, _)| id.as_str() != exclude)
                .map(|(_, c)| Arc::clone(c))
                .collect()
        };

        targets.iter().filter(|c| c.push(json)).count()
    }

    /// 전체 연결 스냅샷 (admin 조회용)
    pub fn all_connections(&self) -> Vec<(String, Arc<Connection>)> {
        self.conns.read().unwrap()
            .iter()
            .map(|(id, c)| (id.clone(), Arc::clone(c)))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.conns.read().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    #[test]
    fn register_and_get() {
        let hub = ConnectionHub::new();
        let (tx, _rx) = mpsc::channel(4);
        hub.register("a", tx, addr());
        assert!(hub.get("a").is_some());
        assert!(hub.get("b").is_none());
        assert_eq!(hub.count(), 1);
    }

    #[test]
    fn send_to_missing_target_is_silent() {
        let hub = ConnectionHub::new();
        assert!(!hub.send_to("nobody", "{}"));
    }

    #[test]
    fn send_to_delivers_exactly_once() {
        let hub = ConnectionHub::new();
        let (tx, mut rx) = mpsc::channel(4);
        hub.register("a", tx, addr());
        assert!(hub.send_to("a", "hello"));
        assert_eq!(rx.try_recv().unwrap(), "hello");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn broadcast_skips_excluded() {
        let hub = ConnectionHub::new();
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        let (tx_c, mut rx_c) = mpsc::channel(4);
        hub.register("a", tx_a, addr());
        hub.register("b", tx_b, addr());
        hub.register("c", tx_c, addr());

        assert_eq!(hub.broadcast_except("a", "x"), 2);
        assert!(rx_a.try_recv().is_err());
        assert_eq!(rx_b.try_recv().unwrap(), "x");
        assert_eq!(rx_c.try_recv().unwrap(), "x");
    }

    #[test]
    fn full_queue_drops_without_error() {
        let hub = ConnectionHub::new();
        let (tx, _rx) = mpsc::channel(1);
        hub.register("a", tx, addr());
        assert!(hub.send_to("a", "1"));
        assert!(!hub.send_to("a", "2"));
    }

    #[test]
    fn closed_receiver_drops_without_error() {
        let hub = ConnectionHub::new();
        let (tx, rx) = mpsc::channel(4);
        hub.register("a", tx, addr());
        drop(rx);
        assert!(!hub.send_to("a", "1"));
    }

    #[test]
    fn unregister_removes() {
        let hub = ConnectionHub::new();
        let (tx, _rx) = mpsc::channel(4);
        hub.register("a", tx, addr());
        hub.unregister("a");
        hub.unregister("a");
        assert_eq!(hub.count(), 0);
    }
}
