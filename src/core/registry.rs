// author: kodeholic (powered by Claude)
// BroadcasterRegistry — "broadcaster" 를 선언한 연결 목록
//
// 역할(송출자/시청자)은 따로 저장하지 않는다.
// 이 테이블에 id 가 있으면 송출자, 없으면 (watcher 를 보냈든 아니든) 송출자가 아님.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::trace;

use super::connection::Connection;

pub struct BroadcasterRegistry {
    broadcasters: RwLock<HashMap<String, Arc<Connection>>>,
}

impl Default for BroadcasterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcasterRegistry {
    pub fn new() -> Self {
        trace!("Initializing BroadcasterRegistry");
        Self { broadcasters: RwLock::new(HashMap::new()) }
    }

    /// 같은 id 로 다시 호출하면 덮어씀
    pub fn register(&self, conn_id: &str, conn: Arc<Connection>) {
        self.broadcasters.write().unwrap().insert(conn_id.to_string(), conn);
        trace!("Broadcaster registered: {}", conn_id);
    }

    /// 없으면 아무 일도 없음
    pub fn unregister(&self, conn_id: &str) -> bool {
        let removed = self.broadcasters.write().unwrap().remove(conn_id).is_some();
        if removed {
            trace!("Broadcaster unregistered: {}", conn_id);
        }
        removed
    }

    /// 스냅샷 복사 — 반환 후 등록/해제가 일어나도 안전하게 순회 가능
    pub fn all_broadcasters(&self) -> Vec<(String, Arc<Connection>)> {
        self.broadcasters.read().unwrap()
            .iter()
            .map(|(id, c)| (id.clone(), Arc::clone(c)))
            .collect()
    }

    pub fn contains(&self, conn_id: &str) -> bool {
        self.broadcasters.read().unwrap().contains_key(conn_id)
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.broadcasters.read().unwrap().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn count(&self) -> usize {
        self.broadcasters.read().unwrap().len()
    }
}
