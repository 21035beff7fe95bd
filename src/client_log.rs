// author: kodeholic (powered by Claude)
//
// ClientLogSink — 클라이언트가 보낸 clientLog 항목을 client.log 에 JSON Lines 로 누적
//
//   {"ts":"2026-01-01T00:00:00.000Z","socketId":"Xk2...","address":"::ffff:10.0.0.3", ...entry}
//
// 기록 실패는 호출자가 error! 로 남기고 끝 — 연결/프로세스에 영향 없음

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::trace;

use crate::config;
use crate::error::{RelayError, RelayResult};

pub struct ClientLogSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl ClientLogSink {
    /// log_dir 생성 + client.log 비우고 append 모드로 오픈
    pub async fn create(log_dir: &Path) -> RelayResult<Self> {
        tokio::fs::create_dir_all(log_dir).await?;
        let path = log_dir.join(config::CLIENT_LOG_FILE);
        tokio::fs::write(&path, b"").await?;

        let file = OpenOptions::new().append(true).open(&path).await?;
        trace!("[client-log] opened {}", path.display());
        Ok(Self { path, file: Mutex::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 한 줄 기록. 여러 연결이 동시에 호출해도 줄 단위로 직렬화됨
    pub async fn append(&self, conn_id: &str, address: &str, entry: Value) -> RelayResult<()> {
        let mut line = build_line(conn_id, address, entry);
        line.push('\n');

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await.map_err(RelayError::LogWrite)?;
        file.flush().await.map_err(RelayError::LogWrite)
    }
}

/// 기본 필드(ts, socketId, address) 위에 entry 필드를 덮어씀
/// entry 가 객체가 아니면 "entry" 키로 보관
pub fn build_line(conn_id: &str, address: &str, entry: Value) -> String {
    let mut record = Map::new();
    record.insert("ts".into(), Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)));
    record.insert("socketId".into(), Value::String(conn_id.to_string()));
    record.insert("address".into(), Value::String(address.to_string()));

    match entry {
        Value::Object(fields) => record.extend(fields),
        Value::Null => {}
        other => {
            record.insert("entry".into(), other);
        }
    }

    Value::Object(record).to_string()
}
