// author: kodeholic (powered by Claude)
// tracing 구독자 초기화
//
// - stdout: 항상 (RUST_LOG, 기본 info)
// - logs/server.log: 파일 로그 활성 시 stdout 과 같은 내용을 ANSI 없이 복사
//   (기동할 때마다 비움)
//
// server.log 에는 tracing 이벤트만 기록된다. println!/eprintln! 같은 raw
// stdout/stderr 출력이나 panic 메시지는 복사되지 않는다.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config;
use crate::error::{RelayError, RelayResult};

/// log_dir 이 Some 이면 server.log 도 함께 기록
/// 반환: 파일 레이어가 실제로 설치됐는지
/// (파일을 열 수 없거나 구독자가 이미 설치돼 있으면 false)
pub fn init(log_dir: Option<&Path>) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file, failure) = open_log_target(log_dir);

    let file_layer = file.map(|f| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(f))
    });
    let enabled = file_layer.is_some();

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .is_ok();

    if let Some(e) = failure {
        error!("[logging] server log disabled: {}", e);
    }
    installed && enabled
}

/// 파일 레이어 대상 결정
/// - None            → (None, None): stdout 만
/// - Some(성공)      → (Some(file), None)
/// - Some(열기 실패) → (None, Some(err)): stdout 만 + 에러 보고
fn open_log_target(log_dir: Option<&Path>) -> (Option<File>, Option<RelayError>) {
    match log_dir.map(open_server_log) {
        Some(Ok(f))  => (Some(f), None),
        Some(Err(e)) => (None, Some(e)),
        None         => (None, None),
    }
}

/// 디렉토리 생성 + server.log 새로 만들기 (기존 내용 삭제)
fn open_server_log(log_dir: &Path) -> RelayResult<File> {
    std::fs::create_dir_all(log_dir)?;
    Ok(File::create(log_dir.join(config::SERVER_LOG_FILE))?)
}
