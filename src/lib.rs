// author: kodeholic (powered by Claude)

pub mod client_log;
pub mod config;
pub mod core;
pub mod error;
pub mod http;
pub mod logging;
pub mod protocol;
pub mod trace;
pub mod utils;

use axum::{routing::get, Router};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::client_log::ClientLogSink;
use crate::http::HttpState;
use crate::protocol::{ws_handler, AppState};

/// CLI에서 주입되는 런타임 설정
/// - 기본값은 config.rs 상수
pub struct ServerArgs {
    pub port:         u16,
    pub public_dir:   PathBuf,
    pub advertise_ip: Option<Ipv4Addr>, // None이면 detect_local_ipv4() 자동 감지
    /// None이면 파일 로그(client.log) 비활성
    pub log_dir:      Option<PathBuf>,
}

/// WS(/ws) + HTTP(/ip, /admin, /trace) + 정적 파일 라우터 조립
pub fn build_router(app_state: AppState, public_dir: &Path) -> Router {
    let http_state = HttpState::new(
        Arc::clone(app_state.hub()),
        Arc::clone(app_state.registry()),
        Arc::clone(&app_state.trace_hub),
        app_state.relay.server_ip(),
    );

    let http_router = Router::new()
        .route("/ip",                  get(http::get_ip))
        .route("/admin/status",        get(http::admin_status))
        .route("/admin/connections",   get(http::admin_connections))
        .route("/admin/broadcasters",  get(http::admin_broadcasters))
        .route("/trace",               get(http::trace_stream))
        .route("/trace/{conn_id}",     get(http::trace_stream))
        .with_state(http_state);

    // CORS — 로컬 테스트 페이지/다른 포트의 클라이언트 모두 허용
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(app_state)
        .merge(http_router)
        .fallback_service(ServeDir::new(public_dir))
        .layer(cors)
}

/// 리스너 위에서 서비스 — 원격 주소(ConnectInfo) 주입 포함
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await
}

pub async fn run_server(args: ServerArgs) {
    let server_ip = args.advertise_ip.unwrap_or_else(utils::detect_local_ipv4);

    let client_log = match &args.log_dir {
        Some(dir) => match ClientLogSink::create(dir).await {
            Ok(sink) => Some(Arc::new(sink)),
            Err(e) => {
                error!("[client-log] disabled: {}", e);
                None
            }
        },
        None => None,
    };

    let app_state = AppState::new(server_ip, client_log);
    let app = build_router(app_state, &args.public_dir);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l)  => l,
        Err(e) => {
            error!("[signal-relay] bind {} failed: {}", addr, e);
            return;
        }
    };

    info!("[signal-relay] Server running on http://localhost:{}", args.port);
    info!("[signal-relay] Signaling on ws://{}/ws", addr);
    info!("[signal-relay] Static files from {}", args.public_dir.display());
    if args.advertise_ip.is_some() {
        info!("[signal-relay] LAN IP: {} (manual)", server_ip);
    } else {
        info!("[signal-relay] LAN IP: {} (auto detect)", server_ip);
    }
    match &args.log_dir {
        Some(dir) => info!("[signal-relay] File logging to {}", dir.display()),
        None      => info!("[signal-relay] File logging disabled"),
    }

    if let Err(e) = serve(listener, app).await {
        error!("[signal-relay] server stopped: {}", e);
    }
}
