// author: kodeholic (powered by Claude)

use clap::Parser;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use signal_relay::{config, logging, run_server, ServerArgs};

#[derive(Parser)]
#[command(
    name    = "relayd",
    about   = "WebRTC 송출자/시청자 시그널링 릴레이",
    version,
)]
struct Cli {
    /// WS/HTTP 공용 포트
    #[arg(long, default_value_t = config::SIGNALING_PORT)]
    port: u16,

    /// 정적 파일(클라이언트 앱) 디렉토리
    #[arg(long, default_value = config::DEFAULT_PUBLIC_DIR)]
    public_dir: PathBuf,

    /// .local 치환/GET /ip 에 쓸 서버 IPv4 (생략 시 자동 감지)
    #[arg(long)]
    advertise_ip: Option<Ipv4Addr>,

    /// server.log / client.log 위치
    #[arg(long, default_value = config::LOG_DIR)]
    log_dir: PathBuf,

    /// 파일 로그 끄기
    #[arg(long)]
    no_file_logging: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let file_logging = config::ENABLE_FILE_LOGGING && !cli.no_file_logging;
    let log_dir = file_logging.then_some(cli.log_dir);

    // 환경 변수 기반 로깅 초기화 (기본값: info)
    logging::init(log_dir.as_deref());

    run_server(ServerArgs {
        port:         cli.port,
        public_dir:   cli.public_dir,
        advertise_ip: cli.advertise_ip,
        log_dir,
    }).await;
}
