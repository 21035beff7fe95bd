// author: kodeholic (powered by Claude)
//
// relaytrace — signal-relay 실시간 시그널링 관찰 CLI
//
// 사용법:
//   relaytrace [--host HOST] [--port PORT] [--filter EVENT] [CONN_ID]
//
// 예시:
//   relaytrace                       # 전체 이벤트 스트림
//   relaytrace Xk2fq...              # 특정 연결 관련 이벤트만
//   relaytrace --filter candidate    # candidate 이벤트만

use clap::Parser;
use colored::Colorize;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::io::{BufRead, BufReader};

#[derive(Parser)]
#[command(
    name    = "relaytrace",
    about   = "signal-relay 실시간 시그널링 이벤트 스트림 관찰",
    version,
)]
struct Cli {
    /// 서버 호스트
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// 서버 포트
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// 이벤트 이름 필터 (대소문자 무관, 부분 일치)
    #[arg(long, short = 'f')]
    filter: Option<String>,

    /// 관찰할 연결 ID (생략 시 전체)
    conn_id: Option<String>,
}

/// src/trace.rs TraceEvent 와 동일 구조
#[derive(Debug, Deserialize)]
struct TraceEvent {
    ts:      u64,
    dir:     String,
    conn_id: Option<String>,
    event:   String,
    summary: String,
}

fn main() {
    let cli = Cli::parse();

    let url = match &cli.conn_id {
        Some(id) => format!("http://{}:{}/trace/{}", cli.host, cli.port, id),
        None     => format!("http://{}:{}/trace",    cli.host, cli.port),
    };
    let filter = cli.filter.as_ref().map(|s| s.to_lowercase());

    println!("{}", "─".repeat(80).dimmed());
    println!(
        "  {} {}  {}  {}",
        "relaytrace".bold().cyan(),
        "▶".green(),
        url.dimmed(),
        filter.as_deref()
            .map(|f| format!("[filter: {}]", f).yellow().to_string())
            .unwrap_or_default(),
    );
    println!("{}", "─".repeat(80).dimmed());

    let client = match Client::builder().timeout(None).build() {
        Ok(c)  => c,
        Err(e) => {
            eprintln!("{} http client: {}", "✗".red(), e);
            std::process::exit(1);
        }
    };

    let resp = match client.get(&url).header("Accept", "text/event-stream").send() {
        Ok(r)  => r,
        Err(e) => {
            eprintln!("{} 서버 연결 실패: {}", "✗".red(), e);
            eprintln!("  서버가 실행 중인지 확인하세요: {}", url.dimmed());
            std::process::exit(1);
        }
    };

    if !resp.status().is_success() {
        eprintln!("{} HTTP {}", "✗".red(), resp.status());
        std::process::exit(1);
    }

    let mut event_count: u64 = 0;
    for line in BufReader::new(resp).lines() {
        let line = match line {
            Ok(l)  => l,
            Err(e) => {
                eprintln!("{} 스트림 읽기 실패: {}", "✗".red(), e);
                break;
            }
        };

        // SSE: "data: {JSON}" 만 처리 (keep-alive 주석, 빈 줄 무시)
        let json_str = match line.strip_prefix("data: ") {
            Some(rest) => rest,
            None       => continue,
        };

        let event: TraceEvent = match serde_json::from_str(json_str) {
            Ok(e)  => e,
            Err(e) => {
                eprintln!("{} JSON 파싱 실패: {} ({})", "⚠".yellow(), e, json_str);
                continue;
            }
        };

        if let Some(ref f) = filter {
            if !event.event.to_lowercase().contains(f.as_str()) {
                continue;
            }
        }

        print_event(&event);
        event_count += 1;
    }

    println!("{}", "─".repeat(80).dimmed());
    println!("  스트림 종료 (총 {} 이벤트)", event_count);
}

fn print_event(e: &TraceEvent) {
    let dir_str = match e.dir.as_str() {
        "in"  => "↓ C→S".bright_blue().to_string(),
        "out" => "↑ S→C".bright_green().to_string(),
        "sys" => "· SYS".bright_yellow().to_string(),
        other => other.dimmed().to_string(),
    };

    println!(
        "  {} {} {:<20} {:<22} {}",
        format_ts(e.ts).dimmed(),
        dir_str,
        colorize_event(&e.event),
        e.conn_id.as_deref().unwrap_or("-").bright_white(),
        e.summary.dimmed(),
    );
}

fn colorize_event(name: &str) -> String {
    match name {
        "broadcaster"                => name.bright_green().bold().to_string(),
        "watcher"                    => name.bright_cyan().to_string(),
        "offer" | "answer"           => name.bright_magenta().to_string(),
        "candidate"                  => name.bright_yellow().to_string(),
        "disconnect" | "connect"     => name.bright_red().to_string(),
        _                            => name.normal().to_string(),
    }
}

/// Unix millis → "HH:MM:SS.mmm" (UTC)
fn format_ts(ts_ms: u64) -> String {
    let secs   = ts_ms / 1000;
    let millis = ts_ms % 1000;
    let today  = secs % 86400;
    format!("{:02}:{:02}:{:02}.{:03}", today / 3600, (today % 3600) / 60, today % 60, millis)
}
