// author: kodeholic (powered by Claude)
//
// relayadmin — signal-relay 운영 조회 CLI
//
// 사용법:
//   relayadmin [--host HOST] [--port PORT] <COMMAND>
//
//   relayadmin status          서버 상태 요약 (uptime, 연결 수, 송출자 수)
//   relayadmin connections     연결 전체 테이블
//   relayadmin broadcasters    등록된 송출자 id 목록
//   relayadmin ip              서버 LAN IP

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Deserialize;
use tabled::{Table, Tabled};

#[derive(Parser)]
#[command(
    name    = "relayadmin",
    about   = "signal-relay 운영 조회 CLI",
    version,
)]
struct Cli {
    /// 서버 호스트
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// 서버 포트 (WS/HTTP 공용)
    #[arg(long, default_value_t = 3000)]
    port: u16,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 서버 상태 요약
    Status,
    /// 접속 중인 연결 목록
    Connections,
    /// 등록된 송출자 목록
    Broadcasters,
    /// 서버 LAN IP
    Ip,
}

// ----------------------------------------------------------------------------
// [응답 타입] — http/dto.rs 와 대응
// ----------------------------------------------------------------------------

#[derive(Deserialize)]
struct ServerStatus {
    uptime_secs:       u64,
    connection_count:  usize,
    broadcaster_count: usize,
    server_ip:         String,
}

#[derive(Deserialize, Tabled)]
struct ConnectionSummary {
    #[tabled(rename = "CONNECTION ID")]
    id:             String,
    #[tabled(rename = "ADDRESS")]
    address:        String,
    #[tabled(rename = "BROADCASTER")]
    broadcaster:    bool,
    #[tabled(rename = "AGE(s)")]
    connected_secs: u64,
}

#[derive(Deserialize)]
struct BroadcasterList {
    broadcasters: Vec<String>,
}

#[derive(Deserialize)]
struct IpResponse {
    ip: String,
}

fn main() {
    let cli = Cli::parse();
    let base = format!("http://{}:{}", cli.host, cli.port);

    let result = match cli.command {
        Command::Status       => cmd_status(&base),
        Command::Connections  => cmd_connections(&base),
        Command::Broadcasters => cmd_broadcasters(&base),
        Command::Ip           => cmd_ip(&base),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "ERROR:".red().bold(), e);
        std::process::exit(1);
    }
}

// ----------------------------------------------------------------------------
// [커맨드 구현]
// ----------------------------------------------------------------------------

fn cmd_status(base: &str) -> Result<(), Box<dyn std::error::Error>> {
    let s: ServerStatus = get_json(&format!("{}/admin/status", base))?;

    let hours   = s.uptime_secs / 3600;
    let minutes = (s.uptime_secs % 3600) / 60;
    let secs    = s.uptime_secs % 60;

    println!();
    println!("{}", "  signal-relay Status".bold().cyan());
    println!("  {}", "─".repeat(36).dimmed());
    println!("  {:16} {}",
        "Uptime:".bold(),
        format!("{}h {}m {}s", hours, minutes, secs).green()
    );
    println!("  {:16} {}", "LAN IP:".bold(),       s.server_ip.yellow());
    println!("  {:16} {}", "Connections:".bold(),  s.connection_count.to_string().yellow());
    println!("  {:16} {}",
        "Broadcasters:".bold(),
        if s.broadcaster_count > 0 {
            s.broadcaster_count.to_string().green().bold().to_string()
        } else {
            s.broadcaster_count.to_string().dimmed().to_string()
        }
    );
    println!();
    Ok(())
}

fn cmd_connections(base: &str) -> Result<(), Box<dyn std::error::Error>> {
    let list: Vec<ConnectionSummary> = get_json(&format!("{}/admin/connections", base))?;
    if list.is_empty() {
        println!("{}", "  (no connections)".dimmed());
        return Ok(());
    }
    println!("{}", Table::new(list));
    Ok(())
}

fn cmd_broadcasters(base: &str) -> Result<(), Box<dyn std::error::Error>> {
    let list: BroadcasterList = get_json(&format!("{}/admin/broadcasters", base))?;
    if list.broadcasters.is_empty() {
        println!("{}", "  (no broadcasters)".dimmed());
        return Ok(());
    }
    for id in list.broadcasters {
        println!("  {} {}", "●".green(), id);
    }
    Ok(())
}

fn cmd_ip(base: &str) -> Result<(), Box<dyn std::error::Error>> {
    let r: IpResponse = get_json(&format!("{}/ip", base))?;
    println!("{}", r.ip);
    Ok(())
}

fn get_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, Box<dyn std::error::Error>> {
    let resp = reqwest::blocking::get(url)?;
    if !resp.status().is_success() {
        return Err(format!("HTTP {} ({})", resp.status(), url).into());
    }
    Ok(resp.json::<T>()?)
}
