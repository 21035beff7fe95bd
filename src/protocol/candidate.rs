// author: kodeholic (powered by Claude)
//
// ICE 후보 mDNS(.local) 치환
//
// Chrome 75+ 는 host 후보의 실제 IP 대신 "<uuid>.local" 가짜 호스트명을 넣는다.
// mDNS 를 못 푸는 수신자는 이 후보로 연결할 수 없으므로,
// 서버가 관측한 발신자 주소로 호스트명 토큰만 바꿔서 전달한다.
//
//   candidate:1 1 udp 2122260223 8c1a...9d55.local 54321 typ host
//       → candidate:1 1 udp 2122260223 203.0.113.7 54321 typ host

use regex::Regex;
use serde_json::Value;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::OnceLock;
use tracing::info;

use crate::config;

/// mDNS 호스트명 토큰: 소문자 hex / '-' 로 이루어지고 .local 로 끝남
fn local_host_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[a-f0-9-]+\.local").expect("static mDNS pattern"))
}

/// 발신자의 실제 주소 결정
/// - 루프백 (127/8, ::1, ::ffff:127.x) → 서버 자신의 IPv4 (같은 머신 접속)
/// - IPv4-mapped IPv6 → 내장 IPv4
/// - 그 외 → 그대로
pub fn resolve_sender_ip(remote: IpAddr, server_ip: Ipv4Addr) -> IpAddr {
    let plain = match remote {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(remote),
        v4 => v4,
    };

    if plain.is_loopback() {
        IpAddr::V4(server_ip)
    } else {
        plain
    }
}

/// candidate 문자열 내 .local 토큰 전부를 주어진 주소로 치환
/// 패턴이 없으면 None (원본 유지)
pub fn rewrite_candidate_line(line: &str, addr: &IpAddr) -> Option<String> {
    if !line.contains(config::LOCAL_HOST_SUFFIX) {
        return None;
    }
    let replaced = local_host_pattern().replace_all(line, addr.to_string().as_str());
    Some(replaced.into_owned())
}

/// ICE 후보 payload 변환
/// candidate 필드가 없거나 문자열이 아니면 그대로 통과
/// 나머지 필드(sdpMid, sdpMLineIndex, ...)는 건드리지 않음
pub fn rewrite_candidate(mut payload: Value, sender: IpAddr, server_ip: Ipv4Addr) -> Value {
    let line = match payload.get("candidate").and_then(Value::as_str) {
        Some(s) if s.contains(config::LOCAL_HOST_SUFFIX) => s,
        _ => return payload,
    };

    let addr = resolve_sender_ip(sender, server_ip);
    if let Some(rewritten) = rewrite_candidate_line(line, &addr) {
        payload["candidate"] = Value::String(rewritten);
        info!("[mdns-fix] replaced .local with {}", addr);
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::net::Ipv6Addr;

    const SERVER_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 10);
    const MDNS_LINE: &str =
        "candidate:842163049 1 udp 1677729535 8c1a9f3e-d4b2-4a11-9c77-2f6a1e0b9d55.local 54321 typ host generation 0";

    fn sender(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn no_local_suffix_is_byte_identical() {
        let payload = json!({
            "candidate": "candidate:1 1 udp 2122260223 10.0.0.5 50000 typ host",
            "sdpMid": "0",
            "sdpMLineIndex": 0,
        });
        let out = rewrite_candidate(payload.clone(), sender("203.0.113.7"), SERVER_IP);
        assert_eq!(out, payload);
        assert_eq!(out.to_string(), payload.to_string());
    }

    #[test]
    fn replaces_mdns_token_with_sender_ip() {
        let payload = json!({ "candidate": MDNS_LINE, "sdpMid": "0", "sdpMLineIndex": 0 });
        let out = rewrite_candidate(payload, sender("203.0.113.7"), SERVER_IP);
        assert_eq!(
            out["candidate"],
            "candidate:842163049 1 udp 1677729535 203.0.113.7 54321 typ host generation 0"
        );
        assert_eq!(out["sdpMid"], "0");
        assert_eq!(out["sdpMLineIndex"], 0);
    }

    #[test]
    fn ipv4_loopback_uses_server_ip() {
        let out = rewrite_candidate(json!({ "candidate": MDNS_LINE }), sender("127.0.0.1"), SERVER_IP);
        assert!(out["candidate"].as_str().unwrap().contains(" 192.168.0.10 "));
        assert!(!out["candidate"].as_str().unwrap().contains("127.0.0.1"));
    }

    #[test]
    fn ipv6_loopback_uses_server_ip() {
        let out = rewrite_candidate(json!({ "candidate": MDNS_LINE }), sender("::1"), SERVER_IP);
        assert!(out["candidate"].as_str().unwrap().contains(" 192.168.0.10 "));
    }

    #[test]
    fn mapped_loopback_uses_server_ip() {
        let out = rewrite_candidate(json!({ "candidate": MDNS_LINE }), sender("::ffff:127.0.0.1"), SERVER_IP);
        assert!(out["candidate"].as_str().unwrap().contains(" 192.168.0.10 "));
    }

    #[test]
    fn mapped_ipv4_prefix_is_stripped() {
        let addr = resolve_sender_ip(sender("::ffff:203.0.113.7"), SERVER_IP);
        assert_eq!(addr, sender("203.0.113.7"));
    }

    #[test]
    fn plain_ipv6_sender_is_kept() {
        let v6 = IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1));
        assert_eq!(resolve_sender_ip(v6, SERVER_IP), v6);
    }

    #[test]
    fn missing_candidate_field_passes_through() {
        let payload = json!({ "sdpMid": "0" });
        assert_eq!(rewrite_candidate(payload.clone(), sender("203.0.113.7"), SERVER_IP), payload);

        let payload = json!({ "candidate": null });
        assert_eq!(rewrite_candidate(payload.clone(), sender("203.0.113.7"), SERVER_IP), payload);

        assert_eq!(rewrite_candidate(Value::Null, sender("203.0.113.7"), SERVER_IP), Value::Null);
    }

    #[test]
    fn every_token_is_replaced() {
        let line = "a1b2.local x c3d4-e5.local";
        let out = rewrite_candidate_line(line, &sender("198.51.100.2")).unwrap();
        assert_eq!(out, "198.51.100.2 x 198.51.100.2");
    }

    #[test]
    fn line_without_suffix_returns_none() {
        assert!(rewrite_candidate_line("candidate:1 1 udp 1 1.2.3.4 9 typ host", &sender("1.1.1.1")).is_none());
    }
}
