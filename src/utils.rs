// author: kodeholic (powered by Claude)

use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config;

/// 현재 시간을 밀리초 단위의 Unix Timestamp로 반환합니다.
/// 에러 발생 시 시스템 패닉 대신 0(기본값)을 반환하여 장애를 방어합니다.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// 연결 ID 생성 (alphanumeric)
pub fn random_id(len: usize) -> String {
    use rand::Rng;
    let charset: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

/// 서버 호스트의 대표 IPv4 주소 감지
/// 1. 인터페이스 목록에서 첫 번째 비-내부(루프백/미지정 아님) IPv4
/// 2. 실패 시 UDP connect 라우팅 조회 (실제 패킷 없음, 기본 경로 필요)
/// 3. 둘 다 실패하면 config::FALLBACK_IPV4
pub fn detect_local_ipv4() -> Ipv4Addr {
    match if_addrs::get_if_addrs() {
        Ok(ifaces) => {
            let addrs = ifaces.iter().filter(|i| !i.is_loopback()).map(|i| i.ip());
            if let Some(ip) = pick_lan_ipv4(addrs) {
                return ip;
            }
        }
        Err(e) => tracing::warn!("[net] interface scan failed: {}", e),
    }

    let routed = UdpSocket::bind("0.0.0.0:0")
        .and_then(|s| { s.connect("8.8.8.8:80")?; s.local_addr() })
        .map(|addr| addr.ip());

    match routed {
        Ok(ip) => pick_lan_ipv4([ip]).unwrap_or_else(|| {
            tracing::warn!("[net] no usable IPv4 interface (got {}), falling back to {}", ip, config::FALLBACK_IPV4);
            config::FALLBACK_IPV4
        }),
        Err(e) => {
            tracing::warn!("[net] local IPv4 detection failed: {}, falling back to {}", e, config::FALLBACK_IPV4);
            config::FALLBACK_IPV4
        }
    }
}

/// 주소 목록에서 첫 번째 외부 IPv4 (루프백, 0.0.0.0, IPv6 제외)
pub fn pick_lan_ipv4<I: IntoIterator<Item = IpAddr>>(addrs: I) -> Option<Ipv4Addr> {
    addrs.into_iter().find_map(|addr| match addr {
        IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => Some(ip),
        _ => None,
    })
}
