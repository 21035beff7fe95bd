// author: kodeholic (powered by Claude)

use axum::{extract::State, response::IntoResponse, Json};

use super::dto::IpResponse;
use super::state::HttpState;

/// GET /ip
/// 클라이언트가 같은 LAN 의 서버 주소를 알아내는 용도
pub async fn get_ip(State(state): State<HttpState>) -> impl IntoResponse {
    Json(IpResponse { ip: state.server_ip.to_string() })
}
