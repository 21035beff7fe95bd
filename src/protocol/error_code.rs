// author: kodeholic (powered by Claude)

use crate::error::RelayError;

/// 1xxx: 프레임/이벤트
pub const UNKNOWN_EVENT:   u16 = 1003;
pub const INVALID_PAYLOAD: u16 = 1004;

/// 9xxx: 서버 내부
pub const INTERNAL_ERROR:  u16 = 9000;

/// RelayError → 에러 코드 변환
/// 에러 응답 패킷 생성 시 사용
pub fn to_error_code(err: &RelayError) -> u16 {
    match err {
        RelayError::UnknownEvent(_)   => UNKNOWN_EVENT,
        RelayError::InvalidPayload(_) => INVALID_PAYLOAD,

        RelayError::LogWrite(_)
        | RelayError::Io(_)           => INTERNAL_ERROR,
    }
}
