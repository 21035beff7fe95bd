// author: kodeholic (powered by Claude)

pub mod candidate;
pub mod error_code;
pub mod event;
pub mod message;
pub mod protocol;

pub use protocol::{ws_handler, AppState};
