mod http;

pub use http::{DEFAULT_CHAT_PATH, HttpProvider};
