mod config;
mod error;
mod sink;

pub use config::HttpSinkConfig;
pub use error::{HttpSinkError, HttpSinkResult};
pub use sink::HttpResultSink;
