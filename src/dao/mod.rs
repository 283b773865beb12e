#[cfg(feature = "http-sink")]
pub mod http;
pub mod memory;
pub mod result_sink;
