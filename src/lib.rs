pub mod config;
pub mod connection;
pub mod error;
pub mod sdp;
pub mod session;
pub mod signaling;
pub mod tracing_helper;
