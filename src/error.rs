use http::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;

/// Every failure aborts the run; nothing is retried or recovered locally.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("offer SDP is missing a required attribute: {attribute}")]
    MalformedOffer { attribute: &'static str },
    #[error("signaling failed: {status}: {message}")]
    Signaling { status: StatusCode, message: String },
    #[error("signaling response did not contain an answer SDP")]
    MissingAnswer,
    #[error("negotiation failed: {0}")]
    Negotiation(#[from] webrtc::Error),
    #[error("signaling request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
