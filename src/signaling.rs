pub mod messages;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{config::Credentials, error::StreamError};

use self::messages::{Device, ExecuteCommandRequestBody, ExecuteCommandResponseBody,
    ListDevicesResponseBody};

pub const DEFAULT_ORIGIN: &str = "https://smartdevicemanagement.googleapis.com";

/// The seam between session orchestration and the wire: exchange a local
/// offer SDP for the remote answer SDP.
#[async_trait]
pub trait SignalingExchange {
    async fn exchange(&self, offer_sdp: &str) -> Result<String, StreamError>;
}

pub struct SdmClient {
    client: reqwest::Client,
    origin: String,
    credentials: Credentials,
}

impl SdmClient {
    // The exchange is the only unbounded external wait of the run.
    fn timeout() -> Duration {
        Duration::from_secs(10)
    }

    pub fn new(credentials: Credentials) -> Self {
        Self::with_origin(DEFAULT_ORIGIN.to_owned(), credentials)
    }

    pub fn with_origin(origin: String, credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            origin,
            credentials,
        }
    }

    pub async fn list_devices(&self) -> Result<Vec<Device>, StreamError> {
        let url = format!(
            "{}/v1/enterprises/{}/devices",
            self.origin,
            self.credentials.project_id()
        );
        info!("GET {}", url);
        let res = self
            .client
            .get(url)
            .bearer_auth(self.credentials.access_token())
            .timeout(Self::timeout())
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await?;
        ListDevicesResponseBody::parse(status, &text)
    }

    pub async fn find_camera(&self) -> Result<Option<Device>, StreamError> {
        Ok(self.list_devices().await?.into_iter().find(Device::is_camera))
    }
}

#[async_trait]
impl SignalingExchange for SdmClient {
    async fn exchange(&self, offer_sdp: &str) -> Result<String, StreamError> {
        let url = format!(
            "{}/v1/enterprises/{}/devices/{}:executeCommand",
            self.origin,
            self.credentials.project_id(),
            self.credentials.require_device_id()?
        );
        info!("POST {}", url);
        let res = self
            .client
            .post(url)
            .bearer_auth(self.credentials.access_token())
            .json(&ExecuteCommandRequestBody::generate_web_rtc_stream(
                offer_sdp.to_owned(),
            ))
            .timeout(Self::timeout())
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            warn!("signaling returned {}", status);
            warn!("{:?}", res.headers());
        }
        let text = res.text().await?;
        if !status.is_success() {
            warn!("{}", text);
        }
        let results = ExecuteCommandResponseBody::parse(status, &text)?;
        if let Some(media_session_id) = results.media_session_id() {
            info!("media session {}", media_session_id);
        }
        if let Some(expires_at) = results.expires_at() {
            info!("stream expires at {}", expires_at);
        }
        results.into_answer_sdp().ok_or(StreamError::MissingAnswer)
    }
}
