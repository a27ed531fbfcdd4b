//! Wire shapes of the SDM `:executeCommand` and device-listing endpoints.

use derive_new::new;
use getset::Getters;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::StreamError;

pub const GENERATE_WEB_RTC_STREAM_COMMAND: &str =
    "sdm.devices.commands.CameraLiveStream.GenerateWebRtcStream";

const CAMERA_TYPE_PREFIX: &str = "sdm.devices.types.CAMERA";

#[derive(Debug, Deserialize, Serialize, new)]
pub struct ExecuteCommandRequestBody {
    command: String,
    params: GenerateWebRtcStreamParams,
}

impl ExecuteCommandRequestBody {
    pub fn generate_web_rtc_stream(offer_sdp: String) -> Self {
        Self::new(
            GENERATE_WEB_RTC_STREAM_COMMAND.to_owned(),
            GenerateWebRtcStreamParams::new(offer_sdp),
        )
    }
}

#[derive(Debug, Deserialize, Serialize, new)]
#[serde(rename_all = "camelCase")]
pub struct GenerateWebRtcStreamParams {
    offer_sdp: String,
}

#[derive(Debug, Deserialize, Serialize, new)]
pub struct ExecuteCommandResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    results: Option<GenerateWebRtcStreamResults>,
}

impl ExecuteCommandResponseBody {
    /// Non-success statuses fail with the remote error message when the
    /// body carries one; a success body without `results` is a
    /// `MissingAnswer` (the spec treats it like a missing answer field).
    pub fn parse(
        status: StatusCode,
        text: &str,
    ) -> Result<GenerateWebRtcStreamResults, StreamError> {
        if !status.is_success() {
            return Err(StreamError::Signaling {
                status,
                message: error_message(text),
            });
        }
        let body: Self = serde_json::from_str(text).map_err(|err| StreamError::Signaling {
            status,
            message: format!("undecodable response body: {err}"),
        })?;
        body.results.ok_or(StreamError::MissingAnswer)
    }
}

#[derive(Debug, Deserialize, Serialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct GenerateWebRtcStreamResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    answer_sdp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[get = "pub"]
    media_session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[get = "pub"]
    expires_at: Option<String>,
}

impl GenerateWebRtcStreamResults {
    pub fn into_answer_sdp(self) -> Option<String> {
        self.answer_sdp
    }
}

#[derive(Debug, Deserialize, Serialize, Getters, new)]
pub struct Device {
    #[get = "pub"]
    name: String,
    #[serde(rename = "type")]
    #[get = "pub"]
    device_type: String,
}

impl Device {
    pub fn is_camera(&self) -> bool {
        self.device_type.contains(CAMERA_TYPE_PREFIX)
    }
}

#[derive(Debug, Deserialize, Serialize, new)]
pub struct ListDevicesResponseBody {
    #[serde(default)]
    devices: Vec<Device>,
}

impl ListDevicesResponseBody {
    pub fn parse(status: StatusCode, text: &str) -> Result<Vec<Device>, StreamError> {
        if !status.is_success() {
            return Err(StreamError::Signaling {
                status,
                message: error_message(text),
            });
        }
        let body: Self = serde_json::from_str(text).map_err(|err| StreamError::Signaling {
            status,
            message: format!("undecodable response body: {err}"),
        })?;
        Ok(body.devices)
    }
}

#[derive(Debug, Deserialize, Serialize, new)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize, Serialize, new)]
struct ErrorDetail {
    message: String,
}

fn error_message(text: &str) -> String {
    serde_json::from_str::<ErrorBody>(text)
        .map(|body| body.error.message)
        .unwrap_or_else(|_| text.to_owned())
}
