use std::sync::Arc;

use webrtc::{rtp_transceiver::rtp_codec::RTPCodecType, track::track_remote::TrackRemote};

/// Handle for the first inbound media track, delivered once per session.
/// Media consumption happens downstream; this only exposes what a consumer
/// needs to take over.
pub struct InboundTrack {
    rtc: Arc<TrackRemote>,
}

impl InboundTrack {
    pub(super) fn new(rtc: Arc<TrackRemote>) -> Self {
        Self { rtc }
    }

    pub fn kind(&self) -> RTPCodecType {
        self.rtc.kind()
    }

    pub fn mime_type(&self) -> String {
        self.rtc.codec().capability.mime_type
    }

    pub fn ssrc(&self) -> u32 {
        self.rtc.ssrc()
    }

    pub fn into_inner(self) -> Arc<TrackRemote> {
        self.rtc
    }
}
