use tokio::{select, sync::oneshot};
use tracing::{debug, trace};
use webrtc::{
    api::{
        interceptor_registry::register_default_interceptors, media_engine::MediaEngine, APIBuilder,
    },
    ice_transport::ice_server::RTCIceServer,
    peer_connection::{
        configuration::RTCConfiguration, peer_connection_state::RTCPeerConnectionState,
        sdp::session_description::RTCSessionDescription, RTCPeerConnection,
    },
    rtp_transceiver::{
        rtp_codec::RTPCodecType, rtp_transceiver_direction::RTCRtpTransceiverDirection,
        RTCRtpTransceiverInit,
    },
};

use crate::{error::StreamError, sdp};

use super::track::InboundTrack;

fn create_default_config() -> RTCConfiguration {
    RTCConfiguration {
        ice_servers: vec![RTCIceServer {
            urls: vec!["stun:stun.l.google.com:19302".to_owned()],
            ..Default::default()
        }],
        ..Default::default()
    }
}

async fn create_peer_connection(config: RTCConfiguration) -> Result<RTCPeerConnection, StreamError> {
    let mut media_engine = MediaEngine::default();
    media_engine.register_default_codecs()?;
    let registry = register_default_interceptors(Default::default(), &mut media_engine)?;
    Ok(APIBuilder::new()
        .with_media_engine(media_engine)
        .with_interceptor_registry(registry)
        .build()
        .new_peer_connection(config)
        .await?)
}

fn recvonly() -> RTCRtpTransceiverInit {
    RTCRtpTransceiverInit {
        direction: RTCRtpTransceiverDirection::Recvonly,
        send_encodings: vec![],
    }
}

/// The single mutable session object. Created once, exclusively owned by
/// the run, never accessed concurrently.
pub struct PeerConnection {
    rtc: Option<RTCPeerConnection>,
    state_failed_rx: Option<oneshot::Receiver<()>>,
    track_rx: Option<oneshot::Receiver<InboundTrack>>,
}

impl Drop for PeerConnection {
    fn drop(&mut self) {
        trace!("drop connection");
        let rtc = self.rtc.take().unwrap();
        let drop = async move {
            // NOTE: If the connection was established, it will not be disconnected by drop,
            //       so close it explicitly.
            let _ = rtc.close().await;
            trace!("connection closed");
        };
        if let Ok(rt) = tokio::runtime::Handle::try_current() {
            rt.spawn(drop);
        } else {
            tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap()
                .block_on(drop);
        }
    }
}

impl PeerConnection {
    pub async fn new() -> Result<Self, StreamError> {
        Self::with_config(create_default_config()).await
    }

    pub async fn with_config(config: RTCConfiguration) -> Result<Self, StreamError> {
        let rtc = create_peer_connection(config).await?;

        let (state_failed_tx, state_failed_rx) = oneshot::channel();
        let mut state_failed_tx = Some(state_failed_tx);
        rtc.on_peer_connection_state_change(Box::new(move |state| {
            debug!("on_peer_connection_state_change {}", state);
            if state == RTCPeerConnectionState::Failed {
                if let Some(tx) = state_failed_tx.take() {
                    let _ = tx.send(());
                }
            }
            Box::pin(async {})
        }));

        let (track_tx, track_rx) = oneshot::channel();
        let mut track_tx = Some(track_tx);
        rtc.on_track(Box::new(move |track, _receiver, _transceiver| {
            // Single-shot delivery: only the first track is forwarded.
            match track_tx.take() {
                Some(tx) => {
                    let _ = tx.send(InboundTrack::new(track));
                }
                None => trace!("ignoring additional track: {}", track.kind()),
            }
            Box::pin(async {})
        }));

        Ok(Self {
            rtc: Some(rtc),
            state_failed_rx: Some(state_failed_rx),
            track_rx: Some(track_rx),
        })
    }

    fn rtc(&self) -> &RTCPeerConnection {
        self.rtc.as_ref().unwrap()
    }

    /// Builds the local offer: recv-only audio and video transceivers, ICE
    /// gathering run to completion, the offer committed as the local
    /// description (required before it is valid to send), and the committed
    /// SDP patched to guarantee a data-channel section.
    pub async fn build_offer(&mut self) -> Result<String, StreamError> {
        self.rtc()
            .add_transceiver_from_kind(RTPCodecType::Audio, Some(recvonly()))
            .await?;
        self.rtc()
            .add_transceiver_from_kind(RTPCodecType::Video, Some(recvonly()))
            .await?;

        let offer = self.rtc().create_offer(None).await?;

        let mut gather_complete = self.rtc().gathering_complete_promise().await;
        self.rtc().set_local_description(offer).await?;
        let _ = gather_complete.recv().await;

        let local_desc = self
            .rtc()
            .local_description()
            .await
            .ok_or_else(|| webrtc::Error::new("failed to get local description".to_owned()))?;
        sdp::ensure_application_section(&local_desc.sdp)
    }

    pub async fn apply_answer(&self, answer_sdp: &str) -> Result<(), StreamError> {
        let answer_desc = RTCSessionDescription::answer(answer_sdp.to_owned())?;
        self.rtc().set_remote_description(answer_desc).await?;
        Ok(())
    }

    pub async fn local_description(&self) -> Option<RTCSessionDescription> {
        self.rtc().local_description().await
    }

    pub async fn remote_description(&self) -> Option<RTCSessionDescription> {
        self.rtc().remote_description().await
    }

    /// Resolves when the first inbound track arrives, or fails if the peer
    /// connection reaches the `Failed` state first.
    pub async fn wait_for_track(&mut self) -> Result<InboundTrack, StreamError> {
        let track_task = self.track_rx.take().unwrap();
        let failed_task = self.state_failed_rx.take().unwrap();
        select! {
            track = track_task => track.map_err(|_| {
                webrtc::Error::new("connection closed before a track arrived".to_owned()).into()
            }),
            _ = failed_task => {
                Err(webrtc::Error::new("RTCPeerConnection failed".to_owned()).into())
            }
        }
    }
}
