use std::sync::Mutex;

use async_trait::async_trait;
use http::StatusCode;
use webrtc::{
    api::{
        interceptor_registry::register_default_interceptors, media_engine::MediaEngine, APIBuilder,
    },
    peer_connection::{
        configuration::RTCConfiguration, sdp::session_description::RTCSessionDescription,
    },
};

use nest_webrtc::{
    connection::PeerConnection,
    error::StreamError,
    session::{CameraSession, SessionState},
    signaling::SignalingExchange,
};

// No ICE servers: host candidates only, so gathering completes offline.
async fn test_connection() -> PeerConnection {
    PeerConnection::with_config(RTCConfiguration::default())
        .await
        .unwrap()
}

/// Answers the audio/video sections of an offer the way the remote device
/// would, standing in for the camera.
async fn answer_offer(offer_sdp: &str) -> String {
    let mut media_engine = MediaEngine::default();
    media_engine.register_default_codecs().unwrap();
    let registry = register_default_interceptors(Default::default(), &mut media_engine).unwrap();
    let pc = APIBuilder::new()
        .with_media_engine(media_engine)
        .with_interceptor_registry(registry)
        .build()
        .new_peer_connection(RTCConfiguration::default())
        .await
        .unwrap();

    let offer = RTCSessionDescription::offer(offer_sdp.to_owned()).unwrap();
    pc.set_remote_description(offer).await.unwrap();
    let answer = pc.create_answer(None).await.unwrap();
    let mut gather_complete = pc.gathering_complete_promise().await;
    pc.set_local_description(answer).await.unwrap();
    let _ = gather_complete.recv().await;
    let sdp = pc.local_description().await.unwrap().sdp;
    pc.close().await.unwrap();
    sdp
}

#[derive(Default)]
struct CameraStub {
    answered: Mutex<Vec<String>>,
}

#[async_trait]
impl SignalingExchange for CameraStub {
    async fn exchange(&self, offer_sdp: &str) -> Result<String, StreamError> {
        // The appended data-channel section is consumed by the real device;
        // the stub answers the audio/video sections it was offered.
        let base = match offer_sdp.find("m=application") {
            Some(index) => &offer_sdp[..index],
            None => offer_sdp,
        };
        let answer = answer_offer(base).await;
        self.answered.lock().unwrap().push(answer.clone());
        Ok(answer)
    }
}

struct RejectingSignaling;

#[async_trait]
impl SignalingExchange for RejectingSignaling {
    async fn exchange(&self, _offer_sdp: &str) -> Result<String, StreamError> {
        Err(StreamError::Signaling {
            status: StatusCode::BAD_REQUEST,
            message: "bad request".to_owned(),
        })
    }
}

#[tokio::test]
async fn build_offer_appends_the_data_channel_section() {
    let mut conn = test_connection().await;
    let offer = conn.build_offer().await.unwrap();

    assert!(offer.contains("m=application 9 DTLS/SCTP 5000\r\n"));
    assert!(offer.contains("a=sctp-port:5000\r\n"));
    assert!(offer.contains("a=max-message-size:262144\r\n"));

    // The patch is append-only; the committed local description is untouched.
    let committed = conn.local_description().await.unwrap().sdp;
    assert!(offer.starts_with(&committed));
    assert!(!committed.contains("m=application"));
}

#[tokio::test]
async fn negotiate_reaches_finalized_and_applies_the_answer_once() {
    let mut session = CameraSession::with_connection(test_connection().await);
    assert_eq!(session.state(), SessionState::Idle);

    let stub = CameraStub::default();
    session.negotiate(&stub).await.unwrap();
    assert_eq!(session.state(), SessionState::Finalized);

    let answered = stub.answered.lock().unwrap().clone();
    assert_eq!(answered.len(), 1);
    let remote = session.connection().remote_description().await.unwrap();
    assert_eq!(remote.sdp, answered[0]);
}

#[tokio::test]
async fn a_signaling_failure_is_terminal() {
    let mut session = CameraSession::with_connection(test_connection().await);

    let err = session.negotiate(&RejectingSignaling).await.unwrap_err();
    match err {
        StreamError::Signaling { status, message } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message, "bad request");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(session.state(), SessionState::Failed);
    // Remote-description application was never attempted.
    assert!(session.connection().remote_description().await.is_none());
}
