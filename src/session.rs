use tracing::{debug, info};

use crate::{
    connection::{InboundTrack, PeerConnection},
    error::StreamError,
    signaling::SignalingExchange,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionState {
    Idle,
    OfferBuilt,
    OfferSent,
    AnswerReceived,
    Finalized,
    Failed,
}

/// Owns the peer connection and the handshake state, passed explicitly
/// through the stages rather than living as ambient state.
pub struct CameraSession {
    conn: PeerConnection,
    state: SessionState,
}

impl CameraSession {
    pub async fn new() -> Result<Self, StreamError> {
        Ok(Self::with_connection(PeerConnection::new().await?))
    }

    pub fn with_connection(conn: PeerConnection) -> Self {
        Self {
            conn,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn connection(&self) -> &PeerConnection {
        &self.conn
    }

    /// Drives the offer/answer handshake to completion. Every failure is
    /// terminal: the state parks at `Failed` and nothing is retried. In
    /// particular, a failed exchange never reaches remote-description
    /// application.
    pub async fn negotiate(
        &mut self,
        signaling: &impl SignalingExchange,
    ) -> Result<(), StreamError> {
        match self.try_negotiate(signaling).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.state = SessionState::Failed;
                Err(err)
            }
        }
    }

    async fn try_negotiate(
        &mut self,
        signaling: &impl SignalingExchange,
    ) -> Result<(), StreamError> {
        let offer_sdp = self.conn.build_offer().await?;
        self.state = SessionState::OfferBuilt;
        debug!("offer SDP:\n{}", offer_sdp);

        self.state = SessionState::OfferSent;
        let answer_sdp = signaling.exchange(&offer_sdp).await?;
        self.state = SessionState::AnswerReceived;
        debug!("answer SDP:\n{}", answer_sdp);

        self.conn.apply_answer(&answer_sdp).await?;
        self.state = SessionState::Finalized;
        info!("remote description set");
        Ok(())
    }

    pub async fn wait_for_track(&mut self) -> Result<InboundTrack, StreamError> {
        self.conn.wait_for_track().await
    }
}
