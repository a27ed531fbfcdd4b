mod peer_connection;
mod track;

pub use peer_connection::PeerConnection;
pub use track::InboundTrack;
