/// The per-peer connection state machine (§4.9): `INIT → READY → DONE`.
/// A [`crate::Client`]/transport pairing starts `Init`, becomes `Ready`
/// once a transport is attached, and moves to `Done` once closed by
/// either the caller or the transport itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    Init,
    Ready,
    Done,
}

impl PeerState {
    pub fn is_ready(self) -> bool {
        matches!(self, PeerState::Ready)
    }
}
