//! Shared per-session state and the serialized send path.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::fix::FramingError;
use crate::fix::message::FixMessage;

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Socket accepted, logon pending.
    Connected,
    /// Logon complete; order-bearing messages permitted.
    LoggedIn,
    /// Logout sent or received; draining.
    LoggingOut,
    /// Torn down.
    Closed,
}

/// Errors raised by the session layer.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Wire-level framing failure; the connection is dropped silently.
    #[error(transparent)]
    Framing(#[from] FramingError),

    /// Socket failure.
    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Outbound channel is gone; the session is already closing.
    #[error("session send path closed")]
    Closed,

    /// A second connection presented an already-active SenderCompID.
    #[error("SenderCompID {comp_id} already active")]
    DuplicateCompId {
        /// The conflicting comp id.
        comp_id: String,
    },
}

/// Handle to a live session, shared between the receive loop, the writer
/// task, the heartbeat watchdog and the execution dispatcher.
///
/// All outbound traffic funnels through [`SessionHandle::send`] into the
/// single writer task, which assigns MsgSeqNum and stamps SendingTime —
/// emission order is channel order, and sequence numbers are gap-free by
/// construction.
#[derive(Debug)]
pub struct SessionHandle {
    id: u64,
    peer: SocketAddr,
    outbound: mpsc::UnboundedSender<FixMessage>,
    sender_comp_id: RwLock<Option<String>>,
    state: RwLock<SessionState>,
    heartbeat_interval: RwLock<Duration>,
    last_inbound: RwLock<Instant>,
    cancel: CancellationToken,
}

impl SessionHandle {
    /// Create the handle for a freshly accepted connection.
    #[must_use]
    pub fn new(
        id: u64,
        peer: SocketAddr,
        outbound: mpsc::UnboundedSender<FixMessage>,
        default_heartbeat: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            peer,
            outbound,
            sender_comp_id: RwLock::new(None),
            state: RwLock::new(SessionState::Connected),
            heartbeat_interval: RwLock::new(default_heartbeat),
            last_inbound: RwLock::new(Instant::now()),
            cancel,
        }
    }

    /// Connection id, unique per acceptor lifetime.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Remote address.
    #[must_use]
    pub const fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Enqueue a message body for emission.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` once the writer has shut down.
    pub fn send(&self, msg: FixMessage) -> Result<(), SessionError> {
        self.outbound.send(msg).map_err(|_| SessionError::Closed)
    }

    /// The client's SenderCompID, once seen.
    #[must_use]
    pub fn sender_comp_id(&self) -> Option<String> {
        self.sender_comp_id.read().clone()
    }

    /// Record the client's SenderCompID.
    pub fn set_sender_comp_id(&self, comp_id: &str) {
        *self.sender_comp_id.write() = Some(comp_id.to_string());
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Move to a new lifecycle state.
    pub fn set_state(&self, state: SessionState) {
        *self.state.write() = state;
    }

    /// Negotiated heartbeat interval.
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        *self.heartbeat_interval.read()
    }

    /// Adopt the client-proposed heartbeat interval.
    pub fn set_heartbeat_interval(&self, interval: Duration) {
        *self.heartbeat_interval.write() = interval;
    }

    /// Record that inbound bytes arrived.
    pub fn touch_inbound(&self) {
        *self.last_inbound.write() = Instant::now();
    }

    /// Time since the last inbound byte.
    #[must_use]
    pub fn inbound_idle(&self) -> Duration {
        self.last_inbound.read().elapsed()
    }

    /// Token that tears the session down when cancelled.
    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_handle() -> (SessionHandle, mpsc::UnboundedReceiver<FixMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = SessionHandle::new(
            1,
            "127.0.0.1:4000".parse().unwrap(),
            tx,
            Duration::from_secs(30),
            CancellationToken::new(),
        );
        (handle, rx)
    }

    #[test]
    fn starts_connected_without_comp_id() {
        let (handle, _rx) = make_handle();
        assert_eq!(handle.state(), SessionState::Connected);
        assert_eq!(handle.sender_comp_id(), None);
        assert_eq!(handle.heartbeat_interval(), Duration::from_secs(30));
    }

    #[test]
    fn send_enqueues_to_writer_channel() {
        let (handle, mut rx) = make_handle();
        handle.send(FixMessage::new("0")).unwrap();

        let msg = rx.try_recv().unwrap();
        assert_eq!(msg.msg_type(), Some("0"));
    }

    #[test]
    fn send_after_writer_gone_errors() {
        let (handle, rx) = make_handle();
        drop(rx);
        assert!(matches!(
            handle.send(FixMessage::new("0")),
            Err(SessionError::Closed)
        ));
    }

    #[test]
    fn logon_updates_identity_and_interval() {
        let (handle, _rx) = make_handle();
        handle.set_sender_comp_id("TEST_CLIENT");
        handle.set_heartbeat_interval(Duration::from_secs(5));
        handle.set_state(SessionState::LoggedIn);

        assert_eq!(handle.sender_comp_id().as_deref(), Some("TEST_CLIENT"));
        assert_eq!(handle.heartbeat_interval(), Duration::from_secs(5));
        assert_eq!(handle.state(), SessionState::LoggedIn);
    }
}
