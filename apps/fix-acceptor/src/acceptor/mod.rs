//! TCP listener and session fan-out.
//!
//! Accepts client connections, enforces the global session cap, and hands
//! each socket to a session driver task. On shutdown the listener stops
//! accepting, live sessions are asked to log out, and whatever remains
//! after the grace period is cancelled outright.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::session::{SessionContext, run_session};

/// Errors from the acceptor.
#[derive(Debug, thiserror::Error)]
pub enum AcceptorError {
    /// The listen socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address we tried to bind.
        addr: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// FIX listener bound and ready to accept.
pub struct Acceptor {
    listener: TcpListener,
    ctx: SessionContext,
    cancel: CancellationToken,
}

impl Acceptor {
    /// Bind the configured listen address.
    ///
    /// # Errors
    ///
    /// Returns `AcceptorError::Bind` if the socket cannot be bound.
    pub async fn bind(ctx: SessionContext, cancel: CancellationToken) -> Result<Self, AcceptorError> {
        let addr = ctx.config.listen_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| AcceptorError::Bind {
                addr: addr.clone(),
                source,
            })?;
        tracing::info!(%addr, comp_id = %ctx.config.server_comp_id, "FIX acceptor listening");
        Ok(Self {
            listener,
            ctx,
            cancel,
        })
    }

    /// The actual bound address (useful when the port was 0).
    ///
    /// # Errors
    ///
    /// Propagates the socket's local-address lookup failure.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until shutdown, then drain sessions.
    pub async fn run(self) {
        // Deliberately not a child of the shutdown token: sessions get a
        // Logout and a grace period before they are cancelled.
        let sessions_cancel = CancellationToken::new();
        let active = Arc::new(AtomicUsize::new(0));
        let mut next_id: u64 = 0;

        loop {
            let accepted = tokio::select! {
                () = self.cancel.cancelled() => break,
                accepted = self.listener.accept() => accepted,
            };

            let (stream, peer) = match accepted {
                Ok(conn) => conn,
                Err(err) => {
                    tracing::warn!(error = %err, "accept failed");
                    continue;
                }
            };

            let cap = self.ctx.config.max_sessions;
            if cap > 0 && active.load(Ordering::Acquire) >= cap {
                tracing::warn!(%peer, cap, "session cap reached, refusing connection");
                drop(stream);
                continue;
            }

            next_id += 1;
            let id = next_id;
            let ctx = self.ctx.clone();
            let session_cancel = sessions_cancel.child_token();
            let active = Arc::clone(&active);
            active.fetch_add(1, Ordering::AcqRel);

            tokio::spawn(async move {
                run_session(ctx, stream, peer, id, session_cancel).await;
                active.fetch_sub(1, Ordering::AcqRel);
            });
        }

        // No new connections past this point; give live sessions a chance
        // to log out before cutting them off.
        tracing::info!(
            live = active.load(Ordering::Acquire),
            grace_secs = self.ctx.config.shutdown_grace.as_secs(),
            "acceptor draining sessions"
        );
        self.ctx.registry.logout_all("Server shutting down");

        let deadline = tokio::time::Instant::now() + self.ctx.config.shutdown_grace;
        while active.load(Ordering::Acquire) > 0 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        sessions_cancel.cancel();
        while active.load(Ordering::Acquire) > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tracing::info!("acceptor stopped");
    }
}
