#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! FIX Acceptor - Broker Session Server
//!
//! Terminates FIX 4.2 sessions from trading clients, validates inbound
//! order messages, keeps the authoritative order and execution state, and
//! emits execution reports back to the owning session. Administrative
//! fills, cancels and rejects arrive through an axum HTTP API and are
//! bridged to the correct client session with proper sequencing.
//!
//! # Data Flow
//!
//! ```text
//! FIX client ──► acceptor ──► session ──► codec ──► engine ──► store
//!                                ▲                               │
//!                                └── dispatcher ◄── admin HTTP ──┘
//! ```
//!
//! - `fix`: wire codec, tag constants, the dynamic message view
//! - `domain`: order/execution entities and the state machine transitions
//! - `store`: in-memory order authority shared by sessions and admin
//! - `engine`: client-path event application (new/cancel/replace)
//! - `session`: per-connection receive loop, writer task, heartbeats
//! - `dispatch`: administrative execution bridge to owning sessions
//! - `acceptor`: TCP listener and session fan-out
//! - `admin`: axum REST surface over the dispatcher

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod acceptor;
pub mod admin;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod engine;
pub mod fix;
pub mod session;
pub mod store;
pub mod telemetry;

pub use acceptor::{Acceptor, AcceptorError};
pub use admin::{AppState, create_router};
pub use config::AcceptorConfig;
pub use dispatch::{DispatchError, ExecutionDispatcher};
pub use engine::{CancelOutcome, OrderEngine};
pub use session::{SessionContext, SessionRegistry};
pub use store::{OrderStore, StoreError};
