//! Per-connection session driver.
//!
//! Each accepted socket gets three cooperating tasks: the receive loop
//! (this module's entry point, feeding the incremental decoder and
//! dispatching messages), a single writer task that owns the write half and
//! assigns outbound sequence numbers, and a watchdog that emits heartbeats
//! and enforces the inbound idle timeout.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::handle::{SessionError, SessionHandle, SessionState};
use super::registry::SessionRegistry;
use crate::config::AcceptorConfig;
use crate::domain::{ExecutionReport, NewOrderCommand, OrdType, OrderError, Side, TimeInForce};
use crate::engine::{CancelOutcome, OrderEngine};
use crate::fix::message::FixMessage;
use crate::fix::tags::{self, msg_type};
use crate::fix::time::sending_time_now;
use crate::fix::{FixDecoder, encode};

/// Shared dependencies handed to every session.
#[derive(Clone)]
pub struct SessionContext {
    /// Acceptor configuration.
    pub config: Arc<AcceptorConfig>,
    /// Order state machine over the shared store.
    pub engine: OrderEngine,
    /// Live session table.
    pub registry: Arc<SessionRegistry>,
}

/// What to do with the connection after handling a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Continue,
    Close,
}

/// Drive one connection to completion.
///
/// Returns once the peer disconnects, a session or framing error tears the
/// connection down, or `cancel` fires.
pub async fn run_session(
    ctx: SessionContext,
    stream: TcpStream,
    peer: SocketAddr,
    id: u64,
    cancel: CancellationToken,
) {
    let (read_half, write_half) = stream.into_split();
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = Arc::new(SessionHandle::new(
        id,
        peer,
        tx,
        ctx.config.default_heartbeat,
        cancel,
    ));
    let last_outbound = Arc::new(RwLock::new(Instant::now()));

    tracing::info!(session = id, %peer, "session connected");

    let writer = tokio::spawn(write_loop(
        rx,
        write_half,
        Arc::clone(&handle),
        ctx.config.server_comp_id.clone(),
        Arc::clone(&last_outbound),
    ));
    let watchdog = tokio::spawn(watchdog_loop(
        Arc::clone(&handle),
        Arc::clone(&last_outbound),
        ctx.config.idle_timeout_multiplier,
    ));

    if let Err(err) = receive_loop(&ctx, &handle, read_half).await {
        match &err {
            SessionError::Framing(_) => {}
            other => tracing::warn!(session = id, error = %other, "session error"),
        }
    }

    handle.set_state(SessionState::Closed);
    handle.cancel_token().cancel();
    if let Some(comp_id) = handle.sender_comp_id() {
        ctx.registry.unregister(&comp_id, &handle);
    }
    let _ = writer.await;
    let _ = watchdog.await;
    tracing::info!(session = id, %peer, "session closed");
}

/// Read socket bytes, decode frames and dispatch messages.
async fn receive_loop(
    ctx: &SessionContext,
    handle: &Arc<SessionHandle>,
    mut reader: OwnedReadHalf,
) -> Result<(), SessionError> {
    let mut decoder = FixDecoder::new();
    let mut buf = vec![0u8; 4096];
    let mut expected_inbound: u64 = 1;

    loop {
        let n = tokio::select! {
            () = handle.cancel_token().cancelled() => return Ok(()),
            read = reader.read(&mut buf) => read?,
        };
        if n == 0 {
            tracing::debug!(session = handle.id(), "peer closed connection");
            return Ok(());
        }

        handle.touch_inbound();
        decoder.feed(&buf[..n]);

        loop {
            match decoder.next_message() {
                Ok(Some(msg)) => {
                    if handle_message(ctx, handle, &mut expected_inbound, &msg)
                        == Disposition::Close
                    {
                        return Ok(());
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    // Framing errors drop the connection without a FIX
                    // response; keep the raw bytes for the audit trail.
                    tracing::error!(
                        session = handle.id(),
                        error = %err,
                        raw = %String::from_utf8_lossy(decoder.buffered()).replace('\x01', "|"),
                        "framing error, dropping connection"
                    );
                    return Err(err.into());
                }
            }
        }
    }
}

/// Handle one inbound message. Sequence discipline first, then per-type
/// routing gated on session state.
fn handle_message(
    ctx: &SessionContext,
    handle: &Arc<SessionHandle>,
    expected_inbound: &mut u64,
    msg: &FixMessage,
) -> Disposition {
    tracing::debug!(
        session = handle.id(),
        msg = %msg.to_wire_string(),
        "RECV"
    );

    // Remember the peer identity as soon as any message names it, so even
    // pre-logon Logouts carry a proper TargetCompID.
    if handle.sender_comp_id().is_none() {
        if let Some(comp_id) = msg.get(tags::TAG_SENDER_COMP_ID) {
            handle.set_sender_comp_id(comp_id);
        }
    }

    if check_sequence(handle, expected_inbound, msg) == Disposition::Close {
        return Disposition::Close;
    }

    let Some(msg_type) = msg.msg_type() else {
        tracing::warn!(session = handle.id(), "message without MsgType, ignoring");
        return Disposition::Continue;
    };

    match handle.state() {
        SessionState::Connected => {
            if msg_type == msg_type::LOGON {
                handle_logon(ctx, handle, msg)
            } else {
                send_logout(handle, "Expected Logon");
                Disposition::Close
            }
        }
        SessionState::LoggedIn => handle_app_message(ctx, handle, msg_type, msg),
        SessionState::LoggingOut | SessionState::Closed => Disposition::Continue,
    }
}

/// Enforce per-session MsgSeqNum discipline.
fn check_sequence(
    handle: &SessionHandle,
    expected_inbound: &mut u64,
    msg: &FixMessage,
) -> Disposition {
    let Some(received) = msg.get_u64(tags::TAG_MSG_SEQ_NUM) else {
        tracing::warn!(session = handle.id(), "missing MsgSeqNum, ignoring");
        return Disposition::Continue;
    };

    if received == *expected_inbound {
        *expected_inbound += 1;
        return Disposition::Continue;
    }

    if received > *expected_inbound {
        // Gap detected. Resend-request recovery is out of scope; adopt the
        // peer's number and keep the session alive.
        tracing::warn!(
            session = handle.id(),
            expected = *expected_inbound,
            received,
            "inbound sequence gap"
        );
        *expected_inbound = received + 1;
        return Disposition::Continue;
    }

    let poss_dup = msg
        .get(tags::TAG_POSS_DUP_FLAG)
        .is_some_and(|v| v.eq_ignore_ascii_case("Y"));
    if poss_dup {
        tracing::debug!(session = handle.id(), received, "ignoring PossDup replay");
        return Disposition::Continue;
    }

    tracing::warn!(
        session = handle.id(),
        expected = *expected_inbound,
        received,
        "MsgSeqNum too low, disconnecting"
    );
    send_logout(handle, "MsgSeqNum too low");
    Disposition::Close
}

/// Logon handshake: validate, claim the comp id, echo the Logon.
fn handle_logon(ctx: &SessionContext, handle: &Arc<SessionHandle>, msg: &FixMessage) -> Disposition {
    let Some(comp_id) = msg.get(tags::TAG_SENDER_COMP_ID).map(str::to_string) else {
        send_logout(handle, "SenderCompID missing");
        return Disposition::Close;
    };

    if msg.get(tags::TAG_TARGET_COMP_ID) != Some(ctx.config.server_comp_id.as_str()) {
        send_logout(handle, "TargetCompID mismatch");
        return Disposition::Close;
    }
    if msg.get(tags::TAG_ENCRYPT_METHOD) != Some("0") {
        send_logout(handle, "Unsupported EncryptMethod");
        return Disposition::Close;
    }

    let heartbeat_s = msg
        .get_u64(tags::TAG_HEART_BT_INT)
        .filter(|s| *s > 0)
        .unwrap_or(ctx.config.default_heartbeat.as_secs());
    handle.set_heartbeat_interval(Duration::from_secs(heartbeat_s));

    if let Err(err) = ctx.registry.register(&comp_id, Arc::clone(handle)) {
        tracing::warn!(session = handle.id(), %comp_id, error = %err, "logon refused");
        send_logout(handle, "Session already active");
        return Disposition::Close;
    }

    handle.set_state(SessionState::LoggedIn);

    let mut logon = FixMessage::new(msg_type::LOGON);
    logon.push(tags::TAG_ENCRYPT_METHOD, "0");
    logon.push(tags::TAG_HEART_BT_INT, heartbeat_s.to_string());
    let _ = handle.send(logon);

    tracing::info!(
        session = handle.id(),
        %comp_id,
        heartbeat_s,
        "session logged in"
    );
    Disposition::Continue
}

/// Route an application message on a logged-in session.
fn handle_app_message(
    ctx: &SessionContext,
    handle: &Arc<SessionHandle>,
    msg_type: &str,
    msg: &FixMessage,
) -> Disposition {
    match msg_type {
        msg_type::HEARTBEAT => Disposition::Continue,
        msg_type::TEST_REQUEST => {
            let _ = handle.send(FixMessage::new(msg_type::HEARTBEAT));
            Disposition::Continue
        }
        msg_type::LOGOUT => {
            handle.set_state(SessionState::LoggingOut);
            let _ = handle.send(FixMessage::new(msg_type::LOGOUT));
            tracing::info!(session = handle.id(), "logout received");
            Disposition::Close
        }
        msg_type::NEW_ORDER_SINGLE => {
            handle_new_order(ctx, handle, msg);
            Disposition::Continue
        }
        msg_type::ORDER_CANCEL_REQUEST => {
            let orig = msg.get(tags::TAG_ORIG_CL_ORD_ID).unwrap_or_default();
            let cl_ord_id = msg.get(tags::TAG_CL_ORD_ID).unwrap_or_default();
            let outcome = ctx.engine.client_cancel(orig, cl_ord_id);
            send_outcome(handle, outcome);
            Disposition::Continue
        }
        msg_type::ORDER_CANCEL_REPLACE_REQUEST => {
            let orig = msg.get(tags::TAG_ORIG_CL_ORD_ID).unwrap_or_default();
            let cl_ord_id = msg.get(tags::TAG_CL_ORD_ID).unwrap_or_default();
            let new_qty = msg.get_u64(tags::TAG_ORDER_QTY);
            let new_price = msg.get_decimal(tags::TAG_PRICE);
            let outcome = ctx.engine.client_replace(orig, cl_ord_id, new_qty, new_price);
            send_outcome(handle, outcome);
            Disposition::Continue
        }
        msg_type::LOGON => {
            tracing::warn!(session = handle.id(), "Logon on live session, ignoring");
            Disposition::Continue
        }
        other => {
            tracing::warn!(session = handle.id(), msg_type = other, "unsupported MsgType, ignoring");
            Disposition::Continue
        }
    }
}

/// E1: parse and submit a NewOrderSingle, or synthesize the Rejected report
/// when the message cannot be parsed into a command.
fn handle_new_order(ctx: &SessionContext, handle: &Arc<SessionHandle>, msg: &FixMessage) {
    let sender = handle.sender_comp_id().unwrap_or_default();
    let report = match parse_new_order(msg, &sender) {
        Ok(cmd) => ctx.engine.submit_order(cmd),
        Err(err) => {
            tracing::warn!(session = handle.id(), error = %err, "unparsable NewOrderSingle");
            ExecutionReport::rejected_new(
                msg.get(tags::TAG_CL_ORD_ID).unwrap_or_default().to_string(),
                msg.get(tags::TAG_SYMBOL).unwrap_or_default().to_string(),
                msg.get(tags::TAG_SIDE).and_then(Side::from_fix),
                msg.get_u64(tags::TAG_ORDER_QTY).unwrap_or(0),
                ctx.engine.store().next_exec_id(),
                err.to_string(),
            )
        }
    };
    let _ = handle.send(report.to_message());
}

/// Extract a typed order command from the dynamic tag view.
fn parse_new_order(msg: &FixMessage, sender_comp_id: &str) -> Result<NewOrderCommand, OrderError> {
    let missing = |field: &str| OrderError::InvalidParameters {
        field: field.to_string(),
        message: format!("{field} missing or malformed"),
    };

    let side = msg
        .get(tags::TAG_SIDE)
        .and_then(Side::from_fix)
        .ok_or_else(|| missing("side"))?;
    let order_type = msg
        .get(tags::TAG_ORD_TYPE)
        .and_then(OrdType::from_fix)
        .ok_or_else(|| missing("ord_type"))?;
    let quantity = msg.get_u64(tags::TAG_ORDER_QTY).ok_or_else(|| missing("quantity"))?;
    let limit_price = match msg.get(tags::TAG_PRICE) {
        None => None,
        Some(raw) => Some(raw.parse().map_err(|_| missing("price"))?),
    };
    let time_in_force = match msg.get(tags::TAG_TIME_IN_FORCE) {
        None => TimeInForce::default(),
        Some(raw) => TimeInForce::from_fix(raw).ok_or_else(|| missing("time_in_force"))?,
    };

    Ok(NewOrderCommand {
        cl_ord_id: msg.get(tags::TAG_CL_ORD_ID).unwrap_or_default().to_string(),
        symbol: msg.get(tags::TAG_SYMBOL).unwrap_or_default().to_string(),
        side,
        order_type,
        quantity,
        limit_price,
        time_in_force,
        sender_comp_id: sender_comp_id.to_string(),
    })
}

/// Emit a cancel/replace outcome on the session.
fn send_outcome(handle: &SessionHandle, outcome: CancelOutcome) {
    let msg = match outcome {
        CancelOutcome::Report(report) => report.to_message(),
        CancelOutcome::Reject(reject) => reject.to_message(),
    };
    let _ = handle.send(msg);
}

/// Enqueue a Logout with a diagnostic text.
fn send_logout(handle: &SessionHandle, text: &str) {
    handle.set_state(SessionState::LoggingOut);
    let mut logout = FixMessage::new(msg_type::LOGOUT);
    logout.push(tags::TAG_TEXT, text);
    let _ = handle.send(logout);
}

/// Single writer task: stamps the header, assigns MsgSeqNum, writes bytes.
///
/// Being the only consumer of the outbound channel makes the sequence
/// strictly monotonic and gap-free, and keeps heartbeats from interleaving
/// mid-message with reports.
async fn write_loop(
    mut rx: mpsc::UnboundedReceiver<FixMessage>,
    mut writer: OwnedWriteHalf,
    handle: Arc<SessionHandle>,
    server_comp_id: String,
    last_outbound: Arc<RwLock<Instant>>,
) {
    let mut seq: u64 = 1;
    loop {
        tokio::select! {
            () = handle.cancel_token().cancelled() => {
                // Drain whatever is already queued (e.g. a final Logout),
                // then stop.
                while let Ok(msg) = rx.try_recv() {
                    if write_message(&mut writer, &handle, &server_comp_id, &mut seq, &last_outbound, msg)
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                break;
            }
            received = rx.recv() => {
                let Some(msg) = received else { break };
                if write_message(&mut writer, &handle, &server_comp_id, &mut seq, &last_outbound, msg)
                    .await
                    .is_err()
                {
                    handle.cancel_token().cancel();
                    break;
                }
            }
        }
    }
}

async fn write_message(
    writer: &mut OwnedWriteHalf,
    handle: &SessionHandle,
    server_comp_id: &str,
    seq: &mut u64,
    last_outbound: &RwLock<Instant>,
    msg: FixMessage,
) -> std::io::Result<()> {
    let target = handle
        .sender_comp_id()
        .unwrap_or_else(|| "UNKNOWN".to_string());
    let stamped = stamp_header(&msg, server_comp_id, &target, *seq);
    tracing::debug!(
        session = handle.id(),
        seq = *seq,
        msg = %stamped.to_wire_string(),
        "SEND"
    );
    writer.write_all(&encode(&stamped)).await?;
    *seq += 1;
    *last_outbound.write() = Instant::now();
    Ok(())
}

/// Prefix the standard header fields onto a message body.
fn stamp_header(msg: &FixMessage, sender: &str, target: &str, seq: u64) -> FixMessage {
    let mut out = FixMessage::new(msg.msg_type().unwrap_or_default());
    out.push(tags::TAG_MSG_SEQ_NUM, seq.to_string());
    out.push(tags::TAG_SENDER_COMP_ID, sender);
    out.push(tags::TAG_TARGET_COMP_ID, target);
    out.push(tags::TAG_SENDING_TIME, sending_time_now());
    for (tag, value) in msg.tags().iter().skip(1) {
        out.push(*tag, value.clone());
    }
    out
}

/// Heartbeat and idle watchdog.
///
/// Ticks once a second: emits a heartbeat when nothing else went out for a
/// full interval, and tears the session down when no inbound byte arrived
/// for `idle_multiplier × heartbeat_interval`.
async fn watchdog_loop(
    handle: Arc<SessionHandle>,
    last_outbound: Arc<RwLock<Instant>>,
    idle_multiplier: f64,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            () = handle.cancel_token().cancelled() => break,
            _ = interval.tick() => {
                let heartbeat = handle.heartbeat_interval();
                let idle_limit = heartbeat.mul_f64(idle_multiplier);

                if handle.inbound_idle() > idle_limit {
                    tracing::warn!(
                        session = handle.id(),
                        idle_secs = handle.inbound_idle().as_secs(),
                        limit_secs = idle_limit.as_secs(),
                        "inbound idle timeout, tearing session down"
                    );
                    handle.cancel_token().cancel();
                    break;
                }

                if handle.state() == SessionState::LoggedIn
                    && last_outbound.read().elapsed() >= heartbeat
                {
                    let _ = handle.send(FixMessage::new(msg_type::HEARTBEAT));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_header_orders_standard_fields() {
        let mut body = FixMessage::new(msg_type::EXECUTION_REPORT);
        body.push(tags::TAG_CL_ORD_ID, "ORD-1");

        let stamped = stamp_header(&body, "BROKER", "TEST_CLIENT", 7);
        let tag_order: Vec<u32> = stamped.tags().iter().map(|(t, _)| *t).collect();
        assert_eq!(
            tag_order,
            vec![
                tags::TAG_MSG_TYPE,
                tags::TAG_MSG_SEQ_NUM,
                tags::TAG_SENDER_COMP_ID,
                tags::TAG_TARGET_COMP_ID,
                tags::TAG_SENDING_TIME,
                tags::TAG_CL_ORD_ID,
            ]
        );
        assert_eq!(stamped.get(tags::TAG_MSG_SEQ_NUM), Some("7"));
        assert_eq!(stamped.get(tags::TAG_SENDER_COMP_ID), Some("BROKER"));
        assert_eq!(stamped.get(tags::TAG_TARGET_COMP_ID), Some("TEST_CLIENT"));
    }

    #[test]
    fn parse_new_order_defaults_tif_to_day() {
        let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
        msg.push(tags::TAG_CL_ORD_ID, "ORD-1");
        msg.push(tags::TAG_SYMBOL, "AAPL");
        msg.push(tags::TAG_SIDE, "1");
        msg.push(tags::TAG_ORD_TYPE, "1");
        msg.push(tags::TAG_ORDER_QTY, "100");

        let cmd = parse_new_order(&msg, "TEST_CLIENT").unwrap();
        assert_eq!(cmd.time_in_force, TimeInForce::Day);
        assert_eq!(cmd.quantity, 100);
        assert_eq!(cmd.side, Side::Buy);
        assert_eq!(cmd.limit_price, None);
    }

    #[test]
    fn parse_new_order_requires_side() {
        let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
        msg.push(tags::TAG_CL_ORD_ID, "ORD-1");
        msg.push(tags::TAG_SYMBOL, "AAPL");
        msg.push(tags::TAG_ORD_TYPE, "1");
        msg.push(tags::TAG_ORDER_QTY, "100");

        assert!(parse_new_order(&msg, "TEST_CLIENT").is_err());
    }

    #[test]
    fn parse_new_order_rejects_malformed_price() {
        let mut msg = FixMessage::new(msg_type::NEW_ORDER_SINGLE);
        msg.push(tags::TAG_CL_ORD_ID, "ORD-1");
        msg.push(tags::TAG_SYMBOL, "AAPL");
        msg.push(tags::TAG_SIDE, "1");
        msg.push(tags::TAG_ORD_TYPE, "2");
        msg.push(tags::TAG_ORDER_QTY, "100");
        msg.push(tags::TAG_PRICE, "not-a-price");

        let err = parse_new_order(&msg, "TEST_CLIENT").unwrap_err();
        assert!(err.to_string().contains("price"));
    }
}
