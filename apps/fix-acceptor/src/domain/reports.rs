//! Outbound report payloads produced by order state transitions.
//!
//! The state machine returns these typed payloads; the session layer stamps
//! the header fields (comp ids, sequence number, sending time) and puts
//! them on the wire.

use rust_decimal::Decimal;

use super::execution::ExecType;
use super::order::{Order, OrderStatus, Side};
use crate::fix::message::FixMessage;
use crate::fix::tags;

/// ExecutionReport (MsgType `8`) payload.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// ClOrdID echoed in tag 11.
    pub cl_ord_id: String,
    /// OrigClOrdID (tag 41) for cancel/replace reports.
    pub orig_cl_ord_id: Option<String>,
    /// Execution id (tag 17).
    pub exec_id: String,
    /// Execution kind (tag 150).
    pub exec_type: ExecType,
    /// Order status (tag 39).
    pub ord_status: OrderStatus,
    /// Symbol (tag 55).
    pub symbol: String,
    /// Side (tag 54), absent when a reject predates side parsing.
    pub side: Option<Side>,
    /// Order quantity (tag 38).
    pub order_qty: u64,
    /// Quantity of this fill (tag 32), fills only.
    pub last_qty: Option<u64>,
    /// Price of this fill (tag 31), fills only.
    pub last_px: Option<Decimal>,
    /// Cumulative filled quantity (tag 14).
    pub cum_qty: u64,
    /// Volume-weighted average price (tag 6).
    pub avg_px: Decimal,
    /// Open quantity (tag 151).
    pub leaves_qty: u64,
    /// Human diagnostic (tag 58).
    pub text: Option<String>,
}

impl ExecutionReport {
    /// Build a report reflecting the order's current state.
    ///
    /// LeavesQty reports zero once the order is terminal, even though the
    /// record keeps the audit remainder.
    #[must_use]
    pub fn from_order(order: &Order, exec_id: String, exec_type: ExecType) -> Self {
        let leaves_qty = if order.status().is_terminal() {
            0
        } else {
            order.remaining_quantity()
        };
        Self {
            cl_ord_id: order.cl_ord_id().to_string(),
            orig_cl_ord_id: order.orig_cl_ord_id().map(str::to_string),
            exec_id,
            exec_type,
            ord_status: order.status(),
            symbol: order.symbol().to_string(),
            side: Some(order.side()),
            order_qty: order.quantity(),
            last_qty: None,
            last_px: None,
            cum_qty: order.filled_quantity(),
            avg_px: order.avg_px(),
            leaves_qty,
            text: None,
        }
    }

    /// Build a Rejected report for a NewOrderSingle that created no order.
    #[must_use]
    pub fn rejected_new(
        cl_ord_id: String,
        symbol: String,
        side: Option<Side>,
        order_qty: u64,
        exec_id: String,
        text: String,
    ) -> Self {
        Self {
            cl_ord_id,
            orig_cl_ord_id: None,
            exec_id,
            exec_type: ExecType::Rejected,
            ord_status: OrderStatus::Rejected,
            symbol,
            side,
            order_qty,
            last_qty: None,
            last_px: None,
            cum_qty: 0,
            avg_px: Decimal::ZERO,
            leaves_qty: 0,
            text: Some(text),
        }
    }

    /// Attach the fill particulars (tags 32/31).
    #[must_use]
    pub fn with_fill(mut self, last_qty: u64, last_px: Decimal) -> Self {
        self.last_qty = Some(last_qty);
        self.last_px = Some(last_px);
        self
    }

    /// Override tag 11/41 (cancel reports echo the request's own ClOrdID).
    #[must_use]
    pub fn with_ids(mut self, cl_ord_id: String, orig_cl_ord_id: Option<String>) -> Self {
        self.cl_ord_id = cl_ord_id;
        self.orig_cl_ord_id = orig_cl_ord_id;
        self
    }

    /// Attach a diagnostic text (tag 58).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Render as a FIX message body.
    #[must_use]
    pub fn to_message(&self) -> FixMessage {
        let mut msg = FixMessage::new(tags::msg_type::EXECUTION_REPORT);
        msg.push(tags::TAG_CL_ORD_ID, self.cl_ord_id.clone());
        if let Some(orig) = &self.orig_cl_ord_id {
            msg.push(tags::TAG_ORIG_CL_ORD_ID, orig.clone());
        }
        msg.push(tags::TAG_EXEC_ID, self.exec_id.clone());
        msg.push(tags::TAG_EXEC_TYPE, self.exec_type.to_fix());
        msg.push(tags::TAG_ORD_STATUS, self.ord_status.to_fix());
        msg.push(tags::TAG_SYMBOL, self.symbol.clone());
        if let Some(side) = self.side {
            msg.push(tags::TAG_SIDE, side.to_fix());
        }
        msg.push(tags::TAG_ORDER_QTY, self.order_qty.to_string());
        if let Some(last_qty) = self.last_qty {
            msg.push(tags::TAG_LAST_QTY, last_qty.to_string());
        }
        if let Some(last_px) = self.last_px {
            msg.push_decimal(tags::TAG_LAST_PX, last_px);
        }
        msg.push(tags::TAG_CUM_QTY, self.cum_qty.to_string());
        msg.push_decimal(tags::TAG_AVG_PX, self.avg_px);
        msg.push(tags::TAG_LEAVES_QTY, self.leaves_qty.to_string());
        if let Some(text) = &self.text {
            msg.push(tags::TAG_TEXT, text.clone());
        }
        msg
    }
}

/// CxlRejReason values (tag 434).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CxlRejReason {
    /// Too late to cancel (`434=0`).
    TooLate,
    /// Unknown order (`434=1`).
    UnknownOrder,
}

impl CxlRejReason {
    /// The FIX wire value.
    #[must_use]
    pub const fn to_fix(self) -> &'static str {
        match self {
            Self::TooLate => tags::cxl_rej_reason::TOO_LATE,
            Self::UnknownOrder => tags::cxl_rej_reason::UNKNOWN_ORDER,
        }
    }
}

/// OrderCancelReject (MsgType `9`) payload.
#[derive(Debug, Clone)]
pub struct OrderCancelReject {
    /// ClOrdID of the failed cancel/replace request (tag 11).
    pub cl_ord_id: String,
    /// OrigClOrdID the request pointed at (tag 41).
    pub orig_cl_ord_id: String,
    /// Status of the order, `REJECTED` when unknown (tag 39).
    pub ord_status: OrderStatus,
    /// Reject reason (tag 434).
    pub reason: CxlRejReason,
    /// Human diagnostic (tag 58).
    pub text: String,
}

impl OrderCancelReject {
    /// Reject because the referenced order does not exist.
    #[must_use]
    pub fn unknown_order(cl_ord_id: String, orig_cl_ord_id: String) -> Self {
        Self {
            cl_ord_id,
            orig_cl_ord_id,
            ord_status: OrderStatus::Rejected,
            reason: CxlRejReason::UnknownOrder,
            text: "Order not found".to_string(),
        }
    }

    /// Reject because the order is already terminal.
    #[must_use]
    pub fn too_late(cl_ord_id: String, orig_cl_ord_id: String, status: OrderStatus) -> Self {
        Self {
            cl_ord_id,
            orig_cl_ord_id,
            ord_status: status,
            reason: CxlRejReason::TooLate,
            text: format!("Order already {status}"),
        }
    }

    /// Render as a FIX message body.
    #[must_use]
    pub fn to_message(&self) -> FixMessage {
        let mut msg = FixMessage::new(tags::msg_type::ORDER_CANCEL_REJECT);
        msg.push(tags::TAG_CL_ORD_ID, self.cl_ord_id.clone());
        msg.push(tags::TAG_ORIG_CL_ORD_ID, self.orig_cl_ord_id.clone());
        msg.push(tags::TAG_ORD_STATUS, self.ord_status.to_fix());
        msg.push(tags::TAG_CXL_REJ_REASON, self.reason.to_fix());
        msg.push(tags::TAG_TEXT, self.text.clone());
        msg
    }
}
