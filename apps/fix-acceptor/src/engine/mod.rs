//! Client-path order state machine.
//!
//! Applies NewOrderSingle, OrderCancelRequest and OrderCancelReplaceRequest
//! events to the store and produces the outbound report payload for each.
//! Transitions commit under the order's own mutex; the caller emits the
//! returned payload through the owning session's serialized send path, so
//! reports reach the client in commit order.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::{
    ExecType, Execution, NewOrderCommand, Order, OrderCancelReject, OrderError, ExecutionReport,
};
use crate::store::OrderStore;

/// Outcome of a cancel or replace request: an ExecutionReport on success,
/// an OrderCancelReject otherwise.
#[derive(Debug, Clone)]
pub enum CancelOutcome {
    /// The transition happened.
    Report(ExecutionReport),
    /// The request was refused; no state changed.
    Reject(OrderCancelReject),
}

/// Order state machine over the shared store.
#[derive(Debug, Clone)]
pub struct OrderEngine {
    store: Arc<OrderStore>,
}

impl OrderEngine {
    /// Create an engine over the store.
    #[must_use]
    pub fn new(store: Arc<OrderStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<OrderStore> {
        &self.store
    }

    /// E1 — NewOrderSingle.
    ///
    /// Validation failure produces a Rejected report and stores nothing.
    /// Success stores the order and produces the New acknowledgement.
    #[must_use]
    pub fn submit_order(&self, cmd: NewOrderCommand) -> ExecutionReport {
        let cl_ord_id = cmd.cl_ord_id.clone();
        let symbol = cmd.symbol.clone();
        let side = Some(cmd.side);
        let order_qty = cmd.quantity;

        let order = match Order::new(cmd) {
            Ok(order) => order,
            Err(err) => return self.reject_submission(cl_ord_id, symbol, side, order_qty, &err),
        };

        let handle = match self.store.insert(order) {
            Ok(handle) => handle,
            Err(store_err) => {
                let err = OrderError::InvalidParameters {
                    field: "cl_ord_id".to_string(),
                    message: store_err.to_string(),
                };
                return self.reject_submission(cl_ord_id, symbol, side, order_qty, &err);
            }
        };

        let order = handle.lock();
        let exec_id = self.store.next_exec_id();
        self.store.record_execution(Execution::new(
            exec_id.clone(),
            order.cl_ord_id(),
            ExecType::New,
            0,
            Decimal::ZERO,
        ));
        tracing::info!(
            cl_ord_id = %order.cl_ord_id(),
            symbol = %order.symbol(),
            qty = order.quantity(),
            "order accepted"
        );
        ExecutionReport::from_order(&order, exec_id, ExecType::New)
    }

    /// E5 — OrderCancelRequest.
    ///
    /// The report echoes the cancel's own ClOrdID in tag 11 and the
    /// canceled order's id in tag 41.
    #[must_use]
    pub fn client_cancel(&self, orig_cl_ord_id: &str, cancel_cl_ord_id: &str) -> CancelOutcome {
        let Some(handle) = self.store.get(orig_cl_ord_id) else {
            return CancelOutcome::Reject(OrderCancelReject::unknown_order(
                cancel_cl_ord_id.to_string(),
                orig_cl_ord_id.to_string(),
            ));
        };

        let mut order = handle.lock();
        if let Err(err) = order.cancel() {
            let status = match err {
                OrderError::CannotCancel { status } => status,
                _ => order.status(),
            };
            return CancelOutcome::Reject(OrderCancelReject::too_late(
                cancel_cl_ord_id.to_string(),
                orig_cl_ord_id.to_string(),
                status,
            ));
        }

        let exec_id = self.store.next_exec_id();
        self.store.record_execution(Execution::new(
            exec_id.clone(),
            order.cl_ord_id(),
            ExecType::Canceled,
            0,
            Decimal::ZERO,
        ));
        tracing::info!(cl_ord_id = %order.cl_ord_id(), "order canceled by client");

        let report = ExecutionReport::from_order(&order, exec_id, ExecType::Canceled).with_ids(
            cancel_cl_ord_id.to_string(),
            Some(orig_cl_ord_id.to_string()),
        );
        CancelOutcome::Report(report)
    }

    /// E6 — OrderCancelReplaceRequest.
    ///
    /// The replacement inherits unchanged fields and the filled quantity;
    /// the original becomes terminal. The new quantity must cover what is
    /// already filled.
    #[must_use]
    pub fn client_replace(
        &self,
        orig_cl_ord_id: &str,
        new_cl_ord_id: &str,
        new_qty: Option<u64>,
        new_price: Option<Decimal>,
    ) -> CancelOutcome {
        let Some(handle) = self.store.get(orig_cl_ord_id) else {
            return CancelOutcome::Reject(OrderCancelReject::unknown_order(
                new_cl_ord_id.to_string(),
                orig_cl_ord_id.to_string(),
            ));
        };

        let mut order = handle.lock();
        let replacement = match order.build_replacement(new_cl_ord_id, new_qty, new_price) {
            Ok(replacement) => replacement,
            Err(OrderError::CannotReplace { status }) => {
                return CancelOutcome::Reject(OrderCancelReject::too_late(
                    new_cl_ord_id.to_string(),
                    orig_cl_ord_id.to_string(),
                    status,
                ));
            }
            Err(OrderError::QuantityBelowFilled { .. }) => {
                let mut reject = OrderCancelReject::too_late(
                    new_cl_ord_id.to_string(),
                    orig_cl_ord_id.to_string(),
                    order.status(),
                );
                reject.text = "New quantity below filled".to_string();
                return CancelOutcome::Reject(reject);
            }
            Err(err) => {
                let mut reject = OrderCancelReject::too_late(
                    new_cl_ord_id.to_string(),
                    orig_cl_ord_id.to_string(),
                    order.status(),
                );
                reject.text = err.to_string();
                return CancelOutcome::Reject(reject);
            }
        };

        // The original's mutex is held across the insert, so a racing fill
        // or cancel on the old id observes the terminal state it gets here.
        let new_handle = match self.store.insert(replacement) {
            Ok(handle) => handle,
            Err(store_err) => {
                let mut reject = OrderCancelReject::too_late(
                    new_cl_ord_id.to_string(),
                    orig_cl_ord_id.to_string(),
                    order.status(),
                );
                reject.text = store_err.to_string();
                return CancelOutcome::Reject(reject);
            }
        };
        order.mark_replaced();
        drop(order);

        let new_order = new_handle.lock();
        let exec_id = self.store.next_exec_id();
        self.store.record_execution(Execution::new(
            exec_id.clone(),
            new_order.cl_ord_id(),
            ExecType::Replaced,
            0,
            Decimal::ZERO,
        ));
        tracing::info!(
            orig_cl_ord_id = %orig_cl_ord_id,
            cl_ord_id = %new_order.cl_ord_id(),
            qty = new_order.quantity(),
            "order replaced"
        );
        CancelOutcome::Report(ExecutionReport::from_order(
            &new_order,
            exec_id,
            ExecType::Replaced,
        ))
    }

    fn reject_submission(
        &self,
        cl_ord_id: String,
        symbol: String,
        side: Option<crate::domain::Side>,
        order_qty: u64,
        err: &OrderError,
    ) -> ExecutionReport {
        tracing::warn!(cl_ord_id = %cl_ord_id, error = %err, "order rejected");
        ExecutionReport::rejected_new(
            cl_ord_id,
            symbol,
            side,
            order_qty,
            self.store.next_exec_id(),
            err.to_string(),
        )
    }
}
