//! Execution dispatcher: the bridge from the administrative surface to the
//! order state machine and the owning client session.
//!
//! Transitions commit under the order's mutex and the report is enqueued on
//! the owning session's send path before the mutex is released, so a client
//! observes reports in commit order with monotonic CumQty. When the owner
//! has no live session the state change still commits and the report is
//! dropped with a warning; there is no replay on reconnect.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::{ExecType, Execution, ExecutionReport, Order, OrderError, OrderStatus};
use crate::session::SessionRegistry;
use crate::store::OrderStore;

/// Structured rejection returned to the administrative caller. These never
/// produce FIX messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// No order with the given ClOrdID.
    #[error("order {cl_ord_id} not found")]
    NotFound {
        /// The ClOrdID looked up.
        cl_ord_id: String,
    },

    /// The order's status does not admit the requested transition.
    #[error("order {cl_ord_id} is {status}")]
    BadState {
        /// The order.
        cl_ord_id: String,
        /// Its current status.
        status: OrderStatus,
    },

    /// The fill would exceed the open quantity.
    #[error("fill of {requested} exceeds remaining {remaining} on {cl_ord_id}")]
    Overfill {
        /// The order.
        cl_ord_id: String,
        /// Requested fill quantity.
        requested: u64,
        /// Open quantity.
        remaining: u64,
    },

    /// Fill quantity must be positive.
    #[error("fill quantity must be positive")]
    InvalidQuantity,
}

/// Bridges administrative execution posts to the owning session.
#[derive(Debug, Clone)]
pub struct ExecutionDispatcher {
    store: Arc<OrderStore>,
    registry: Arc<SessionRegistry>,
}

impl ExecutionDispatcher {
    /// Create a dispatcher over the shared store and session table.
    #[must_use]
    pub fn new(store: Arc<OrderStore>, registry: Arc<SessionRegistry>) -> Self {
        Self { store, registry }
    }

    /// E2 — post a fill against an order.
    ///
    /// # Errors
    ///
    /// `NotFound`, `BadState`, `Overfill` or `InvalidQuantity`; the order
    /// is untouched on error and no message reaches the client.
    pub fn submit_fill(
        &self,
        cl_ord_id: &str,
        quantity: u64,
        price: Decimal,
    ) -> Result<(), DispatchError> {
        let handle = self.store.get(cl_ord_id).ok_or_else(|| DispatchError::NotFound {
            cl_ord_id: cl_ord_id.to_string(),
        })?;

        let mut order = handle.lock();
        let exec_type = order
            .apply_fill(quantity, price)
            .map_err(|err| map_order_error(cl_ord_id, &err))?;

        let exec_id = self.store.next_exec_id();
        self.store.record_execution(Execution::new(
            exec_id.clone(),
            order.cl_ord_id(),
            exec_type,
            quantity,
            price,
        ));
        tracing::info!(
            cl_ord_id = %order.cl_ord_id(),
            qty = quantity,
            price = %price,
            cum_qty = order.filled_quantity(),
            status = %order.status(),
            "fill applied"
        );

        let report =
            ExecutionReport::from_order(&order, exec_id, exec_type).with_fill(quantity, price);
        self.emit(&order, report);
        Ok(())
    }

    /// E3 — administrative cancel.
    ///
    /// # Errors
    ///
    /// `NotFound` or `BadState`.
    pub fn admin_cancel(&self, cl_ord_id: &str) -> Result<(), DispatchError> {
        let handle = self.store.get(cl_ord_id).ok_or_else(|| DispatchError::NotFound {
            cl_ord_id: cl_ord_id.to_string(),
        })?;

        let mut order = handle.lock();
        order
            .cancel()
            .map_err(|err| map_order_error(cl_ord_id, &err))?;

        let exec_id = self.store.next_exec_id();
        self.store.record_execution(Execution::new(
            exec_id.clone(),
            order.cl_ord_id(),
            ExecType::Canceled,
            0,
            Decimal::ZERO,
        ));
        tracing::info!(cl_ord_id = %order.cl_ord_id(), "order canceled by admin");

        let report = ExecutionReport::from_order(&order, exec_id, ExecType::Canceled);
        self.emit(&order, report);
        Ok(())
    }

    /// E4 — administrative reject, permitted only from `NEW`.
    ///
    /// # Errors
    ///
    /// `NotFound` or `BadState`.
    pub fn admin_reject(&self, cl_ord_id: &str) -> Result<(), DispatchError> {
        let handle = self.store.get(cl_ord_id).ok_or_else(|| DispatchError::NotFound {
            cl_ord_id: cl_ord_id.to_string(),
        })?;

        let mut order = handle.lock();
        order
            .reject()
            .map_err(|err| map_order_error(cl_ord_id, &err))?;

        let exec_id = self.store.next_exec_id();
        self.store.record_execution(Execution::new(
            exec_id.clone(),
            order.cl_ord_id(),
            ExecType::Rejected,
            0,
            Decimal::ZERO,
        ));
        tracing::info!(cl_ord_id = %order.cl_ord_id(), "order rejected by admin");

        let report = ExecutionReport::from_order(&order, exec_id, ExecType::Rejected);
        self.emit(&order, report);
        Ok(())
    }

    /// Read-only view: all orders.
    #[must_use]
    pub fn list_orders(&self) -> Vec<Order> {
        self.store.list_orders()
    }

    /// Read-only view: one order.
    #[must_use]
    pub fn get_order(&self, cl_ord_id: &str) -> Option<Order> {
        self.store.get_order(cl_ord_id)
    }

    /// Read-only view: the execution log.
    #[must_use]
    pub fn list_executions(&self) -> Vec<Execution> {
        self.store.list_executions()
    }

    /// Push a report to the order's owning session, if one is live.
    fn emit(&self, order: &Order, report: ExecutionReport) {
        match self.registry.get(order.owner()) {
            Some(session) => {
                if session.send(report.to_message()).is_err() {
                    tracing::warn!(
                        cl_ord_id = %order.cl_ord_id(),
                        owner = %order.owner(),
                        "owning session closing, report dropped"
                    );
                }
            }
            None => {
                tracing::warn!(
                    cl_ord_id = %order.cl_ord_id(),
                    owner = %order.owner(),
                    "no live session for owner, report dropped"
                );
            }
        }
    }
}

/// Map a domain transition failure onto the admin error taxonomy.
fn map_order_error(cl_ord_id: &str, err: &OrderError) -> DispatchError {
    match err {
        OrderError::FillExceedsRemaining { fill_qty, remaining } => DispatchError::Overfill {
            cl_ord_id: cl_ord_id.to_string(),
            requested: *fill_qty,
            remaining: *remaining,
        },
        OrderError::InvalidParameters { .. } => DispatchError::InvalidQuantity,
        OrderError::CannotFill { status }
        | OrderError::CannotCancel { status }
        | OrderError::CannotReject { status }
        | OrderError::CannotReplace { status } => DispatchError::BadState {
            cl_ord_id: cl_ord_id.to_string(),
            status: *status,
        },
        OrderError::QuantityBelowFilled { .. } => DispatchError::InvalidQuantity,
    }
}
