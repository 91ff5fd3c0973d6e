//! In-memory order store.
//!
//! The single process-wide authority for orders and executions, shared by
//! every session and the admin dispatcher. Each order lives behind its own
//! `Mutex`, so updates to one order serialize without blocking the rest;
//! the id map itself sits under a read-mostly `RwLock`.
//!
//! Lock discipline: the map lock is never held while an order mutex is
//! taken. Callers clone the `Arc` out of the map, drop the map guard, and
//! lock the order after.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::domain::{ExecIdSequence, Execution, Order};

/// Errors from store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No order with the given ClOrdID.
    #[error("order {cl_ord_id} not found")]
    NotFound {
        /// The ClOrdID looked up.
        cl_ord_id: String,
    },

    /// ClOrdID already present; ids are unique process-wide.
    #[error("duplicate ClOrdID {cl_ord_id}")]
    DuplicateClOrdId {
        /// The conflicting ClOrdID.
        cl_ord_id: String,
    },
}

/// Shared handle to one order.
pub type OrderHandle = Arc<Mutex<Order>>;

/// Authoritative ClOrdID → order mapping plus the execution log.
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: RwLock<HashMap<String, OrderHandle>>,
    executions: RwLock<Vec<Execution>>,
    exec_ids: ExecIdSequence,
}

impl OrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateClOrdId` if the id is already taken.
    pub fn insert(&self, order: Order) -> Result<OrderHandle, StoreError> {
        let mut orders = self.orders.write();
        if orders.contains_key(order.cl_ord_id()) {
            return Err(StoreError::DuplicateClOrdId {
                cl_ord_id: order.cl_ord_id().to_string(),
            });
        }
        let handle: OrderHandle = Arc::new(Mutex::new(order.clone()));
        orders.insert(order.cl_ord_id().to_string(), Arc::clone(&handle));
        Ok(handle)
    }

    /// Look up an order handle by ClOrdID.
    #[must_use]
    pub fn get(&self, cl_ord_id: &str) -> Option<OrderHandle> {
        self.orders.read().get(cl_ord_id).cloned()
    }

    /// SenderCompID of the session that owns the order.
    #[must_use]
    pub fn owner_session(&self, cl_ord_id: &str) -> Option<String> {
        let handle = self.get(cl_ord_id)?;
        let owner = handle.lock().owner().to_string();
        Some(owner)
    }

    /// Allocate the next monotonic execution id.
    #[must_use]
    pub fn next_exec_id(&self) -> String {
        self.exec_ids.next_id()
    }

    /// Append an execution to the log.
    pub fn record_execution(&self, execution: Execution) {
        self.executions.write().push(execution);
    }

    /// Snapshot of one order for the admin surface.
    #[must_use]
    pub fn get_order(&self, cl_ord_id: &str) -> Option<Order> {
        let handle = self.get(cl_ord_id)?;
        let order = handle.lock().clone();
        Some(order)
    }

    /// Snapshot of all orders, oldest first.
    #[must_use]
    pub fn list_orders(&self) -> Vec<Order> {
        let handles: Vec<OrderHandle> = self.orders.read().values().cloned().collect();
        let mut orders: Vec<Order> = handles.iter().map(|h| h.lock().clone()).collect();
        orders.sort_by_key(Order::created_at);
        orders
    }

    /// Snapshot of the execution log, oldest first.
    #[must_use]
    pub fn list_executions(&self) -> Vec<Execution> {
        self.executions.read().clone()
    }

    /// Number of orders held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    /// Whether the store holds no orders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }
}
