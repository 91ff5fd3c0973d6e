//! Order domain: entities, lifecycle transitions and report payloads.

pub mod execution;
pub mod order;
pub mod reports;

pub use execution::{ExecIdSequence, ExecType, Execution};
pub use order::{NewOrderCommand, OrdType, Order, OrderError, OrderStatus, Side, TimeInForce};
pub use reports::{CxlRejReason, ExecutionReport, OrderCancelReject};
