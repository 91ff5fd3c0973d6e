//! Order entity and lifecycle transitions.
//!
//! The order carries FIX protocol semantics for state transitions and
//! partial fills: `OrderQty = CumQty + LeavesQty`, volume-weighted `AvgPx`,
//! and terminal states that admit no further transitions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::execution::ExecType;

/// Order side (tag 54).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// Buy (`54=1`).
    Buy,
    /// Sell (`54=2`).
    Sell,
}

impl Side {
    /// Parse the FIX wire value.
    #[must_use]
    pub fn from_fix(value: &str) -> Option<Self> {
        match value {
            "1" => Some(Self::Buy),
            "2" => Some(Self::Sell),
            _ => None,
        }
    }

    /// The FIX wire value.
    #[must_use]
    pub const fn to_fix(self) -> &'static str {
        match self {
            Self::Buy => "1",
            Self::Sell => "2",
        }
    }
}

/// Order type (tag 40).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrdType {
    /// Market (`40=1`).
    Market,
    /// Limit (`40=2`), requires a positive price.
    Limit,
    /// Stop (`40=3`).
    Stop,
    /// Stop limit (`40=4`), requires a positive price.
    StopLimit,
}

impl OrdType {
    /// Parse the FIX wire value.
    #[must_use]
    pub fn from_fix(value: &str) -> Option<Self> {
        match value {
            "1" => Some(Self::Market),
            "2" => Some(Self::Limit),
            "3" => Some(Self::Stop),
            "4" => Some(Self::StopLimit),
            _ => None,
        }
    }

    /// The FIX wire value.
    #[must_use]
    pub const fn to_fix(self) -> &'static str {
        match self {
            Self::Market => "1",
            Self::Limit => "2",
            Self::Stop => "3",
            Self::StopLimit => "4",
        }
    }

    /// Whether this order type carries a limit price.
    #[must_use]
    pub const fn requires_price(self) -> bool {
        matches!(self, Self::Limit | Self::StopLimit)
    }
}

/// Time in force (tag 59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Day order (`59=0`), the default when tag 59 is absent.
    #[default]
    Day,
    /// Good till cancel (`59=1`).
    Gtc,
    /// Immediate or cancel (`59=3`).
    Ioc,
    /// Fill or kill (`59=4`).
    Fok,
}

impl TimeInForce {
    /// Parse the FIX wire value.
    #[must_use]
    pub fn from_fix(value: &str) -> Option<Self> {
        match value {
            "0" => Some(Self::Day),
            "1" => Some(Self::Gtc),
            "3" => Some(Self::Ioc),
            "4" => Some(Self::Fok),
            _ => None,
        }
    }

    /// The FIX wire value.
    #[must_use]
    pub const fn to_fix(self) -> &'static str {
        match self {
            Self::Day => "0",
            Self::Gtc => "1",
            Self::Ioc => "3",
            Self::Fok => "4",
        }
    }
}

/// Order status (tag 39).
///
/// `Replaced` is internal: a superseded original keeps its audit record but
/// behaves as a terminal (canceled) order for every later lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Accepted, nothing filled.
    New,
    /// Some quantity filled, some open.
    PartiallyFilled,
    /// Fully filled (terminal).
    Filled,
    /// Canceled (terminal).
    Canceled,
    /// Superseded by a replacement order (terminal).
    Replaced,
    /// Rejected (terminal).
    Rejected,
}

impl OrderStatus {
    /// The FIX OrdStatus wire value. A replaced original reports as
    /// canceled.
    #[must_use]
    pub const fn to_fix(self) -> &'static str {
        match self {
            Self::New => "0",
            Self::PartiallyFilled => "1",
            Self::Filled => "2",
            Self::Canceled | Self::Replaced => "4",
            Self::Rejected => "8",
        }
    }

    /// Whether no further state-changing transitions are permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Filled | Self::Canceled | Self::Replaced | Self::Rejected
        )
    }

    /// Whether the order can receive fills.
    #[must_use]
    pub const fn can_fill(self) -> bool {
        matches!(self, Self::New | Self::PartiallyFilled)
    }

    /// Whether the order can be canceled or replaced.
    #[must_use]
    pub const fn is_cancelable(self) -> bool {
        matches!(self, Self::New | Self::PartiallyFilled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::New => "NEW",
            Self::PartiallyFilled => "PARTIALLY_FILLED",
            Self::Filled => "FILLED",
            Self::Canceled => "CANCELED",
            Self::Replaced => "REPLACED",
            Self::Rejected => "REJECTED",
        };
        write!(f, "{name}")
    }
}

/// Errors that can occur in order validation and transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    /// Invalid order parameters.
    #[error("invalid order parameter '{field}': {message}")]
    InvalidParameters {
        /// Field with the invalid value.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// Order cannot receive fills in its current status.
    #[error("cannot fill order in status {status}")]
    CannotFill {
        /// Current status.
        status: OrderStatus,
    },

    /// Fill quantity exceeds the open quantity.
    #[error("fill quantity {fill_qty} exceeds remaining {remaining}")]
    FillExceedsRemaining {
        /// Fill quantity attempted.
        fill_qty: u64,
        /// Open quantity.
        remaining: u64,
    },

    /// Order cannot be canceled in its current status.
    #[error("cannot cancel order in status {status}")]
    CannotCancel {
        /// Current status.
        status: OrderStatus,
    },

    /// Order cannot be rejected in its current status.
    #[error("can only reject orders in status NEW, not {status}")]
    CannotReject {
        /// Current status.
        status: OrderStatus,
    },

    /// Order cannot be replaced in its current status.
    #[error("cannot replace order in status {status}")]
    CannotReplace {
        /// Current status.
        status: OrderStatus,
    },

    /// Replacement would shrink the order below what is already filled.
    #[error("new quantity {new_qty} below filled quantity {filled}")]
    QuantityBelowFilled {
        /// Requested replacement quantity.
        new_qty: u64,
        /// Quantity already filled.
        filled: u64,
    },
}

/// Command to create a new order from a NewOrderSingle.
#[derive(Debug, Clone)]
pub struct NewOrderCommand {
    /// Client order id (tag 11).
    pub cl_ord_id: String,
    /// Symbol (tag 55).
    pub symbol: String,
    /// Side (tag 54).
    pub side: Side,
    /// Order type (tag 40).
    pub order_type: OrdType,
    /// Quantity (tag 38).
    pub quantity: u64,
    /// Limit price (tag 44), required for limit types.
    pub limit_price: Option<Decimal>,
    /// Time in force (tag 59).
    pub time_in_force: TimeInForce,
    /// Session that submitted the order.
    pub sender_comp_id: String,
}

impl NewOrderCommand {
    /// Validate the command parameters.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidParameters` naming the offending field.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.cl_ord_id.is_empty() {
            return Err(OrderError::InvalidParameters {
                field: "cl_ord_id".to_string(),
                message: "ClOrdID must not be empty".to_string(),
            });
        }
        if self.symbol.trim().is_empty() {
            return Err(OrderError::InvalidParameters {
                field: "symbol".to_string(),
                message: "symbol must not be empty".to_string(),
            });
        }
        if self.quantity == 0 {
            return Err(OrderError::InvalidParameters {
                field: "quantity".to_string(),
                message: "order quantity must be positive".to_string(),
            });
        }
        match self.limit_price {
            None if self.order_type.requires_price() => {
                return Err(OrderError::InvalidParameters {
                    field: "price".to_string(),
                    message: "limit price required for limit orders".to_string(),
                });
            }
            Some(price) if price <= Decimal::ZERO => {
                return Err(OrderError::InvalidParameters {
                    field: "price".to_string(),
                    message: "limit price must be positive".to_string(),
                });
            }
            _ => {}
        }
        Ok(())
    }
}

/// A single-leg order with its fill state.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    cl_ord_id: String,
    orig_cl_ord_id: Option<String>,
    symbol: String,
    side: Side,
    order_type: OrdType,
    quantity: u64,
    limit_price: Option<Decimal>,
    time_in_force: TimeInForce,
    status: OrderStatus,
    filled_quantity: u64,
    avg_px: Decimal,
    owning_sender_comp_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order in status `NEW` from a validated command.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidParameters` if validation fails.
    pub fn new(cmd: NewOrderCommand) -> Result<Self, OrderError> {
        cmd.validate()?;
        let now = Utc::now();
        Ok(Self {
            cl_ord_id: cmd.cl_ord_id,
            orig_cl_ord_id: None,
            symbol: cmd.symbol,
            side: cmd.side,
            order_type: cmd.order_type,
            quantity: cmd.quantity,
            limit_price: cmd.limit_price,
            time_in_force: cmd.time_in_force,
            status: OrderStatus::New,
            filled_quantity: 0,
            avg_px: Decimal::ZERO,
            owning_sender_comp_id: cmd.sender_comp_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Client order id.
    #[must_use]
    pub fn cl_ord_id(&self) -> &str {
        &self.cl_ord_id
    }

    /// ClOrdID of the order this one replaced, if any.
    #[must_use]
    pub fn orig_cl_ord_id(&self) -> Option<&str> {
        self.orig_cl_ord_id.as_deref()
    }

    /// Symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Side.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Order type.
    #[must_use]
    pub const fn order_type(&self) -> OrdType {
        self.order_type
    }

    /// Ordered quantity (tag 38).
    #[must_use]
    pub const fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Limit price, if any.
    #[must_use]
    pub const fn limit_price(&self) -> Option<Decimal> {
        self.limit_price
    }

    /// Time in force.
    #[must_use]
    pub const fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Cumulative filled quantity (tag 14).
    #[must_use]
    pub const fn filled_quantity(&self) -> u64 {
        self.filled_quantity
    }

    /// Open quantity. Kept as `quantity - filled` even on terminal orders
    /// for audit; reports zero it out for canceled orders.
    #[must_use]
    pub const fn remaining_quantity(&self) -> u64 {
        self.quantity - self.filled_quantity
    }

    /// Volume-weighted average fill price (tag 6).
    #[must_use]
    pub const fn avg_px(&self) -> Decimal {
        self.avg_px
    }

    /// SenderCompID of the session that owns this order.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owning_sender_comp_id
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply a fill, returning the execution kind it produced.
    ///
    /// Recomputes the VWAP and moves the order to `PARTIALLY_FILLED` or
    /// `FILLED`.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot receive fills, the quantity is
    /// zero, or the fill would exceed the open quantity.
    pub fn apply_fill(&mut self, qty: u64, price: Decimal) -> Result<ExecType, OrderError> {
        if !self.status.can_fill() {
            return Err(OrderError::CannotFill {
                status: self.status,
            });
        }
        if qty == 0 {
            return Err(OrderError::InvalidParameters {
                field: "quantity".to_string(),
                message: "fill quantity must be positive".to_string(),
            });
        }
        let remaining = self.remaining_quantity();
        if qty > remaining {
            return Err(OrderError::FillExceedsRemaining {
                fill_qty: qty,
                remaining,
            });
        }

        // VWAP: new_avg = (old_avg * old_cum + price * qty) / new_cum
        let new_filled = self.filled_quantity + qty;
        let old_value = self.avg_px * Decimal::from(self.filled_quantity);
        let fill_value = price * Decimal::from(qty);
        self.avg_px = (old_value + fill_value) / Decimal::from(new_filled);

        self.filled_quantity = new_filled;
        self.updated_at = Utc::now();

        if self.filled_quantity == self.quantity {
            self.status = OrderStatus::Filled;
            Ok(ExecType::Fill)
        } else {
            self.status = OrderStatus::PartiallyFilled;
            Ok(ExecType::PartialFill)
        }
    }

    /// Cancel the order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::CannotCancel` for terminal orders.
    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if !self.status.is_cancelable() {
            return Err(OrderError::CannotCancel {
                status: self.status,
            });
        }
        self.status = OrderStatus::Canceled;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Reject the order. Permitted only from `NEW`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::CannotReject` otherwise.
    pub fn reject(&mut self) -> Result<(), OrderError> {
        if self.status != OrderStatus::New {
            return Err(OrderError::CannotReject {
                status: self.status,
            });
        }
        self.status = OrderStatus::Rejected;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Build the replacement order for a cancel/replace request.
    ///
    /// Unchanged fields inherit from this order; the replacement carries
    /// the filled quantity and VWAP forward and resumes in `NEW` or
    /// `PARTIALLY_FILLED` accordingly. The original is left untouched;
    /// callers mark it replaced once the new record is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if this order is terminal or the new quantity is
    /// below the filled quantity.
    pub fn build_replacement(
        &self,
        new_cl_ord_id: &str,
        new_qty: Option<u64>,
        new_price: Option<Decimal>,
    ) -> Result<Self, OrderError> {
        if !self.status.is_cancelable() {
            return Err(OrderError::CannotReplace {
                status: self.status,
            });
        }
        let quantity = new_qty.unwrap_or(self.quantity);
        if quantity < self.filled_quantity {
            return Err(OrderError::QuantityBelowFilled {
                new_qty: quantity,
                filled: self.filled_quantity,
            });
        }
        let now = Utc::now();
        Ok(Self {
            cl_ord_id: new_cl_ord_id.to_string(),
            orig_cl_ord_id: Some(self.cl_ord_id.clone()),
            symbol: self.symbol.clone(),
            side: self.side,
            order_type: self.order_type,
            quantity,
            limit_price: new_price.or(self.limit_price),
            time_in_force: self.time_in_force,
            status: if self.filled_quantity == 0 {
                OrderStatus::New
            } else {
                OrderStatus::PartiallyFilled
            },
            filled_quantity: self.filled_quantity,
            avg_px: self.avg_px,
            owning_sender_comp_id: self.owning_sender_comp_id.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Mark this order as superseded by a replacement.
    pub fn mark_replaced(&mut self) {
        self.status = OrderStatus::Replaced;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    #[test_case(OrderStatus::Filled)]
    #[test_case(OrderStatus::Canceled)]
    #[test_case(OrderStatus::Replaced)]
    #[test_case(OrderStatus::Rejected)]
    fn terminal_states_admit_no_transitions(status: OrderStatus) {
        assert!(status.is_terminal());
        assert!(!status.can_fill());
        assert!(!status.is_cancelable());
    }

    #[test_case(OrderStatus::New)]
    #[test_case(OrderStatus::PartiallyFilled)]
    fn open_states_accept_fills_and_cancels(status: OrderStatus) {
        assert!(!status.is_terminal());
        assert!(status.can_fill());
        assert!(status.is_cancelable());
    }

    fn make_command() -> NewOrderCommand {
        NewOrderCommand {
            cl_ord_id: "ORD-1".to_string(),
            symbol: "AAPL".to_string(),
            side: Side::Buy,
            order_type: OrdType::Limit,
            quantity: 100,
            limit_price: Some(dec!(230.0)),
            time_in_force: TimeInForce::Day,
            sender_comp_id: "TEST_CLIENT".to_string(),
        }
    }

    #[test]
    fn new_order_starts_clean() {
        let order = Order::new(make_command()).unwrap();
        assert_eq!(order.status(), OrderStatus::New);
        assert_eq!(order.filled_quantity(), 0);
        assert_eq!(order.remaining_quantity(), 100);
        assert_eq!(order.avg_px(), Decimal::ZERO);
    }

    #[test]
    fn validation_rejects_empty_symbol() {
        let mut cmd = make_command();
        cmd.symbol = "  ".to_string();
        assert!(matches!(
            Order::new(cmd),
            Err(OrderError::InvalidParameters { field, .. }) if field == "symbol"
        ));
    }

    #[test]
    fn validation_rejects_zero_quantity() {
        let mut cmd = make_command();
        cmd.quantity = 0;
        assert!(Order::new(cmd).is_err());
    }

    #[test]
    fn validation_rejects_limit_without_price() {
        let mut cmd = make_command();
        cmd.limit_price = None;
        let err = Order::new(cmd).unwrap_err();
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn validation_rejects_non_positive_price() {
        let mut cmd = make_command();
        cmd.limit_price = Some(dec!(0));
        assert!(Order::new(cmd).is_err());
    }

    #[test]
    fn market_order_needs_no_price() {
        let mut cmd = make_command();
        cmd.order_type = OrdType::Market;
        cmd.limit_price = None;
        assert!(Order::new(cmd).is_ok());
    }

    #[test]
    fn partial_then_full_fill() {
        let mut order = Order::new(make_command()).unwrap();

        assert_eq!(order.apply_fill(30, dec!(230.0)), Ok(ExecType::PartialFill));
        assert_eq!(order.status(), OrderStatus::PartiallyFilled);
        assert_eq!(order.filled_quantity(), 30);
        assert_eq!(order.remaining_quantity(), 70);

        assert_eq!(order.apply_fill(70, dec!(230.0)), Ok(ExecType::Fill));
        assert_eq!(order.status(), OrderStatus::Filled);
        assert_eq!(order.remaining_quantity(), 0);
    }

    #[test]
    fn exact_fill_is_filled_not_partial() {
        let mut order = Order::new(make_command()).unwrap();
        assert_eq!(order.apply_fill(100, dec!(230.10)), Ok(ExecType::Fill));
        assert_eq!(order.status(), OrderStatus::Filled);
    }

    #[test]
    fn vwap_across_fills() {
        let mut order = Order::new(make_command()).unwrap();
        order.apply_fill(40, dec!(150.00)).unwrap();
        assert_eq!(order.avg_px(), dec!(150.00));

        // (150.00 * 40 + 151.00 * 60) / 100 = 150.60
        order.apply_fill(60, dec!(151.00)).unwrap();
        assert_eq!(order.avg_px(), dec!(150.60));
    }

    #[test]
    fn overfill_is_rejected() {
        let mut order = Order::new(make_command()).unwrap();
        order.apply_fill(60, dec!(230.0)).unwrap();
        assert_eq!(
            order.apply_fill(50, dec!(230.0)),
            Err(OrderError::FillExceedsRemaining {
                fill_qty: 50,
                remaining: 40
            })
        );
        // State untouched by the failed fill.
        assert_eq!(order.filled_quantity(), 60);
        assert_eq!(order.status(), OrderStatus::PartiallyFilled);
    }

    #[test]
    fn zero_fill_is_rejected() {
        let mut order = Order::new(make_command()).unwrap();
        assert!(order.apply_fill(0, dec!(230.0)).is_err());
    }

    #[test]
    fn fill_after_terminal_is_rejected() {
        let mut order = Order::new(make_command()).unwrap();
        order.cancel().unwrap();
        assert_eq!(
            order.apply_fill(10, dec!(230.0)),
            Err(OrderError::CannotFill {
                status: OrderStatus::Canceled
            })
        );
    }

    #[test]
    fn cancel_preserves_filled_quantity() {
        let mut order = Order::new(make_command()).unwrap();
        order.apply_fill(40, dec!(230.0)).unwrap();
        order.cancel().unwrap();

        assert_eq!(order.status(), OrderStatus::Canceled);
        assert_eq!(order.filled_quantity(), 40);
        assert_eq!(order.remaining_quantity(), 60);
    }

    #[test]
    fn cancel_twice_fails() {
        let mut order = Order::new(make_command()).unwrap();
        order.cancel().unwrap();
        assert_eq!(
            order.cancel(),
            Err(OrderError::CannotCancel {
                status: OrderStatus::Canceled
            })
        );
    }

    #[test]
    fn reject_only_from_new() {
        let mut order = Order::new(make_command()).unwrap();
        order.apply_fill(10, dec!(230.0)).unwrap();
        assert!(order.reject().is_err());

        let mut fresh = Order::new(make_command()).unwrap();
        fresh.reject().unwrap();
        assert_eq!(fresh.status(), OrderStatus::Rejected);
    }

    #[test]
    fn replacement_inherits_unchanged_fields() {
        let order = Order::new(make_command()).unwrap();
        let replacement = order.build_replacement("ORD-1-V2", Some(150), None).unwrap();

        assert_eq!(replacement.cl_ord_id(), "ORD-1-V2");
        assert_eq!(replacement.orig_cl_ord_id(), Some("ORD-1"));
        assert_eq!(replacement.quantity(), 150);
        assert_eq!(replacement.limit_price(), Some(dec!(230.0)));
        assert_eq!(replacement.symbol(), "AAPL");
        assert_eq!(replacement.status(), OrderStatus::New);
    }

    #[test]
    fn replacement_carries_fills_forward() {
        let mut order = Order::new(make_command()).unwrap();
        order.apply_fill(40, dec!(230.0)).unwrap();

        let replacement = order.build_replacement("ORD-1-V2", Some(120), None).unwrap();
        assert_eq!(replacement.filled_quantity(), 40);
        assert_eq!(replacement.status(), OrderStatus::PartiallyFilled);
        assert_eq!(replacement.avg_px(), dec!(230.0));
    }

    #[test]
    fn replacement_below_filled_is_rejected() {
        let mut order = Order::new(make_command()).unwrap();
        order.apply_fill(40, dec!(230.0)).unwrap();

        assert_eq!(
            order
                .build_replacement("ORD-1-V2", Some(30), None)
                .unwrap_err(),
            OrderError::QuantityBelowFilled {
                new_qty: 30,
                filled: 40
            }
        );
    }

    #[test]
    fn replaced_original_is_terminal() {
        let mut order = Order::new(make_command()).unwrap();
        order.mark_replaced();
        assert!(order.status().is_terminal());
        assert_eq!(order.status().to_fix(), "4");
        assert!(order.cancel().is_err());
    }

    #[test]
    fn status_display_matches_reject_text() {
        assert_eq!(OrderStatus::Filled.to_string(), "FILLED");
        assert_eq!(OrderStatus::PartiallyFilled.to_string(), "PARTIALLY_FILLED");
        assert_eq!(OrderStatus::Replaced.to_string(), "REPLACED");
    }
}
