//! Execution records and execution ids.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Execution event kind (tag 150).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecType {
    /// Order accepted (`150=0`).
    New,
    /// Partial fill (`150=1`).
    PartialFill,
    /// Full fill (`150=2`).
    Fill,
    /// Canceled (`150=4`).
    Canceled,
    /// Replaced (`150=5`).
    Replaced,
    /// Rejected (`150=8`).
    Rejected,
}

impl ExecType {
    /// The FIX wire value.
    #[must_use]
    pub const fn to_fix(self) -> &'static str {
        match self {
            Self::New => "0",
            Self::PartialFill => "1",
            Self::Fill => "2",
            Self::Canceled => "4",
            Self::Replaced => "5",
            Self::Rejected => "8",
        }
    }

    /// Whether this event contributes to the filled quantity.
    #[must_use]
    pub const fn is_fill(self) -> bool {
        matches!(self, Self::PartialFill | Self::Fill)
    }
}

/// One fill or administrative event against an order. Immutable once
/// written.
#[derive(Debug, Clone, Serialize)]
pub struct Execution {
    /// Server-assigned execution id (tag 17).
    pub exec_id: String,
    /// Order this execution belongs to.
    pub cl_ord_id: String,
    /// Event kind.
    pub exec_type: ExecType,
    /// Filled quantity; zero for non-fill events.
    pub quantity: u64,
    /// Fill price; zero for non-fill events.
    pub price: Decimal,
    /// When the execution was recorded.
    pub created_at: DateTime<Utc>,
}

impl Execution {
    /// Record a new execution stamped with the current time.
    #[must_use]
    pub fn new(exec_id: String, cl_ord_id: &str, exec_type: ExecType, quantity: u64, price: Decimal) -> Self {
        Self {
            exec_id,
            cl_ord_id: cl_ord_id.to_string(),
            exec_type,
            quantity,
            price,
            created_at: Utc::now(),
        }
    }
}

/// Process-wide monotonic execution id source.
#[derive(Debug, Default)]
pub struct ExecIdSequence {
    next: AtomicU64,
}

impl ExecIdSequence {
    /// Start the sequence at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next execution id.
    #[must_use]
    pub fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("E{n:010}")
    }
}
