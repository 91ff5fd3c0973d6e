//! FIX 4.2 tag numbers and message type values used by the acceptor.

// The tag table is self-describing; the names are the documentation.
#![allow(missing_docs)]

/// SOH field delimiter (0x01).
pub const SOH: u8 = 0x01;

/// Protocol identity sent in tag 8.
pub const BEGIN_STRING: &str = "FIX.4.2";

pub const TAG_BEGIN_STRING: u32 = 8;
pub const TAG_BODY_LENGTH: u32 = 9;
pub const TAG_CHECK_SUM: u32 = 10;
pub const TAG_MSG_TYPE: u32 = 35;
pub const TAG_SENDER_COMP_ID: u32 = 49;
pub const TAG_TARGET_COMP_ID: u32 = 56;
pub const TAG_MSG_SEQ_NUM: u32 = 34;
pub const TAG_SENDING_TIME: u32 = 52;
pub const TAG_POSS_DUP_FLAG: u32 = 43;
pub const TAG_ENCRYPT_METHOD: u32 = 98;
pub const TAG_HEART_BT_INT: u32 = 108;
pub const TAG_CL_ORD_ID: u32 = 11;
pub const TAG_ORIG_CL_ORD_ID: u32 = 41;
pub const TAG_HANDL_INST: u32 = 21;
pub const TAG_SYMBOL: u32 = 55;
pub const TAG_SIDE: u32 = 54;
pub const TAG_TRANSACT_TIME: u32 = 60;
pub const TAG_ORD_TYPE: u32 = 40;
pub const TAG_PRICE: u32 = 44;
pub const TAG_ORDER_QTY: u32 = 38;
pub const TAG_TIME_IN_FORCE: u32 = 59;
pub const TAG_EXEC_ID: u32 = 17;
pub const TAG_EXEC_TYPE: u32 = 150;
pub const TAG_ORD_STATUS: u32 = 39;
pub const TAG_LAST_QTY: u32 = 32;
pub const TAG_LAST_PX: u32 = 31;
pub const TAG_CUM_QTY: u32 = 14;
pub const TAG_AVG_PX: u32 = 6;
pub const TAG_LEAVES_QTY: u32 = 151;
pub const TAG_CXL_REJ_REASON: u32 = 434;
pub const TAG_TEXT: u32 = 58;

/// Message type values (tag 35).
pub mod msg_type {
    /// Logon.
    pub const LOGON: &str = "A";
    /// Heartbeat.
    pub const HEARTBEAT: &str = "0";
    /// Test request.
    pub const TEST_REQUEST: &str = "1";
    /// Logout.
    pub const LOGOUT: &str = "5";
    /// New order - single.
    pub const NEW_ORDER_SINGLE: &str = "D";
    /// Order cancel request.
    pub const ORDER_CANCEL_REQUEST: &str = "F";
    /// Order cancel/replace request.
    pub const ORDER_CANCEL_REPLACE_REQUEST: &str = "G";
    /// Execution report.
    pub const EXECUTION_REPORT: &str = "8";
    /// Order cancel reject.
    pub const ORDER_CANCEL_REJECT: &str = "9";
}

/// CxlRejReason values (tag 434).
pub mod cxl_rej_reason {
    /// Too late to cancel.
    pub const TOO_LATE: &str = "0";
    /// Unknown order.
    pub const UNKNOWN_ORDER: &str = "1";
}
