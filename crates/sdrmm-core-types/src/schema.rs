//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical across the engine, store and client.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entity identifiers
pub const FIELD_MAP_ID: &str = "map_id";
pub const FIELD_USERNAME: &str = "username";

// Collection sizes
pub const FIELD_QUEUE_LEN: &str = "queue_len";

// Error and rejection fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_MESSAGE: &str = "message";
pub const FIELD_REJECTION_CODE: &str = "rejection_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
