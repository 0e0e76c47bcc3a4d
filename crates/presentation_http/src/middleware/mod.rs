//! HTTP middleware and extractors
//!
//! Request correlation and Willow header validation.

pub mod request_id;
pub mod validation;

pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer};
pub use validation::{StreamHeaders, WillowHeaders, validate_stream_headers};
