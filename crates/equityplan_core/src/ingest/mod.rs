//! Ingestion of grant documents
//!
//! The extraction service itself lives outside this crate. What lives here is
//! the boundary: validating whatever it returns, and the retry/rate-limit
//! policy callers wrap their requests in.

pub mod extracted;
pub mod retry;

pub use extracted::{ExtractedGrantData, ExtractionWarning, ValidatedExtraction, validate_extraction};
pub use retry::{Clock, Retrier, RetryPolicy, SystemClock};
