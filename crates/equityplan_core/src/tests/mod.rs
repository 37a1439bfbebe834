//! Integration tests for the equity planning engine
//!
//! Tests are organized by topic:
//! - `vesting` - Schedule shapes, idempotence and share accounting over time
//! - `planning` - AMT room, ISO exercise plans and disposition timing together
//! - `portfolio` - Whole-client evaluation, caching and document import

mod vesting;
