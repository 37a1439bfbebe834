//! AMT safe-harbor capacity
//!
//! The room is a fixed annual exemption figure per filing status: how much
//! ISO spread a client can recognize in a year before AMT starts biting
//! beyond regular tax. It is a planning heuristic. Income phase-out of the
//! exemption is not modeled.

use crate::model::{Client, FilingStatus};
use crate::tax_tables::{AMT_ROOM_MARRIED_JOINT, AMT_ROOM_SINGLE};

/// Dollars of ISO spread recognizable this year without incremental AMT.
pub fn calculate_amt_room(client: &Client) -> f64 {
    client
        .custom_amt_safe_harbor
        .unwrap_or(match client.filing_status {
            FilingStatus::Single => AMT_ROOM_SINGLE,
            FilingStatus::MarriedJoint => AMT_ROOM_MARRIED_JOINT,
        })
}
