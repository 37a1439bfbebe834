mod client;
mod exercise;
mod grant;
mod ids;
mod results;

pub use client::{Client, FilingStatus};
pub use exercise::PlannedExercise;
pub use grant::{
    CustomVestingDate, DEFAULT_ESPP_DISCOUNT, DEFAULT_ESPP_OFFERING_MONTHS,
    DEFAULT_WITHHOLDING_RATE, Grant, GrantType, StockSale, VestingPrice, VestingSchedule,
};
pub use ids::{ClientId, ExerciseId, GrantId};
pub use results::{
    DispositionQualification, DispositionTax, EsppQualification, GrantStatus, HoldingsSummary,
    IsoDisposition, QuarterlyBreakdown, VestingEvent,
};
