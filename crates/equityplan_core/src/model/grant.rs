//! Equity grant records
//!
//! A grant is one equity award (RSU, ISO, NSO or ESPP purchase). It holds the
//! static terms the engine derives everything else from, plus two histories
//! the advisor maintains by hand: realized sales and recorded prices at vest.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::ids::GrantId;
use crate::date_math::add_months;

/// Federal supplemental withholding rate applied when a grant records none.
pub const DEFAULT_WITHHOLDING_RATE: f64 = 22.0;

/// Statutory maximum ESPP discount, used when the plan's discount is unknown.
pub const DEFAULT_ESPP_DISCOUNT: f64 = 15.0;

/// Length of an ESPP offering period when the start date was not recorded.
pub const DEFAULT_ESPP_OFFERING_MONTHS: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrantType {
    #[serde(rename = "RSU")]
    Rsu,
    #[serde(rename = "ISO")]
    Iso,
    #[serde(rename = "NSO")]
    Nso,
    #[serde(rename = "ESPP")]
    Espp,
}

impl GrantType {
    pub fn label(&self) -> &'static str {
        match self {
            GrantType::Rsu => "RSU",
            GrantType::Iso => "ISO",
            GrantType::Nso => "NSO",
            GrantType::Espp => "ESPP",
        }
    }

    /// Share-settled awards withhold tax at vest; options do not.
    pub fn withholds_at_vest(&self) -> bool {
        matches!(self, GrantType::Rsu | GrantType::Espp)
    }

    pub fn is_option(&self) -> bool {
        matches!(self, GrantType::Iso | GrantType::Nso)
    }
}

impl std::fmt::Display for GrantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Vesting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VestingSchedule {
    /// 25% after one year, then quarterly over the remaining three
    #[default]
    #[serde(rename = "standard_4y_1y_cliff")]
    Standard4y1yCliff,
    /// 1/16 every quarter for four years
    #[serde(rename = "standard_4y_quarterly")]
    Standard4yQuarterly,
    #[serde(rename = "immediate")]
    Immediate,
    /// Dates and share counts listed on the grant
    #[serde(rename = "custom")]
    Custom,
}

impl VestingSchedule {
    pub fn label(&self) -> &'static str {
        match self {
            VestingSchedule::Standard4y1yCliff => "4 years, 1 year cliff",
            VestingSchedule::Standard4yQuarterly => "4 years, quarterly",
            VestingSchedule::Immediate => "Immediate",
            VestingSchedule::Custom => "Custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomVestingDate {
    pub date: Date,
    pub shares: u64,
}

/// Historical price recorded for a vest date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VestingPrice {
    pub date: Date,
    pub price: f64,
}

/// A realized disposition. Read-only input to history and holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSale {
    pub date: Date,
    pub shares: u64,
    pub price: f64,
    pub proceeds: f64,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    pub id: GrantId,
    #[serde(rename = "type")]
    pub grant_type: GrantType,
    pub ticker: String,
    #[serde(default)]
    pub company_name: String,
    pub current_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike_price: Option<f64>,
    pub grant_date: Date,
    pub total_shares: u64,
    #[serde(default)]
    pub vesting_schedule: VestingSchedule,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_vesting_dates: Vec<CustomVestingDate>,
    /// Withholding election in percent (RSU/ESPP only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withholding_rate: Option<f64>,

    // Manual holdings overrides. Display only, never fed into vesting status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_held_shares: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_cost_basis: Option<f64>,

    // ESPP purchase terms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub espp_discount_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub espp_purchase_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub espp_offering_start: Option<Date>,
    /// End of the offering period, i.e. the purchase date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub espp_offering_end: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub espp_fmv_at_offering_start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub espp_fmv_at_purchase: Option<f64>,

    #[serde(default)]
    pub sales: Vec<StockSale>,
    #[serde(default)]
    pub vesting_prices: Vec<VestingPrice>,
}

impl Grant {
    /// Exercise price for options; falls back to the grant price, then zero.
    pub fn strike(&self) -> f64 {
        self.strike_price.or(self.grant_price).unwrap_or(0.0)
    }

    /// Withholding election in percent, defaulting to the supplemental rate.
    pub fn withholding_percent(&self) -> f64 {
        self.withholding_rate
            .unwrap_or(DEFAULT_WITHHOLDING_RATE)
            .clamp(0.0, 100.0)
    }

    /// Price recorded for an exact vest date, if any.
    pub fn recorded_price_on(&self, date: Date) -> Option<f64> {
        self.vesting_prices
            .iter()
            .find(|p| p.date == date)
            .map(|p| p.price)
    }

    pub fn shares_sold(&self) -> u64 {
        self.sales.iter().map(|s| s.shares).sum()
    }

    pub fn espp_purchase_date(&self) -> Date {
        self.espp_offering_end.unwrap_or(self.grant_date)
    }

    pub fn espp_offering_start_date(&self) -> Date {
        self.espp_offering_start.unwrap_or_else(|| {
            add_months(self.espp_purchase_date(), -DEFAULT_ESPP_OFFERING_MONTHS)
        })
    }

    pub fn espp_discount(&self) -> f64 {
        self.espp_discount_percent.unwrap_or(DEFAULT_ESPP_DISCOUNT)
    }

    pub fn espp_fmv_purchase(&self) -> f64 {
        self.espp_fmv_at_purchase
            .or(self.grant_price)
            .unwrap_or(self.current_price)
    }

    pub fn espp_price_paid(&self) -> f64 {
        self.espp_purchase_price
            .unwrap_or_else(|| self.espp_fmv_purchase() * (1.0 - self.espp_discount() / 100.0))
    }

    pub fn espp_fmv_offering(&self) -> f64 {
        self.espp_fmv_at_offering_start
            .unwrap_or_else(|| self.espp_fmv_purchase())
    }
}
