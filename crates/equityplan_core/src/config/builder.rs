//! Client and Grant Builders
//!
//! Fluent construction of client records for tests, benchmarks and sample
//! data. Records produced here are identical to ones loaded from storage.
//!
//! # Example
//!
//! ```ignore
//! use equityplan_core::config::{ClientBuilder, GrantBuilder};
//!
//! let client = ClientBuilder::new("c1")
//!     .name("Ada")
//!     .state("CA")
//!     .bracket(35.0)
//!     .grant(
//!         GrantBuilder::iso("g1", "ACME")
//!             .granted(2022, 1, 15)
//!             .shares(4_000)
//!             .strike(10.0)
//!             .price(60.0),
//!     )
//!     .build();
//! ```

use jiff::civil::Date;

use crate::model::{
    Client, ClientId, CustomVestingDate, FilingStatus, Grant, GrantId, GrantType, PlannedExercise,
    StockSale, VestingPrice, VestingSchedule,
};

/// Builder for a [`Client`] with its grants and planned exercises
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    client: Client,
}

impl ClientBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            client: Client {
                id: ClientId::from(id),
                name: id.to_string(),
                state: "CA".to_string(),
                filing_status: FilingStatus::Single,
                tax_bracket: 32.0,
                estimated_income: None,
                custom_state_tax_rate: None,
                custom_ltcg_tax_rate: None,
                custom_amt_safe_harbor: None,
                grants: Vec::new(),
                planned_exercises: Vec::new(),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.client.name = name.to_string();
        self
    }

    pub fn state(mut self, state: &str) -> Self {
        self.client.state = state.to_string();
        self
    }

    pub fn single(mut self) -> Self {
        self.client.filing_status = FilingStatus::Single;
        self
    }

    pub fn married_joint(mut self) -> Self {
        self.client.filing_status = FilingStatus::MarriedJoint;
        self
    }

    /// Top federal ordinary bracket, in percent
    pub fn bracket(mut self, percent: f64) -> Self {
        self.client.tax_bracket = percent;
        self
    }

    pub fn income(mut self, amount: f64) -> Self {
        self.client.estimated_income = Some(amount);
        self
    }

    pub fn custom_state_rate(mut self, percent: f64) -> Self {
        self.client.custom_state_tax_rate = Some(percent);
        self
    }

    pub fn custom_ltcg_rate(mut self, percent: f64) -> Self {
        self.client.custom_ltcg_tax_rate = Some(percent);
        self
    }

    pub fn amt_safe_harbor(mut self, amount: f64) -> Self {
        self.client.custom_amt_safe_harbor = Some(amount);
        self
    }

    pub fn grant(mut self, grant: GrantBuilder) -> Self {
        self.client.grants.push(grant.build());
        self
    }

    pub fn exercise(mut self, exercise: PlannedExercise) -> Self {
        self.client.planned_exercises.push(exercise);
        self
    }

    #[must_use]
    pub fn build(self) -> Client {
        self.client
    }
}

/// Builder for a single [`Grant`]
#[derive(Debug, Clone)]
pub struct GrantBuilder {
    grant: Grant,
}

impl GrantBuilder {
    pub fn new(id: &str, grant_type: GrantType, ticker: &str) -> Self {
        Self {
            grant: Grant {
                id: GrantId::from(id),
                grant_type,
                ticker: ticker.to_string(),
                company_name: ticker.to_string(),
                current_price: 0.0,
                grant_price: None,
                strike_price: None,
                grant_date: jiff::civil::date(2024, 1, 1),
                total_shares: 0,
                vesting_schedule: VestingSchedule::Standard4y1yCliff,
                custom_vesting_dates: Vec::new(),
                withholding_rate: None,
                custom_held_shares: None,
                average_cost_basis: None,
                espp_discount_percent: None,
                espp_purchase_price: None,
                espp_offering_start: None,
                espp_offering_end: None,
                espp_fmv_at_offering_start: None,
                espp_fmv_at_purchase: None,
                sales: Vec::new(),
                vesting_prices: Vec::new(),
            },
        }
    }

    pub fn rsu(id: &str, ticker: &str) -> Self {
        Self::new(id, GrantType::Rsu, ticker)
    }

    pub fn iso(id: &str, ticker: &str) -> Self {
        Self::new(id, GrantType::Iso, ticker)
    }

    pub fn nso(id: &str, ticker: &str) -> Self {
        Self::new(id, GrantType::Nso, ticker)
    }

    /// ESPP purchases vest immediately on the purchase date
    pub fn espp(id: &str, ticker: &str) -> Self {
        Self::new(id, GrantType::Espp, ticker).immediate()
    }

    pub fn company(mut self, name: &str) -> Self {
        self.grant.company_name = name.to_string();
        self
    }

    /// Current market price per share
    pub fn price(mut self, price: f64) -> Self {
        self.grant.current_price = price;
        self
    }

    pub fn grant_price(mut self, price: f64) -> Self {
        self.grant.grant_price = Some(price);
        self
    }

    pub fn strike(mut self, price: f64) -> Self {
        self.grant.strike_price = Some(price);
        self
    }

    pub fn granted(mut self, year: i16, month: i8, day: i8) -> Self {
        self.grant.grant_date = jiff::civil::date(year, month, day);
        self
    }

    pub fn shares(mut self, shares: u64) -> Self {
        self.grant.total_shares = shares;
        self
    }

    pub fn cliff(mut self) -> Self {
        self.grant.vesting_schedule = VestingSchedule::Standard4y1yCliff;
        self
    }

    pub fn quarterly(mut self) -> Self {
        self.grant.vesting_schedule = VestingSchedule::Standard4yQuarterly;
        self
    }

    pub fn immediate(mut self) -> Self {
        self.grant.vesting_schedule = VestingSchedule::Immediate;
        self
    }

    pub fn custom(mut self, dates: &[(Date, u64)]) -> Self {
        self.grant.vesting_schedule = VestingSchedule::Custom;
        self.grant.custom_vesting_dates = dates
            .iter()
            .map(|&(date, shares)| CustomVestingDate { date, shares })
            .collect();
        self
    }

    /// Withholding election, in percent
    pub fn withholding(mut self, percent: f64) -> Self {
        self.grant.withholding_rate = Some(percent);
        self
    }

    pub fn held_shares(mut self, shares: u64) -> Self {
        self.grant.custom_held_shares = Some(shares);
        self
    }

    pub fn cost_basis(mut self, per_share: f64) -> Self {
        self.grant.average_cost_basis = Some(per_share);
        self
    }

    pub fn espp_purchase(mut self, date: Date) -> Self {
        self.grant.espp_offering_end = Some(date);
        self.grant.grant_date = date;
        self
    }

    pub fn espp_offering_start(mut self, date: Date) -> Self {
        self.grant.espp_offering_start = Some(date);
        self
    }

    pub fn espp_fmv(mut self, at_offering_start: f64, at_purchase: f64) -> Self {
        self.grant.espp_fmv_at_offering_start = Some(at_offering_start);
        self.grant.espp_fmv_at_purchase = Some(at_purchase);
        self
    }

    pub fn espp_purchase_price(mut self, price: f64) -> Self {
        self.grant.espp_purchase_price = Some(price);
        self
    }

    pub fn espp_discount(mut self, percent: f64) -> Self {
        self.grant.espp_discount_percent = Some(percent);
        self
    }

    pub fn sale(mut self, date: Date, shares: u64, price: f64, reason: &str) -> Self {
        self.grant.sales.push(StockSale {
            date,
            shares,
            price,
            proceeds: shares as f64 * price,
            reason: reason.to_string(),
        });
        self
    }

    pub fn vest_price(mut self, date: Date, price: f64) -> Self {
        self.grant.vesting_prices.push(VestingPrice { date, price });
        self
    }

    #[must_use]
    pub fn build(self) -> Grant {
        self.grant
    }
}
