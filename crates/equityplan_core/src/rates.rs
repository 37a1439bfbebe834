//! Effective tax-rate resolution
//!
//! Turns a client's profile into the handful of marginal rates every other
//! calculation multiplies by. Manual overrides on the client always win over
//! the static tables in [`crate::tax_tables`].

use serde::{Deserialize, Serialize};

use crate::model::Client;
use crate::tax_tables::{NIIT_RATE, ltcg_rate_percent, state_rate_percent};

/// Marginal rates for one client, all as fractions (0.32 for 32%)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRates {
    pub state_rate: f64,
    pub fed_ltcg_rate: f64,
    /// Federal ordinary bracket plus state
    pub ordinary_rate: f64,
    /// Federal LTCG plus state plus NIIT
    pub ltcg_rate: f64,
}

impl TaxRates {
    /// Ordinary plus NIIT; the rate used for vest income and tax-gap figures.
    pub fn effective_vest_rate(&self) -> f64 {
        self.ordinary_rate + NIIT_RATE
    }

    /// Marginal benefit of shifting a dollar from ordinary to LTCG treatment.
    pub fn ordinary_ltcg_differential(&self) -> f64 {
        self.ordinary_rate - self.ltcg_rate
    }
}

/// Resolve a client's effective rates. Never fails; missing data resolves to zero.
pub fn resolve_rates(client: &Client) -> TaxRates {
    let state_rate = client
        .custom_state_tax_rate
        .unwrap_or_else(|| state_rate_percent(&client.state))
        / 100.0;
    let fed_ltcg_rate = client
        .custom_ltcg_tax_rate
        .unwrap_or_else(|| ltcg_rate_percent(client.tax_bracket))
        / 100.0;

    TaxRates {
        state_rate,
        fed_ltcg_rate,
        ordinary_rate: client.tax_bracket / 100.0 + state_rate,
        ltcg_rate: fed_ltcg_rate + state_rate + NIIT_RATE,
    }
}
