//! Static tax configuration data
//!
//! Rates here are planning inputs, not derived logic. Update them when
//! states or the IRS publish new figures; nothing else in the engine needs
//! to change.

/// Net Investment Income Tax, applied uniformly to capital gains
pub const NIIT_RATE: f64 = 0.038;

/// Flat AMT rate used to approximate liability on spread beyond the room
pub const AMT_RATE: f64 = 0.28;

/// Annual AMT room for single filers (planning heuristic, no phase-out)
pub const AMT_ROOM_SINGLE: f64 = 85_700.0;

/// Annual AMT room for joint filers (planning heuristic, no phase-out)
pub const AMT_ROOM_MARRIED_JOINT: f64 = 133_300.0;

/// Top marginal personal income tax rate by state, in percent (2025).
/// States without a wage income tax map to zero.
pub const STATE_TAX_RATES: &[(&str, f64)] = &[
    ("AL", 5.0),
    ("AK", 0.0),
    ("AZ", 2.5),
    ("AR", 3.9),
    ("CA", 13.3),
    ("CO", 4.4),
    ("CT", 6.99),
    ("DE", 6.6),
    ("DC", 10.75),
    ("FL", 0.0),
    ("GA", 5.39),
    ("HI", 11.0),
    ("ID", 5.695),
    ("IL", 4.95),
    ("IN", 3.0),
    ("IA", 3.8),
    ("KS", 5.58),
    ("KY", 4.0),
    ("LA", 3.0),
    ("ME", 7.15),
    ("MD", 5.75),
    ("MA", 9.0),
    ("MI", 4.25),
    ("MN", 9.85),
    ("MS", 4.4),
    ("MO", 4.7),
    ("MT", 5.9),
    ("NE", 5.2),
    ("NV", 0.0),
    ("NH", 0.0),
    ("NJ", 10.75),
    ("NM", 5.9),
    ("NY", 10.9),
    ("NC", 4.25),
    ("ND", 2.5),
    ("OH", 3.5),
    ("OK", 4.75),
    ("OR", 9.9),
    ("PA", 3.07),
    ("RI", 5.99),
    ("SC", 6.2),
    ("SD", 0.0),
    ("TN", 0.0),
    ("TX", 0.0),
    ("UT", 4.55),
    ("VT", 8.75),
    ("VA", 5.75),
    ("WA", 0.0),
    ("WV", 4.82),
    ("WI", 7.65),
    ("WY", 0.0),
];

/// A long-term capital gains tier keyed on the client's ordinary bracket
#[derive(Debug, Clone, Copy)]
pub struct LtcgTier {
    /// Highest ordinary marginal bracket (percent) that maps to this tier
    pub max_ordinary_bracket: f64,
    /// Federal LTCG rate for the tier, in percent
    pub rate: f64,
}

/// Ordinary bracket → LTCG tier. The 35% bracket maps to 15%.
pub const LTCG_TIERS: &[LtcgTier] = &[
    LtcgTier {
        max_ordinary_bracket: 12.0,
        rate: 0.0,
    },
    LtcgTier {
        max_ordinary_bracket: 35.0,
        rate: 15.0,
    },
    LtcgTier {
        max_ordinary_bracket: 100.0,
        rate: 20.0,
    },
];

/// Top state rate in percent; unknown codes resolve to zero.
pub fn state_rate_percent(state: &str) -> f64 {
    let code = state.trim();
    STATE_TAX_RATES
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(code))
        .map(|(_, rate)| *rate)
        .unwrap_or(0.0)
}

/// Federal LTCG rate in percent for an ordinary marginal bracket in percent.
pub fn ltcg_rate_percent(tax_bracket: f64) -> f64 {
    LTCG_TIERS
        .iter()
        .find(|tier| tax_bracket <= tier.max_ordinary_bracket)
        .or(LTCG_TIERS.last())
        .map(|tier| tier.rate)
        .unwrap_or(0.0)
}
