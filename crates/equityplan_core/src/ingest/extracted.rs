//! Validation of document-extraction output
//!
//! The extraction service returns loosely-typed JSON. Required fields must be
//! present and well-formed or the whole payload is rejected. Optional fields
//! that are out of range are dropped and reported as warnings so the advisor
//! can fill them in by hand.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExtractionError;
use crate::model::{Grant, GrantId, GrantType, VestingSchedule};

/// Grant terms recovered from a document, after validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedGrantData {
    pub ticker: String,
    pub grant_type: GrantType,
    pub total_shares: u64,
    pub grant_date: Date,
    pub company_name: Option<String>,
    pub grant_price: Option<f64>,
    pub strike_price: Option<f64>,
    pub current_price: Option<f64>,
    pub withholding_rate: Option<f64>,
    pub vesting_schedule: VestingSchedule,
    pub espp_discount_percent: Option<f64>,
}

/// An optional field that was present but could not be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionWarning {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedExtraction {
    pub data: ExtractedGrantData,
    pub warnings: Vec<ExtractionWarning>,
}

impl ExtractedGrantData {
    /// Build a grant record priced at `current_price`.
    ///
    /// The strike falls back to the grant price for options, matching how
    /// grant documents usually state a single price.
    pub fn into_grant(self, id: impl Into<GrantId>, current_price: f64) -> Grant {
        let strike_price = match self.grant_type {
            GrantType::Iso | GrantType::Nso => self.strike_price.or(self.grant_price),
            GrantType::Rsu | GrantType::Espp => self.strike_price,
        };
        let espp = self.grant_type == GrantType::Espp;

        Grant {
            id: id.into(),
            grant_type: self.grant_type,
            company_name: self.company_name.unwrap_or_else(|| self.ticker.clone()),
            ticker: self.ticker,
            current_price,
            grant_price: self.grant_price,
            strike_price,
            grant_date: self.grant_date,
            total_shares: self.total_shares,
            vesting_schedule: self.vesting_schedule,
            custom_vesting_dates: Vec::new(),
            withholding_rate: self.withholding_rate,
            custom_held_shares: None,
            average_cost_basis: None,
            espp_discount_percent: self.espp_discount_percent,
            espp_purchase_price: None,
            espp_offering_start: None,
            espp_offering_end: espp.then_some(self.grant_date),
            espp_fmv_at_offering_start: None,
            espp_fmv_at_purchase: None,
            sales: Vec::new(),
            vesting_prices: Vec::new(),
        }
    }
}

/// Validate a raw extraction payload.
pub fn validate_extraction(raw: &Value) -> Result<ValidatedExtraction, ExtractionError> {
    let obj = raw.as_object().ok_or(ExtractionError::NotAnObject)?;
    let mut warnings = Vec::new();

    let ticker = required_str(obj, "ticker")?.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(invalid("ticker", "empty"));
    }

    let type_text = required_str(obj, "type")?;
    let grant_type = parse_grant_type(type_text)
        .ok_or_else(|| invalid("type", format!("unknown grant type '{type_text}'")))?;

    let total_shares = match obj.get("totalShares") {
        None | Some(Value::Null) => return Err(ExtractionError::MissingField("totalShares")),
        Some(value) => parse_share_count(value)
            .ok_or_else(|| invalid("totalShares", "expected a positive whole number"))?,
    };

    let date_text = required_str(obj, "grantDate")?;
    let grant_date: Date = date_text
        .trim()
        .parse()
        .map_err(|e| invalid("grantDate", format!("'{date_text}': {e}")))?;

    let company_name = match obj.get("companyName") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(_) => {
            warn(&mut warnings, "companyName", "not a non-empty string");
            None
        }
    };

    let grant_price = optional_amount(obj, "grantPrice", 0.0, f64::INFINITY, &mut warnings);
    let strike_price = optional_amount(obj, "strikePrice", 0.0, f64::INFINITY, &mut warnings);
    let current_price = optional_amount(obj, "currentPrice", 0.0, f64::INFINITY, &mut warnings);
    let withholding_rate = optional_amount(obj, "withholdingRate", 0.0, 100.0, &mut warnings);
    let espp_discount_percent =
        optional_amount(obj, "esppDiscountPercent", 0.0, 100.0, &mut warnings);

    let vesting_schedule = match obj.get("vestingSchedule") {
        None | Some(Value::Null) => VestingSchedule::default(),
        Some(value) => match value.as_str().and_then(parse_vesting_schedule) {
            Some(schedule) => schedule,
            None => {
                warn(
                    &mut warnings,
                    "vestingSchedule",
                    format!("unrecognized schedule {value}, using standard 4 year cliff"),
                );
                VestingSchedule::default()
            }
        },
    };

    Ok(ValidatedExtraction {
        data: ExtractedGrantData {
            ticker,
            grant_type,
            total_shares,
            grant_date,
            company_name,
            grant_price,
            strike_price,
            current_price,
            withholding_rate,
            vesting_schedule,
            espp_discount_percent,
        },
        warnings,
    })
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ExtractionError {
    ExtractionError::InvalidField {
        field,
        reason: reason.into(),
    }
}

fn warn(warnings: &mut Vec<ExtractionWarning>, field: &'static str, message: impl Into<String>) {
    let message = message.into();
    tracing::warn!(field, %message, "dropping extracted field");
    warnings.push(ExtractionWarning { field, message });
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ExtractionError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(ExtractionError::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(invalid(field, format!("expected a string, got {other}"))),
    }
}

fn parse_grant_type(text: &str) -> Option<GrantType> {
    match text.trim().to_ascii_uppercase().as_str() {
        "RSU" => Some(GrantType::Rsu),
        "ISO" => Some(GrantType::Iso),
        "NSO" => Some(GrantType::Nso),
        "ESPP" => Some(GrantType::Espp),
        _ => None,
    }
}

fn parse_vesting_schedule(text: &str) -> Option<VestingSchedule> {
    match text.trim().to_ascii_lowercase().as_str() {
        "standard_4y_1y_cliff" => Some(VestingSchedule::Standard4y1yCliff),
        "standard_4y_quarterly" => Some(VestingSchedule::Standard4yQuarterly),
        "immediate" => Some(VestingSchedule::Immediate),
        "custom" => Some(VestingSchedule::Custom),
        _ => None,
    }
}

/// Numbers or numeric strings ("1,250" included).
fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite())
}

fn parse_share_count(value: &Value) -> Option<u64> {
    let shares = parse_number(value)?;
    (shares >= 1.0 && shares.fract() == 0.0 && shares <= u64::MAX as f64).then_some(shares as u64)
}

fn optional_amount(
    obj: &Map<String, Value>,
    field: &'static str,
    min: f64,
    max: f64,
    warnings: &mut Vec<ExtractionWarning>,
) -> Option<f64> {
    let value = obj.get(field).filter(|v| !v.is_null())?;
    match parse_number(value) {
        Some(n) if (min..=max).contains(&n) => Some(n),
        Some(n) => {
            warn(warnings, field, format!("{n} is outside {min}..={max}"));
            None
        }
        None => {
            warn(warnings, field, format!("{value} is not a number"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "ticker": " acme ",
            "type": "iso",
            "totalShares": "4,000",
            "grantDate": "2024-03-01"
        })
    }

    #[test]
    fn test_minimal_payload() {
        let validated = validate_extraction(&minimal()).unwrap();
        assert!(validated.warnings.is_empty());

        let data = validated.data;
        assert_eq!(data.ticker, "ACME");
        assert_eq!(data.grant_type, GrantType::Iso);
        assert_eq!(data.total_shares, 4_000);
        assert_eq!(data.grant_date, date(2024, 3, 1));
        assert_eq!(data.vesting_schedule, VestingSchedule::Standard4y1yCliff);
        assert_eq!(data.company_name, None);
    }

    #[test]
    fn test_missing_required_fields() {
        for field in ["ticker", "type", "totalShares", "grantDate"] {
            let mut raw = minimal();
            raw.as_object_mut().unwrap().remove(field);
            assert_eq!(
                validate_extraction(&raw),
                Err(ExtractionError::MissingField(field))
            );
        }
    }

    #[test]
    fn test_invalid_required_fields() {
        let cases = [
            ("ticker", json!("   ")),
            ("type", json!("PSU")),
            ("totalShares", json!(0)),
            ("totalShares", json!(12.5)),
            ("totalShares", json!("lots")),
            ("grantDate", json!("03/01/2024")),
        ];
        for (field, value) in cases {
            let mut raw = minimal();
            raw[field] = value;
            match validate_extraction(&raw) {
                Err(ExtractionError::InvalidField { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected {field} to be invalid, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(
            validate_extraction(&json!([1, 2])),
            Err(ExtractionError::NotAnObject)
        );
    }

    #[test]
    fn test_out_of_range_optionals_are_dropped_with_warnings() {
        let mut raw = minimal();
        raw["withholdingRate"] = json!(140);
        raw["strikePrice"] = json!(-3.0);
        raw["grantPrice"] = json!("12.50");
        raw["vestingSchedule"] = json!("monthly");
        raw["esppDiscountPercent"] = json!("n/a");

        let validated = validate_extraction(&raw).unwrap();
        let fields: Vec<_> = validated.warnings.iter().map(|w| w.field).collect();
        assert_eq!(
            fields,
            vec!["strikePrice", "withholdingRate", "esppDiscountPercent", "vestingSchedule"]
        );
        assert_eq!(validated.data.withholding_rate, None);
        assert_eq!(validated.data.strike_price, None);
        assert_eq!(validated.data.grant_price, Some(12.5));
        assert_eq!(
            validated.data.vesting_schedule,
            VestingSchedule::Standard4y1yCliff
        );
    }

    #[test]
    fn test_into_grant_for_option_uses_grant_price_as_strike() {
        let mut raw = minimal();
        raw["grantPrice"] = json!(8.0);
        raw["companyName"] = json!("Acme Corp");
        raw["vestingSchedule"] = json!("STANDARD_4Y_QUARTERLY");

        let grant = validate_extraction(&raw)
            .unwrap()
            .data
            .into_grant("g9", 42.0);
        assert_eq!(grant.id.as_str(), "g9");
        assert_eq!(grant.company_name, "Acme Corp");
        assert_eq!(grant.current_price, 42.0);
        assert_eq!(grant.strike(), 8.0);
        assert_eq!(grant.strike_price, Some(8.0));
        assert_eq!(grant.vesting_schedule, VestingSchedule::Standard4yQuarterly);
        assert_eq!(grant.espp_offering_end, None);
    }

    #[test]
    fn test_into_grant_for_espp_sets_purchase_date() {
        let mut raw = minimal();
        raw["type"] = json!("ESPP");
        raw["esppDiscountPercent"] = json!(10);

        let grant = validate_extraction(&raw)
            .unwrap()
            .data
            .into_grant("e1", 30.0);
        assert_eq!(grant.company_name, "ACME");
        assert_eq!(grant.espp_purchase_date(), date(2024, 3, 1));
        assert_eq!(grant.espp_discount(), 10.0);
    }
}
