pub mod calculator;

pub use calculator::calculate;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::decimal::Money;
use crate::types::{BaseField, BillingFrequency, CalculationInputs, RuleId};

/// a named dues calculation policy
///
/// rules are immutable once a generated transaction references them; a
/// change is a new rule, so historical charges stay reproducible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuesRule {
    pub id: RuleId,
    pub name: String,
    #[serde(flatten)]
    pub method: CalculationMethod,
    pub billing_frequency: BillingFrequency,
}

/// calculation strategy with its type-specific parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculation_type", rename_all = "snake_case")]
pub enum CalculationMethod {
    FlatRate {
        flat_amount: Option<Money>,
    },
    Percentage {
        /// percent, e.g. 1.5 for 1.5%
        percentage_rate: Option<Decimal>,
        /// input field name as authored; parsed at calculation time so a
        /// typo is an explicit unknown-field outcome
        base_field: Option<String>,
    },
    Hourly {
        hourly_rate: Option<Decimal>,
        hours_per_period: Option<Decimal>,
    },
    Tiered {
        /// list order is authoritative: first matching tier wins
        tier_structure: Vec<TierBracket>,
    },
    Formula {
        custom_formula: String,
    },
}

/// one bracket of a tiered rate schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBracket {
    /// defaults to 0 when absent
    pub min_amount: Option<Decimal>,
    /// unbounded when absent
    pub max_amount: Option<Decimal>,
    /// percent applied to the base amount
    pub rate: Option<Decimal>,
    /// fixed charge, takes precedence over rate
    pub flat_amount: Option<Money>,
}

impl TierBracket {
    /// does `base` fall in this bracket?
    pub fn contains(&self, base: Decimal) -> bool {
        let min = self.min_amount.unwrap_or(Decimal::ZERO);
        base >= min && self.max_amount.map_or(true, |max| base <= max)
    }
}

/// provenance of a calculated amount; audited and replayed as the next
/// period's calculation inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Breakdown {
    FlatRate {
        flat_amount: Money,
    },
    Percentage {
        base_field: String,
        base_amount: Decimal,
        rate: Decimal,
    },
    Hourly {
        hours: Decimal,
        hourly_rate: Decimal,
    },
    Tiered {
        base_amount: Decimal,
        /// matched bracket label, or "none"
        tier: String,
        rate: Option<Decimal>,
        flat_amount: Option<Money>,
    },
    Formula {
        formula: String,
        inputs: CalculationInputs,
        /// set when the formula failed and the amount fell back to zero
        error: Option<String>,
    },
    Override {
        amount: Money,
    },
}

impl Breakdown {
    /// map this breakdown's recorded figures back into the input fields a
    /// later period can calculate from
    pub fn to_inputs(&self) -> CalculationInputs {
        match self {
            Breakdown::Percentage {
                base_field,
                base_amount,
                ..
            } => {
                let mut inputs = CalculationInputs::default();
                match BaseField::from_str(base_field) {
                    Ok(BaseField::GrossWages) => inputs.gross_wages = Some(*base_amount),
                    Ok(BaseField::BaseSalary) => inputs.base_salary = Some(*base_amount),
                    Ok(BaseField::HourlyRate) => inputs.hourly_rate = Some(*base_amount),
                    Ok(BaseField::HoursWorked) => inputs.hours_worked = Some(*base_amount),
                    Err(()) => {}
                }
                inputs
            }
            Breakdown::Hourly { hours, hourly_rate } => CalculationInputs {
                hourly_rate: Some(*hourly_rate),
                hours_worked: Some(*hours),
                ..Default::default()
            },
            Breakdown::Tiered { base_amount, .. } => CalculationInputs {
                gross_wages: Some(*base_amount),
                ..Default::default()
            },
            Breakdown::Formula { inputs, .. } => *inputs,
            Breakdown::FlatRate { .. } | Breakdown::Override { .. } => {
                CalculationInputs::default()
            }
        }
    }
}

/// result of one rule calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub amount: Money,
    pub breakdown: Breakdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_rule_json_shape() {
        let rule = DuesRule {
            id: Uuid::nil(),
            name: "standard".to_string(),
            method: CalculationMethod::Percentage {
                percentage_rate: Some(dec!(1.5)),
                base_field: Some("grossWages".to_string()),
            },
            billing_frequency: BillingFrequency::Monthly,
        };

        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["calculation_type"], "percentage");
        assert_eq!(json["base_field"], "grossWages");
        assert_eq!(json["billing_frequency"], "monthly");

        let back: DuesRule = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn test_breakdown_json_shape() {
        let breakdown = Breakdown::Tiered {
            base_amount: dec!(750),
            tier: "tier_1".to_string(),
            rate: None,
            flat_amount: Some(Money::from_major(10)),
        };
        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json["type"], "tiered");
        assert_eq!(json["tier"], "tier_1");
        let back: Breakdown = serde_json::from_value(json).unwrap();
        assert_eq!(back, breakdown);

        let breakdown = Breakdown::Formula {
            formula: "grossWages * 0.015".to_string(),
            inputs: CalculationInputs {
                gross_wages: Some(dec!(3200)),
                ..Default::default()
            },
            error: None,
        };
        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json["type"], "formula");
        assert_eq!(json["formula"], "grossWages * 0.015");
        let back: Breakdown = serde_json::from_value(json).unwrap();
        assert_eq!(back, breakdown);
    }

    #[test]
    fn test_tier_contains_defaults() {
        let open = TierBracket {
            min_amount: None,
            max_amount: None,
            rate: Some(dec!(2)),
            flat_amount: None,
        };
        assert!(open.contains(dec!(0)));
        assert!(open.contains(dec!(1_000_000)));

        let bounded = TierBracket {
            min_amount: Some(dec!(500)),
            max_amount: Some(dec!(2000)),
            rate: None,
            flat_amount: None,
        };
        assert!(!bounded.contains(dec!(499.99)));
        assert!(bounded.contains(dec!(500)));
        assert!(bounded.contains(dec!(2000)));
        assert!(!bounded.contains(dec!(2000.01)));
    }

    #[test]
    fn test_breakdown_seeds_next_period() {
        let breakdown = Breakdown::Percentage {
            base_field: "grossWages".to_string(),
            base_amount: dec!(3200),
            rate: dec!(1.5),
        };
        assert_eq!(breakdown.to_inputs().gross_wages, Some(dec!(3200)));

        let breakdown = Breakdown::Hourly {
            hours: dec!(160),
            hourly_rate: dec!(21.50),
        };
        let inputs = breakdown.to_inputs();
        assert_eq!(inputs.hours_worked, Some(dec!(160)));
        assert_eq!(inputs.hourly_rate, Some(dec!(21.50)));

        let breakdown = Breakdown::Tiered {
            base_amount: dec!(4000),
            tier: "tier_2".to_string(),
            rate: Some(dec!(2)),
            flat_amount: None,
        };
        assert_eq!(breakdown.to_inputs().gross_wages, Some(dec!(4000)));

        let breakdown = Breakdown::Override {
            amount: Money::from_str_exact("15.50").unwrap(),
        };
        assert_eq!(breakdown.to_inputs(), CalculationInputs::default());
    }
}
