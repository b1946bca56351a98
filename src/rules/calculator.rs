use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use crate::decimal::Money;
use crate::formula;
use crate::rules::{Breakdown, CalculationMethod, CalculationResult, DuesRule, TierBracket};
use crate::types::{BaseField, CalculationInputs};

/// compute the charge amount for one rule against one member's inputs
///
/// never fails: misconfigured parameters, unknown base fields, broken
/// formulas, and non-finite results all collapse to a zero amount so one
/// member's bad rule cannot abort an organization's billing run
pub fn calculate(rule: &DuesRule, inputs: &CalculationInputs) -> CalculationResult {
    match &rule.method {
        CalculationMethod::FlatRate { flat_amount } => flat_rate(*flat_amount),
        CalculationMethod::Percentage {
            percentage_rate,
            base_field,
        } => percentage(*percentage_rate, base_field.as_deref(), inputs),
        CalculationMethod::Hourly {
            hourly_rate,
            hours_per_period,
        } => hourly(*hourly_rate, *hours_per_period, inputs),
        CalculationMethod::Tiered { tier_structure } => tiered(tier_structure, inputs),
        CalculationMethod::Formula { custom_formula } => formula_amount(custom_formula, inputs),
    }
}

fn flat_rate(flat_amount: Option<Money>) -> CalculationResult {
    let amount = flat_amount.unwrap_or(Money::ZERO);
    CalculationResult {
        amount,
        breakdown: Breakdown::FlatRate {
            flat_amount: amount,
        },
    }
}

fn percentage(
    rate: Option<Decimal>,
    base_field: Option<&str>,
    inputs: &CalculationInputs,
) -> CalculationResult {
    let field_name = base_field.unwrap_or_default();
    let (base, rate) = match (BaseField::from_str(field_name), rate) {
        (Ok(field), Some(rate)) => (inputs.get_or_zero(field), rate),
        (Err(()), _) => {
            debug!(field = field_name, "percentage rule references unknown base field");
            (Decimal::ZERO, Decimal::ZERO)
        }
        (_, None) => (Decimal::ZERO, Decimal::ZERO),
    };

    CalculationResult {
        amount: Money::from_decimal(base * rate / Decimal::from(100)),
        breakdown: Breakdown::Percentage {
            base_field: field_name.to_string(),
            base_amount: base,
            rate,
        },
    }
}

fn hourly(
    hourly_rate: Option<Decimal>,
    hours_per_period: Option<Decimal>,
    inputs: &CalculationInputs,
) -> CalculationResult {
    // actual hours worked beat the rule's scheduled hours
    let hours = inputs
        .hours_worked
        .or(hours_per_period)
        .unwrap_or(Decimal::ZERO);
    let rate = hourly_rate.unwrap_or(Decimal::ZERO);

    CalculationResult {
        amount: Money::from_decimal(hours * rate),
        breakdown: Breakdown::Hourly {
            hours,
            hourly_rate: rate,
        },
    }
}

fn tiered(tiers: &[TierBracket], inputs: &CalculationInputs) -> CalculationResult {
    let base = inputs
        .gross_wages
        .or(inputs.base_salary)
        .unwrap_or(Decimal::ZERO);

    // first listed match wins; list order is authoritative, not bracket width
    for (index, tier) in tiers.iter().enumerate() {
        if !tier.contains(base) {
            continue;
        }

        let amount = match (tier.flat_amount, tier.rate) {
            (Some(flat), _) => flat,
            (None, Some(rate)) => Money::from_decimal(base * rate / Decimal::from(100)),
            (None, None) => Money::ZERO,
        };

        return CalculationResult {
            amount,
            breakdown: Breakdown::Tiered {
                base_amount: base,
                tier: format!("tier_{}", index + 1),
                rate: tier.rate,
                flat_amount: tier.flat_amount,
            },
        };
    }

    CalculationResult {
        amount: Money::ZERO,
        breakdown: Breakdown::Tiered {
            base_amount: base,
            tier: "none".to_string(),
            rate: None,
            flat_amount: None,
        },
    }
}

fn formula_amount(custom_formula: &str, inputs: &CalculationInputs) -> CalculationResult {
    let variables = inputs.variables();
    let vars: Vec<(&str, f64)> = variables.iter().map(|(n, v)| (*n, *v)).collect();

    let (amount, error) = match formula::evaluate(custom_formula, &vars) {
        Ok(value) if value.is_finite() => (Money::from_f64_lossy(value), None),
        Ok(_) => {
            debug!(formula = custom_formula, "formula produced non-finite result");
            (Money::ZERO, Some("non-finite result".to_string()))
        }
        Err(err) => {
            debug!(formula = custom_formula, %err, "formula rejected, amount falls back to zero");
            (Money::ZERO, Some(err.to_string()))
        }
    };

    CalculationResult {
        amount,
        breakdown: Breakdown::Formula {
            formula: custom_formula.to_string(),
            inputs: *inputs,
            error,
        },
    }
}
