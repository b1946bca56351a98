/// quick start - calculate dues for a single rule
use dues_engine::{calculate, CalculationInputs, CalculationMethod, DuesRule, Money};
use dues_engine::types::BillingFrequency;
use dues_engine::Uuid;
use rust_decimal_macros::dec;

fn main() {
    // 1.5% of gross wages, billed monthly
    let rule = DuesRule {
        id: Uuid::new_v4(),
        name: "standard percentage".to_string(),
        method: CalculationMethod::Percentage {
            percentage_rate: Some(dec!(1.5)),
            base_field: Some("grossWages".to_string()),
        },
        billing_frequency: BillingFrequency::Monthly,
    };

    let inputs = CalculationInputs {
        gross_wages: Some(dec!(3200)),
        ..Default::default()
    };

    let result = calculate(&rule, &inputs);
    println!("amount: {}", result.amount);
    println!("breakdown: {}", serde_json::to_string_pretty(&result.breakdown).unwrap());

    // a user-authored formula rule; broken formulas never panic, they
    // fall back to a zero amount with the error recorded
    let formula_rule = DuesRule {
        id: Uuid::new_v4(),
        name: "custom formula".to_string(),
        method: CalculationMethod::Formula {
            custom_formula: "grossWages * 0.01 + hoursWorked / 4".to_string(),
        },
        billing_frequency: BillingFrequency::Monthly,
    };

    let inputs = CalculationInputs {
        gross_wages: Some(dec!(3200)),
        hours_worked: Some(dec!(160)),
        ..Default::default()
    };
    let result = calculate(&formula_rule, &inputs);
    println!("formula amount: {}", result.amount);
    assert_eq!(result.amount, Money::from_str_exact("72.00").unwrap());
}
