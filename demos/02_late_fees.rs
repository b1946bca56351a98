/// late fees - accrue a one-time penalty on past-due transactions
use chrono::{NaiveDate, TimeZone, Utc};
use dues_engine::types::{BillingFrequency, MemberDuesAssignment};
use dues_engine::{
    BillingEngine, BillingPeriod, CalculationMethod, DuesRule, InMemoryStore, Money,
    SafeTimeProvider, TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // surface the engine's run logs; RUST_LOG=debug shows per-member detail
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let organization = Uuid::new_v4();
    let member = Uuid::new_v4();
    let mut store = InMemoryStore::new();

    let rule = DuesRule {
        id: Uuid::new_v4(),
        name: "flat monthly".to_string(),
        method: CalculationMethod::FlatRate {
            flat_amount: Some(Money::from_str_exact("52.50")?),
        },
        billing_frequency: BillingFrequency::Monthly,
    };
    store.add_member(organization, member);
    store.add_assignment(MemberDuesAssignment {
        id: Uuid::new_v4(),
        member_id: member,
        rule_id: rule.id,
        effective_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        end_date: None,
        is_active: true,
        override_amount: None,
    });
    store.add_rule(rule);

    // bill january; due date lands on february 15
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
    ));
    let january = BillingPeriod::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    )?;

    let mut engine = BillingEngine::default();
    let reads = store.clone();
    engine.generate_billing_cycle(
        &reads, &reads, &reads, &mut store, organization, january, &time,
    )?;

    // a month later the transaction is past due; the default 2% applies
    let later = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
    ));
    let summary = engine.calculate_late_fees(&mut store, organization, None, &later)?;
    println!("late fees applied: {}", summary.transactions_updated);

    let txn = &store.transactions()[0];
    println!(
        "amount {} + late fee {} = total {}",
        txn.amount, txn.late_fee_amount, txn.total_amount
    );
    assert_eq!(txn.late_fee_amount, Money::from_str_exact("1.05")?);

    // the zero-late-fee guard makes a second run a no-op
    let again = engine.calculate_late_fees(&mut store, organization, None, &later)?;
    assert_eq!(again.transactions_updated, 0);

    Ok(())
}
