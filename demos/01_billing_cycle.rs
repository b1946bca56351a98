/// billing cycle - generate a month of transactions for an organization
use chrono::{NaiveDate, TimeZone, Utc};
use dues_engine::types::{BillingFrequency, MemberDuesAssignment};
use dues_engine::{
    BillingEngine, BillingPeriod, CalculationMethod, DuesRule, InMemoryStore, Money,
    SafeTimeProvider, TimeSource, Uuid,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // surface the engine's run logs; RUST_LOG=debug shows per-member detail
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
    ));

    let organization = Uuid::new_v4();
    let mut store = InMemoryStore::new();

    // flat $25 monthly dues
    let flat = DuesRule {
        id: Uuid::new_v4(),
        name: "flat monthly".to_string(),
        method: CalculationMethod::FlatRate {
            flat_amount: Some(Money::from_str_exact("25.00")?),
        },
        billing_frequency: BillingFrequency::Monthly,
    };

    for _ in 0..3 {
        let member = Uuid::new_v4();
        store.add_member(organization, member);
        store.add_assignment(MemberDuesAssignment {
            id: Uuid::new_v4(),
            member_id: member,
            rule_id: flat.id,
            effective_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end_date: None,
            is_active: true,
            override_amount: None,
        });
    }
    store.add_rule(flat);

    let january = BillingPeriod::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    )?;

    let mut engine = BillingEngine::default();

    let reads = store.clone();
    let summary = engine.generate_billing_cycle(
        &reads, &reads, &reads, &mut store, organization, january, &time,
    )?;
    println!("first run created: {}", summary.transactions_created);

    // re-running the same cycle is a no-op
    let reads = store.clone();
    let again = engine.generate_billing_cycle(
        &reads, &reads, &reads, &mut store, organization, january, &time,
    )?;
    println!("second run created: {}", again.transactions_created);
    assert_eq!(again.transactions_created, 0);

    for txn in store.transactions() {
        println!(
            "member {} owes {} by {}",
            txn.member_id, txn.total_amount, txn.due_date
        );
    }

    Ok(())
}
