use hourglass_rs::SafeTimeProvider;
use tracing::info;

use crate::billing::{BillingEngine, LateFeeRunSummary};
use crate::decimal::Rate;
use crate::errors::Result;
use crate::events::BillingEvent;
use crate::store::TransactionLedger;
use crate::types::OrganizationId;

impl BillingEngine {
    /// apply late fees to an organization's past-due pending transactions
    ///
    /// a transaction qualifies when its due date is strictly before today
    /// and its late fee is still zero; the zero check is the idempotency
    /// guard, so re-running the job never charges twice. `rate` falls back
    /// to the configured default (2%).
    ///
    /// transaction status is deliberately left untouched: the overdue
    /// status transition belongs to a separate collaborator and downstream
    /// consumers may depend on a fee-bearing transaction still reading as
    /// pending.
    pub fn calculate_late_fees(
        &mut self,
        ledger: &mut dyn TransactionLedger,
        organization_id: OrganizationId,
        rate: Option<Rate>,
        time: &SafeTimeProvider,
    ) -> Result<LateFeeRunSummary> {
        let rate = rate.unwrap_or(self.config.default_late_fee_rate);
        let today = time.now().date_naive();

        let candidates = ledger.overdue_pending_without_late_fee(organization_id, today)?;
        info!(
            %organization_id,
            %rate,
            candidates = candidates.len(),
            "starting late fee run"
        );

        let mut transactions_updated = 0usize;
        for transaction in candidates {
            let late_fee = transaction.amount.apply_rate(rate);
            let total = transaction.amount + late_fee;

            ledger.apply_late_fee(transaction.id, late_fee, total)?;
            transactions_updated += 1;

            self.events.emit(BillingEvent::LateFeeApplied {
                transaction_id: transaction.id,
                member_id: transaction.member_id,
                late_fee_amount: late_fee,
                total_amount: total,
            });
        }

        info!(%organization_id, transactions_updated, "late fee run complete");
        self.events.emit(BillingEvent::LateFeeRunCompleted {
            organization_id,
            rate,
            transactions_updated,
        });

        Ok(LateFeeRunSummary {
            transactions_updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::errors::DuesError;
    use crate::rules::Breakdown;
    use crate::store::InMemoryStore;
    use crate::types::{DuesTransaction, TransactionStatus};
    use chrono::{NaiveDate, TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time_at(y: i32, m: u32, d: u32) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap(),
        ))
    }

    fn pending_transaction(
        org: OrganizationId,
        amount: &str,
        due: NaiveDate,
    ) -> DuesTransaction {
        let amount = Money::from_str_exact(amount).unwrap();
        DuesTransaction {
            id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            organization_id: org,
            assignment_id: Uuid::new_v4(),
            rule_id: None,
            amount,
            late_fee_amount: Money::ZERO,
            total_amount: amount,
            period_start: date(2024, 1, 1),
            period_end: date(2024, 1, 31),
            due_date: due,
            status: TransactionStatus::Pending,
            breakdown: Breakdown::FlatRate {
                flat_amount: amount,
            },
            created_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_fee_applied_once() {
        let org = Uuid::new_v4();
        let mut store = InMemoryStore::new();
        store
            .insert_batch(vec![pending_transaction(org, "52.50", date(2024, 2, 15))])
            .unwrap();

        let mut engine = BillingEngine::default();
        let time = time_at(2024, 2, 20);

        let first = engine
            .calculate_late_fees(&mut store, org, None, &time)
            .unwrap();
        assert_eq!(first.transactions_updated, 1);

        let txn = &store.transactions()[0];
        assert_eq!(txn.late_fee_amount, Money::from_str_exact("1.05").unwrap());
        assert_eq!(txn.total_amount, Money::from_str_exact("53.55").unwrap());
        // status stays pending; the overdue transition is not this job's
        assert_eq!(txn.status, TransactionStatus::Pending);

        let second = engine
            .calculate_late_fees(&mut store, org, None, &time)
            .unwrap();
        assert_eq!(second.transactions_updated, 0);
        assert_eq!(
            store.transactions()[0].late_fee_amount,
            Money::from_str_exact("1.05").unwrap()
        );
    }

    #[test]
    fn test_due_today_is_not_late() {
        let org = Uuid::new_v4();
        let mut store = InMemoryStore::new();
        store
            .insert_batch(vec![pending_transaction(org, "25.00", date(2024, 2, 15))])
            .unwrap();

        let mut engine = BillingEngine::default();
        let on_due_date = time_at(2024, 2, 15);
        let summary = engine
            .calculate_late_fees(&mut store, org, None, &on_due_date)
            .unwrap();
        assert_eq!(summary.transactions_updated, 0);
    }

    #[test]
    fn test_explicit_rate_overrides_default() {
        let org = Uuid::new_v4();
        let mut store = InMemoryStore::new();
        store
            .insert_batch(vec![pending_transaction(org, "100.00", date(2024, 2, 15))])
            .unwrap();

        let mut engine = BillingEngine::default();
        engine
            .calculate_late_fees(
                &mut store,
                org,
                Some(Rate::from_percentage(5)),
                &time_at(2024, 3, 1),
            )
            .unwrap();

        assert_eq!(
            store.transactions()[0].late_fee_amount,
            Money::from_str_exact("5.00").unwrap()
        );
    }

    #[test]
    fn test_other_organizations_untouched() {
        let org = Uuid::new_v4();
        let other_org = Uuid::new_v4();
        let mut store = InMemoryStore::new();
        store
            .insert_batch(vec![
                pending_transaction(org, "25.00", date(2024, 2, 15)),
                pending_transaction(other_org, "25.00", date(2024, 2, 15)),
            ])
            .unwrap();

        let mut engine = BillingEngine::default();
        let summary = engine
            .calculate_late_fees(&mut store, org, None, &time_at(2024, 3, 1))
            .unwrap();

        assert_eq!(summary.transactions_updated, 1);
        let untouched = store
            .transactions()
            .iter()
            .find(|t| t.organization_id == other_org)
            .unwrap();
        assert_eq!(untouched.late_fee_amount, Money::ZERO);
    }

    #[test]
    fn test_update_failure_is_fatal() {
        let org = Uuid::new_v4();
        let mut store = InMemoryStore::new();
        store
            .insert_batch(vec![pending_transaction(org, "25.00", date(2024, 2, 15))])
            .unwrap();
        store.set_fail_writes(true);

        let mut engine = BillingEngine::default();
        let err = engine
            .calculate_late_fees(&mut store, org, None, &time_at(2024, 3, 1))
            .unwrap_err();
        assert!(matches!(err, DuesError::LedgerWrite { .. }));
    }
}
