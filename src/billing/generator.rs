use hourglass_rs::SafeTimeProvider;
use tracing::{info, warn};
use uuid::Uuid;

use crate::billing::{BillingEngine, BillingRunSummary};
use crate::decimal::Money;
use crate::errors::{DuesError, Result};
use crate::events::{BillingEvent, SkipReason};
use crate::resolver;
use crate::schedule::BillingPeriod;
use crate::store::{FinancialHistory, MemberDirectory, RuleCatalog, TransactionLedger};
use crate::types::{DuesTransaction, OrganizationId, TransactionStatus};

impl BillingEngine {
    /// generate one billing cycle for an organization
    ///
    /// exactly one transaction per member per period: members already billed
    /// for this period are skipped first, so re-running the same cycle is a
    /// no-op for them and a partially completed run is safe to retry.
    /// transactions accumulate through the member loop and hit the ledger as
    /// a single batch insert at the end.
    ///
    /// a member with no covering assignment, an ambiguous assignment, or a
    /// dangling rule reference is skipped and reported through events and
    /// logs, never by aborting the run. only a ledger write failure is fatal.
    pub fn generate_billing_cycle(
        &mut self,
        directory: &dyn MemberDirectory,
        catalog: &dyn RuleCatalog,
        history: &dyn FinancialHistory,
        ledger: &mut dyn TransactionLedger,
        organization_id: OrganizationId,
        period: BillingPeriod,
        time: &SafeTimeProvider,
    ) -> Result<BillingRunSummary> {
        let members = directory.active_members(organization_id)?;
        info!(
            %organization_id,
            period_start = %period.start,
            period_end = %period.end,
            members = members.len(),
            "starting billing cycle"
        );

        let mut pending = Vec::new();
        let mut members_skipped = 0usize;

        for member_id in members {
            // idempotency check comes first
            if ledger.exists_for_period(member_id, period.start, period.end)? {
                members_skipped += 1;
                self.events.emit(BillingEvent::MemberSkipped {
                    member_id,
                    reason: SkipReason::AlreadyBilled,
                });
                continue;
            }

            let resolved = match resolver::resolve_for_member(
                catalog,
                history,
                organization_id,
                member_id,
                period,
            ) {
                Ok(Some(resolved)) => resolved,
                Ok(None) => {
                    members_skipped += 1;
                    self.events.emit(BillingEvent::MemberSkipped {
                        member_id,
                        reason: SkipReason::NoActiveAssignment,
                    });
                    continue;
                }
                Err(DuesError::AmbiguousAssignment { count, .. }) => {
                    warn!(%member_id, count, "ambiguous dues assignment, member skipped");
                    members_skipped += 1;
                    self.events.emit(BillingEvent::MemberSkipped {
                        member_id,
                        reason: SkipReason::AmbiguousAssignment,
                    });
                    continue;
                }
                Err(DuesError::RuleNotFound { rule_id }) => {
                    warn!(%member_id, %rule_id, "assignment references missing rule, member skipped");
                    members_skipped += 1;
                    self.events.emit(BillingEvent::MemberSkipped {
                        member_id,
                        reason: SkipReason::RuleNotFound,
                    });
                    continue;
                }
                Err(err) => return Err(err),
            };

            let transaction = DuesTransaction {
                id: Uuid::new_v4(),
                member_id,
                organization_id,
                assignment_id: resolved.assignment_id,
                rule_id: resolved.rule_id,
                amount: resolved.amount,
                late_fee_amount: Money::ZERO,
                total_amount: resolved.amount,
                period_start: period.start,
                period_end: period.end,
                due_date: resolved.due_date,
                status: TransactionStatus::Pending,
                breakdown: resolved.breakdown,
                created_at: time.now(),
            };

            self.events.emit(BillingEvent::TransactionCreated {
                transaction_id: transaction.id,
                member_id,
                amount: transaction.amount,
                due_date: transaction.due_date,
            });
            pending.push(transaction);
        }

        let transactions_created = ledger.insert_batch(pending)?;

        info!(
            %organization_id,
            transactions_created,
            members_skipped,
            "billing cycle complete"
        );
        self.events.emit(BillingEvent::BillingCycleCompleted {
            organization_id,
            period_start: period.start,
            period_end: period.end,
            transactions_created,
            members_skipped,
        });

        Ok(BillingRunSummary {
            transactions_created,
            members_skipped,
        })
    }
}
