use std::collections::HashMap;

use chrono::NaiveDate;

use crate::decimal::Money;
use crate::errors::{DuesError, Result};
use crate::rules::{Breakdown, DuesRule};
use crate::store::{FinancialHistory, MemberDirectory, RuleCatalog, TransactionLedger};
use crate::types::{
    DuesTransaction, MemberDuesAssignment, MemberId, OrganizationId, RuleId, TransactionId,
    TransactionStatus,
};

/// in-memory implementation of every collaborator trait
///
/// the standard test double and demo backend; production deployments back
/// these traits with their own catalog and ledger stores
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    members: HashMap<OrganizationId, Vec<MemberId>>,
    rules: HashMap<RuleId, DuesRule>,
    assignments: Vec<MemberDuesAssignment>,
    transactions: Vec<DuesTransaction>,
    /// when set, every write fails; exercises the fatal-write path
    fail_writes: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, organization_id: OrganizationId, member_id: MemberId) {
        self.members.entry(organization_id).or_default().push(member_id);
    }

    pub fn add_rule(&mut self, rule: DuesRule) {
        self.rules.insert(rule.id, rule);
    }

    pub fn add_assignment(&mut self, assignment: MemberDuesAssignment) {
        self.assignments.push(assignment);
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn transactions(&self) -> &[DuesTransaction] {
        &self.transactions
    }

    pub fn transactions_for_member(&self, member_id: MemberId) -> Vec<&DuesTransaction> {
        self.transactions
            .iter()
            .filter(|t| t.member_id == member_id)
            .collect()
    }
}

impl MemberDirectory for InMemoryStore {
    fn active_members(&self, organization_id: OrganizationId) -> Result<Vec<MemberId>> {
        Ok(self.members.get(&organization_id).cloned().unwrap_or_default())
    }
}

impl RuleCatalog for InMemoryStore {
    fn active_assignments(
        &self,
        member_id: MemberId,
        period_start: NaiveDate,
    ) -> Result<Vec<MemberDuesAssignment>> {
        Ok(self
            .assignments
            .iter()
            .filter(|a| a.member_id == member_id && a.covers(period_start))
            .cloned()
            .collect())
    }

    fn rule(&self, rule_id: RuleId) -> Result<Option<DuesRule>> {
        Ok(self.rules.get(&rule_id).cloned())
    }
}

impl FinancialHistory for InMemoryStore {
    fn latest_breakdown(
        &self,
        organization_id: OrganizationId,
        member_id: MemberId,
    ) -> Result<Option<Breakdown>> {
        Ok(self
            .transactions
            .iter()
            .filter(|t| t.organization_id == organization_id && t.member_id == member_id)
            .max_by_key(|t| t.created_at)
            .map(|t| t.breakdown.clone()))
    }
}

impl TransactionLedger for InMemoryStore {
    fn exists_for_period(
        &self,
        member_id: MemberId,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<bool> {
        Ok(self.transactions.iter().any(|t| {
            t.member_id == member_id
                && t.period_start == period_start
                && t.period_end == period_end
        }))
    }

    fn insert_batch(&mut self, transactions: Vec<DuesTransaction>) -> Result<usize> {
        if self.fail_writes {
            return Err(DuesError::LedgerWrite {
                message: "insert rejected".to_string(),
            });
        }
        let count = transactions.len();
        self.transactions.extend(transactions);
        Ok(count)
    }

    fn overdue_pending_without_late_fee(
        &self,
        organization_id: OrganizationId,
        as_of: NaiveDate,
    ) -> Result<Vec<DuesTransaction>> {
        Ok(self
            .transactions
            .iter()
            .filter(|t| {
                t.organization_id == organization_id
                    && t.status == TransactionStatus::Pending
                    && t.due_date < as_of
                    && t.late_fee_amount.is_zero()
            })
            .cloned()
            .collect())
    }

    fn apply_late_fee(
        &mut self,
        transaction_id: TransactionId,
        late_fee_amount: Money,
        total_amount: Money,
    ) -> Result<()> {
        if self.fail_writes {
            return Err(DuesError::LedgerWrite {
                message: "update rejected".to_string(),
            });
        }

        let transaction = self
            .transactions
            .iter_mut()
            .find(|t| t.id == transaction_id)
            .ok_or(DuesError::TransactionNotFound { transaction_id })?;

        transaction.late_fee_amount = late_fee_amount;
        transaction.total_amount = total_amount;
        Ok(())
    }
}
