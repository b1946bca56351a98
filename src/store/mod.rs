pub mod memory;

pub use memory::InMemoryStore;

use chrono::NaiveDate;

use crate::decimal::Money;
use crate::errors::Result;
use crate::rules::{Breakdown, DuesRule};
use crate::types::{
    DuesTransaction, MemberDuesAssignment, MemberId, OrganizationId, RuleId, TransactionId,
};

/// membership roster, read-only
pub trait MemberDirectory {
    /// members of the organization with active status
    fn active_members(&self, organization_id: OrganizationId) -> Result<Vec<MemberId>>;
}

/// dues rule catalog, read-only
pub trait RuleCatalog {
    /// active assignments whose date range covers `period_start`; more than
    /// one is a data integrity violation surfaced by the resolver
    fn active_assignments(
        &self,
        member_id: MemberId,
        period_start: NaiveDate,
    ) -> Result<Vec<MemberDuesAssignment>>;

    fn rule(&self, rule_id: RuleId) -> Result<Option<DuesRule>>;
}

/// member financial history, read-only
pub trait FinancialHistory {
    /// breakdown of the member's most recent transaction, by creation time
    fn latest_breakdown(
        &self,
        organization_id: OrganizationId,
        member_id: MemberId,
    ) -> Result<Option<Breakdown>>;
}

/// transaction ledger write sink
pub trait TransactionLedger {
    fn exists_for_period(
        &self,
        member_id: MemberId,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<bool>;

    /// insert a billing run's transactions as one batch
    fn insert_batch(&mut self, transactions: Vec<DuesTransaction>) -> Result<usize>;

    /// pending transactions past due with no late fee applied yet
    fn overdue_pending_without_late_fee(
        &self,
        organization_id: OrganizationId,
        as_of: NaiveDate,
    ) -> Result<Vec<DuesTransaction>>;

    fn apply_late_fee(
        &mut self,
        transaction_id: TransactionId,
        late_fee_amount: Money,
        total_amount: Money,
    ) -> Result<()>;
}
