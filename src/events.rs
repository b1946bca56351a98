use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{MemberId, OrganizationId, TransactionId};

/// why a member produced no transaction during a billing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// a transaction already exists for this member and period
    AlreadyBilled,
    /// no active assignment covers the period start
    NoActiveAssignment,
    /// more than one active assignment covers the period start
    AmbiguousAssignment,
    /// assignment references a rule the catalog does not have
    RuleNotFound,
}

/// all events emitted by the batch jobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BillingEvent {
    TransactionCreated {
        transaction_id: TransactionId,
        member_id: MemberId,
        amount: Money,
        due_date: NaiveDate,
    },
    MemberSkipped {
        member_id: MemberId,
        reason: SkipReason,
    },
    BillingCycleCompleted {
        organization_id: OrganizationId,
        period_start: NaiveDate,
        period_end: NaiveDate,
        transactions_created: usize,
        members_skipped: usize,
    },
    LateFeeApplied {
        transaction_id: TransactionId,
        member_id: MemberId,
        late_fee_amount: Money,
        total_amount: Money,
    },
    LateFeeRunCompleted {
        organization_id: OrganizationId,
        rate: Rate,
        transactions_updated: usize,
    },
}

/// event log for one engine instance
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<BillingEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: BillingEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<BillingEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[BillingEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_emit_and_take() {
        let mut store = EventStore::new();
        store.emit(BillingEvent::MemberSkipped {
            member_id: Uuid::new_v4(),
            reason: SkipReason::AlreadyBilled,
        });

        assert_eq!(store.events().len(), 1);
        let taken = store.take_events();
        assert_eq!(taken.len(), 1);
        assert!(store.events().is_empty());
    }
}
