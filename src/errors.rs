use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{MemberId, RuleId, TransactionId};

#[derive(Error, Debug)]
pub enum DuesError {
    #[error("ambiguous assignment: member {member_id} has {count} active assignments covering {period_start}")]
    AmbiguousAssignment {
        member_id: MemberId,
        period_start: NaiveDate,
        count: usize,
    },

    #[error("rule not found: {rule_id}")]
    RuleNotFound {
        rule_id: RuleId,
    },

    #[error("transaction not found: {transaction_id}")]
    TransactionNotFound {
        transaction_id: TransactionId,
    },

    #[error("invalid billing period: start {start} is after end {end}")]
    InvalidPeriod {
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("ledger write failed: {message}")]
    LedgerWrite {
        message: String,
    },

    #[error("store error: {message}")]
    Store {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, DuesError>;

/// errors from the formula evaluator; always recovered inside the rule
/// calculator, never surfaced from a batch run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("formula validation failed: {reason}")]
    Validation {
        reason: String,
    },

    #[error("formula parse error at position {position}: {message}")]
    Parse {
        position: usize,
        message: String,
    },
}
