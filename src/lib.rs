pub mod billing;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod formula;
pub mod resolver;
pub mod rules;
pub mod schedule;
pub mod store;
pub mod types;

// re-export key types
pub use billing::{BillingEngine, BillingRunSummary, LateFeeRunSummary};
pub use config::BillingConfig;
pub use decimal::{Money, Rate};
pub use errors::{DuesError, FormulaError, Result};
pub use events::{BillingEvent, EventStore, SkipReason};
pub use resolver::{resolve_for_member, ResolvedDues};
pub use rules::{
    calculate, Breakdown, CalculationMethod, CalculationResult, DuesRule, TierBracket,
};
pub use schedule::{due_date, BillingPeriod};
pub use store::{
    FinancialHistory, InMemoryStore, MemberDirectory, RuleCatalog, TransactionLedger,
};
pub use types::{
    BaseField, BillingFrequency, CalculationInputs, DuesTransaction, MemberDuesAssignment,
    MemberId, OrganizationId, RuleId, TransactionStatus,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
