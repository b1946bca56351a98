pub mod generator;
pub mod late_fees;

use serde::{Deserialize, Serialize};

use crate::config::BillingConfig;
use crate::events::EventStore;

/// batch engine exposing the two scheduler entry points:
/// [`generate_billing_cycle`](BillingEngine::generate_billing_cycle) and
/// [`calculate_late_fees`](BillingEngine::calculate_late_fees)
///
/// holds no state between runs beyond the event log; runs for distinct
/// organizations share nothing and may execute concurrently from separate
/// engine instances
pub struct BillingEngine {
    pub config: BillingConfig,
    pub events: EventStore,
}

impl BillingEngine {
    pub fn new(config: BillingConfig) -> Self {
        Self {
            config,
            events: EventStore::new(),
        }
    }
}

impl Default for BillingEngine {
    fn default() -> Self {
        Self::new(BillingConfig::default())
    }
}

/// outcome of one billing cycle run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRunSummary {
    pub transactions_created: usize,
    pub members_skipped: usize,
}

/// outcome of one late fee run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateFeeRunSummary {
    pub transactions_updated: usize,
}
