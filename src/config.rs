use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;

/// billing engine configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BillingConfig {
    /// late fee rate applied when a run does not pass one explicitly
    pub default_late_fee_rate: Rate,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            default_late_fee_rate: Rate::from_decimal(dec!(0.02)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_late_fee_rate_is_two_percent() {
        let config = BillingConfig::default();
        assert_eq!(config.default_late_fee_rate, Rate::from_percentage(2));
    }
}
