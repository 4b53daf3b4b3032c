//! Engine policy configuration
//!
//! The ambiguous collection policies (late-fee accumulation, overpayment
//! handling, loan deletion) are product decisions, not code decisions.
//! They are carried as an explicit configuration object so either choice
//! can be deployed without touching the engine.

use serde::{Deserialize, Serialize};

/// How mora (late-fee) charges accumulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoraPolicy {
    /// One flat charge on the installment being settled late. Paying two
    /// periods late still costs a single charge per settled period.
    FlatPerSettledPeriod,
    /// One flat charge for every period that is overdue at settlement
    /// time. Non-compounding, but cumulative across missed periods.
    PerMissedPeriod,
}

/// What happens to the portion of a payment above the required amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverpaymentPolicy {
    /// Excess is recorded on the payment and does not advance periods
    RecordExcess,
    /// Excess is carried into the following unpaid periods, settling them
    /// in order while it lasts
    RollToNext,
}

/// What happens when a loan with recorded payments is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Deletion is rejected while payments exist
    Reject,
    /// Payments are deleted together with the loan
    Cascade,
}

/// Collection policy knobs for the payment engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub mora: MoraPolicy,
    pub overpayment: OverpaymentPolicy,
    pub on_delete_with_payments: DeletePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mora: MoraPolicy::FlatPerSettledPeriod,
            overpayment: OverpaymentPolicy::RecordExcess,
            on_delete_with_payments: DeletePolicy::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policies() {
        let config = EngineConfig::default();
        assert_eq!(config.mora, MoraPolicy::FlatPerSettledPeriod);
        assert_eq!(config.overpayment, OverpaymentPolicy::RecordExcess);
        assert_eq!(config.on_delete_with_payments, DeletePolicy::Reject);
    }
}
