// 📒 Revenue Ledger - append-only transaction log with a running total
//
// One lock guards "append + add to total + bump counter", so readers never see
// a total that disagrees with the transaction list.

use crate::category::DataCategory;
use crate::error::LedgerError;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Monthly revenue target: $147,575.00
pub const DEFAULT_MONTHLY_TARGET: Money = Money::from_cents(14_757_500);

/// Divisor used for the "daily average needed" figure.
pub const DAYS_PER_PERIOD: i64 = 30;

// ============================================================================
// TRANSACTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
}

/// One recorded unit of revenue. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable identity (UUID)
    pub id: String,

    /// 1-based position in the ledger, assigned under the write lock
    pub sequence: u64,

    pub timestamp: DateTime<Utc>,
    pub amount: Money,

    /// Free-text label from the caller (not validated)
    pub source: String,

    #[serde(rename = "type")]
    pub category: DataCategory,

    pub status: TransactionStatus,
}

// ============================================================================
// CONFIG & SNAPSHOT
// ============================================================================

#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub monthly_target: Money,

    /// Keep at most this many transactions in memory (oldest dropped first).
    /// Totals and counters always cover the full history. `None` keeps everything.
    pub retention: Option<usize>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            monthly_target: DEFAULT_MONTHLY_TARGET,
            retention: None,
        }
    }
}

/// Point-in-time view of the ledger's aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSnapshot {
    pub total: Money,
    pub target: Money,
    pub remaining: Money,
    pub daily_average_needed: Money,

    /// Never reset on a day boundary; counts every transaction since startup.
    pub transactions_today: u64,

    pub total_transactions: u64,

    /// Most recent last
    pub recent: Vec<Transaction>,
}

// ============================================================================
// LEDGER
// ============================================================================

#[derive(Debug, Default)]
struct LedgerState {
    transactions: VecDeque<Transaction>,
    running_total: Money,
    count_since_period_start: u64,
    next_sequence: u64,
}

#[derive(Debug)]
pub struct Ledger {
    config: LedgerConfig,
    state: RwLock<LedgerState>,
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Self {
        Ledger {
            config,
            state: RwLock::new(LedgerState::default()),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Append one completed transaction and add its amount to the running total.
    ///
    /// Fails only for negative amounts; nothing is recorded in that case.
    pub fn record(
        &self,
        amount: Money,
        source: impl Into<String>,
        category: DataCategory,
    ) -> Result<Transaction, LedgerError> {
        if amount.is_negative() {
            return Err(LedgerError::NegativeAmount(amount));
        }

        let source = source.into();
        let (transaction, total) = {
            let mut state = self.write();
            state.next_sequence += 1;

            let transaction = Transaction {
                id: uuid::Uuid::new_v4().to_string(),
                sequence: state.next_sequence,
                timestamp: Utc::now(),
                amount,
                source,
                category,
                status: TransactionStatus::Completed,
            };

            state.transactions.push_back(transaction.clone());
            state.running_total += amount;
            state.count_since_period_start += 1;

            if let Some(limit) = self.config.retention {
                while state.transactions.len() > limit {
                    state.transactions.pop_front();
                }
            }

            (transaction, state.running_total)
        };

        tracing::info!(
            amount = %transaction.amount,
            source = %transaction.source,
            category = %transaction.category,
            total = %total,
            target = %self.config.monthly_target,
            "revenue recorded"
        );

        Ok(transaction)
    }

    /// Aggregates plus the last `n` transactions, read under one lock.
    pub fn snapshot(&self, n: usize) -> LedgerSnapshot {
        let state = self.read();
        let target = self.config.monthly_target;
        let remaining = target - state.running_total;

        LedgerSnapshot {
            total: state.running_total,
            target,
            remaining,
            daily_average_needed: remaining.divide(DAYS_PER_PERIOD),
            transactions_today: state.count_since_period_start,
            total_transactions: state.next_sequence,
            recent: Self::tail(&state.transactions, n),
        }
    }

    /// Last `n` retained transactions in insertion order, or all of them if fewer.
    pub fn recent(&self, n: usize) -> Vec<Transaction> {
        Self::tail(&self.read().transactions, n)
    }

    pub fn total(&self) -> Money {
        self.read().running_total
    }

    pub fn transactions_today(&self) -> u64 {
        self.read().count_since_period_start
    }

    /// Number of transactions currently held in memory.
    pub fn len(&self) -> usize {
        self.read().transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn tail(transactions: &VecDeque<Transaction>, n: usize) -> Vec<Transaction> {
        let skip = transactions.len().saturating_sub(n);
        transactions.iter().skip(skip).cloned().collect()
    }

    // Nothing between the field updates in `record` can panic, so a poisoned
    // lock still guards consistent state.
    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::new(LedgerConfig::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn test_record_updates_total_and_counter() {
        let ledger = Ledger::default();

        let tx = ledger
            .record(cents(47), "test", DataCategory::DeliveryStatus)
            .unwrap();

        assert_eq!(tx.amount, cents(47));
        assert_eq!(tx.source, "test");
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.sequence, 1);
        assert_eq!(ledger.total(), cents(47));
        assert_eq!(ledger.transactions_today(), 1);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let ledger = Ledger::default();

        let result = ledger.record(cents(-10), "refund", DataCategory::Unknown);

        assert_eq!(result, Err(LedgerError::NegativeAmount(cents(-10))));
        assert_eq!(ledger.total(), Money::ZERO);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_zero_amount_accepted() {
        let ledger = Ledger::default();
        assert!(ledger.record(Money::ZERO, "probe", DataCategory::Unknown).is_ok());
        assert_eq!(ledger.transactions_today(), 1);
    }

    #[test]
    fn test_recent_returns_most_recent_last() {
        let ledger = Ledger::default();
        for i in 1..=5 {
            ledger
                .record(cents(i), format!("src-{}", i), DataCategory::SoilMoisture)
                .unwrap();
        }

        let recent = ledger.recent(3);
        let sources: Vec<&str> = recent.iter().map(|tx| tx.source.as_str()).collect();
        assert_eq!(sources, vec!["src-3", "src-4", "src-5"]);
    }

    #[test]
    fn test_recent_larger_than_ledger() {
        let ledger = Ledger::default();
        ledger.record(cents(15), "a", DataCategory::SoilMoisture).unwrap();
        ledger.record(cents(25), "b", DataCategory::GpsTracking).unwrap();

        assert_eq!(ledger.recent(10).len(), 2);
        assert!(Ledger::default().recent(10).is_empty());
    }

    #[test]
    fn test_snapshot_figures() {
        let ledger = Ledger::new(LedgerConfig {
            monthly_target: cents(3_000),
            retention: None,
        });
        ledger.record(cents(1_500), "a", DataCategory::Unknown).unwrap();

        let snapshot = ledger.snapshot(10);
        assert_eq!(snapshot.total, cents(1_500));
        assert_eq!(snapshot.target, cents(3_000));
        assert_eq!(snapshot.remaining, cents(1_500));
        assert_eq!(snapshot.daily_average_needed, cents(50));
        assert_eq!(snapshot.transactions_today, 1);
        assert_eq!(snapshot.recent.len(), 1);
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let ledger = Ledger::default();
        ledger.record(cents(47), "a", DataCategory::DeliveryStatus).unwrap();
        ledger.record(cents(28), "b", DataCategory::CropHealth).unwrap();

        assert_eq!(ledger.snapshot(10), ledger.snapshot(10));
    }

    #[test]
    fn test_total_matches_sum_of_transactions() {
        let ledger = Ledger::default();
        for category in DataCategory::PRICED {
            ledger.record(category.price(), "sweep", category).unwrap();
        }

        let snapshot = ledger.snapshot(usize::MAX);
        let sum: Money = snapshot.recent.iter().map(|tx| tx.amount).sum();
        assert_eq!(snapshot.total, sum);
        assert_eq!(snapshot.total, cents(15 + 25 + 47 + 32 + 18 + 28));
    }

    #[test]
    fn test_concurrent_records_lose_nothing() {
        let ledger = Ledger::default();
        let threads = 8;
        let per_thread = 500;

        thread::scope(|scope| {
            for t in 0..threads {
                let ledger = &ledger;
                scope.spawn(move || {
                    for _ in 0..per_thread {
                        ledger
                            .record(cents(47), format!("worker-{}", t), DataCategory::DeliveryStatus)
                            .unwrap();
                    }
                });
            }
        });

        let count = (threads * per_thread) as i64;
        assert_eq!(ledger.total(), cents(47 * count));
        assert_eq!(ledger.transactions_today(), count as u64);

        // Sequence numbers follow lock order: unique and gap-free
        let all = ledger.recent(usize::MAX);
        let sequences: Vec<u64> = all.iter().map(|tx| tx.sequence).collect();
        let expected: Vec<u64> = (1..=count as u64).collect();
        assert_eq!(sequences, expected);
    }

    #[test]
    fn test_concurrent_reads_never_see_torn_state() {
        let ledger = Ledger::default();

        thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..1_000 {
                    ledger.record(cents(25), "writer", DataCategory::GpsTracking).unwrap();
                }
            });
            scope.spawn(|| {
                for _ in 0..1_000 {
                    let snapshot = ledger.snapshot(usize::MAX);
                    let sum: Money = snapshot.recent.iter().map(|tx| tx.amount).sum();
                    assert_eq!(snapshot.total, sum);
                    assert_eq!(snapshot.recent.len() as u64, snapshot.transactions_today);
                }
            });
        });
    }

    #[test]
    fn test_retention_keeps_totals_for_full_history() {
        let ledger = Ledger::new(LedgerConfig {
            monthly_target: DEFAULT_MONTHLY_TARGET,
            retention: Some(3),
        });
        for _ in 0..10 {
            ledger.record(cents(10), "burst", DataCategory::Unknown).unwrap();
        }

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.total(), cents(100));
        assert_eq!(ledger.transactions_today(), 10);

        let sequences: Vec<u64> = ledger.recent(10).iter().map(|tx| tx.sequence).collect();
        assert_eq!(sequences, vec![8, 9, 10]);
    }

    #[test]
    fn test_transaction_json_shape() {
        let ledger = Ledger::default();
        let tx = ledger.record(cents(47), "json", DataCategory::DeliveryStatus).unwrap();

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["amount"], serde_json::json!(0.47));
        assert_eq!(json["type"], "delivery_status");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["source"], "json");
    }
}
