//! Per-card rule scoring

use std::collections::{HashMap, VecDeque};

use chrono::{NaiveDateTime, Timelike};

use super::{
    CardTransaction, FraudSignal, TransactionScore, BURST_MINUTES, BURST_SIZE, HIGH_AMOUNT,
    LARGE_AFTER_TEST, LATE_NIGHT_LAST_HOUR, LOCATION_JUMP_MINUTES, MAX_PENDING_TEST_CHARGES,
    MIN_TEST_CHARGES, RAPID_MINUTES, SMALL_CHARGE,
};

#[derive(Debug, Default)]
struct CardState {
    last_time: Option<NaiveDateTime>,
    last_location: Option<String>,
    /// Last `BURST_SIZE` timestamps, current one included
    recent_times: VecDeque<NaiveDateTime>,
    pending_small: Vec<f64>,
}

/// Whole minutes from `from` to `to`, truncated toward zero
fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_minutes()
}

fn within(minutes: i64, limit: i64) -> bool {
    (0..limit).contains(&minutes)
}

/// Stateful scorer; feed transactions in file order
#[derive(Debug, Default)]
pub struct RuleChecker {
    cards: HashMap<u64, CardState>,
}

impl RuleChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&mut self, tx: &CardTransaction) -> TransactionScore {
        let state = self.cards.entry(tx.card_number).or_default();
        let mut signals = Vec::new();

        state.recent_times.push_back(tx.timestamp);
        if state.recent_times.len() > BURST_SIZE {
            state.recent_times.pop_front();
        }

        if tx.amount > HIGH_AMOUNT {
            signals.push(FraudSignal::HighAmount);
        }

        if let Some(last) = state.last_time {
            let minutes = minutes_between(last, tx.timestamp);
            if within(minutes, RAPID_MINUTES) {
                signals.push(FraudSignal::RapidTransactions);
            }

            let moved = state
                .last_location
                .as_deref()
                .is_some_and(|previous| previous != tx.location);
            if within(minutes, LOCATION_JUMP_MINUTES) && moved {
                signals.push(FraudSignal::LocationJump);
            }
        }

        let len = state.recent_times.len();
        if tx.timestamp.hour() <= LATE_NIGHT_LAST_HOUR && len >= 2 {
            let previous = state.recent_times[len - 2];
            if within(minutes_between(previous, tx.timestamp), RAPID_MINUTES) {
                signals.push(FraudSignal::LateNightRapid);
            }
        }

        if tx.amount < SMALL_CHARGE {
            state.pending_small.push(tx.amount);
        } else if state.pending_small.len() >= MIN_TEST_CHARGES && tx.amount > LARGE_AFTER_TEST {
            signals.push(FraudSignal::TestCharges);
            state.pending_small.clear();
        } else if state.pending_small.len() > MAX_PENDING_TEST_CHARGES {
            state.pending_small.clear();
        }

        if len >= BURST_SIZE {
            if let (Some(&first), Some(&last)) =
                (state.recent_times.front(), state.recent_times.back())
            {
                if within(minutes_between(first, last), BURST_MINUTES) {
                    signals.push(FraudSignal::Burst);
                }
            }
        }

        state.last_time = Some(tx.timestamp);
        state.last_location = Some(tx.location.clone());

        let points: u32 = signals.iter().map(|s| s.points()).sum();
        TransactionScore {
            transaction_id: tx.transaction_id,
            card_number: tx.card_number,
            amount: tx.amount,
            location: tx.location.clone(),
            probability: f64::from(points.min(100)),
            signals,
        }
    }
}
