//! Rules Module - heuristic per-card fraud checks over a transaction CSV
//!
//! Independent of the trained model. Each transaction is scored against the
//! card's recent history in file order; rule points add up and are capped at
//! 100%. Transactions at or above [`SUSPICIOUS_PERCENT`] are written to the
//! suspicious-transaction report with their reasons.
//!
//! ## Structure
//! - `checker`: per-card state and scoring
//! - this module: thresholds, weights, CSV reading and the text report

pub mod checker;


use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub use checker::RuleChecker;

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Amounts strictly above this count as unusually high
pub const HIGH_AMOUNT: f64 = 1500.0;

/// Whole minutes since the card's previous transaction that count as rapid
pub const RAPID_MINUTES: i64 = 3;

/// Whole minutes within which a change of location counts as a jump
pub const LOCATION_JUMP_MINUTES: i64 = 1;

/// Hours 0 through this one (inclusive) are late night
pub const LATE_NIGHT_LAST_HOUR: u32 = 5;

/// Charges below this are treated as test charges
pub const SMALL_CHARGE: f64 = 5.0;

/// A purchase above this after test charges completes the pattern
pub const LARGE_AFTER_TEST: f64 = 800.0;

/// Test charges needed before the large purchase
pub const MIN_TEST_CHARGES: usize = 2;

/// Pending test charges are forgotten past this count on an unrelated charge
pub const MAX_PENDING_TEST_CHARGES: usize = 3;

/// Transactions kept per card for burst and late-night checks
pub const BURST_SIZE: usize = 5;

/// Whole minutes spanned by a full window that count as a burst
pub const BURST_MINUTES: i64 = 2;

/// Report transactions scoring at least this percentage
pub const SUSPICIOUS_PERCENT: f64 = 30.0;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const REPORT_HEADER: &str = "Likely Fraud Transactions:\n\n";

// ============================================================================
// TYPES
// ============================================================================

/// A rule that fired for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FraudSignal {
    HighAmount,
    RapidTransactions,
    LocationJump,
    LateNightRapid,
    TestCharges,
    Burst,
}

impl FraudSignal {
    /// Contribution in percentage points
    pub fn points(self) -> u32 {
        match self {
            FraudSignal::HighAmount => 30,
            FraudSignal::RapidTransactions => 60,
            FraudSignal::LocationJump => 60,
            FraudSignal::LateNightRapid => 50,
            FraudSignal::TestCharges => 70,
            FraudSignal::Burst => 60,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            FraudSignal::HighAmount => "Unusually high purchase amount",
            FraudSignal::RapidTransactions => "Rapid consecutive transactions",
            FraudSignal::LocationJump => "Location jump within short time",
            FraudSignal::LateNightRapid => "Late night rapid spending",
            FraudSignal::TestCharges => "Small test charges followed by large purchase",
            FraudSignal::Burst => "Multiple transactions in short burst",
        }
    }
}

/// One parsed transaction row
#[derive(Debug, Clone, PartialEq)]
pub struct CardTransaction {
    pub transaction_id: u64,
    pub card_number: u64,
    pub timestamp: NaiveDateTime,
    pub merchant: String,
    pub location: String,
    pub amount: f64,
}

/// Rule outcome for one transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionScore {
    pub transaction_id: u64,
    pub card_number: u64,
    pub amount: f64,
    pub location: String,
    /// Percentage, capped at 100
    pub probability: f64,
    pub signals: Vec<FraudSignal>,
}

impl TransactionScore {
    pub fn is_suspicious(&self) -> bool {
        self.probability >= SUSPICIOUS_PERCENT
    }

    pub fn reasons(&self) -> Vec<&'static str> {
        self.signals.iter().map(|s| s.reason()).collect()
    }

    /// Report entry, blank line included
    pub fn render(&self) -> String {
        format!(
            "Transaction ID: {} | Card: {} | Amount: ${:.2} | Location: {} | Fraud Probability: {:.1}%\n\
             Reason(s): {}\n\n",
            self.transaction_id,
            self.card_number,
            self.amount,
            self.location,
            self.probability,
            self.reasons().join(", ")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    pub checked: usize,
    pub flagged: usize,
}

#[derive(Debug, Deserialize)]
struct TransactionRow {
    transaction_id: u64,
    card_number: u64,
    timestamp: String,
    merchant: String,
    location: String,
    amount: f64,
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// Parse transaction rows by header name; other columns are ignored
pub fn read_transactions<R: Read>(reader: R) -> CoreResult<Vec<CardTransaction>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut transactions = Vec::new();
    for (row, record) in csv_reader.deserialize::<TransactionRow>().enumerate() {
        let record = record?;
        let timestamp = NaiveDateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT)
            .map_err(|_| CoreError::InvalidValue {
                column: "timestamp".to_string(),
                row,
                value: record.timestamp.clone(),
            })?;

        transactions.push(CardTransaction {
            transaction_id: record.transaction_id,
            card_number: record.card_number,
            timestamp,
            merchant: record.merchant,
            location: record.location,
            amount: record.amount,
        });
    }
    Ok(transactions)
}

/// Score every transaction in order with fresh per-card state
pub fn check_transactions(transactions: &[CardTransaction]) -> Vec<TransactionScore> {
    let mut checker = RuleChecker::new();
    transactions.iter().map(|tx| checker.score(tx)).collect()
}

/// Suspicious-transaction report text
pub fn render_report(scores: &[TransactionScore]) -> String {
    let mut out = String::from(REPORT_HEADER);
    for score in scores.iter().filter(|s| s.is_suspicious()) {
        out.push_str(&score.render());
    }
    out
}

/// Check `data` and write the report for flagged transactions to `out`
pub fn run_check(data: &Path, out: &Path) -> CoreResult<CheckSummary> {
    if !data.exists() {
        let name = data
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("transactions file");
        return Err(CoreError::NotFound(format!("{} not found.", name)));
    }

    let transactions = read_transactions(File::open(data)?)?;
    let scores = check_transactions(&transactions);

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(out, render_report(&scores))?;

    let summary = CheckSummary {
        checked: scores.len(),
        flagged: scores.iter().filter(|s| s.is_suspicious()).count(),
    };
    log::info!(
        "Checked {} transactions, {} suspicious, report at {}",
        summary.checked,
        summary.flagged,
        out.display()
    );
    Ok(summary)
}
