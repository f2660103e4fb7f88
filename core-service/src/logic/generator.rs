//! Synthetic credit-card transactions with labelled fraud patterns.
//!
//! Patterns per draw:
//! - `< 0.02`        test charges: 2-3 small charges then a large one (fraud)
//! - `0.02 .. 0.05`  location jump: home-state charge, then same amount out of state (fraud)
//! - `0.05 .. 0.065` burst: 5 charges 20s apart (all fraud)
//! - otherwise 1% random high amount (fraud), else a normal charge

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::CoreResult;

const CARD_POOL_SIZE: usize = 250;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LOOKBACK_MINUTES: i64 = 60 * 24 * 30;

const MERCHANTS: [&str; 20] = [
    "Walmart", "Amazon", "Target", "BestBuy", "Costco", "Kroger", "HomeDepot", "Walgreens", "CVS",
    "McDonalds", "Starbucks", "Shell", "Exxon", "AppleStore", "Nike", "eBay", "Uber", "Lyft",
    "Lowes", "Macy's",
];

const STATES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY",
];

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub rows: usize,
    pub seed: u64,
    /// Timestamps fall in the 30 days before this instant
    pub anchor: NaiveDateTime,
}

impl GeneratorConfig {
    pub fn new(rows: usize, seed: u64) -> Self {
        Self {
            rows,
            seed,
            anchor: chrono::Local::now().naive_local(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedStats {
    pub rows: usize,
    pub fraud_rows: usize,
}

#[derive(Debug, Serialize)]
struct GeneratedTransaction {
    transaction_id: u64,
    card_number: u64,
    timestamp: String,
    merchant: &'static str,
    location: &'static str,
    amount: String,
    is_potential_fraud: u8,
}

struct Card {
    number: u64,
    home: &'static str,
}

struct Generator<W: Write> {
    rng: StdRng,
    cards: Vec<Card>,
    anchor: NaiveDateTime,
    out: csv::Writer<W>,
    next_id: u64,
    stats: GeneratedStats,
}

impl<W: Write> Generator<W> {
    fn new(config: &GeneratorConfig, writer: W) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let cards = (0..CARD_POOL_SIZE)
            .map(|_| Card {
                number: 4_000_000_000_000_000 + (rng.gen::<f64>() * 1e15) as u64,
                home: STATES[rng.gen_range(0..STATES.len())],
            })
            .collect();

        Self {
            rng,
            cards,
            anchor: config.anchor,
            out: csv::Writer::from_writer(writer),
            next_id: 1,
            stats: GeneratedStats {
                rows: 0,
                fraud_rows: 0,
            },
        }
    }

    fn amount(&mut self, low: f64, span: f64) -> f64 {
        let raw = low + self.rng.gen::<f64>() * span;
        (raw * 100.0).round() / 100.0
    }

    fn emit(
        &mut self,
        card: u64,
        at: NaiveDateTime,
        merchant: &'static str,
        location: &'static str,
        amount: f64,
        fraud: bool,
    ) -> CoreResult<()> {
        self.out.serialize(GeneratedTransaction {
            transaction_id: self.next_id,
            card_number: card,
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            merchant,
            location,
            amount: format!("{:.2}", amount),
            is_potential_fraud: fraud as u8,
        })?;

        self.next_id += 1;
        self.stats.rows += 1;
        if fraud {
            self.stats.fraud_rows += 1;
        }
        Ok(())
    }

    fn run(mut self, max_rows: usize) -> CoreResult<GeneratedStats> {
        while self.stats.rows < max_rows {
            let card_index = self.rng.gen_range(0..self.cards.len());
            let (card, home) = (self.cards[card_index].number, self.cards[card_index].home);
            let base = self.anchor
                - Duration::minutes(self.rng.gen_range(0..LOOKBACK_MINUTES));
            let merchant = MERCHANTS[self.rng.gen_range(0..MERCHANTS.len())];
            let roll = self.rng.gen::<f64>();
            let written = self.stats.rows;

            if roll < 0.02 && written + 4 <= max_rows {
                let small_count = 2 + self.rng.gen_range(0..2);
                for i in 0..small_count {
                    let amount = self.amount(1.0, 4.0);
                    let at = base + Duration::seconds(30 * i as i64);
                    self.emit(card, at, merchant, home, amount, false)?;
                }
                if self.stats.rows < max_rows {
                    let amount = self.amount(1500.0, 2000.0);
                    let at = base + Duration::seconds(30 * small_count as i64);
                    self.emit(card, at, merchant, home, amount, true)?;
                }
                continue;
            }

            if (0.02..0.05).contains(&roll) && written + 2 <= max_rows {
                let amount = self.amount(50.0, 500.0);
                self.emit(card, base, merchant, home, amount, false)?;

                let away = loop {
                    let state = STATES[self.rng.gen_range(0..STATES.len())];
                    if state != home {
                        break state;
                    }
                };
                self.emit(card, base + Duration::seconds(30), merchant, away, amount, true)?;
                continue;
            }

            if (0.05..0.065).contains(&roll) && written + 5 <= max_rows {
                for i in 0..5 {
                    let amount = self.amount(50.0, 300.0);
                    let at = base + Duration::seconds(20 * i);
                    self.emit(card, at, merchant, home, amount, true)?;
                }
                continue;
            }

            if self.rng.gen::<f64>() < 0.01 {
                let amount = self.amount(1500.0, 2000.0);
                self.emit(card, base, merchant, home, amount, true)?;
                continue;
            }

            let amount = self.amount(5.0, 1000.0);
            self.emit(card, base, merchant, home, amount, false)?;
        }

        self.out.flush()?;
        Ok(self.stats)
    }
}

/// Write exactly `config.rows` transactions as CSV (with header) to `writer`
pub fn generate_transactions<W: Write>(
    config: &GeneratorConfig,
    writer: W,
) -> CoreResult<GeneratedStats> {
    Generator::new(config, writer).run(config.rows)
}

/// Write a generated dataset to `path`, creating parent directories
pub fn write_transactions_csv(config: &GeneratorConfig, path: &Path) -> CoreResult<GeneratedStats> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let stats = generate_transactions(config, File::create(path)?)?;
    log::info!(
        "Generated {} transactions ({} flagged) at {}",
        stats.rows,
        stats.fraud_rows,
        path.display()
    );
    Ok(stats)
}
