//! Stratified train / validation / test split.
//!
//! Two stages, each stratified per class: hold out 20% of every class, then
//! halve the holdout into validation and test. Every subset keeps the
//! dataset's positive-class ratio up to rounding of one row per class.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::constants::{HOLDOUT_FRACTION, TEST_FRACTION_OF_HOLDOUT};

/// Row indices of each subset, ascending
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
    pub test: Vec<usize>,
}

impl SplitIndices {
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.train.len(), self.validation.len(), self.test.len())
    }
}

/// 80/10/10 stratified split, deterministic for a given seed
pub fn stratified_split(labels: &[bool], seed: u64) -> SplitIndices {
    let mut rng = StdRng::seed_from_u64(seed);
    let all: Vec<usize> = (0..labels.len()).collect();

    let (train, holdout) = stratified_holdout(&all, labels, HOLDOUT_FRACTION, &mut rng);
    let (validation, test) =
        stratified_holdout(&holdout, labels, TEST_FRACTION_OF_HOLDOUT, &mut rng);

    SplitIndices {
        train,
        validation,
        test,
    }
}

/// Split `indices` into (kept, held), holding out `fraction` of each class
pub fn stratified_holdout<R: Rng>(
    indices: &[usize],
    labels: &[bool],
    fraction: f64,
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let mut kept = Vec::with_capacity(indices.len());
    let mut held = Vec::new();

    for class in [false, true] {
        let mut members: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| labels[i] == class)
            .collect();
        members.shuffle(rng);

        let n_held = ((members.len() as f64 * fraction).round() as usize).min(members.len());
        held.extend_from_slice(&members[..n_held]);
        kept.extend_from_slice(&members[n_held..]);
    }

    kept.sort_unstable();
    held.sort_unstable();
    (kept, held)
}
