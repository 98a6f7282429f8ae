use crate::SimError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::{Genome, Instruction};

/// Rates below this never fire
const RATE_EPSILON: f64 = 0.0001;

/// Per-variant copy error rates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationRates {
    /// Drives both the deletion and the insertion gate
    pub indel: f64,

    /// Drives the substitution gate
    pub mismatch: f64,
}

/// What a single copy produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Symbol dropped
    Deleted,
    /// Intended symbol followed by a random extra one
    Inserted(Instruction, Instruction),
    /// A random symbol in place of the intended one
    Mismatched(Instruction),
    Faithful(Instruction),
}

impl CopyOutcome {
    pub fn symbols(self) -> Vec<Instruction> {
        match self {
            CopyOutcome::Deleted => Vec::new(),
            CopyOutcome::Inserted(intended, extra) => vec![intended, extra],
            CopyOutcome::Mismatched(symbol) | CopyOutcome::Faithful(symbol) => vec![symbol],
        }
    }

    pub fn append_to(self, genome: &mut Genome) {
        for symbol in self.symbols() {
            genome.push(symbol);
        }
    }
}

impl MutationRates {
    pub const NONE: MutationRates = MutationRates {
        indel: 0.0,
        mismatch: 0.0,
    };

    pub fn validate(&self) -> Result<(), SimError> {
        for (which, value) in [("indel", self.indel), ("mismatch", self.mismatch)] {
            if !(0.0..1.0).contains(&value) {
                return Err(SimError::InvalidRate { which, value });
            }
        }
        Ok(())
    }

    /// Copy one template symbol, drawing replacements from `pool`.
    ///
    /// Gates are checked in order deletion, insertion, mismatch; the first one
    /// that fires decides the outcome.
    pub fn copy<R: Rng + ?Sized>(
        &self,
        symbol: Instruction,
        pool: &[Instruction],
        rng: &mut R,
    ) -> CopyOutcome {
        if gate_fires(self.indel, rng) {
            return CopyOutcome::Deleted;
        }
        if gate_fires(self.indel, rng) {
            return CopyOutcome::Inserted(symbol, random_symbol(pool, symbol, rng));
        }
        if gate_fires(self.mismatch, rng) {
            return CopyOutcome::Mismatched(random_symbol(pool, symbol, rng));
        }
        CopyOutcome::Faithful(symbol)
    }
}

/// One success in `round(1 / rate)` trials
pub fn gate_fires<R: Rng + ?Sized>(rate: f64, rng: &mut R) -> bool {
    if rate < RATE_EPSILON {
        return false;
    }
    let trials = ((1.0 / rate).round() as u64).max(1);
    rng.gen_range(0..trials) == 0
}

fn random_symbol<R: Rng + ?Sized>(pool: &[Instruction], fallback: Instruction, rng: &mut R) -> Instruction {
    pool.choose(rng).copied().unwrap_or(fallback)
}
