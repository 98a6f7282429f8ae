use crate::board::{Board, Pos};
use crate::{Organism, SimError};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Parameters of the contest draw for one organism variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatRules {
    /// The draw's mean is `challenger / defender / ratio_divisor`
    pub ratio_divisor: f64,

    /// Standard deviation of the draw
    pub spread: f64,
}

impl CombatRules {
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.ratio_divisor.is_finite() || self.ratio_divisor <= 0.0 {
            return Err(SimError::InvalidCombatDivisor(self.ratio_divisor));
        }
        if !self.spread.is_finite() || self.spread < 0.0 {
            return Err(SimError::InvalidCombatSpread(self.spread));
        }
        Ok(())
    }
}

/// Result of a fight over a neighboring cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Battle {
    /// Offspring took the defender's cell
    Won(Pos),
    /// Offspring discarded; the defender may have been drained
    Lost(Pos),
    /// No candidate to fight
    NoContest,
}

/// Decide whether a challenger with `challenger` energy beats a defender
/// with `defender` energy.
pub fn challenger_wins<R: Rng + ?Sized>(
    challenger: i64,
    defender: i64,
    rules: CombatRules,
    rng: &mut R,
) -> bool {
    if challenger == 0 && defender == 0 {
        return false;
    }
    if challenger >= 0 && defender <= 0 {
        return true;
    }
    if challenger > 0 && defender > 0 {
        return draw(challenger, defender, rules, rng) >= 0.5;
    }
    if challenger < 0 && defender < 0 {
        return draw(challenger, defender, rules, rng) < 0.5;
    }
    false
}

fn draw<R: Rng + ?Sized>(challenger: i64, defender: i64, rules: CombatRules, rng: &mut R) -> f64 {
    let mean = challenger as f64 / defender as f64 / rules.ratio_divisor;
    let z: f64 = rng.sample(StandardNormal);
    mean + z * rules.spread
}

/// Pick one defender among `candidates` and fight for its cell.
///
/// A winning offspring replaces the defender. A losing one is dropped, and a
/// positive `strength` is subtracted from the defender's energy.
pub fn battle<R: Rng + ?Sized>(
    offspring: Organism,
    strength: i64,
    candidates: &[Pos],
    board: &mut Board,
    rules: CombatRules,
    rng: &mut R,
) -> Battle {
    let Some(&target) = candidates.choose(rng) else {
        return Battle::NoContest;
    };
    let Some(defender) = board.get(target).map(Organism::energy) else {
        return Battle::NoContest;
    };

    if challenger_wins(strength, defender, rules, rng) {
        tracing::debug!(
            row = target.0,
            col = target.1,
            strength,
            defender,
            kind = %offspring.kind(),
            "offspring displaced neighbor"
        );
        board.put(target, offspring);
        return Battle::Won(target);
    }

    if strength > 0 {
        if let Some(loser) = board.get_mut(target) {
            *loser.energy_mut() -= strength;
        }
    }
    tracing::debug!(row = target.0, col = target.1, strength, defender, "offspring repelled");
    Battle::Lost(target)
}
