use crate::board::{Board, Pos};
use crate::reproduction::{self, Reproduction};
use crate::{Organism, SimConfig, SimError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::{Genome, Instruction};
use std::collections::BTreeMap;

/// Energy bonuses for instruction patterns, consulted on `E`.
///
/// Serialized as a map from pattern string to reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, i64>", into = "BTreeMap<String, i64>")]
pub struct RewardTable {
    patterns: Vec<(Genome, i64)>,
}

impl RewardTable {
    pub fn new(patterns: impl IntoIterator<Item = (Genome, i64)>) -> Result<Self, SimError> {
        let patterns: Vec<_> = patterns.into_iter().collect();
        if patterns.iter().any(|(pattern, _)| pattern.is_empty()) {
            return Err(SimError::EmptyRewardPattern);
        }
        Ok(Self { patterns })
    }

    /// Largest reward among patterns that start at `position` and fit inside
    /// `genome`; 0 when nothing matches.
    pub fn best_reward(&self, genome: &Genome, position: usize) -> i64 {
        self.patterns
            .iter()
            .filter(|(pattern, _)| genome.matches_at(position, pattern))
            .map(|&(_, reward)| reward)
            .fold(0, i64::max)
    }
}

impl Default for RewardTable {
    /// E: 2, EE: 4, EEE: 8, EEEE: 16
    fn default() -> Self {
        let patterns = (1..=4)
            .map(|run| (Genome::from(vec![Instruction::Energy; run]), 1_i64 << run))
            .collect();
        Self { patterns }
    }
}

impl TryFrom<BTreeMap<String, i64>> for RewardTable {
    type Error = SimError;

    fn try_from(map: BTreeMap<String, i64>) -> Result<Self, Self::Error> {
        let patterns = map
            .into_iter()
            .map(|(pattern, reward)| Ok((pattern.parse::<Genome>()?, reward)))
            .collect::<Result<Vec<_>, SimError>>()?;
        Self::new(patterns)
    }
}

impl From<RewardTable> for BTreeMap<String, i64> {
    fn from(table: RewardTable) -> Self {
        table
            .patterns
            .into_iter()
            .map(|(pattern, reward)| (pattern.to_string(), reward))
            .collect()
    }
}

/// Run one generation for the organism at `pos`: every strand executes one
/// instruction, strand 0 first.
pub fn update_cell<R: Rng + ?Sized>(board: &mut Board, pos: Pos, config: &SimConfig, rng: &mut R) {
    // Lift the organism out so it can act on its neighbors. Neighborhood
    // queries never include `pos`, so nothing lands here meanwhile.
    let Some(mut organism) = board.take(pos) else {
        return;
    };
    for strand in 0..organism.strands().len() {
        execute(&mut organism, strand, pos, board, config, rng);
    }
    board.put(pos, organism);
}

/// Execute the instruction under `strand`'s operation pointer.
///
/// Empty strands do nothing.
pub fn execute<R: Rng + ?Sized>(
    organism: &mut Organism,
    strand: usize,
    pos: Pos,
    board: &mut Board,
    config: &SimConfig,
    rng: &mut R,
) -> Option<Reproduction> {
    let current = organism.strands().get(strand)?;
    let read_pos = current.read_pos()?;
    let instruction = current.current()?;

    match instruction {
        Instruction::Nop => {
            organism.strands_mut()[strand].advance();
            *organism.energy_mut() -= 1;
            None
        }
        Instruction::Energy => {
            let reward = config.reward_patterns.best_reward(current.genome(), read_pos);
            organism.strands_mut()[strand].advance();
            *organism.energy_mut() += reward - 1;
            None
        }
        Instruction::Replicate => replicate(organism, strand, pos, board, config, rng),
    }
}

/// Copy one template symbol, then reproduce if every strand is copied.
fn replicate<R: Rng + ?Sized>(
    organism: &mut Organism,
    strand: usize,
    pos: Pos,
    board: &mut Board,
    config: &SimConfig,
    rng: &mut R,
) -> Option<Reproduction> {
    let rates = config.rates_for(organism.kind());
    let target = &mut organism.strands_mut()[strand];
    if let Some(template) = target.next_template() {
        let outcome = rates.copy(template, &config.mutation_pool, rng);
        target.record_copy(outcome);
        *organism.energy_mut() -= 1;
    }

    organism
        .is_ready()
        .then(|| reproduction::reproduce(organism, pos, board, config, rng))
}
