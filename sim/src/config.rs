use crate::board::Neighborhood;
use crate::combat::CombatRules;
use crate::interpreter::RewardTable;
use crate::mutation::MutationRates;
use crate::SimError;
use serde::{Deserialize, Serialize};
use shared::{Color, Genome, Instruction, OrganismKind};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible simulation runs.
    pub seed: u64,
    pub rows: usize,
    pub cols: usize,
    /// Which cells count as neighbors for mating, placement and combat.
    pub neighborhood: Neighborhood,
    /// Newborn energy per genome symbol.
    pub energy_per_symbol: i64,
    /// Bonuses consulted when an `E` instruction executes.
    pub reward_patterns: RewardTable,
    /// Symbols drawn for insertions and mismatches.
    pub mutation_pool: Vec<Instruction>,
    pub eukaryote_rates: MutationRates,
    pub prokaryote_rates: MutationRates,
    pub eukaryote_combat: CombatRules,
    pub prokaryote_combat: CombatRules,
    /// Genesis population used by `Simulation::with_founders`.
    pub founders: FounderConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            rows: 100,
            cols: 100,
            neighborhood: Neighborhood::Moore,
            energy_per_symbol: 5,
            reward_patterns: RewardTable::default(),
            mutation_pool: Instruction::ALPHABET.to_vec(),
            eukaryote_rates: MutationRates {
                indel: 0.002,
                mismatch: 0.002,
            },
            prokaryote_rates: MutationRates {
                indel: 0.01,
                mismatch: 0.01,
            },
            eukaryote_combat: CombatRules {
                ratio_divisor: 2.0,
                spread: 0.05,
            },
            prokaryote_combat: CombatRules {
                ratio_divisor: 1.0,
                spread: 0.1,
            },
            founders: FounderConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SimError::EmptyBoard {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.mutation_pool.is_empty() {
            return Err(SimError::EmptyMutationPool);
        }
        self.eukaryote_rates.validate()?;
        self.prokaryote_rates.validate()?;
        self.eukaryote_combat.validate()?;
        self.prokaryote_combat.validate()?;
        Ok(())
    }

    /// Mutation rates used when an organism of `kind` copies its genome
    pub fn rates_for(&self, kind: OrganismKind) -> MutationRates {
        match kind {
            OrganismKind::Prokaryote => self.prokaryote_rates,
            OrganismKind::Eukaryote => self.eukaryote_rates,
        }
    }

    /// Combat rules applied when an offspring of `kind` fights for space
    pub fn combat_for(&self, kind: OrganismKind) -> CombatRules {
        match kind {
            OrganismKind::Prokaryote => self.prokaryote_combat,
            OrganismKind::Eukaryote => self.eukaryote_combat,
        }
    }
}

/// Genesis population: four eukaryotes in the bottom-right corner and four
/// prokaryotes in the top-left corner, all carrying the same starting gene.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FounderConfig {
    pub starting_gene: Genome,
    /// How many times `starting_gene` is repeated to form each founder strand
    pub gene_repeats: usize,
    pub eukaryote_color: Color,
    pub prokaryote_color: Color,
}

impl Default for FounderConfig {
    fn default() -> Self {
        Self {
            starting_gene: Genome::from(vec![
                Instruction::Nop,
                Instruction::Replicate,
                Instruction::Energy,
            ]),
            gene_repeats: 4,
            eukaryote_color: Color::new(0, 255, 255),
            prokaryote_color: Color::new(255, 255, 0),
        }
    }
}

impl FounderConfig {
    pub fn founder_genome(&self) -> Genome {
        Genome::repeated(&self.starting_gene, self.gene_repeats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.founders.founder_genome().to_string(), "NRENRENRENRE");
    }

    #[test]
    fn test_invalid_rates_rejected() {
        let config = SimConfig {
            prokaryote_rates: MutationRates {
                indel: 1.0,
                mismatch: 0.0,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidRate { which: "indel", .. })
        ));
    }

    #[test]
    fn test_empty_board_rejected() {
        let config = SimConfig {
            rows: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SimError::EmptyBoard { .. })));
    }

    #[test]
    fn test_empty_mutation_pool_rejected() {
        let config = SimConfig {
            mutation_pool: Vec::new(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(SimError::EmptyMutationPool));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimConfig = serde_json::from_str(
            r#"{
                "rows": 8,
                "cols": 6,
                "seed": 7,
                "mutation_pool": ["N", "R", "E", "N", "N", "N"],
                "reward_patterns": {"E": 1, "EE": 3},
                "neighborhood": "von_neumann"
            }"#,
        )
        .unwrap();

        assert_eq!(config.rows, 8);
        assert_eq!(config.cols, 6);
        assert_eq!(config.seed, 7);
        assert_eq!(config.mutation_pool.len(), 6);
        assert_eq!(config.neighborhood, Neighborhood::VonNeumann);
        assert_eq!(config.energy_per_symbol, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rates_and_rules_per_kind() {
        let config = SimConfig::default();
        assert_eq!(config.rates_for(OrganismKind::Prokaryote), config.prokaryote_rates);
        assert_eq!(config.rates_for(OrganismKind::Eukaryote), config.eukaryote_rates);
        assert_eq!(config.combat_for(OrganismKind::Eukaryote).ratio_divisor, 2.0);
        assert_eq!(config.combat_for(OrganismKind::Prokaryote).ratio_divisor, 1.0);
    }
}
