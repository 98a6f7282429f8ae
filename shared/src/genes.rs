use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single genome symbol. Each symbol is executed as one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Instruction {
    /// `N`: does nothing but still costs energy
    #[serde(rename = "N")]
    Nop,

    /// `R`: copies one template symbol into the replica buffer
    #[serde(rename = "R")]
    Replicate,

    /// `E`: harvests energy according to the reward table
    #[serde(rename = "E")]
    Energy,
}

impl Instruction {
    /// Every instruction the interpreter understands.
    pub const ALPHABET: [Instruction; 3] = [Instruction::Nop, Instruction::Replicate, Instruction::Energy];

    pub fn symbol(self) -> char {
        match self {
            Instruction::Nop => 'N',
            Instruction::Replicate => 'R',
            Instruction::Energy => 'E',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'N' => Some(Instruction::Nop),
            'R' => Some(Instruction::Replicate),
            'E' => Some(Instruction::Energy),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenomeError {
    /// The genome text holds a symbol outside the instruction alphabet.
    /// A genome like this is corrupt and can never be executed.
    #[error("genome contains unknown instruction {symbol:?} at position {position}")]
    UnknownInstruction { symbol: char, position: usize },
}

/// A genome strand: an ordered sequence of instructions.
///
/// Length may be zero, in which case the strand never executes.
/// Serialized as its symbol string, e.g. `"NRE"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Genome(Vec<Instruction>);

impl Genome {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Concatenate `unit` with itself `times` times
    pub fn repeated(unit: &Genome, times: usize) -> Self {
        Self(unit.0.repeat(times))
    }

    /// Parse raw symbol bytes, rejecting anything outside the alphabet
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GenomeError> {
        bytes
            .iter()
            .enumerate()
            .map(|(position, &byte)| {
                let symbol = byte as char;
                Instruction::from_symbol(symbol)
                    .ok_or(GenomeError::UnknownInstruction { symbol, position })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Instruction> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[Instruction] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Instruction> + '_ {
        self.0.iter().copied()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.0.push(instruction);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// True when `pattern` occurs starting at `position` without running
    /// past the end of the strand.
    pub fn matches_at(&self, position: usize, pattern: &Genome) -> bool {
        self.0
            .get(position..)
            .is_some_and(|rest| rest.starts_with(&pattern.0))
    }
}

impl From<Vec<Instruction>> for Genome {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self(instructions)
    }
}

impl FromIterator<Instruction> for Genome {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for Genome {
    type Err = GenomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, symbol)| {
                Instruction::from_symbol(symbol)
                    .ok_or(GenomeError::UnknownInstruction { symbol, position })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl TryFrom<String> for Genome {
    type Error = GenomeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Genome> for String {
    fn from(genome: Genome) -> Self {
        genome.to_string()
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.0 {
            write!(f, "{}", instruction.symbol())?;
        }
        Ok(())
    }
}

/// Visual tag carried by every organism. Only the reporting side looks at it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn r(self) -> u8 {
        self.0[0]
    }

    pub fn g(self) -> u8 {
        self.0[1]
    }

    pub fn b(self) -> u8 {
        self.0[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_genome_parsing() {
        let genome: Genome = "NRE".parse().unwrap();
        assert_eq!(genome.len(), 3);
        assert_eq!(genome.get(0), Some(Instruction::Nop));
        assert_eq!(genome.get(1), Some(Instruction::Replicate));
        assert_eq!(genome.get(2), Some(Instruction::Energy));
        assert_eq!(genome.get(3), None);
    }

    #[test]
    fn test_unknown_instruction_is_rejected() {
        let err = "NRXE".parse::<Genome>().unwrap_err();
        assert_eq!(
            err,
            GenomeError::UnknownInstruction {
                symbol: 'X',
                position: 2
            }
        );

        let err = Genome::from_bytes(b"E?").unwrap_err();
        assert_eq!(
            err,
            GenomeError::UnknownInstruction {
                symbol: '?',
                position: 1
            }
        );
    }

    #[test]
    fn test_empty_genome() {
        let genome: Genome = "".parse().unwrap();
        assert!(genome.is_empty());
        assert_eq!(genome, Genome::new());
    }

    #[test]
    fn test_repeated() {
        let unit: Genome = "NRE".parse().unwrap();
        let genome = Genome::repeated(&unit, 3);
        assert_eq!(genome.to_string(), "NRENRENRE");
    }

    #[test]
    fn test_matches_at_stays_inside_strand() {
        let genome: Genome = "NEEE".parse().unwrap();
        let ee: Genome = "EE".parse().unwrap();
        let eeee: Genome = "EEEE".parse().unwrap();

        assert!(genome.matches_at(1, &ee));
        assert!(genome.matches_at(2, &ee));
        assert!(!genome.matches_at(3, &ee));
        assert!(!genome.matches_at(1, &eeee));
        assert!(!genome.matches_at(10, &ee));
    }

    #[test]
    fn test_genome_serializes_as_symbols() {
        let genome: Genome = "ERN".parse().unwrap();
        let json = serde_json::to_string(&genome).unwrap();
        assert_eq!(json, "\"ERN\"");

        assert!(serde_json::from_str::<Genome>("\"EZ\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_display_parses_back(symbols in "[NRE]{0,40}") {
            let genome: Genome = symbols.parse().unwrap();
            prop_assert_eq!(genome.len(), symbols.len());
            prop_assert_eq!(genome.to_string(), symbols);
        }
    }
}
