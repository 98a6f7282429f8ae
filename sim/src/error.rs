use shared::GenomeError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error(transparent)]
    Genome(#[from] GenomeError),

    #[error("{which} rate must lie in [0, 1), got {value}")]
    InvalidRate { which: &'static str, value: f64 },

    #[error("board needs at least one row and one column, got {rows}x{cols}")]
    EmptyBoard { rows: usize, cols: usize },

    #[error("founder layout needs a board of at least 4x4, got {rows}x{cols}")]
    BoardTooSmall { rows: usize, cols: usize },

    #[error("position ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },

    #[error("reward patterns must not be empty")]
    EmptyRewardPattern,

    #[error("mutation pool must hold at least one instruction")]
    EmptyMutationPool,

    #[error("combat ratio divisor must be finite and positive, got {0}")]
    InvalidCombatDivisor(f64),

    #[error("combat spread must be finite and non-negative, got {0}")]
    InvalidCombatSpread(f64),
}
