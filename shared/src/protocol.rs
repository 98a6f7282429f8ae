use crate::{Color, Genome};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which organism variant occupies a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganismKind {
    /// Single-strand organism, reproduces asexually
    Prokaryote,

    /// Dual-strand organism, reproduces with a ready neighbor
    Eukaryote,
}

impl fmt::Display for OrganismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrganismKind::Prokaryote => write!(f, "Prokaryote"),
            OrganismKind::Eukaryote => write!(f, "Eukaryote"),
        }
    }
}

/// Everything a reporting collaborator may learn about one occupied cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellReport {
    pub kind: OrganismKind,
    pub color: Color,
    pub energy: i64,

    /// One strand for prokaryotes, two for eukaryotes
    pub genomes: Vec<Genome>,
}

/// Read-only copy of a committed board.
///
/// Snapshots are only ever taken between ticks, so a snapshot never shows a
/// half-updated generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Generation this board belongs to (0 = genesis)
    pub generation: u64,
    pub rows: usize,
    pub cols: usize,

    /// Row-major grid, `None` where the cell is empty
    pub cells: Vec<Vec<Option<CellReport>>>,
}

impl BoardSnapshot {
    pub fn get(&self, row: usize, col: usize) -> Option<&CellReport> {
        self.cells.get(row)?.get(col)?.as_ref()
    }

    /// Iterate over occupied cells as `((row, col), report)`
    pub fn occupied(&self) -> impl Iterator<Item = ((usize, usize), &CellReport)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.as_ref().map(|report| ((row, col), report)))
        })
    }

    pub fn population(&self) -> usize {
        self.occupied().count()
    }
}

/// Describes the simulation run a snapshot service is publishing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    /// Unique ID for this run
    pub run_id: Uuid,

    /// Snapshot format version the service speaks
    pub protocol_version: u32,

    pub rows: usize,
    pub cols: usize,

    /// Most recent published generation, if any
    pub latest_generation: Option<u64>,

    /// Number of snapshots currently retained
    pub snapshots_held: usize,

    /// Service uptime in seconds
    pub uptime_seconds: u64,
}

/// Snapshot service error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerError {
    /// Nothing has been published yet
    NoSnapshot,

    /// The requested generation was never published or has been evicted
    UnknownGeneration { generation: u64 },
}
