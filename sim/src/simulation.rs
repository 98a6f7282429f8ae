use crate::board::{Board, Pos};
use crate::interpreter::update_cell;
use crate::organism::{Eukaryote, Prokaryote};
use crate::{Organism, SimConfig, SimError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::BoardSnapshot;

/// Founder block edge; the genesis layout needs two of these per side
const FOUNDER_BLOCK: usize = 2;

/// Where a tick currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPhase {
    /// No tick running; the board is consistent
    Committed,
    /// Copying the board for the next generation
    CloneInProgress,
    /// Running organisms against the fresh board
    UpdateInProgress,
}

/// A board plus the seeded randomness and generation counter driving it
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    board: Board,
    generation: u64,
    rng: StdRng,
    phase: TickPhase,
}

impl Simulation {
    /// Empty board sized from `config`
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let board = Board::new(config.rows, config.cols);
        Ok(Self::assemble(config, board))
    }

    /// Run from an existing board; its dimensions override the configured ones
    pub fn from_board(mut config: SimConfig, board: Board) -> Result<Self, SimError> {
        config.rows = board.rows();
        config.cols = board.cols();
        config.validate()?;
        Ok(Self::assemble(config, board))
    }

    /// Board seeded with the genesis layout: prokaryotes in the top-left 2×2
    /// block, eukaryotes in the bottom-right one.
    pub fn with_founders(config: SimConfig) -> Result<Self, SimError> {
        let (rows, cols) = (config.rows, config.cols);
        if rows < 2 * FOUNDER_BLOCK || cols < 2 * FOUNDER_BLOCK {
            config.validate()?;
            return Err(SimError::BoardTooSmall { rows, cols });
        }

        let mut simulation = Self::new(config)?;
        let founders = &simulation.config.founders;
        let genome = founders.founder_genome();
        let per_symbol = simulation.config.energy_per_symbol;

        let prokaryote = Organism::from(Prokaryote::newborn(
            [genome.clone()],
            founders.prokaryote_color,
            per_symbol,
        ));
        let eukaryote = Organism::from(Eukaryote::newborn(
            [genome.clone(), genome],
            founders.eukaryote_color,
            per_symbol,
        ));

        for (dr, dc) in block_offsets() {
            simulation.board.place((dr, dc), prokaryote.clone())?;
            let corner = (rows - FOUNDER_BLOCK + dr, cols - FOUNDER_BLOCK + dc);
            simulation.board.place(corner, eukaryote.clone())?;
        }

        tracing::debug!(rows, cols, population = simulation.board.population(), "founders placed");
        Ok(simulation)
    }

    fn assemble(config: SimConfig, board: Board) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            board,
            generation: 0,
            rng,
            phase: TickPhase::Committed,
        }
    }

    /// Place an organism before (or between) ticks
    pub fn place(&mut self, pos: Pos, organism: Organism) -> Result<(), SimError> {
        self.board.place(pos, organism)
    }

    /// Advance one generation.
    ///
    /// Every organism alive at the start of the tick runs once, in row-major
    /// order. Offspring and fights land in the fresh board immediately, so
    /// later cells see them; cells that were empty at the start are skipped
    /// even if something moved in.
    pub fn tick(&mut self) {
        self.phase = TickPhase::CloneInProgress;
        let mut next = self.board.clone();
        let alive: Vec<Pos> = self.board.occupied().map(|(pos, _)| pos).collect();

        self.phase = TickPhase::UpdateInProgress;
        for &pos in &alive {
            update_cell(&mut next, pos, &self.config, &mut self.rng);
        }

        self.board = next;
        self.generation += 1;
        self.phase = TickPhase::Committed;
        tracing::trace!(
            generation = self.generation,
            executed = alive.len(),
            population = self.board.population(),
            "tick committed"
        );
    }

    /// Advance `generations` ticks, logging progress at each quarter
    pub fn run(&mut self, generations: u64) {
        self.run_with(generations, |_| {});
    }

    /// Advance `generations` ticks and collect snapshots of the starting
    /// board, every `interval`-th generation and the final one.
    ///
    /// An `interval` of 0 keeps only the first and last boards.
    pub fn run_collect(&mut self, generations: u64, interval: u64) -> Vec<BoardSnapshot> {
        let mut snapshots = vec![self.snapshot()];
        let start = self.generation;
        self.run_with(generations, |simulation| {
            let done = simulation.generation - start;
            let due = interval > 0 && done % interval == 0;
            if due || done == generations {
                snapshots.push(simulation.snapshot());
            }
        });
        snapshots
    }

    /// Tick `generations` times, calling `after_tick` once each tick commits
    pub fn run_with<F>(&mut self, generations: u64, mut after_tick: F)
    where
        F: FnMut(&Simulation),
    {
        let milestones: Vec<u64> = [25, 50, 75, 100]
            .iter()
            .map(|percent| generations * percent / 100)
            .collect();

        for done in 1..=generations {
            self.tick();
            after_tick(self);
            if let Some(index) = milestones.iter().position(|&m| m == done) {
                tracing::info!(
                    progress = (index + 1) * 25,
                    generation = self.generation,
                    population = self.board.population(),
                    "simulation progress"
                );
            }
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot(self.generation)
    }
}

/// Cells of a 2×2 block relative to its top-left corner
fn block_offsets() -> impl Iterator<Item = Pos> {
    (0..FOUNDER_BLOCK).flat_map(|dr| (0..FOUNDER_BLOCK).map(move |dc| (dr, dc)))
}
