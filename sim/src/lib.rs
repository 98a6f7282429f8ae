pub mod board;
pub mod combat;
pub mod config;
pub mod crossover;
pub mod error;
pub mod interpreter;
pub mod mutation;
pub mod organism;
pub mod reproduction;
pub mod simulation;

pub use board::{Board, Neighborhood, Pos};
pub use combat::CombatRules;
pub use config::{FounderConfig, SimConfig};
pub use error::SimError;
pub use interpreter::RewardTable;
pub use mutation::MutationRates;
pub use organism::{Body, Eukaryote, Organism, Prokaryote, Strand};
pub use reproduction::Reproduction;
pub use simulation::{Simulation, TickPhase};

use shared::BoardSnapshot;

/// Run a complete simulation from the founder layout.
///
/// Returns the board at generation 0, every `interval`-th generation and the
/// last one.
pub fn run_simulation(
    config: SimConfig,
    generations: u64,
    interval: u64,
) -> Result<Vec<BoardSnapshot>, SimError> {
    let mut simulation = Simulation::with_founders(config)?;
    tracing::info!(
        rows = simulation.board().rows(),
        cols = simulation.board().cols(),
        seed = simulation.config().seed,
        generations,
        "starting simulation"
    );
    let snapshots = simulation.run_collect(generations, interval);
    tracing::info!(
        generation = simulation.generation(),
        population = simulation.board().population(),
        "simulation finished"
    );
    Ok(snapshots)
}
