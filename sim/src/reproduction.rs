use crate::board::{Board, Pos};
use crate::combat::{self, Battle};
use crate::crossover::crossover;
use crate::organism::{Eukaryote, Prokaryote};
use crate::{Organism, SimConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use shared::{Color, Genome};

/// Lowest value of a synthesized color channel
const COLOR_FLOOR: u16 = 50;

/// Synthesized channels wrap within `COLOR_FLOOR..COLOR_FLOOR + COLOR_SPAN`
const COLOR_SPAN: u16 = 205;

/// Exclusive upper bound of the random color shift
const COLOR_JITTER: u16 = 10;

/// What a reproduction attempt led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reproduction {
    /// No neighboring eukaryote was ready; buffers are kept for a retry
    NoMate,
    /// Offspring moved into an empty neighbor
    Settled(Pos),
    /// Offspring won a fight and replaced the neighbor
    Displaced(Pos),
    /// Offspring lost a fight and was discarded
    Repelled(Pos),
    /// No empty cell and nobody to fight; offspring discarded
    Crowded,
}

/// Produce an offspring from a ready organism sitting at `pos`.
pub fn reproduce<R: Rng + ?Sized>(
    parent: &mut Organism,
    pos: Pos,
    board: &mut Board,
    config: &SimConfig,
    rng: &mut R,
) -> Reproduction {
    let outcome = match parent {
        Organism::Prokaryote(body) => reproduce_asexual(body, pos, board, config, rng),
        Organism::Eukaryote(body) => reproduce_sexual(body, pos, board, config, rng),
    };
    tracing::debug!(row = pos.0, col = pos.1, kind = %parent.kind(), ?outcome, "reproduction");
    outcome
}

/// The replica becomes the offspring's strand as-is. The parent keeps its
/// buffer when the offspring finds neither room nor a rival.
fn reproduce_asexual<R: Rng + ?Sized>(
    parent: &mut Prokaryote,
    pos: Pos,
    board: &mut Board,
    config: &SimConfig,
    rng: &mut R,
) -> Reproduction {
    let [strand] = parent.strands();
    let genome = strand.replica().clone();

    let [parent_genome] = parent.genomes();
    let color = if *parent_genome == genome {
        parent.color
    } else {
        jitter_color(parent.color, rng)
    };

    let offspring = Organism::from(Prokaryote::newborn([genome], color, config.energy_per_symbol));
    let strength = offspring.energy();
    let outcome = settle(offspring, strength, pos, board, config, rng);
    if outcome != Reproduction::Crowded {
        parent.reset_replication();
    }
    outcome
}

/// Mate with a ready neighboring eukaryote.
///
/// Crossover works on copies of the replicas, so both partners keep their
/// buffers untouched when the offspring finds neither room nor a rival.
fn reproduce_sexual<R: Rng + ?Sized>(
    parent: &mut Eukaryote,
    pos: Pos,
    board: &mut Board,
    config: &SimConfig,
    rng: &mut R,
) -> Reproduction {
    let mates = board.ready_mates(pos, config.neighborhood);
    let Some(&mate_pos) = mates.choose(rng) else {
        return Reproduction::NoMate;
    };
    let Some(Organism::Eukaryote(mate)) = board.get(mate_pos) else {
        return Reproduction::NoMate;
    };

    let from_parent = contribute(parent, rng);
    let from_mate = contribute(mate, rng);
    let mut offspring = Eukaryote::newborn([from_parent, from_mate], Color::default(), config.energy_per_symbol);
    offspring.color = if offspring.is_same_species(parent) {
        parent.color
    } else if offspring.is_same_species(mate) {
        mate.color
    } else {
        blend_colors(parent.color, mate.color, rng)
    };
    let strength = (parent.energy + mate.energy) / 2;

    let outcome = settle(offspring.into(), strength, pos, board, config, rng);
    match outcome {
        Reproduction::Crowded | Reproduction::NoMate => return outcome,
        // the mate itself was the rival and is gone
        Reproduction::Displaced(target) if target == mate_pos => {}
        _ => {
            if let Some(Organism::Eukaryote(mate)) = board.get_mut(mate_pos) {
                mate.reset_replication();
            }
        }
    }
    parent.reset_replication();
    outcome
}

/// Cross a copy of the replica pair over and hand out one of the two results
fn contribute<R: Rng + ?Sized>(parent: &Eukaryote, rng: &mut R) -> Genome {
    let [first, second] = parent.strands();
    let (mut first, mut second) = (first.replica().clone(), second.replica().clone());
    crossover(&mut first, &mut second, rng);
    if rng.gen_bool(0.5) {
        first
    } else {
        second
    }
}

/// Put the offspring in a random empty neighbor, or fight for an occupied one
fn settle<R: Rng + ?Sized>(
    offspring: Organism,
    strength: i64,
    pos: Pos,
    board: &mut Board,
    config: &SimConfig,
    rng: &mut R,
) -> Reproduction {
    let empty = board.empty_neighbors(pos, config.neighborhood);
    if let Some(&target) = empty.choose(rng) {
        board.put(target, offspring);
        return Reproduction::Settled(target);
    }

    let rivals = board.rival_neighbors(pos, &offspring, config.neighborhood);
    let rules = config.combat_for(offspring.kind());
    match combat::battle(offspring, strength, &rivals, board, rules, rng) {
        Battle::Won(target) => Reproduction::Displaced(target),
        Battle::Lost(target) => Reproduction::Repelled(target),
        Battle::NoContest => Reproduction::Crowded,
    }
}

fn shifted<R: Rng + ?Sized>(base: u16, rng: &mut R) -> u8 {
    let value = (base + rng.gen_range(0..COLOR_JITTER)) % COLOR_SPAN + COLOR_FLOOR;
    value as u8
}

/// New prokaryote lineage color: red and blue drift, green cleared
fn jitter_color<R: Rng + ?Sized>(parent: Color, rng: &mut R) -> Color {
    let r = shifted(parent.r().into(), rng);
    let b = shifted(parent.b().into(), rng);
    Color::new(r, 0, b)
}

/// New eukaryote lineage color: green and blue average the parents with drift,
/// red cleared
fn blend_colors<R: Rng + ?Sized>(a: Color, b: Color, rng: &mut R) -> Color {
    let avg = |x: u8, y: u8| (u16::from(x) + u16::from(y)) / 2;
    let g = shifted(avg(a.g(), b.g()), rng);
    let blue = shifted(avg(a.b(), b.b()), rng);
    Color::new(0, g, blue)
}
