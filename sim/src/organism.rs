use crate::mutation::CopyOutcome;
use shared::{CellReport, Color, Genome, Instruction, OrganismKind};

/// One genome strand together with its interpreter and replication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strand {
    genome: Genome,
    /// Replica under construction
    replica: Genome,
    /// Next instruction, read modulo the genome length
    op_pos: usize,
    /// Template symbols already copied into `replica`
    rpc_pos: usize,
}

impl Strand {
    pub fn new(genome: Genome) -> Self {
        Self {
            genome,
            replica: Genome::new(),
            op_pos: 0,
            rpc_pos: 0,
        }
    }

    /// Build a strand part-way through execution. `rpc_pos` is capped at the
    /// genome length.
    pub fn with_progress(genome: Genome, replica: Genome, op_pos: usize, rpc_pos: usize) -> Self {
        let rpc_pos = rpc_pos.min(genome.len());
        Self {
            genome,
            replica,
            op_pos,
            rpc_pos,
        }
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn replica(&self) -> &Genome {
        &self.replica
    }

    pub fn op_pos(&self) -> usize {
        self.op_pos
    }

    pub fn rpc_pos(&self) -> usize {
        self.rpc_pos
    }

    /// Position the next instruction is read from, `None` for an empty strand
    pub fn read_pos(&self) -> Option<usize> {
        (!self.genome.is_empty()).then(|| self.op_pos % self.genome.len())
    }

    pub fn current(&self) -> Option<Instruction> {
        self.read_pos().and_then(|pos| self.genome.get(pos))
    }

    /// Template symbol awaiting copy, `None` once the copy is complete
    pub fn next_template(&self) -> Option<Instruction> {
        self.genome.get(self.rpc_pos)
    }

    /// Whole genome copied (and there was something to copy)
    pub fn is_copied(&self) -> bool {
        !self.genome.is_empty() && self.rpc_pos == self.genome.len()
    }

    pub(crate) fn advance(&mut self) {
        self.op_pos = self.op_pos.wrapping_add(1);
    }

    pub(crate) fn record_copy(&mut self, outcome: CopyOutcome) {
        outcome.append_to(&mut self.replica);
        self.rpc_pos += 1;
        self.advance();
    }

    pub(crate) fn replica_mut(&mut self) -> &mut Genome {
        &mut self.replica
    }

    pub(crate) fn reset_replication(&mut self) {
        self.replica.clear();
        self.rpc_pos = 0;
    }
}

/// Organism body carrying `N` strands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body<const N: usize> {
    pub energy: i64,
    pub color: Color,
    strands: [Strand; N],
}

/// Single-strand organism
pub type Prokaryote = Body<1>;

/// Dual-strand organism
pub type Eukaryote = Body<2>;

impl<const N: usize> Body<N> {
    pub fn new(genomes: [Genome; N], color: Color, energy: i64) -> Self {
        Self {
            energy,
            color,
            strands: genomes.map(Strand::new),
        }
    }

    pub fn from_strands(strands: [Strand; N], color: Color, energy: i64) -> Self {
        Self {
            energy,
            color,
            strands,
        }
    }

    /// Fresh organism whose energy is its total genome length times
    /// `energy_per_symbol`
    pub fn newborn(genomes: [Genome; N], color: Color, energy_per_symbol: i64) -> Self {
        let symbols: usize = genomes.iter().map(Genome::len).sum();
        Self::new(genomes, color, symbols as i64 * energy_per_symbol)
    }

    pub fn strands(&self) -> &[Strand; N] {
        &self.strands
    }

    pub(crate) fn strands_mut(&mut self) -> &mut [Strand; N] {
        &mut self.strands
    }

    pub fn genomes(&self) -> [&Genome; N] {
        std::array::from_fn(|i| self.strands[i].genome())
    }

    pub fn is_ready(&self) -> bool {
        self.strands.iter().all(Strand::is_copied)
    }

    pub(crate) fn reset_replication(&mut self) {
        self.strands.iter_mut().for_each(Strand::reset_replication);
    }
}

impl Eukaryote {
    /// Same strand pair, in either order
    pub fn is_same_species(&self, other: &Eukaryote) -> bool {
        let [a0, a1] = self.genomes();
        let [b0, b1] = other.genomes();
        (a0 == b0 && a1 == b1) || (a0 == b1 && a1 == b0)
    }
}

/// A grid occupant. Cloning produces a fully independent deep copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Organism {
    Prokaryote(Prokaryote),
    Eukaryote(Eukaryote),
}

impl Organism {
    pub fn prokaryote(genome: Genome, color: Color, energy: i64) -> Self {
        Organism::Prokaryote(Prokaryote::new([genome], color, energy))
    }

    pub fn eukaryote(genomes: [Genome; 2], color: Color, energy: i64) -> Self {
        Organism::Eukaryote(Eukaryote::new(genomes, color, energy))
    }

    pub fn kind(&self) -> OrganismKind {
        match self {
            Organism::Prokaryote(_) => OrganismKind::Prokaryote,
            Organism::Eukaryote(_) => OrganismKind::Eukaryote,
        }
    }

    pub fn energy(&self) -> i64 {
        match self {
            Organism::Prokaryote(body) => body.energy,
            Organism::Eukaryote(body) => body.energy,
        }
    }

    pub fn energy_mut(&mut self) -> &mut i64 {
        match self {
            Organism::Prokaryote(body) => &mut body.energy,
            Organism::Eukaryote(body) => &mut body.energy,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Organism::Prokaryote(body) => body.color,
            Organism::Eukaryote(body) => body.color,
        }
    }

    pub fn strands(&self) -> &[Strand] {
        match self {
            Organism::Prokaryote(body) => body.strands(),
            Organism::Eukaryote(body) => body.strands(),
        }
    }

    pub(crate) fn strands_mut(&mut self) -> &mut [Strand] {
        match self {
            Organism::Prokaryote(body) => body.strands_mut(),
            Organism::Eukaryote(body) => body.strands_mut(),
        }
    }

    pub fn genomes(&self) -> impl Iterator<Item = &Genome> + '_ {
        self.strands().iter().map(Strand::genome)
    }

    /// Every strand fully copied and none of them empty
    pub fn is_ready(&self) -> bool {
        self.strands().iter().all(Strand::is_copied)
    }

    /// Genetic identity: same variant and same strands, strand order ignored
    pub fn is_same_species(&self, other: &Organism) -> bool {
        match (self, other) {
            (Organism::Prokaryote(a), Organism::Prokaryote(b)) => a.genomes() == b.genomes(),
            (Organism::Eukaryote(a), Organism::Eukaryote(b)) => a.is_same_species(b),
            _ => false,
        }
    }

    pub fn report(&self) -> CellReport {
        CellReport {
            kind: self.kind(),
            color: self.color(),
            energy: self.energy(),
            genomes: self.genomes().cloned().collect(),
        }
    }
}

impl From<Prokaryote> for Organism {
    fn from(body: Prokaryote) -> Self {
        Organism::Prokaryote(body)
    }
}

impl From<Eukaryote> for Organism {
    fn from(body: Eukaryote) -> Self {
        Organism::Eukaryote(body)
    }
}
