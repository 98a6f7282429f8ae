use crate::{Organism, SimError};
use serde::{Deserialize, Serialize};
use shared::{BoardSnapshot, OrganismKind};

/// Grid coordinates as `(row, col)`
pub type Pos = (usize, usize);

/// Which surrounding cells count as neighbors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    /// 8-connected
    #[default]
    Moore,
    /// 4-connected
    VonNeumann,
}

impl Neighborhood {
    /// Row/column offsets in row-major order
    fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Neighborhood::Moore => &[
                (-1, -1),
                (-1, 0),
                (-1, 1),
                (0, -1),
                (0, 1),
                (1, -1),
                (1, 0),
                (1, 1),
            ],
            Neighborhood::VonNeumann => &[(-1, 0), (0, -1), (0, 1), (1, 0)],
        }
    }
}

/// Bounded 2D grid; each cell holds at most one organism
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    rows: usize,
    cols: usize,
    grid: Vec<Vec<Option<Organism>>>,
}

impl Board {
    /// Create an empty board with the given dimensions
    pub fn new(rows: usize, cols: usize) -> Self {
        let grid = vec![vec![None; cols]; rows];
        Board { rows, cols, grid }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Check if position is valid
    pub fn is_valid_position(&self, (row, col): Pos) -> bool {
        row < self.rows && col < self.cols
    }

    /// Organism at position (None if empty or out of bounds)
    pub fn get(&self, (row, col): Pos) -> Option<&Organism> {
        self.grid.get(row)?.get(col)?.as_ref()
    }

    pub fn get_mut(&mut self, (row, col): Pos) -> Option<&mut Organism> {
        self.grid.get_mut(row)?.get_mut(col)?.as_mut()
    }

    /// Place an organism on an empty cell
    pub fn place(&mut self, pos: Pos, organism: Organism) -> Result<(), SimError> {
        if !self.is_valid_position(pos) {
            return Err(SimError::OutOfBounds {
                row: pos.0,
                col: pos.1,
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.get(pos).is_some() {
            return Err(SimError::Occupied {
                row: pos.0,
                col: pos.1,
            });
        }
        self.put(pos, organism);
        Ok(())
    }

    /// Overwrite a cell, returning whatever lived there.
    /// Out-of-bounds positions are ignored.
    pub(crate) fn put(&mut self, (row, col): Pos, organism: Organism) -> Option<Organism> {
        let cell = self.grid.get_mut(row)?.get_mut(col)?;
        cell.replace(organism)
    }

    pub(crate) fn take(&mut self, (row, col): Pos) -> Option<Organism> {
        self.grid.get_mut(row)?.get_mut(col)?.take()
    }

    /// Occupied cells in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (Pos, &Organism)> + '_ {
        self.grid.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.as_ref().map(|organism| ((row, col), organism)))
        })
    }

    pub fn population(&self) -> usize {
        self.occupied().count()
    }

    /// In-bounds neighbors of `pos` in row-major order, excluding `pos` itself
    pub fn neighbors(&self, (row, col): Pos, neighborhood: Neighborhood) -> impl Iterator<Item = Pos> + '_ {
        neighborhood.offsets().iter().filter_map(move |&(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;
            self.is_valid_position((r, c)).then_some((r, c))
        })
    }

    pub fn empty_neighbors(&self, pos: Pos, neighborhood: Neighborhood) -> Vec<Pos> {
        self.neighbors(pos, neighborhood)
            .filter(|&p| self.get(p).is_none())
            .collect()
    }

    /// Neighboring eukaryotes that have finished copying both strands
    pub fn ready_mates(&self, pos: Pos, neighborhood: Neighborhood) -> Vec<Pos> {
        self.neighbors(pos, neighborhood)
            .filter(|&p| {
                self.get(p)
                    .is_some_and(|o| o.kind() == OrganismKind::Eukaryote && o.is_ready())
            })
            .collect()
    }

    /// Occupied neighbors that are not the same species as `challenger`
    pub fn rival_neighbors(&self, pos: Pos, challenger: &Organism, neighborhood: Neighborhood) -> Vec<Pos> {
        self.neighbors(pos, neighborhood)
            .filter(|&p| self.get(p).is_some_and(|o| !o.is_same_species(challenger)))
            .collect()
    }

    /// Read-only copy for reporting
    pub fn snapshot(&self, generation: u64) -> BoardSnapshot {
        BoardSnapshot {
            generation,
            rows: self.rows,
            cols: self.cols,
            cells: self
                .grid
                .iter()
                .map(|line| line.iter().map(|cell| cell.as_ref().map(Organism::report)).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organism::{Eukaryote, Strand};
    use shared::{Color, Genome};

    fn g(symbols: &str) -> Genome {
        symbols.parse().unwrap()
    }

    fn pro(genome: &str) -> Organism {
        Organism::prokaryote(g(genome), Color::default(), 10)
    }

    fn ready_euk(a: &str, b: &str) -> Organism {
        let strands = [
            Strand::with_progress(g(a), g(a), 0, a.len()),
            Strand::with_progress(g(b), g(b), 0, b.len()),
        ];
        Eukaryote::from_strands(strands, Color::default(), 10).into()
    }

    #[test]
    fn test_board_creation() {
        let board = Board::new(4, 6);
        assert_eq!(board.rows(), 4);
        assert_eq!(board.cols(), 6);
        assert_eq!(board.population(), 0);
        assert!(board.is_valid_position((3, 5)));
        assert!(!board.is_valid_position((4, 0)));
    }

    #[test]
    fn test_place_rejects_collisions_and_bounds() {
        let mut board = Board::new(3, 3);
        board.place((1, 1), pro("NRE")).unwrap();

        assert_eq!(
            board.place((1, 1), pro("E")),
            Err(SimError::Occupied { row: 1, col: 1 })
        );
        assert!(matches!(
            board.place((3, 0), pro("E")),
            Err(SimError::OutOfBounds { .. })
        ));
        assert_eq!(board.population(), 1);
    }

    #[test]
    fn test_corner_neighbors() {
        let board = Board::new(4, 4);
        let moore: Vec<_> = board.neighbors((0, 0), Neighborhood::Moore).collect();
        assert_eq!(moore, vec![(0, 1), (1, 0), (1, 1)]);

        let von_neumann: Vec<_> = board.neighbors((0, 0), Neighborhood::VonNeumann).collect();
        assert_eq!(von_neumann, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_interior_neighbors_are_row_major() {
        let board = Board::new(5, 5);
        let moore: Vec<_> = board.neighbors((2, 2), Neighborhood::Moore).collect();
        assert_eq!(
            moore,
            vec![(1, 1), (1, 2), (1, 3), (2, 1), (2, 3), (3, 1), (3, 2), (3, 3)]
        );
    }

    #[test]
    fn test_empty_neighbors() {
        let mut board = Board::new(3, 3);
        board.place((0, 1), pro("N")).unwrap();
        board.place((1, 0), pro("N")).unwrap();

        assert_eq!(board.empty_neighbors((0, 0), Neighborhood::Moore), vec![(1, 1)]);
    }

    #[test]
    fn test_ready_mates_only_counts_ready_eukaryotes() {
        let mut board = Board::new(3, 3);
        board.place((0, 0), ready_euk("NRE", "RE")).unwrap();
        board.place((0, 1), Organism::eukaryote([g("NRE"), g("RE")], Color::default(), 5)).unwrap();
        board.place((0, 2), pro("NRE")).unwrap();
        board.place((2, 2), ready_euk("E", "E")).unwrap();

        assert_eq!(board.ready_mates((1, 1), Neighborhood::Moore), vec![(0, 0), (2, 2)]);
        assert!(board.ready_mates((1, 1), Neighborhood::VonNeumann).is_empty());
    }

    #[test]
    fn test_rival_neighbors_skip_same_species() {
        let mut board = Board::new(3, 3);
        board.place((0, 0), pro("NRE")).unwrap();
        board.place((0, 1), pro("NRR")).unwrap();
        board.place((0, 2), ready_euk("NRE", "NRE")).unwrap();

        let challenger = pro("NRE");
        assert_eq!(
            board.rival_neighbors((1, 1), &challenger, Neighborhood::Moore),
            vec![(0, 1), (0, 2)]
        );

        let challenger = Organism::eukaryote([g("NRE"), g("NRE")], Color::default(), 0);
        assert_eq!(
            board.rival_neighbors((1, 1), &challenger, Neighborhood::Moore),
            vec![(0, 0), (0, 1)]
        );
    }

    #[test]
    fn test_snapshot_reports_cells() {
        let mut board = Board::new(2, 3);
        board.place((1, 2), pro("NRE")).unwrap();

        let snapshot = board.snapshot(7);
        assert_eq!(snapshot.generation, 7);
        assert_eq!(snapshot.rows, 2);
        assert_eq!(snapshot.cols, 3);
        assert_eq!(snapshot.population(), 1);

        let cell = snapshot.get(1, 2).unwrap();
        assert_eq!(cell.kind, OrganismKind::Prokaryote);
        assert_eq!(cell.energy, 10);
        assert_eq!(cell.genomes[0].to_string(), "NRE");
    }
}
