//! Core engine for the beans placement puzzle.
//!
//! A puzzle is an N×N board partitioned into N connected colored
//! regions. The player must place N beans so that every row, every
//! column, and every region holds exactly one bean, and no two beans
//! touch, not even diagonally. The engine generates boards with
//! exactly one valid placement and validates player placements.
//!
//! Entry points: [`Generator::generate`] to produce a [`Puzzle`],
//! [`validate_placement`] to judge a candidate placement, and
//! [`Solver`] to count or recover solutions for a region map.

mod generator;
mod partition;
mod solver;
mod validate;

pub use generator::{GenerateError, Generator, GeneratorConfig};
pub use solver::Solver;
pub use validate::{is_solution, validate_placement, ValidationReport, Violation};

use serde::{Deserialize, Serialize};

/// A cell coordinate on the board, 0-indexed from the top-left.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Flat index of this position on a board of the given size.
    pub fn index(&self, size: usize) -> usize {
        self.row * size + self.col
    }

    /// Position for a flat index on a board of the given size.
    pub fn from_index(index: usize, size: usize) -> Self {
        Self {
            row: index / size,
            col: index % size,
        }
    }

    /// Whether two positions touch, including diagonally.
    ///
    /// Chebyshev distance ≤ 1, so a position is adjacent to itself:
    /// a duplicate in a candidate placement is caught by the same test
    /// as a touching pair.
    pub fn is_adjacent(&self, other: Position) -> bool {
        self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }
}

/// Membership mask over small indices (columns, region ids).
///
/// Backed by a `u16`, which bounds supported board sizes at 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BitSet(u16);

impl BitSet {
    /// The empty set.
    pub fn empty() -> Self {
        Self(0)
    }

    /// Reconstruct from a raw mask.
    pub fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// The raw mask.
    pub fn as_raw(&self) -> u16 {
        self.0
    }

    /// Whether the index is in the set.
    pub fn contains(&self, index: usize) -> bool {
        self.0 & (1 << index) != 0
    }

    /// Add an index to the set.
    pub fn insert(&mut self, index: usize) {
        self.0 |= 1 << index;
    }

    /// Remove an index from the set.
    pub fn remove(&mut self, index: usize) {
        self.0 &= !(1 << index);
    }

    /// Number of indices in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate over the indices in the set, ascending.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        let raw = self.0;
        (0..16).filter(move |i| raw & (1 << i) != 0)
    }
}

/// Region identifier, `0..size`.
pub type RegionId = u8;

/// Assignment of every cell to a region, stored row-major.
///
/// Produced once by the generator and read-only afterwards. The
/// invariants (exactly `size` ids in use, each region 4-connected,
/// each region holding exactly one solution bean) are established at
/// generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionMap {
    size: usize,
    cells: Vec<RegionId>,
}

impl RegionMap {
    pub(crate) fn new(size: usize, cells: Vec<RegionId>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Self { size, cells }
    }

    /// Board side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Region id at a position.
    pub fn region(&self, pos: Position) -> RegionId {
        self.cells[pos.index(self.size)]
    }

    /// Region id at a flat index.
    pub fn region_at(&self, index: usize) -> RegionId {
        self.cells[index]
    }

    /// Row-major region ids for all cells.
    pub fn cells(&self) -> &[RegionId] {
        &self.cells
    }

    /// Flat indices of all cells in a region.
    pub fn region_cells(&self, id: RegionId) -> Vec<usize> {
        (0..self.cells.len())
            .filter(|&i| self.cells[i] == id)
            .collect()
    }

    /// Render the map as one letter per cell, `a` for region 0.
    ///
    /// Cells listed in `beans` are uppercased.
    pub fn to_text(&self, beans: &[Position]) -> String {
        let mut out = String::with_capacity(self.size * (self.size + 1));
        for row in 0..self.size {
            for col in 0..self.size {
                let pos = Position::new(row, col);
                let letter = (b'a' + self.region(pos)) as char;
                if beans.contains(&pos) {
                    out.push(letter.to_ascii_uppercase());
                } else {
                    out.push(letter);
                }
            }
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Display for RegionMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text(&[]))
    }
}

/// A generated puzzle: the hidden solution and the region map.
///
/// Immutable snapshot; a new game means a new `Puzzle`. The region
/// map alone defines the puzzle the player sees; the stored solution
/// is the generator's certificate that a valid placement exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    size: usize,
    solution: Vec<Position>,
    regions: RegionMap,
    degraded: bool,
}

impl Puzzle {
    pub(crate) fn new(
        size: usize,
        solution: Vec<Position>,
        regions: RegionMap,
        degraded: bool,
    ) -> Self {
        Self {
            size,
            solution,
            regions,
            degraded,
        }
    }

    /// Board side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The generator's solution, one bean per row in row order.
    pub fn solution(&self) -> &[Position] {
        &self.solution
    }

    /// The region map.
    pub fn regions(&self) -> &RegionMap {
        &self.regions
    }

    /// Whether the generator hit its retry ceiling and accepted a
    /// board it could not prove single-solution (or with an imperfect
    /// partition). Normal generation never sets this.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

impl std::fmt::Display for Puzzle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.regions.to_text(&[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_includes_diagonals_and_self() {
        let p = Position::new(3, 3);
        for dr in -1i32..=1 {
            for dc in -1i32..=1 {
                let q = Position::new((3 + dr) as usize, (3 + dc) as usize);
                assert!(p.is_adjacent(q), "{:?} should touch {:?}", p, q);
            }
        }
        assert!(!p.is_adjacent(Position::new(3, 5)));
        assert!(!p.is_adjacent(Position::new(1, 3)));
        assert!(!p.is_adjacent(Position::new(5, 5)));
    }

    #[test]
    fn test_known_solution_is_pairwise_non_adjacent() {
        let solution = [
            (0, 0),
            (1, 4),
            (2, 7),
            (3, 5),
            (4, 2),
            (5, 6),
            (6, 1),
            (7, 3),
        ]
        .map(|(r, c)| Position::new(r, c));

        for (i, a) in solution.iter().enumerate() {
            for b in &solution[i + 1..] {
                assert!(!a.is_adjacent(*b), "{:?} touches {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_index_round_trip() {
        let pos = Position::new(2, 5);
        assert_eq!(pos.index(8), 21);
        assert_eq!(Position::from_index(21, 8), pos);
    }

    #[test]
    fn test_bitset_basics() {
        let mut set = BitSet::empty();
        assert!(set.is_empty());
        set.insert(0);
        set.insert(7);
        set.insert(15);
        assert_eq!(set.len(), 3);
        assert!(set.contains(7));
        assert!(!set.contains(3));
        set.remove(7);
        assert!(!set.contains(7));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 15]);
        assert_eq!(BitSet::from_raw(set.as_raw()), set);
    }

    #[test]
    fn test_region_map_text() {
        let map = RegionMap::new(2, vec![0, 0, 1, 1]);
        assert_eq!(map.to_text(&[]), "aa\nbb\n");
        assert_eq!(map.to_text(&[Position::new(1, 0)]), "aa\nBb\n");
        assert_eq!(map.region(Position::new(1, 1)), 1);
        assert_eq!(map.region_cells(0), vec![0, 1]);
    }

    #[test]
    fn test_puzzle_serde_round_trip() {
        let regions = RegionMap::new(1, vec![0]);
        let puzzle = Puzzle::new(1, vec![Position::new(0, 0)], regions, false);
        let json = serde_json::to_string(&puzzle).unwrap();
        let back: Puzzle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, puzzle);
    }
}
