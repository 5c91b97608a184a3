use crate::{BitSet, Position, RegionMap};

/// Unit struct solver. Stateless, all state is per-call.
///
/// Works from the region map alone: the map, not any stored placement,
/// is what defines the puzzle, so uniqueness is decided by re-deriving
/// solutions from scratch.
pub struct Solver;

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Create a new solver.
    pub fn new() -> Self {
        Self
    }

    /// Count valid placements for the region map, up to `limit`.
    pub fn count_solutions(&self, regions: &RegionMap, limit: usize) -> usize {
        let mut search = Search::new(regions);
        search.run(0, limit);
        search.count
    }

    /// Check if the region map admits exactly one valid placement.
    pub fn has_unique_solution(&self, regions: &RegionMap) -> bool {
        self.count_solutions(regions, 2) == 1
    }

    /// Recover a valid placement from the region map, if one exists.
    ///
    /// Returns the first solution in row-major column order; for an
    /// accepted puzzle that is the only one.
    pub fn solve(&self, regions: &RegionMap) -> Option<Vec<Position>> {
        let mut search = Search::new(regions);
        search.run(0, 1);
        search.first
    }
}

/// Exhaustive backtracking over rows: one bean per row, reserving its
/// column and region, skipping cells adjacent to beans already placed
/// in this branch.
struct Search<'a> {
    regions: &'a RegionMap,
    size: usize,
    used_cols: BitSet,
    used_regions: BitSet,
    placed: Vec<Position>,
    count: usize,
    first: Option<Vec<Position>>,
}

impl<'a> Search<'a> {
    fn new(regions: &'a RegionMap) -> Self {
        Self {
            regions,
            size: regions.size(),
            used_cols: BitSet::empty(),
            used_regions: BitSet::empty(),
            placed: Vec::with_capacity(regions.size()),
            count: 0,
            first: None,
        }
    }

    /// Returns true once `limit` solutions have been seen, which
    /// unwinds the whole search early.
    fn run(&mut self, row: usize, limit: usize) -> bool {
        if row == self.size {
            self.count += 1;
            if self.first.is_none() {
                self.first = Some(self.placed.clone());
            }
            return self.count >= limit;
        }

        for col in 0..self.size {
            if self.used_cols.contains(col) {
                continue;
            }
            let pos = Position::new(row, col);
            let region = self.regions.region(pos) as usize;
            if self.used_regions.contains(region) {
                continue;
            }
            if self.placed.iter().any(|p| p.is_adjacent(pos)) {
                continue;
            }

            self.used_cols.insert(col);
            self.used_regions.insert(region);
            self.placed.push(pos);

            let stop = self.run(row + 1, limit);

            self.placed.pop();
            self.used_regions.remove(region);
            self.used_cols.remove(col);

            if stop {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // On an empty 4x4 board only two placements satisfy the row,
    // column and adjacency rules: columns (1,3,0,2) and (2,0,3,1).
    // Region shape decides which of them survive.

    fn unique_map() -> RegionMap {
        // aabb
        // cabb
        // ccdb
        // cddd
        RegionMap::new(
            4,
            vec![
                0, 0, 1, 1, //
                2, 0, 1, 1, //
                2, 2, 3, 1, //
                2, 3, 3, 3,
            ],
        )
    }

    fn two_solution_map() -> RegionMap {
        // abbb
        // aabd
        // acdd
        // cccd
        RegionMap::new(
            4,
            vec![
                0, 1, 1, 1, //
                0, 0, 1, 3, //
                0, 2, 3, 3, //
                2, 2, 2, 3,
            ],
        )
    }

    #[test]
    fn test_unique_map_counts_one() {
        let solver = Solver::new();
        assert_eq!(solver.count_solutions(&unique_map(), 2), 1);
        assert!(solver.has_unique_solution(&unique_map()));
    }

    #[test]
    fn test_two_solution_map_counts_two() {
        let solver = Solver::new();
        assert_eq!(solver.count_solutions(&two_solution_map(), 2), 2);
        assert!(!solver.has_unique_solution(&two_solution_map()));
    }

    #[test]
    fn test_count_respects_cap() {
        let solver = Solver::new();
        assert_eq!(solver.count_solutions(&two_solution_map(), 1), 1);
    }

    #[test]
    fn test_solve_recovers_the_solution() {
        let solver = Solver::new();
        let solution = solver.solve(&unique_map()).unwrap();
        let expected: Vec<Position> = [(0, 1), (1, 3), (2, 0), (3, 2)]
            .iter()
            .map(|&(r, c)| Position::new(r, c))
            .collect();
        assert_eq!(solution, expected);
    }

    #[test]
    fn test_single_region_board_has_no_multi_bean_solution() {
        // One region covering a 4x4 board can hold only one bean, so
        // no full placement exists.
        let map = RegionMap::new(4, vec![0; 16]);
        let solver = Solver::new();
        assert_eq!(solver.count_solutions(&map, 2), 0);
        assert_eq!(solver.solve(&map), None);
    }

    #[test]
    fn test_size_one_board() {
        let map = RegionMap::new(1, vec![0]);
        let solver = Solver::new();
        assert_eq!(solver.count_solutions(&map, 2), 1);
        assert_eq!(solver.solve(&map), Some(vec![Position::new(0, 0)]));
    }
}
