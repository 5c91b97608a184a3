//! Region growth around a solution placement.
//!
//! Each bean seeds one region; regions grow one cell per round in
//! round-robin order so they stay roughly balanced. Cells stranded in
//! pockets no frontier can reach are attached to the nearest assigned
//! cell, which may disconnect a region; the connectivity check catches
//! that and the whole growth is retried.

use crate::generator::SimpleRng;
use crate::{Position, RegionId, RegionMap};
use std::collections::VecDeque;

const UNASSIGNED: RegionId = RegionId::MAX;

/// Partition the board into one connected region per bean.
///
/// Returns the map and whether every region passed the connectivity
/// check. After `max_retries` failed growths the last map is accepted
/// anyway, so this always terminates.
pub(crate) fn partition(
    solution: &[Position],
    size: usize,
    rng: &mut SimpleRng,
    max_retries: usize,
) -> (RegionMap, bool) {
    let mut map = grow_regions(solution, size, rng);
    let mut attempt = 0;
    while !all_regions_connected(&map, solution.len()) {
        attempt += 1;
        if attempt > max_retries {
            log::warn!(
                "accepting partition with a disconnected region after {} retries",
                max_retries
            );
            return (map, false);
        }
        log::debug!(
            "disconnected region after growth, retry {}/{}",
            attempt,
            max_retries
        );
        map = grow_regions(solution, size, rng);
    }
    (map, true)
}

/// Simultaneous round-robin flood fill from the bean positions.
fn grow_regions(solution: &[Position], size: usize, rng: &mut SimpleRng) -> RegionMap {
    let total = size * size;
    let mut cells = vec![UNASSIGNED; total];
    let mut queues: Vec<VecDeque<usize>> = Vec::with_capacity(solution.len());

    for (id, pos) in solution.iter().enumerate() {
        let index = pos.index(size);
        cells[index] = id as RegionId;
        queues.push(VecDeque::from([index]));
    }

    let mut assigned = solution.len();
    while assigned < total {
        let mut dequeued_any = false;

        for (id, queue) in queues.iter_mut().enumerate() {
            let Some(cell) = queue.pop_front() else {
                continue;
            };
            dequeued_any = true;

            let mut neighbors = orthogonal_neighbors(cell, size);
            rng.shuffle(&mut neighbors);
            if let Some(&next) = neighbors.iter().find(|&&n| cells[n] == UNASSIGNED) {
                cells[next] = id as RegionId;
                assigned += 1;
                queue.push_back(next);
            }
            // The dequeued cell is spent either way; one claim at
            // most per region per round. Pockets its other neighbors
            // would have reached are caught by the stall fill.
        }

        if !dequeued_any {
            // Every frontier is exhausted but unclaimed pockets
            // remain. Attach them to the nearest assigned cell.
            fill_stranded(&mut cells, size);
            break;
        }
    }

    RegionMap::new(size, cells)
}

/// Assign every unclaimed cell to the region of its nearest assigned
/// cell, searched over expanding Chebyshev-radius rings.
///
/// Guarantees a fully assigned board but not connectivity; the caller
/// re-checks that.
fn fill_stranded(cells: &mut [RegionId], size: usize) {
    for index in 0..cells.len() {
        if cells[index] != UNASSIGNED {
            continue;
        }
        let row = index / size;
        let col = index % size;
        'rings: for radius in 1..2 * size {
            for r in row.saturating_sub(radius)..=(row + radius).min(size - 1) {
                for c in col.saturating_sub(radius)..=(col + radius).min(size - 1) {
                    if r.abs_diff(row).max(c.abs_diff(col)) != radius {
                        continue;
                    }
                    let candidate = cells[r * size + c];
                    if candidate != UNASSIGNED {
                        cells[index] = candidate;
                        break 'rings;
                    }
                }
            }
        }
    }
}

/// Check every region is one 4-connected component.
fn all_regions_connected(map: &RegionMap, region_count: usize) -> bool {
    (0..region_count).all(|id| region_is_connected(map, id as RegionId))
}

/// Flood fill from one member cell and confirm it reaches every cell
/// with this region id.
fn region_is_connected(map: &RegionMap, id: RegionId) -> bool {
    let members = map.region_cells(id);
    let Some(&start) = members.first() else {
        return false;
    };

    let size = map.size();
    let mut visited = vec![false; size * size];
    let mut queue = VecDeque::from([start]);
    visited[start] = true;
    let mut reached = 0;

    while let Some(cell) = queue.pop_front() {
        reached += 1;
        for neighbor in orthogonal_neighbors(cell, size) {
            if !visited[neighbor] && map.region_at(neighbor) == id {
                visited[neighbor] = true;
                queue.push_back(neighbor);
            }
        }
    }

    reached == members.len()
}

/// 4-connected neighbor indices of a cell.
fn orthogonal_neighbors(index: usize, size: usize) -> Vec<usize> {
    let row = index / size;
    let col = index % size;
    let mut neighbors = Vec::with_capacity(4);
    if row > 0 {
        neighbors.push(index - size);
    }
    if row + 1 < size {
        neighbors.push(index + size);
    }
    if col > 0 {
        neighbors.push(index - 1);
    }
    if col + 1 < size {
        neighbors.push(index + 1);
    }
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::fallback_solution;

    #[test]
    fn test_partition_covers_board_with_connected_regions() {
        let solution = fallback_solution(8);
        let mut rng = SimpleRng::with_seed(42);
        let (map, connected) = partition(&solution, 8, &mut rng, 10);

        assert!(connected);
        assert!(map.cells().iter().all(|&id| (id as usize) < 8));
        for (id, pos) in solution.iter().enumerate() {
            assert_eq!(map.region(*pos), id as RegionId, "seed not in its region");
        }
        // Every bean sits alone in its region.
        for id in 0..8u8 {
            let beans_in_region = solution.iter().filter(|p| map.region(**p) == id).count();
            assert_eq!(beans_in_region, 1);
        }
    }

    #[test]
    fn test_partition_size_one() {
        let solution = vec![Position::new(0, 0)];
        let mut rng = SimpleRng::with_seed(5);
        let (map, connected) = partition(&solution, 1, &mut rng, 10);
        assert!(connected);
        assert_eq!(map.cells(), &[0]);
    }

    #[test]
    fn test_two_island_region_fails_connectivity() {
        // Region 0 is split across opposite corners.
        let cells = vec![
            0, 1, 1, 1, //
            1, 1, 1, 1, //
            1, 1, 1, 1, //
            1, 1, 1, 0,
        ];
        let map = RegionMap::new(4, cells);
        assert!(!region_is_connected(&map, 0));
        assert!(region_is_connected(&map, 1));
        assert!(!all_regions_connected(&map, 2));
    }

    #[test]
    fn test_fill_stranded_picks_nearest_region() {
        let mut cells = vec![0, UNASSIGNED, UNASSIGNED, 1];
        fill_stranded(&mut cells, 2);
        // (0,1) and (1,0) both see region 0 first in ring order.
        assert_eq!(cells, vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_orthogonal_neighbors_at_edges() {
        // Corner of a 3x3 board.
        let mut n = orthogonal_neighbors(0, 3);
        n.sort_unstable();
        assert_eq!(n, vec![1, 3]);
        // Center.
        let mut n = orthogonal_neighbors(4, 3);
        n.sort_unstable();
        assert_eq!(n, vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_growth_is_reproducible_per_seed() {
        let solution = fallback_solution(8);
        let mut a = SimpleRng::with_seed(7);
        let mut b = SimpleRng::with_seed(7);
        assert_eq!(
            grow_regions(&solution, 8, &mut a),
            grow_regions(&solution, 8, &mut b)
        );
    }
}
