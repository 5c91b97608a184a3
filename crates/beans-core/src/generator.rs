use crate::{partition, BitSet, Position, Puzzle, Solver};
use thiserror::Error;

/// Largest supported board size (column/region masks are `u16`).
pub(crate) const MAX_SIZE: usize = 16;

/// Generation failed before any search started.
///
/// Everything past argument validation is handled internally with
/// retries and fallbacks; `generate` never fails mid-search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// No valid placement exists for sizes 2 and 3 (consecutive rows
    /// need a column gap of at least 2), and sizes above 16 exceed the
    /// reservation masks.
    #[error("board size {0} is not supported (must be 1 or 4..=16)")]
    UnsupportedSize(usize),
}

/// Bounds for the generation retry loops.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Randomized placement attempts before the deterministic
    /// fallback pattern is used.
    pub solution_attempts: usize,
    /// Region growth attempts before a disconnected partition is
    /// accepted.
    pub partition_retries: usize,
    /// Fresh partitions tried against one solution before a puzzle
    /// without a uniqueness proof is accepted (and flagged). A
    /// partition is cheap, so the ceiling is high: it exists to stop
    /// pathological non-termination, not to cut generation short.
    /// Values below 1 are treated as 1.
    pub uniqueness_retries: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            solution_attempts: 1000,
            partition_retries: 10,
            uniqueness_retries: 10_000,
        }
    }
}

/// Beans puzzle generator.
///
/// Produces a solution placement, grows a region partition around it,
/// and re-partitions until the board has exactly one valid placement.
/// The solution is fixed for the lifetime of one `generate` call; only
/// the partition varies, since region shape is the only degree of
/// freedom that affects the solution count.
pub struct Generator {
    config: GeneratorConfig,
    rng: SimpleRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a generator with default bounds and an entropy seed.
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with custom bounds.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with a specific seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Create a seeded generator with custom bounds.
    pub fn with_config_and_seed(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Generate a puzzle with exactly one valid placement.
    pub fn generate(&mut self, size: usize) -> Result<Puzzle, GenerateError> {
        if size != 1 && !(4..=MAX_SIZE).contains(&size) {
            return Err(GenerateError::UnsupportedSize(size));
        }

        let solution = self.generate_solution(size);
        let solver = Solver::new();
        let ceiling = self.config.uniqueness_retries.max(1);

        let mut attempt = 0;
        loop {
            let (regions, connected) = partition::partition(
                &solution,
                size,
                &mut self.rng,
                self.config.partition_retries,
            );
            attempt += 1;

            if connected && solver.count_solutions(&regions, 2) == 1 {
                if attempt > 1 {
                    log::debug!("unique partition found after {} attempts", attempt);
                }
                return Ok(Puzzle::new(size, solution, regions, false));
            }

            if attempt >= ceiling {
                // Retry ceiling hit: accept the last board rather
                // than hang, flagged so callers can tell it apart
                // from normal success.
                log::warn!(
                    "no single-solution partition within {} attempts for size {}; \
                     accepting degraded board",
                    ceiling,
                    size
                );
                return Ok(Puzzle::new(size, solution, regions, true));
            }
        }
    }

    /// Produce one valid solution placement for the board.
    ///
    /// Randomized backtracking with a bounded attempt count; falls
    /// back to the deterministic pattern so this always terminates.
    fn generate_solution(&mut self, size: usize) -> Vec<Position> {
        for _ in 0..self.config.solution_attempts {
            if let Some(placement) = self.try_random_placement(size) {
                if solution_is_valid(&placement, size) {
                    return placement;
                }
                // Should never trigger: the search enforces the same
                // constraints the check re-verifies.
                log::error!("placement search produced an invalid solution; discarding");
            }
        }

        log::warn!(
            "placement search exhausted {} attempts for size {}; using fallback pattern",
            self.config.solution_attempts,
            size
        );
        let fallback = fallback_solution(size);
        if !solution_is_valid(&fallback, size) {
            log::error!("fallback solution failed validation for size {}", size);
        }
        fallback
    }

    /// One attempt: scan rows in order, placing each bean in the first
    /// free, non-adjacent column of a freshly shuffled column order.
    fn try_random_placement(&mut self, size: usize) -> Option<Vec<Position>> {
        let mut columns: Vec<usize> = (0..size).collect();
        self.rng.shuffle(&mut columns);

        let mut placed: Vec<Position> = Vec::with_capacity(size);
        let mut used_cols = BitSet::empty();

        for row in 0..size {
            let choice = columns.iter().copied().find(|&col| {
                !used_cols.contains(col) && {
                    let pos = Position::new(row, col);
                    placed.iter().all(|p| !p.is_adjacent(pos))
                }
            });
            match choice {
                Some(col) => {
                    used_cols.insert(col);
                    placed.push(Position::new(row, col));
                }
                None => return None,
            }
        }
        Some(placed)
    }
}

/// Deterministic valid placement: odd columns ascending, then even.
///
/// Within each run consecutive rows differ by 2 columns; at the
/// junction the gap is at least 3 for every supported size.
pub(crate) fn fallback_solution(size: usize) -> Vec<Position> {
    let odd = (1..size).step_by(2);
    let even = (0..size).step_by(2);
    odd.chain(even)
        .enumerate()
        .map(|(row, col)| Position::new(row, col))
        .collect()
}

/// Full solution invariant: one bean per row and column, no two
/// beans touching.
pub(crate) fn solution_is_valid(placement: &[Position], size: usize) -> bool {
    if placement.len() != size {
        return false;
    }
    let mut rows = BitSet::empty();
    let mut cols = BitSet::empty();
    for pos in placement {
        if pos.row >= size || pos.col >= size {
            return false;
        }
        if rows.contains(pos.row) || cols.contains(pos.col) {
            return false;
        }
        rows.insert(pos.row);
        cols.insert(pos.col);
    }
    for (i, a) in placement.iter().enumerate() {
        for b in &placement[i + 1..] {
            if a.is_adjacent(*b) {
                return false;
            }
        }
    }
    true
}

/// Simple PRNG for no-std/WASM-friendly seeding.
pub(crate) struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub(crate) fn new() -> Self {
        // Use getrandom for WASM-compatible random seeding
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: use a static counter if getrandom fails
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        let seed = u64::from_le_bytes(seed_bytes);
        Self::with_seed(seed)
    }

    pub(crate) fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        // PCG-like PRNG
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    pub(crate) fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }

    /// Fisher–Yates shuffle.
    pub(crate) fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_usize(i + 1);
            slice.swap(i, j);
        }
    }
}
