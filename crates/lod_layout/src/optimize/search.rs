use crate::error::{LayoutError, Result};
use std::time::{Duration, Instant};

/// Time budget of one exact search
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    phase: &'static str,
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn start(phase: &'static str, budget: Duration) -> Self {
        Self {
            phase,
            started: Instant::now(),
            budget,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn check(&self) -> Result<()> {
        if self.started.elapsed() >= self.budget {
            return Err(LayoutError::SearchTimeout {
                phase: self.phase,
                budget_ms: self.budget.as_millis() as u64,
            });
        }
        Ok(())
    }
}

/// Counters reported at debug level after each search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub pruned: u64,
}

impl SearchStats {
    pub fn merge(&mut self, other: SearchStats) {
        self.nodes += other.nodes;
        self.pruned += other.pruned;
    }
}

/// Per-cell occupancy counters of one search branch (row-major cell indices)
#[derive(Debug, Clone)]
pub struct Occupancy {
    counts: Vec<u8>,
}

impl Occupancy {
    pub fn new(cell_count: usize) -> Self {
        Self {
            counts: vec![0; cell_count],
        }
    }

    /// True when none of `cells` is taken
    pub fn is_free(&self, cells: &[usize]) -> bool {
        cells.iter().all(|&c| self.counts[c] == 0)
    }

    pub fn occupy(&mut self, cells: &[usize]) {
        for &c in cells {
            self.counts[c] += 1;
        }
    }

    pub fn release(&mut self, cells: &[usize]) {
        for &c in cells {
            self.counts[c] -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupancy_tracks_shared_cells() {
        let mut occ = Occupancy::new(6);
        occ.occupy(&[0, 1]);
        assert!(!occ.is_free(&[1, 2]));
        assert!(occ.is_free(&[2, 3]));
        occ.release(&[0, 1]);
        assert!(occ.is_free(&[0, 1, 2]));
    }

    #[test]
    fn test_fresh_deadline_passes() {
        let deadline = Deadline::start("test", Duration::from_secs(60));
        assert!(deadline.check().is_ok());
    }

    #[test]
    fn test_zero_budget_times_out() {
        let deadline = Deadline::start("placement", Duration::ZERO);
        let err = deadline.check().unwrap_err();
        assert!(matches!(
            err,
            LayoutError::SearchTimeout {
                phase: "placement",
                budget_ms: 0
            }
        ));
    }
}
