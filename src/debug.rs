/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that summarizes one simulation
 * step for logging and inspection.
 *
 * Includes metrics for:
 * - Number of boids stepped
 * - Sensed and avoiding neighbor pairs
 * - Boids whose steering hit the maneuver budget
 * - Parallel processing chunk size
 */

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DebugInfo {
    pub boids: usize,
    pub sensed_pairs: usize,
    pub avoiding_pairs: usize,
    pub saturated_boids: usize,
    // Zero when the step ran sequentially
    pub chunk_size: usize,
}

impl DebugInfo {
    // Combine counts from two disjoint sets of boids
    pub fn merge(self, other: Self) -> Self {
        Self {
            boids: self.boids + other.boids,
            sensed_pairs: self.sensed_pairs + other.sensed_pairs,
            avoiding_pairs: self.avoiding_pairs + other.avoiding_pairs,
            saturated_boids: self.saturated_boids + other.saturated_boids,
            chunk_size: self.chunk_size.max(other.chunk_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_sums_counts_and_keeps_largest_chunk() {
        let a = DebugInfo {
            boids: 3,
            sensed_pairs: 4,
            avoiding_pairs: 1,
            saturated_boids: 0,
            chunk_size: 8,
        };
        let b = DebugInfo {
            boids: 2,
            sensed_pairs: 1,
            avoiding_pairs: 1,
            saturated_boids: 1,
            chunk_size: 2,
        };

        let merged = a.merge(b);
        assert_eq!(merged.boids, 5);
        assert_eq!(merged.sensed_pairs, 5);
        assert_eq!(merged.avoiding_pairs, 2);
        assert_eq!(merged.saturated_boids, 1);
        assert_eq!(merged.chunk_size, 8);
    }
}
