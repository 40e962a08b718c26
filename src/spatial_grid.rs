/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for faster neighbor lookups.
 * It divides the domain into uniform cells at least as wide as the largest
 * sense radius, so every boid that can be sensed lies in the 3x3 (or 3x3x3)
 * block of cells around the querying boid.
 *
 * Results must match the brute-force scan bit for bit:
 * - Neighbor offsets are not wrapped, so neither is the cell search
 * - Gathered candidates are sorted so they are visited in index order,
 *   which keeps floating point accumulation order unchanged
 */

use crate::vector::FlockVector;

// Upper bound on the total number of cells, regardless of radius
const MAX_CELLS: usize = 1 << 16;

// Cells are slightly wider than the radius so rounding can never push a
// sensed neighbor two cells away
const CELL_MARGIN: f32 = 1.01;

pub struct SpatialGrid {
    pub cell_size: f32,
    dims: [usize; 3],
    cells: Vec<Vec<usize>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self {
            cell_size: 0.0,
            dims: [1, 1, 1],
            cells: Vec::new(),
        }
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    // Resize the grid for a new radius/domain and insert every position.
    // Cell storage is kept between frames.
    pub fn rebuild<V, I>(&mut self, positions: I, radius: f32, domain_size: V)
    where
        V: FlockVector,
        I: IntoIterator<Item = V>,
    {
        let extent = domain_size.axes();

        // Cap the per-axis cell count so tiny radii cannot explode memory
        let cap = (MAX_CELLS as f32).powf(1.0 / V::DIM as f32).floor().max(1.0);
        let mut cell_size = (radius * CELL_MARGIN).max(f32::MIN_POSITIVE);
        for &axis_extent in &extent[..V::DIM] {
            cell_size = cell_size.max(axis_extent / cap);
        }

        let mut dims = [1usize; 3];
        for (axis, dim) in dims.iter_mut().enumerate().take(V::DIM) {
            *dim = ((extent[axis] / cell_size).ceil() as usize).clamp(1, cap as usize);
        }

        self.cell_size = cell_size;
        self.dims = dims;

        let total = dims[0] * dims[1] * dims[2];
        self.cells.resize_with(total, Vec::new);
        for cell in &mut self.cells {
            cell.clear();
        }

        for (index, position) in positions.into_iter().enumerate() {
            let cell = self.cell_index(self.cell_coords(position.axes()));
            self.cells[cell].push(index);
        }
    }

    // Collect indices from the cell containing `position` and its neighbors,
    // in ascending order
    pub fn gather<V: FlockVector>(&self, position: V, out: &mut Vec<usize>) {
        out.clear();
        if self.cells.is_empty() {
            return;
        }

        let center = self.cell_coords(position.axes());
        let span = |axis: usize| -> std::ops::RangeInclusive<isize> {
            if axis < V::DIM {
                -1..=1
            } else {
                0..=0
            }
        };

        for dz in span(2) {
            let Some(z) = offset(center[2], dz, self.dims[2]) else {
                continue;
            };
            for dy in span(1) {
                let Some(y) = offset(center[1], dy, self.dims[1]) else {
                    continue;
                };
                for dx in span(0) {
                    let Some(x) = offset(center[0], dx, self.dims[0]) else {
                        continue;
                    };
                    out.extend_from_slice(&self.cells[self.cell_index([x, y, z])]);
                }
            }
        }

        out.sort_unstable();
    }

    // Convert coordinates to clamped cell coordinates
    #[inline]
    fn cell_coords(&self, axes: [f32; 3]) -> [usize; 3] {
        let mut coords = [0usize; 3];
        for (axis, coord) in coords.iter_mut().enumerate() {
            let max = (self.dims[axis] - 1) as f32;
            *coord = (axes[axis] / self.cell_size).floor().clamp(0.0, max) as usize;
        }
        coords
    }

    // Convert 3D cell coordinates to a flat index
    #[inline]
    fn cell_index(&self, coords: [usize; 3]) -> usize {
        (coords[2] * self.dims[1] + coords[1]) * self.dims[0] + coords[0]
    }
}

// Step a cell coordinate, skipping cells outside the grid
#[inline]
fn offset(coord: usize, delta: isize, dim: usize) -> Option<usize> {
    let stepped = coord as isize + delta;
    if stepped < 0 || stepped >= dim as isize {
        None
    } else {
        Some(stepped as usize)
    }
}
