use serde::{Deserialize, Serialize};

use crate::error::{GrandnessError, Result};

/// A 2D elevation grid storing samples as f32, row-major.
///
/// Sample `(row, col)` lives at linear index `row * width + col`; the same
/// convention is used to turn a linear index back into coordinates, so
/// non-square grids are handled without axis mix-ups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationGrid {
    /// Row-major elevation values.
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl ElevationGrid {
    /// Create a new grid filled with the given value.
    pub fn new(width: usize, height: usize, fill: f32) -> Self {
        Self {
            data: vec![fill; width * height],
            width,
            height,
        }
    }

    /// Create a flat (zero-elevation) grid.
    pub fn flat(width: usize, height: usize) -> Self {
        Self::new(width, height, 0.0)
    }

    /// The 0×0 grid used when no elevation source is given.
    pub fn empty() -> Self {
        Self::flat(0, 0)
    }

    /// Wrap an existing row-major buffer, checking its length.
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        let grid = Self { data, width, height };
        grid.validate()?;
        Ok(grid)
    }

    /// Build a grid from a slice of equally long rows (row 0 first).
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let data: Vec<f32> = rows.iter().flatten().copied().collect();
        Self::from_vec(width, height, data)
    }

    /// Check that the buffer length matches `width × height`.
    pub fn validate(&self) -> Result<()> {
        let expected = self
            .width
            .checked_mul(self.height)
            .ok_or(GrandnessError::GridTooLarge { width: self.width, height: self.height })?;
        if self.data.len() != expected {
            return Err(GrandnessError::GridShape {
                width: self.width,
                height: self.height,
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Total number of samples; equals `width × height` once validated.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f32) {
        self.data[row * self.width + col] = val;
    }

    /// Decompose a linear index into `(row, col)`.
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.width, index % self.width)
    }

    pub fn min_elevation(&self) -> f32 {
        self.data.iter().cloned().fold(f32::INFINITY, f32::min)
    }

    pub fn max_elevation(&self) -> f32 {
        self.data.iter().cloned().fold(f32::NEG_INFINITY, f32::max)
    }
}
