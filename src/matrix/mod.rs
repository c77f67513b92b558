//! Dense row-major `f64` matrix used for simulation input and output
//!
//! Input files are `n x 7` matrices (one row per body), output files are
//! `num_outputs x 3n` trajectories. Both are stored on disk as `.npy`.

pub mod npy;

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, SimError};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Allocate a zero-filled `rows x cols` matrix
    /// Reports allocation failure instead of aborting the process
    pub fn create(rows: usize, cols: usize) -> Result<Self> {
        let len = rows
            .checked_mul(cols)
            .ok_or(SimError::Allocation { rows, cols })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| SimError::Allocation { rows, cols })?;
        data.resize(len, 0.0);

        Ok(Self { rows, cols, data })
    }

    /// Wrap an existing row-major buffer
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(SimError::ShapeMismatch {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Borrow row `r`; panics if `r >= rows`
    pub fn row(&self, r: usize) -> &[f64] {
        assert!(r < self.rows, "row {r} out of bounds for {} rows", self.rows);
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Mutably borrow row `r`; panics if `r >= rows`
    pub fn row_mut(&mut self, r: usize) -> &mut [f64] {
        assert!(r < self.rows, "row {r} out of bounds for {} rows", self.rows);
        &mut self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn get(&self, r: usize, c: usize) -> Option<f64> {
        if r < self.rows && c < self.cols {
            Some(self.data[r * self.cols + c])
        } else {
            None
        }
    }

    /// Read a matrix from a `.npy` file
    pub fn from_npy_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| SimError::io(path, e))?;
        npy::decode(&bytes)
    }

    /// Write the matrix to a `.npy` file
    ///
    /// Data goes to a temporary file in the destination directory first and
    /// is renamed into place once complete, so a failed write never leaves a
    /// truncated file behind.
    pub fn to_npy_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| SimError::io(dir, e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            npy::encode(&mut writer, self).map_err(|e| SimError::io(path, e))?;
            writer.flush().map_err(|e| SimError::io(path, e))?;
        }
        tmp.persist(path).map_err(|e| SimError::io(path, e.error))?;
        Ok(())
    }
}
