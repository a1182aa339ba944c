//! Dense, validated distance matrix.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A dense n×n cost matrix stored in row-major order.
///
/// Every cell is finite, off-diagonal cells are non-negative and `n >= 2`.
/// These invariants are checked on construction, so a `DistanceMatrix`
/// value is always valid. The matrix is immutable; solvers that need a
/// different diagonal work on a copy from [`with_diagonal`](Self::with_diagonal).
///
/// # Examples
///
/// ```
/// use u_tsp::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 5.0, 9.0],
///     vec![5.0, 0.0, 4.0],
///     vec![9.0, 4.0, 0.0],
/// ])
/// .expect("valid matrix");
/// assert_eq!(dm.size(), 3);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert!(dm.is_symmetric(1e-10));
///
/// assert!(DistanceMatrix::from_rows(&[vec![0.0, 1.0]]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Builds a matrix from a row-major `size × size` buffer.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != size * size {
            return Err(Error::invalid_matrix(format!(
                "expected {} cells for a {size}x{size} matrix, got {}",
                size * size,
                data.len()
            )));
        }
        let dm = Self { data, size };
        dm.validate()?;
        Ok(dm)
    }

    /// Builds a matrix from explicit rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(Error::invalid_matrix(format!(
                    "matrix is not square: row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Self::from_data(size, data)
    }

    /// Builds a matrix from rows where `None` marks an unreachable pair.
    ///
    /// Fails if any cell is `None`, listing every unreachable pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::distance::DistanceMatrix;
    ///
    /// let err = DistanceMatrix::from_optional_rows(&[
    ///     vec![Some(0.0), None],
    ///     vec![Some(3.0), Some(0.0)],
    /// ])
    /// .unwrap_err();
    /// assert!(err.to_string().contains("0 -> 1"));
    /// ```
    pub fn from_optional_rows(rows: &[Vec<Option<f64>>]) -> Result<Self> {
        let missing: Vec<String> = rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, cell)| cell.is_none())
                    .map(move |(j, _)| format!("{i} -> {j}"))
            })
            .collect();
        if !missing.is_empty() {
            return Err(Error::invalid_matrix(format!(
                "no travel cost for {}",
                missing.join(", ")
            )));
        }
        let dense: Vec<Vec<f64>> = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.unwrap_or(f64::NAN)).collect())
            .collect();
        Self::from_rows(&dense)
    }

    fn validate(&self) -> Result<()> {
        if self.size < 2 {
            return Err(Error::invalid_matrix(format!(
                "at least 2 nodes are required, got {}",
                self.size
            )));
        }
        for i in 0..self.size {
            for j in 0..self.size {
                let d = self.get(i, j);
                if !d.is_finite() {
                    return Err(Error::invalid_matrix(format!(
                        "entry ({i}, {j}) is not finite"
                    )));
                }
                if i != j && d < 0.0 {
                    return Err(Error::invalid_matrix(format!(
                        "entry ({i}, {j}) is negative: {d}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Returns the cost from node `from` to node `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of nodes in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns row `from` as a slice.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Largest off-diagonal cost.
    pub fn max_arc_cost(&self) -> f64 {
        let mut max = 0.0_f64;
        for i in 0..self.size {
            for j in 0..self.size {
                if i != j {
                    max = max.max(self.get(i, j));
                }
            }
        }
        max
    }

    /// Returns a copy with every diagonal cell set to `value`.
    ///
    /// Used by solvers that must forbid "staying" at a node.
    pub fn with_diagonal(&self, value: f64) -> Self {
        let mut copy = self.clone();
        for i in 0..self.size {
            copy.data[i * self.size + i] = value;
        }
        copy
    }

    /// Returns the matrix as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.size).map(<[f64]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for DistanceMatrix {
    type Error = Error;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

impl From<DistanceMatrix> for Vec<Vec<f64>> {
    fn from(dm: DistanceMatrix) -> Self {
        dm.to_rows()
    }
}
