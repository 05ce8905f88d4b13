use rand::Rng;
use rand_distr::StandardNormal;

/// Dense row-major matrix. `data[i][j]` is row `i`, column `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Fills a `(rows, cols)` matrix with independent N(0, 1) draws, row by row.
    ///
    /// The draw order is fixed, so the same RNG state always yields the same
    /// matrix.
    pub fn standard_normal<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let data = (0..rows)
            .map(|_| (0..cols).map(|_| rng.sample(StandardNormal)).collect())
            .collect();
        Matrix { rows, cols, data }
    }

    /// Wraps row vectors. Callers are responsible for the rows being equally long.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, |row| row.len()),
            data,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True when every row has exactly `cols` entries.
    pub fn is_rectangular(&self) -> bool {
        self.data.len() == self.rows && self.data.iter().all(|row| row.len() == self.cols)
    }

    /// Matrix-vector product `self · v`, length `rows`.
    pub fn dot_vec(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(self.cols, v.len());
        self.data
            .iter()
            .map(|row| row.iter().zip(v).map(|(w, x)| w * x).sum())
            .collect()
    }

    /// Vector-matrix product `v · self` (equivalently `selfᵀ · v`), length `cols`.
    pub fn vec_dot(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(self.rows, v.len());
        let mut res = vec![0.0; self.cols];
        for (row, &scale) in self.data.iter().zip(v) {
            for (acc, w) in res.iter_mut().zip(row) {
                *acc += scale * w;
            }
        }
        res
    }

    /// Outer product `a ⊗ b`, shape `(a.len(), b.len())`.
    pub fn outer(a: &[f64], b: &[f64]) -> Matrix {
        let data = a
            .iter()
            .map(|&x| b.iter().map(|&y| x * y).collect())
            .collect();
        Matrix {
            rows: a.len(),
            cols: b.len(),
            data,
        }
    }

    /// `self -= scale * other`, element-wise and in place.
    pub fn scaled_sub_assign(&mut self, other: &Matrix, scale: f64) {
        assert_eq!(self.shape(), other.shape(), "Matrices are of incorrect sizes");
        for (row, grad_row) in self.data.iter_mut().zip(&other.data) {
            sub_scaled(row, grad_row, scale);
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

/// Element-wise (Hadamard) product of two equal-length vectors.
pub fn hadamard(a: &[f64], b: &[f64]) -> Vec<f64> {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).collect()
}

/// `v -= scale * g`, element-wise and in place.
pub fn sub_scaled(v: &mut [f64], g: &[f64], scale: f64) {
    assert_eq!(v.len(), g.len());
    for (x, d) in v.iter_mut().zip(g) {
        *x -= scale * d;
    }
}
