//! Dense travel time matrix.

/// A dense n×n travel time matrix stored in row-major order.
///
/// Directed: `get(i, j)` and `get(j, i)` are independent entries, so
/// asymmetric networks (one-way streets, uphill vs. downhill) are supported.
///
/// # Examples
///
/// ```
/// use aco_tw::distance::TravelTimeMatrix;
///
/// let tm = TravelTimeMatrix::from_rows(vec![
///     vec![0.0, 30.0],
///     vec![30.0, 0.0],
/// ]).unwrap();
/// assert_eq!(tm.get(0, 1), 30.0);
/// assert_eq!(tm.size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TravelTimeMatrix {
    data: Vec<f64>,
    size: usize,
}

impl TravelTimeMatrix {
    /// Creates a travel time matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a matrix from an explicit grid of rows.
    ///
    /// Returns `None` if any row's length differs from the number of rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for row in rows {
            if row.len() != size {
                return None;
            }
            data.extend(row);
        }
        Some(Self { data, size })
    }

    /// Returns the travel time from node `from` to node `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the travel time from node `from` to node `to`.
    pub fn set(&mut self, from: usize, to: usize, travel_time: f64) {
        self.data[from * self.size + to] = travel_time;
    }

    /// Number of nodes covered by this matrix.
    pub fn size(&self) -> usize {
        self.size
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

    /// Returns a copy enlarged by one node at index `size()`.
    ///
    /// Existing entries are preserved; travel time between the new node and
    /// every existing node is `default_travel` in both directions, and zero
    /// on the diagonal.
    pub fn extended(&self, default_travel: f64) -> Self {
        let n = self.size + 1;
        let mut out = Self::new(n);
        for i in 0..self.size {
            for j in 0..self.size {
                out.set(i, j, self.get(i, j));
            }
            out.set(i, self.size, default_travel);
            out.set(self.size, i, default_travel);
        }
        out
    }
}
