use std::fmt;
use std::ops::{Index, IndexMut, Mul, MulAssign};

use serde::{Deserialize, Serialize};

use super::ops::container_ops;
use super::{
    describe, error, or_panic, validate_shape, ArrayError, ArrayInstance, Buffer, Element,
    ErrorKind, Result,
};

/// A rank-2 container, stored in row-major order.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixData<T>")]
pub struct Matrix<T> {
    rows: usize,
    columns: usize,
    values: Buffer<T>,
}

impl<T: Element> Matrix<T> {
    /// Construct a new `rows x columns` matrix of zeros.
    pub fn zeros(rows: usize, columns: usize) -> Result<Self> {
        let size = validate_shape(&[rows, columns])?;
        let values = Buffer::allocate(size)?;
        Ok(Self {
            rows,
            columns,
            values,
        })
    }

    /// Construct a new `rows x columns` matrix filled with `value`.
    pub fn filled(rows: usize, columns: usize, value: T) -> Result<Self> {
        let size = validate_shape(&[rows, columns])?;
        let values = Buffer::filled(size, value)?;
        Ok(Self {
            rows,
            columns,
            values,
        })
    }

    /// Construct a new `rows x columns` matrix from its elements in row-major order.
    pub fn new(rows: usize, columns: usize, values: Vec<T>) -> Result<Self> {
        Self::try_from(MatrixData {
            rows,
            columns,
            values: values.into(),
        })
    }

    /// Construct a new matrix from a list of equal-length rows.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);

        if columns == 0 {
            return Err(error(
                ErrorKind::RaggedShape,
                "a matrix needs at least one row and one column",
            ));
        }

        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != columns) {
            return Err(error(
                ErrorKind::RaggedShape,
                format!(
                    "row {} has {} columns but row 0 has {}",
                    i,
                    row.len(),
                    columns
                ),
            ));
        }

        let num_rows = rows.len();
        let values = rows.into_iter().flatten().collect();
        Ok(Self {
            rows: num_rows,
            columns,
            values,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Copy the given `row` out of this matrix.
    pub fn row(&self, row: usize) -> Result<Vec<T>> {
        if row < self.rows {
            let start = row * self.columns;
            Ok(self.values[start..start + self.columns].to_vec())
        } else {
            Err(self.out_of_range(row, 0))
        }
    }

    pub fn get(&self, row: usize, column: usize) -> Result<T> {
        self.offset(row, column).map(|offset| self.values[offset])
    }

    pub fn set(&mut self, row: usize, column: usize, value: T) -> Result<()> {
        let offset = self.offset(row, column)?;
        self.values[offset] = value;
        Ok(())
    }

    fn offset(&self, row: usize, column: usize) -> Result<usize> {
        if row < self.rows && column < self.columns {
            Ok(row * self.columns + column)
        } else {
            Err(self.out_of_range(row, column))
        }
    }

    fn out_of_range(&self, row: usize, column: usize) -> ArrayError {
        error(
            ErrorKind::IndexOutOfRange,
            format!(
                "({}, {}) is out of range for a {}x{} Matrix",
                row, column, self.rows, self.columns
            ),
        )
    }
}

impl<T: Element> ArrayInstance for Matrix<T> {
    type DType = T;

    fn shape(&self) -> Vec<usize> {
        vec![self.rows, self.columns]
    }

    fn buffer(&self) -> &Buffer<T> {
        &self.values
    }

    fn buffer_mut(&mut self) -> &mut Buffer<T> {
        &mut self.values
    }

    fn with_buffer(&self, buffer: Buffer<T>) -> Self {
        debug_assert_eq!(buffer.len(), self.len());

        Self {
            rows: self.rows,
            columns: self.columns,
            values: buffer,
        }
    }

    fn into_buffer(self) -> Buffer<T> {
        self.values
    }
}

container_ops!(Matrix);

/// The matrix product; see [`Matrix::matmul`].
impl<T: Element> Mul for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, other: Self) -> Self::Output {
        or_panic(self.matmul(other))
    }
}

impl<T: Element> MulAssign<&Matrix<T>> for Matrix<T> {
    fn mul_assign(&mut self, other: &Matrix<T>) {
        let product = &*self * other;
        *self = product;
    }
}

impl<T: Element> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, column): (usize, usize)) -> &T {
        let offset = or_panic(self.offset(row, column));
        &self.values[offset]
    }
}

impl<T: Element> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut T {
        let offset = or_panic(self.offset(row, column));
        &mut self.values[offset]
    }
}

#[derive(Deserialize)]
struct MatrixData<T> {
    rows: usize,
    columns: usize,
    values: Buffer<T>,
}

impl<T> TryFrom<MatrixData<T>> for Matrix<T> {
    type Error = ArrayError;

    fn try_from(data: MatrixData<T>) -> Result<Self> {
        let MatrixData {
            rows,
            columns,
            values,
        } = data;

        let size = validate_shape(&[rows, columns])?;
        if values.len() != size {
            return Err(error(
                ErrorKind::LengthMismatch,
                format!(
                    "a {}x{} matrix needs {} values, not {}",
                    rows,
                    columns,
                    size,
                    values.len()
                ),
            ));
        }

        Ok(Self {
            rows,
            columns,
            values,
        })
    }
}

impl<T: Element> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<T: Element> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}x{} Matrix<{}>", self.rows, self.columns, T::DTYPE)?;
        f.write_str(&describe(self.values(), &[self.rows, self.columns]))
    }
}
