use std::fmt;
use std::ops::{Index, IndexMut, Mul, MulAssign};

use serde::{Deserialize, Serialize};

use super::ops::container_ops;
use super::{
    coord_of, describe, error, offset_of, or_panic, validate_shape, ArrayError, ArrayInstance,
    Buffer, Coord, Element, ErrorKind, Matrix, Result, Vector,
};

/// An n-dimensional container, stored in row-major order (the last dimension varies fastest).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ShapedData<T>")]
pub struct ShapedArray<T> {
    shape: Vec<usize>,
    values: Buffer<T>,
}

/// An alias of [`ShapedArray`].
pub type NDArray<T> = ShapedArray<T>;

impl<T: Element> ShapedArray<T> {
    /// Construct a new array of zeros with the given `shape`.
    pub fn zeros(shape: Vec<usize>) -> Result<Self> {
        let size = validate_shape(&shape)?;
        let values = Buffer::allocate(size)?;
        Ok(Self { shape, values })
    }

    /// Construct a new array with the given `shape`, filled with `value`.
    pub fn filled(shape: Vec<usize>, value: T) -> Result<Self> {
        let size = validate_shape(&shape)?;
        let values = Buffer::filled(size, value)?;
        Ok(Self { shape, values })
    }

    /// Construct a new array with the given `shape` from its elements in row-major order.
    pub fn new(shape: Vec<usize>, values: Vec<T>) -> Result<Self> {
        Self::try_from(ShapedData {
            shape,
            values: values.into(),
        })
    }

    /// Construct a new 2-dimensional array from a list of equal-length rows.
    pub fn from_nested2(rows: Vec<Vec<T>>) -> Result<Self> {
        let shape = nested_shape(rows.len(), rows.iter().map(Vec::len))?;
        let values = rows.into_iter().flatten().collect::<Vec<T>>();
        Self::new(shape, values)
    }

    /// Construct a new 3-dimensional array from a list of equal-size matrices.
    pub fn from_nested3(sheets: Vec<Vec<Vec<T>>>) -> Result<Self> {
        let rows = nested_shape(sheets.len(), sheets.iter().map(Vec::len))?;
        let columns = nested_shape(
            rows[1],
            sheets.iter().flat_map(|sheet| sheet.iter().map(Vec::len)),
        )?;

        let shape = vec![rows[0], rows[1], columns[1]];
        let values = sheets
            .into_iter()
            .flatten()
            .flatten()
            .collect::<Vec<T>>();

        Self::new(shape, values)
    }

    /// The number of dimensions of this array.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn get(&self, coord: &[usize]) -> Result<T> {
        offset_of(&self.shape, coord).map(|offset| self.values[offset])
    }

    pub fn set(&mut self, coord: &[usize], value: T) -> Result<()> {
        let offset = offset_of(&self.shape, coord)?;
        self.values[offset] = value;
        Ok(())
    }

    /// Construct a new array of the same shape by applying `f` to every element.
    pub fn map<U: Element, F: Fn(T) -> U>(&self, f: F) -> ShapedArray<U> {
        ShapedArray {
            shape: self.shape.clone(),
            values: self.values.iter().copied().map(f).collect(),
        }
    }

    /// The coordinate of the element at the given row-major `offset`.
    ///
    /// Panics: if `offset` is not less than [`ArrayInstance::len`].
    pub fn coord_of(&self, offset: usize) -> Coord {
        coord_of(&self.shape, offset)
    }
}

// the shape of a nested list of `len` items with the given child lengths
fn nested_shape<I: Iterator<Item = usize>>(len: usize, mut children: I) -> Result<Vec<usize>> {
    let first = children.next().unwrap_or(0);

    if len == 0 || first == 0 {
        return Err(error(
            ErrorKind::RaggedShape,
            "a nested array must not be empty at any level",
        ));
    }

    match children.position(|child| child != first) {
        None => Ok(vec![len, first]),
        Some(i) => Err(error(
            ErrorKind::RaggedShape,
            format!("nested list {} does not have length {}", i + 1, first),
        )),
    }
}

impl<T: Element> ArrayInstance for ShapedArray<T> {
    type DType = T;

    fn shape(&self) -> Vec<usize> {
        self.shape.clone()
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
            shape: self.shape.clone(),
            values: buffer,
        }
    }

    fn into_buffer(self) -> Buffer<T> {
        self.values
    }
}

container_ops!(ShapedArray);

impl<T: Element> Mul for &ShapedArray<T> {
    type Output = ShapedArray<T>;

    fn mul(self, other: Self) -> Self::Output {
        or_panic(super::ops::hadamard(self, other))
    }
}

impl<T: Element> MulAssign<&ShapedArray<T>> for ShapedArray<T> {
    fn mul_assign(&mut self, other: &ShapedArray<T>) {
        let product = &*self * other;
        *self = product;
    }
}

impl<T: Element> Index<&[usize]> for ShapedArray<T> {
    type Output = T;

    fn index(&self, coord: &[usize]) -> &T {
        let offset = or_panic(offset_of(&self.shape, coord));
        &self.values[offset]
    }
}

impl<T: Element> IndexMut<&[usize]> for ShapedArray<T> {
    fn index_mut(&mut self, coord: &[usize]) -> &mut T {
        let offset = or_panic(offset_of(&self.shape, coord));
        &mut self.values[offset]
    }
}

impl<T: Element> From<Matrix<T>> for ShapedArray<T> {
    fn from(matrix: Matrix<T>) -> Self {
        Self {
            shape: matrix.shape(),
            values: matrix.into_buffer(),
        }
    }
}

impl<T: Element> TryFrom<Vector<T>> for ShapedArray<T> {
    type Error = ArrayError;

    fn try_from(vector: Vector<T>) -> Result<Self> {
        Self::try_from(ShapedData {
            shape: vector.shape(),
            values: vector.into_buffer(),
        })
    }
}

impl<T: Element> TryFrom<ShapedArray<T>> for Matrix<T> {
    type Error = ArrayError;

    fn try_from(array: ShapedArray<T>) -> Result<Self> {
        match array.shape.as_slice() {
            [rows, columns] => Matrix::new(*rows, *columns, array.values.into_vec()),
            shape => Err(error(
                ErrorKind::ShapeMismatch,
                format!("cannot convert an array of shape {:?} into a Matrix", shape),
            )),
        }
    }
}

impl<T: Element> TryFrom<ShapedArray<T>> for Vector<T> {
    type Error = ArrayError;

    fn try_from(array: ShapedArray<T>) -> Result<Self> {
        if array.rank() == 1 {
            Ok(Vector::from(array.values))
        } else {
            Err(error(
                ErrorKind::ShapeMismatch,
                format!(
                    "cannot convert an array of shape {:?} into a Vector",
                    array.shape
                ),
            ))
        }
    }
}

#[derive(Deserialize)]
struct ShapedData<T> {
    shape: Vec<usize>,
    values: Buffer<T>,
}

impl<T> TryFrom<ShapedData<T>> for ShapedArray<T> {
    type Error = ArrayError;

    fn try_from(data: ShapedData<T>) -> Result<Self> {
        let ShapedData { shape, values } = data;

        let size = validate_shape(&shape)?;
        if values.len() != size {
            return Err(error(
                ErrorKind::LengthMismatch,
                format!(
                    "an array of shape {:?} needs {} values, not {}",
                    shape,
                    size,
                    values.len()
                ),
            ));
        }

        Ok(Self { shape, values })
    }
}

impl<T: Element> fmt::Debug for ShapedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<T: Element> fmt::Display for ShapedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let dims: Vec<String> = self.shape.iter().map(usize::to_string).collect();
        writeln!(f, "{} ShapedArray<{}>", dims.join("x"), T::DTYPE)?;
        f.write_str(&describe(self.values(), &self.shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let zeros = ShapedArray::<f32>::zeros(vec![2, 3, 4]).unwrap();
        assert_eq!(zeros.len(), 24);
        assert_eq!(zeros.rank(), 3);

        let nested = ShapedArray::from_nested3(vec![
            vec![vec![1, 2, 3], vec![4, 5, 6]],
            vec![vec![7, 8, 9], vec![10, 11, 12]],
        ])
        .unwrap();

        let flat = ShapedArray::new(vec![2, 2, 3], (1..=12).collect()).unwrap();
        assert_eq!(nested, flat);

        let matrix = ShapedArray::from_nested2(vec![vec![1., 2.], vec![3., 4.]]).unwrap();
        assert_eq!(matrix.shape(), vec![2, 2]);
    }

    #[test]
    fn test_invalid_constructors() {
        let kind = |result: Result<ShapedArray<i32>>| result.unwrap_err().kind();

        assert_eq!(kind(ShapedArray::zeros(vec![])), ErrorKind::InvalidSize);
        assert_eq!(kind(ShapedArray::filled(vec![2, 0], 1)), ErrorKind::InvalidSize);
        assert_eq!(kind(ShapedArray::new(vec![2, 2], vec![1])), ErrorKind::LengthMismatch);
        assert_eq!(kind(ShapedArray::from_nested2(vec![])), ErrorKind::RaggedShape);
        assert_eq!(
            kind(ShapedArray::from_nested2(vec![vec![1], vec![2, 3]])),
            ErrorKind::RaggedShape
        );
        assert_eq!(
            kind(ShapedArray::from_nested3(vec![
                vec![vec![1, 2], vec![3, 4]],
                vec![vec![5, 6], vec![7]],
            ])),
            ErrorKind::RaggedShape
        );
        assert_eq!(
            kind(ShapedArray::from_nested3(vec![
                vec![vec![1, 2], vec![3, 4]],
                vec![vec![5, 6]],
            ])),
            ErrorKind::RaggedShape
        );
    }

    #[test]
    fn test_index() {
        let mut array = ShapedArray::new(vec![2, 2, 3], (1..=12).collect()).unwrap();
        assert_eq!(array[&[1, 0, 2][..]], 9);
        assert_eq!(array.get(&[0, 1, 0]).unwrap(), 4);

        array.set(&[1, 1, 2], 0).unwrap();
        assert_eq!(array[&[1, 1, 2][..]], 0);
        assert_eq!(array.coord_of(8), vec![1, 0, 2]);

        let cause = array.get(&[0, 2, 0]).unwrap_err();
        assert_eq!(cause.kind(), ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn test_conversions() {
        let matrix = Matrix::new(2, 2, vec![1, 2, 3, 4]).unwrap();
        let array = ShapedArray::from(matrix.clone());
        assert_eq!(array.shape(), vec![2, 2]);
        assert_eq!(Matrix::try_from(array).unwrap(), matrix);

        let vector = Vector::from(vec![1., 2., 3.]);
        let array = ShapedArray::try_from(vector.clone()).unwrap();
        assert_eq!(Vector::try_from(array.clone()).unwrap(), vector);

        let cause = Matrix::try_from(array).unwrap_err();
        assert_eq!(cause.kind(), ErrorKind::ShapeMismatch);

        let empty = Vector::<f64>::from(vec![]);
        let cause = ShapedArray::try_from(empty).unwrap_err();
        assert_eq!(cause.kind(), ErrorKind::InvalidSize);
    }

    #[test]
    fn test_display() {
        let array = ShapedArray::new(vec![2, 2, 3], (1..=12).collect()).unwrap();
        let expected = concat!(
            "2x2x3 ShapedArray<i32>\n",
            "⎛ ⎛  1   2   3 ⎞ ⎞\n",
            "⎜ ⎝  4   5   6 ⎠ ⎟\n",
            "⎜                ⎟\n",
            "⎜ ⎛  7   8   9 ⎞ ⎟\n",
            "⎝ ⎝ 10  11  12 ⎠ ⎠"
        );

        assert_eq!(array.to_string(), expected);
    }

    #[test]
    fn test_serde() {
        let array = ShapedArray::new(vec![1, 2, 2], vec![1, 2, 3, 4]).unwrap();
        let json = serde_json::to_string(&array).unwrap();
        assert_eq!(json, r#"{"shape":[1,2,2],"values":[1,2,3,4]}"#);
        assert_eq!(serde_json::from_str::<ShapedArray<i32>>(&json).unwrap(), array);

        let invalid = r#"{"shape":[2,0],"values":[]}"#;
        assert!(serde_json::from_str::<ShapedArray<i32>>(invalid).is_err());
    }
}
